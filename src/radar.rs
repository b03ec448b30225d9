use std::f64::consts::TAU;

use anyhow::{Result, anyhow};

use crate::columns::ColumnSpec;
use crate::dataset::Table;
use crate::explore::quantile_sorted;

pub const Q_LOW: f64 = 0.10;
pub const Q_HIGH: f64 = 0.90;

#[derive(Debug, Clone)]
pub struct RadarAxis {
    pub metric: String,
    pub low: f64,
    pub high: f64,
    pub lower_is_better: bool,
}

#[derive(Debug, Clone)]
pub struct RadarProfile {
    pub name: String,
    /// Raw metric values in axis order; NaN when the player is missing
    /// a value (drawn at the center).
    pub values: Vec<f64>,
    /// Polygon vertices, one per axis, radius normalized to [0, 1].
    pub vertices: Vec<(f64, f64)>,
}

#[derive(Debug, Clone)]
pub struct RadarData {
    pub axes: Vec<RadarAxis>,
    pub mean: Vec<f64>,
    pub median: Vec<f64>,
    pub profiles: Vec<RadarProfile>,
}

/// Radar geometry for up to two compared players over a metric list.
/// Axis bounds come from the q10/q90 quantiles of the working subset so
/// one outlier cannot flatten everyone else's shape.
pub fn radar_data(
    table: &Table,
    spec: &ColumnSpec,
    row_ids: &[usize],
    metric_cols: &[usize],
    lower_is_better: &[String],
    players: &[String],
) -> Result<RadarData> {
    let metric_cols: Vec<usize> = metric_cols
        .iter()
        .copied()
        .filter(|&col| table.is_numeric_column(col))
        .collect();
    if metric_cols.is_empty() {
        return Err(anyhow!("no numeric metrics available for the radar"));
    }

    let mut axes = Vec::with_capacity(metric_cols.len());
    let mut mean = Vec::with_capacity(metric_cols.len());
    let mut median = Vec::with_capacity(metric_cols.len());
    for &col in &metric_cols {
        let mut values: Vec<f64> = row_ids
            .iter()
            .filter_map(|&row| table.cell(row, col).as_num())
            .collect();
        values.sort_by(f64::total_cmp);
        let name = table.columns[col].clone();
        axes.push(RadarAxis {
            low: quantile_sorted(&values, Q_LOW),
            high: quantile_sorted(&values, Q_HIGH),
            lower_is_better: lower_is_better.iter().any(|m| m == &name),
            metric: name,
        });
        mean.push(if values.is_empty() {
            f64::NAN
        } else {
            values.iter().sum::<f64>() / values.len() as f64
        });
        median.push(quantile_sorted(&values, 0.5));
    }

    let profiles = players
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .take(2)
        .map(|player| {
            let values = player_values(table, spec, row_ids, &metric_cols, player);
            let vertices = polygon(&axes, &values);
            RadarProfile {
                name: player.to_string(),
                values,
                vertices,
            }
        })
        .collect();

    Ok(RadarData {
        axes,
        mean,
        median,
        profiles,
    })
}

/// First matching row wins, like a single-row lookup by display name.
fn player_values(
    table: &Table,
    spec: &ColumnSpec,
    row_ids: &[usize],
    metric_cols: &[usize],
    player: &str,
) -> Vec<f64> {
    let row = row_ids
        .iter()
        .copied()
        .find(|&row| table.cell(row, spec.player).display().trim() == player);
    match row {
        Some(row) => metric_cols
            .iter()
            .map(|&col| table.cell(row, col).as_num().unwrap_or(f64::NAN))
            .collect(),
        None => vec![f64::NAN; metric_cols.len()],
    }
}

/// Map values onto unit-radius polygon vertices. Axis k points at angle
/// `TAU * k / n`, starting at three o'clock.
pub fn polygon(axes: &[RadarAxis], values: &[f64]) -> Vec<(f64, f64)> {
    let n = axes.len();
    axes.iter()
        .zip(values)
        .enumerate()
        .map(|(k, (axis, &value))| {
            let r = normalized_radius(axis, value);
            let angle = TAU * k as f64 / n as f64;
            (r * angle.cos(), r * angle.sin())
        })
        .collect()
}

fn normalized_radius(axis: &RadarAxis, value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let span = axis.high - axis.low;
    if span.abs() <= f64::EPSILON {
        return 0.5;
    }
    let r = ((value - axis.low) / span).clamp(0.0, 1.0);
    if axis.lower_is_better { 1.0 - r } else { r }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn table() -> (Table, ColumnSpec) {
        let table = Table {
            columns: vec![
                "Player".into(),
                "Season".into(),
                "Goals".into(),
                "Losses".into(),
            ],
            rows: (0..11)
                .map(|i| {
                    vec![
                        Cell::Text(format!("P{i}")),
                        Cell::Text("2024".into()),
                        Cell::Num(i as f64),
                        Cell::Num(10.0 - i as f64),
                    ]
                })
                .collect(),
        };
        let spec = ColumnSpec::resolve(&table).unwrap();
        (table, spec)
    }

    #[test]
    fn axes_use_decile_bounds() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..11).collect();
        let data = radar_data(&table, &spec, &rows, &[2, 3], &[], &[]).unwrap();
        assert!((data.axes[0].low - 1.0).abs() < 1e-9);
        assert!((data.axes[0].high - 9.0).abs() < 1e-9);
        assert!((data.median[0] - 5.0).abs() < 1e-9);
    }

    #[test]
    fn lower_is_better_inverts_radius() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..11).collect();
        let data = radar_data(
            &table,
            &spec,
            &rows,
            &[2, 3],
            &["Losses".to_string()],
            &["P10".to_string()],
        )
        .unwrap();
        let profile = &data.profiles[0];
        // P10 maxes Goals and minimizes Losses, so both radii hit 1.0.
        let r0 = (profile.vertices[0].0.powi(2) + profile.vertices[0].1.powi(2)).sqrt();
        let r1 = (profile.vertices[1].0.powi(2) + profile.vertices[1].1.powi(2)).sqrt();
        assert!((r0 - 1.0).abs() < 1e-9);
        assert!((r1 - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_player_sits_at_center() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..11).collect();
        let data =
            radar_data(&table, &spec, &rows, &[2], &[], &["Ghost".to_string()]).unwrap();
        assert!(data.profiles[0].values[0].is_nan());
        assert_eq!(data.profiles[0].vertices[0], (0.0, 0.0));
    }

    #[test]
    fn no_numeric_metrics_is_an_error() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..11).collect();
        assert!(radar_data(&table, &spec, &rows, &[0], &[], &[]).is_err());
    }
}
