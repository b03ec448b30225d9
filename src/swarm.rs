use crate::columns::ColumnSpec;
use crate::dataset::Table;
use crate::explore::quantile_sorted;

pub const P_LOW: f64 = 0.33;
pub const P_HIGH: f64 = 0.67;
const JITTER_SPAN: f64 = 0.5;

/// Tercile band for one record's metric value. For a lower-is-better
/// metric the bands are inverted (low values land in `Strong`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Weak,
    Middle,
    Strong,
}

#[derive(Debug, Clone)]
pub struct SwarmPoint {
    pub row: usize,
    pub player: String,
    pub value: f64,
    /// Deterministic vertical offset in [-0.25, 0.25] so dense strips
    /// stay readable without a randomness dependency.
    pub jitter: f64,
    pub band: Band,
    /// Index into the highlight list when this record is one of the up
    /// to two spotlighted players.
    pub highlight: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct SwarmData {
    pub metric: String,
    pub points: Vec<SwarmPoint>,
    pub p_low: f64,
    pub p_high: f64,
    pub lower_is_better: bool,
}

/// Distribution strip for one metric over the working subset. Rows with
/// a missing value for the metric are left out.
pub fn swarm_data(
    table: &Table,
    spec: &ColumnSpec,
    row_ids: &[usize],
    metric_col: usize,
    lower_is_better: bool,
    highlights: &[String],
) -> SwarmData {
    let mut values: Vec<f64> = row_ids
        .iter()
        .filter_map(|&row| table.cell(row, metric_col).as_num())
        .collect();
    values.sort_by(f64::total_cmp);
    let p_low = quantile_sorted(&values, P_LOW);
    let p_high = quantile_sorted(&values, P_HIGH);

    let highlights: Vec<String> = highlights
        .iter()
        .map(|h| h.trim().to_string())
        .filter(|h| !h.is_empty())
        .take(2)
        .collect();

    let points = row_ids
        .iter()
        .filter_map(|&row| {
            let value = table.cell(row, metric_col).as_num()?;
            let player = table.cell(row, spec.player).display();
            let highlight = highlights
                .iter()
                .position(|h| h == player.trim());
            Some(SwarmPoint {
                row,
                player,
                value,
                jitter: jitter_for(row),
                band: classify(value, p_low, p_high, lower_is_better),
                highlight,
            })
        })
        .collect();

    SwarmData {
        metric: table.columns[metric_col].clone(),
        points,
        p_low,
        p_high,
        lower_is_better,
    }
}

fn classify(value: f64, p_low: f64, p_high: f64, lower_is_better: bool) -> Band {
    if lower_is_better {
        if value <= p_low {
            Band::Strong
        } else if value <= p_high {
            Band::Middle
        } else {
            Band::Weak
        }
    } else if value <= p_low {
        Band::Weak
    } else if value <= p_high {
        Band::Middle
    } else {
        Band::Strong
    }
}

/// Knuth multiplicative hash mapped onto the jitter span; stable per
/// row so the picture does not shimmer across redraws.
fn jitter_for(row: usize) -> f64 {
    let h = (row as u64).wrapping_mul(2654435761) % 1000;
    (h as f64 / 1000.0 - 0.5) * JITTER_SPAN
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn table() -> (Table, ColumnSpec) {
        let table = Table {
            columns: vec!["Player".into(), "Season".into(), "Goals".into()],
            rows: (0..6)
                .map(|i| {
                    vec![
                        Cell::Text(format!("P{i}")),
                        Cell::Text("2024".into()),
                        if i == 5 { Cell::Missing } else { Cell::Num(i as f64) },
                    ]
                })
                .collect(),
        };
        let spec = ColumnSpec::resolve(&table).unwrap();
        (table, spec)
    }

    #[test]
    fn missing_metric_rows_are_dropped() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..6).collect();
        let data = swarm_data(&table, &spec, &rows, 2, false, &[]);
        assert_eq!(data.points.len(), 5);
        assert!(data.points.iter().all(|p| p.row != 5));
    }

    #[test]
    fn bands_follow_terciles_and_invert() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..6).collect();
        let normal = swarm_data(&table, &spec, &rows, 2, false, &[]);
        assert_eq!(normal.points[0].band, Band::Weak);
        assert_eq!(normal.points[4].band, Band::Strong);

        let inverted = swarm_data(&table, &spec, &rows, 2, true, &[]);
        assert_eq!(inverted.points[0].band, Band::Strong);
        assert_eq!(inverted.points[4].band, Band::Weak);
    }

    #[test]
    fn highlight_matches_at_most_two_players() {
        let (table, spec) = table();
        let rows: Vec<usize> = (0..6).collect();
        let data = swarm_data(
            &table,
            &spec,
            &rows,
            2,
            false,
            &["P1".to_string(), "P3".to_string(), "P4".to_string()],
        );
        let marked: Vec<(usize, usize)> = data
            .points
            .iter()
            .filter_map(|p| p.highlight.map(|h| (p.row, h)))
            .collect();
        assert_eq!(marked, vec![(1, 0), (3, 1)]);
    }

    #[test]
    fn jitter_is_deterministic_and_bounded() {
        assert_eq!(jitter_for(7), jitter_for(7));
        for row in 0..200 {
            assert!(jitter_for(row).abs() <= JITTER_SPAN / 2.0);
        }
    }
}
