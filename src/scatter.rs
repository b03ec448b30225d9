use std::collections::HashSet;

use crate::columns::ColumnSpec;
use crate::dataset::Table;
use crate::explore::quantile_sorted;

/// How a point is drawn and whether it gets a name label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointClass {
    /// The explicitly spotlighted player.
    Highlight,
    /// Member of the spotlighted team.
    TeamHighlight,
    /// Top-N on either axis.
    Top,
    Background,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefLine {
    Median,
    Mean,
}

#[derive(Debug, Clone)]
pub struct ScatterPoint {
    pub row: usize,
    pub player: String,
    pub team: String,
    pub x: f64,
    pub y: f64,
    pub class: PointClass,
}

#[derive(Debug, Clone)]
pub struct ScatterData {
    pub x_metric: String,
    pub y_metric: String,
    pub points: Vec<ScatterPoint>,
    pub ref_x: f64,
    pub ref_y: f64,
    pub ref_line: RefLine,
}

/// Two-metric comparison over the working subset. Rows missing either
/// metric are left out; reference cross-hairs sit at the median or mean
/// of each axis.
#[allow(clippy::too_many_arguments)]
pub fn scatter_data(
    table: &Table,
    spec: &ColumnSpec,
    row_ids: &[usize],
    x_col: usize,
    y_col: usize,
    highlight_player: Option<&str>,
    highlight_team: Option<&str>,
    top_n: usize,
    ref_line: RefLine,
) -> ScatterData {
    let usable: Vec<(usize, f64, f64)> = row_ids
        .iter()
        .filter_map(|&row| {
            let x = table.cell(row, x_col).as_num()?;
            let y = table.cell(row, y_col).as_num()?;
            Some((row, x, y))
        })
        .collect();

    let (ref_x, ref_y) = reference_point(&usable, ref_line);

    // Leaders on either axis get labeled.
    let mut top_rows: HashSet<usize> = HashSet::new();
    for key in [1usize, 2] {
        let mut sorted = usable.clone();
        sorted.sort_by(|a, b| {
            let (av, bv) = if key == 1 { (a.1, b.1) } else { (a.2, b.2) };
            bv.total_cmp(&av)
        });
        top_rows.extend(sorted.iter().take(top_n).map(|(row, _, _)| *row));
    }

    let highlight_player = highlight_player.map(str::trim).filter(|p| !p.is_empty());
    let highlight_team = highlight_team
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty());

    let points = usable
        .into_iter()
        .map(|(row, x, y)| {
            let player = table.cell(row, spec.player).display();
            let team = spec
                .team
                .map(|col| table.cell(row, col).display())
                .unwrap_or_default();
            let class = if highlight_player == Some(player.trim()) {
                PointClass::Highlight
            } else if highlight_team
                .as_deref()
                .is_some_and(|t| team.to_lowercase().contains(t))
            {
                PointClass::TeamHighlight
            } else if top_rows.contains(&row) {
                PointClass::Top
            } else {
                PointClass::Background
            };
            ScatterPoint {
                row,
                player,
                team,
                x,
                y,
                class,
            }
        })
        .collect();

    ScatterData {
        x_metric: table.columns[x_col].clone(),
        y_metric: table.columns[y_col].clone(),
        points,
        ref_x,
        ref_y,
        ref_line,
    }
}

fn reference_point(usable: &[(usize, f64, f64)], ref_line: RefLine) -> (f64, f64) {
    if usable.is_empty() {
        return (0.0, 0.0);
    }
    match ref_line {
        RefLine::Mean => {
            let n = usable.len() as f64;
            (
                usable.iter().map(|(_, x, _)| x).sum::<f64>() / n,
                usable.iter().map(|(_, _, y)| y).sum::<f64>() / n,
            )
        }
        RefLine::Median => {
            let mut xs: Vec<f64> = usable.iter().map(|(_, x, _)| *x).collect();
            let mut ys: Vec<f64> = usable.iter().map(|(_, _, y)| *y).collect();
            xs.sort_by(f64::total_cmp);
            ys.sort_by(f64::total_cmp);
            (quantile_sorted(&xs, 0.5), quantile_sorted(&ys, 0.5))
        }
    }
}
