use std::collections::HashSet;

use crate::dataset::{Cell, Table};

/// Headline numbers for the Explore screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    pub rows: usize,
    pub columns: usize,
    pub missing_cells: usize,
    pub duplicate_rows: usize,
}

pub fn overview(table: &Table) -> Overview {
    let missing_cells = table
        .rows
        .iter()
        .flat_map(|row| row.iter())
        .filter(|cell| cell.is_missing())
        .count();

    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicate_rows = 0usize;
    for row in &table.rows {
        let key = row
            .iter()
            .map(Cell::display)
            .collect::<Vec<_>>()
            .join("\u{1f}");
        if !seen.insert(key) {
            duplicate_rows += 1;
        }
    }

    Overview {
        rows: table.rows.len(),
        columns: table.columns.len(),
        missing_cells,
        duplicate_rows,
    }
}

/// Per-column missing percentage, worst first, capped at `top_n`.
pub fn missing_by_column(table: &Table, top_n: usize) -> Vec<(String, f64)> {
    if table.rows.is_empty() {
        return Vec::new();
    }
    let n = table.rows.len() as f64;
    let mut out: Vec<(String, f64)> = table
        .columns
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let missing = table
                .rows
                .iter()
                .filter(|row| row[col].is_missing())
                .count() as f64;
            (name.clone(), 100.0 * missing / n)
        })
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out.truncate(top_n);
    out
}

#[derive(Debug, Clone)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

/// Describe every numeric column: count / mean / std / min / median /
/// max over the non-missing values.
pub fn numeric_describe(table: &Table) -> Vec<ColumnSummary> {
    table
        .numeric_columns()
        .into_iter()
        .filter_map(|col| {
            let mut values: Vec<f64> = table
                .rows
                .iter()
                .filter_map(|row| row[col].as_num())
                .collect();
            if values.is_empty() {
                return None;
            }
            values.sort_by(f64::total_cmp);
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>()
                / count as f64;
            Some(ColumnSummary {
                name: table.columns[col].clone(),
                count,
                mean,
                std: var.sqrt(),
                min: values[0],
                median: quantile_sorted(&values, 0.5),
                max: values[count - 1],
            })
        })
        .collect()
}

/// Quantile with linear interpolation between order statistics. Input
/// must already be sorted ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = pos - lo as f64;
        sorted[lo] * (1.0 - frac) + sorted[hi] * frac
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table {
            columns: vec!["Player".into(), "Goals".into()],
            rows: vec![
                vec![Cell::Text("Ana".into()), Cell::Num(2.0)],
                vec![Cell::Text("Bea".into()), Cell::Missing],
                vec![Cell::Text("Ana".into()), Cell::Num(2.0)],
                vec![Cell::Text("Caro".into()), Cell::Num(6.0)],
            ],
        }
    }

    #[test]
    fn overview_counts_missing_and_duplicates() {
        let ov = overview(&table());
        assert_eq!(
            ov,
            Overview {
                rows: 4,
                columns: 2,
                missing_cells: 1,
                duplicate_rows: 1,
            }
        );
    }

    #[test]
    fn missing_by_column_sorted_descending() {
        let out = missing_by_column(&table(), 10);
        assert_eq!(out[0].0, "Goals");
        assert!((out[0].1 - 25.0).abs() < 1e-9);
        assert_eq!(out[1].1, 0.0);
    }

    #[test]
    fn describe_skips_missing_values() {
        let out = numeric_describe(&table());
        assert_eq!(out.len(), 1);
        let goals = &out[0];
        assert_eq!(goals.count, 3);
        assert!((goals.mean - 10.0 / 3.0).abs() < 1e-9);
        assert_eq!(goals.min, 2.0);
        assert_eq!(goals.max, 6.0);
        assert_eq!(goals.median, 2.0);
    }

    #[test]
    fn quantile_interpolates() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(quantile_sorted(&values, 0.0), 1.0);
        assert_eq!(quantile_sorted(&values, 1.0), 4.0);
        assert!((quantile_sorted(&values, 0.5) - 2.5).abs() < 1e-9);
    }
}
