use std::collections::BTreeSet;

use crate::columns::ColumnSpec;
use crate::dataset::{Cell, Table};

/// Working-subset selection. Empty allow-lists mean "no restriction",
/// mirroring an unchecked multi-select. A filter whose backing column is
/// absent from the table is disabled, not a reject-all.
#[derive(Debug, Clone, Default)]
pub struct Filters {
    pub seasons: Vec<String>,
    pub countries: Vec<String>,
    pub leagues: Vec<String>,
    pub teams: Vec<String>,
    pub feet: Vec<String>,
    pub position_contains: String,
    pub min_minutes: Option<f64>,
}

impl Filters {
    pub fn is_empty(&self) -> bool {
        self.seasons.is_empty()
            && self.countries.is_empty()
            && self.leagues.is_empty()
            && self.teams.is_empty()
            && self.feet.is_empty()
            && self.position_contains.is_empty()
            && self.min_minutes.is_none()
    }

    /// Row indices surviving all filters, in original table order.
    pub fn apply(&self, table: &Table, spec: &ColumnSpec) -> Vec<usize> {
        (0..table.rows.len())
            .filter(|&row| self.keeps(table, spec, row))
            .collect()
    }

    fn keeps(&self, table: &Table, spec: &ColumnSpec, row: usize) -> bool {
        if !allow_list_matches(table, row, Some(spec.season), &self.seasons) {
            return false;
        }
        if !allow_list_matches(table, row, spec.country, &self.countries) {
            return false;
        }
        if !allow_list_matches(table, row, spec.league, &self.leagues) {
            return false;
        }
        if !allow_list_matches(table, row, spec.team, &self.teams) {
            return false;
        }
        if !allow_list_matches(table, row, spec.foot, &self.feet) {
            return false;
        }
        if !self.position_contains.is_empty() {
            if let Some(col) = spec.position {
                let hay = table.cell(row, col).display().to_lowercase();
                if !hay.contains(&self.position_contains.to_lowercase()) {
                    return false;
                }
            }
        }
        if let (Some(min), Some(col)) = (self.min_minutes, spec.minutes) {
            match table.cell(row, col).as_num() {
                Some(v) if v >= min => {}
                _ => return false,
            }
        }
        true
    }
}

fn allow_list_matches(table: &Table, row: usize, col: Option<usize>, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    // No backing column: the filter is disabled, not a reject-all.
    let Some(col) = col else {
        return true;
    };
    let value = table.cell(row, col).display();
    allowed.iter().any(|a| a == &value)
}

/// Distinct non-missing values of a column, sorted, for the UI pickers.
pub fn distinct_values(table: &Table, col: usize) -> Vec<String> {
    let mut set = BTreeSet::new();
    for row in &table.rows {
        match &row[col] {
            Cell::Missing => {}
            cell => {
                set.insert(cell.display());
            }
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> (Table, ColumnSpec) {
        let table = Table {
            columns: vec![
                "Player".into(),
                "Season".into(),
                "Team".into(),
                "Position".into(),
                "Minutes played".into(),
            ],
            rows: vec![
                vec![
                    Cell::Text("Ana".into()),
                    Cell::Text("2023".into()),
                    Cell::Text("River".into()),
                    Cell::Text("Centre Forward".into()),
                    Cell::Num(1800.0),
                ],
                vec![
                    Cell::Text("Bea".into()),
                    Cell::Text("2024".into()),
                    Cell::Text("Boca".into()),
                    Cell::Text("Left Winger".into()),
                    Cell::Num(250.0),
                ],
                vec![
                    Cell::Text("Caro".into()),
                    Cell::Text("2023".into()),
                    Cell::Text("River".into()),
                    Cell::Text("Right Winger".into()),
                    Cell::Missing,
                ],
            ],
        };
        let spec = ColumnSpec::resolve(&table).unwrap();
        (table, spec)
    }

    #[test]
    fn empty_filters_keep_everything() {
        let (table, spec) = table();
        assert_eq!(Filters::default().apply(&table, &spec), vec![0, 1, 2]);
    }

    #[test]
    fn season_and_team_allow_lists() {
        let (table, spec) = table();
        let filters = Filters {
            seasons: vec!["2023".into()],
            teams: vec!["River".into()],
            ..Filters::default()
        };
        assert_eq!(filters.apply(&table, &spec), vec![0, 2]);
    }

    #[test]
    fn position_contains_is_case_insensitive() {
        let (table, spec) = table();
        let filters = Filters {
            position_contains: "winger".into(),
            ..Filters::default()
        };
        assert_eq!(filters.apply(&table, &spec), vec![1, 2]);
    }

    #[test]
    fn min_minutes_drops_missing_values() {
        let (table, spec) = table();
        let filters = Filters {
            min_minutes: Some(300.0),
            ..Filters::default()
        };
        assert_eq!(filters.apply(&table, &spec), vec![0]);
    }

    #[test]
    fn filters_without_backing_columns_are_disabled() {
        let table = Table {
            columns: vec!["Player".into(), "Season".into(), "Goals".into()],
            rows: (0..3)
                .map(|i| {
                    vec![
                        Cell::Text(format!("P{i}")),
                        Cell::Text("2024".into()),
                        Cell::Num(i as f64),
                    ]
                })
                .collect(),
        };
        let spec = ColumnSpec::resolve(&table).unwrap();
        assert_eq!(spec.minutes, None);

        // A minutes floor with no minutes column must not empty the pool.
        let filters = Filters {
            min_minutes: Some(50.0),
            ..Filters::default()
        };
        assert_eq!(filters.apply(&table, &spec), vec![0, 1, 2]);

        // Same for allow-lists and position text on absent columns.
        let filters = Filters {
            teams: vec!["River".into()],
            position_contains: "winger".into(),
            ..Filters::default()
        };
        assert_eq!(filters.apply(&table, &spec), vec![0, 1, 2]);
    }

    #[test]
    fn distinct_values_sorted_without_missing() {
        let (table, _) = table();
        assert_eq!(distinct_values(&table, 2), vec!["Boca", "River"]);
    }
}
