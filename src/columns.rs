use anyhow::{Result, anyhow};

use crate::dataset::Table;

/// Column layout resolved once per loaded table. Everything downstream
/// works with indices from here instead of re-probing headers.
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub player: usize,
    pub season: usize,
    pub country: Option<usize>,
    pub league: Option<usize>,
    pub team: Option<usize>,
    pub foot: Option<usize>,
    pub position: Option<usize>,
    pub minutes: Option<usize>,
    pub age: Option<usize>,
}

impl ColumnSpec {
    /// Player and season are mandatory; the descriptive columns are
    /// optional and simply disable the filters that need them.
    pub fn resolve(table: &Table) -> Result<Self> {
        let player = table
            .column_index("Player")
            .ok_or_else(|| anyhow!("dataset has no 'Player' column"))?;
        let season = table
            .column_index("Season")
            .ok_or_else(|| anyhow!("dataset has no 'Season' column"))?;
        Ok(Self {
            player,
            season,
            country: table.column_index("Country"),
            league: table.column_index("League"),
            team: table.column_index("Team"),
            foot: table.column_index("Foot"),
            position: table.column_index("Position"),
            minutes: table.column_index("Minutes played"),
            age: table.column_index("Age"),
        })
    }
}

/// Resolve a KPI name list against the table, keeping order and dropping
/// anything absent or non-numeric. An empty result is the caller's cue
/// to raise `InsufficientFeatures` before modeling.
pub fn resolve_kpis(table: &Table, names: &[String]) -> Vec<usize> {
    names
        .iter()
        .filter_map(|name| table.column_index(name))
        .filter(|&col| table.is_numeric_column(col))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn sample_table() -> Table {
        Table {
            columns: vec![
                "Player".into(),
                "Season".into(),
                "Goals".into(),
                "Foot".into(),
            ],
            rows: vec![vec![
                Cell::Text("A".into()),
                Cell::Text("2023".into()),
                Cell::Num(3.0),
                Cell::Text("Left".into()),
            ]],
        }
    }

    #[test]
    fn resolve_requires_player_and_season() {
        let table = sample_table();
        let spec = ColumnSpec::resolve(&table).unwrap();
        assert_eq!(spec.player, 0);
        assert_eq!(spec.season, 1);
        assert_eq!(spec.foot, Some(3));
        assert_eq!(spec.minutes, None);

        let headless = Table {
            columns: vec!["Season".into()],
            rows: Vec::new(),
        };
        assert!(ColumnSpec::resolve(&headless).is_err());
    }

    #[test]
    fn resolve_kpis_keeps_order_and_drops_text_columns() {
        let table = sample_table();
        let kpis = resolve_kpis(
            &table,
            &["Goals".to_string(), "Foot".to_string(), "Missing".to_string()],
        );
        assert_eq!(kpis, vec![2]);
    }
}
