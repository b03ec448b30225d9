use std::collections::VecDeque;
use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::columns::{ColumnSpec, resolve_kpis};
use crate::dataset::{self, Table};
use crate::filters::Filters;
use crate::scatter::RefLine;
use crate::similarity::{self, SimilarityOutput};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Explore,
    Swarm,
    Scatter,
    Radar,
    Similarity,
}

/// KPI defaults used when the dataset carries the usual per-90 columns
/// and `SCOUT_KPIS` is not set. Missing names are silently skipped at
/// resolution time.
pub const DEFAULT_KPIS: &[&str] = &[
    "Goals",
    "xG",
    "Assists",
    "xA",
    "Shots",
    "Key passes",
    "Dribbles",
    "Tackles",
    "Interceptions",
    "Duels won",
];

const MAX_DEFAULT_KPIS: usize = 10;

/// All cross-call state of the application. The similarity engine is a
/// pure function; everything it needs is handed in from here per call.
pub struct AppState {
    pub dataset_path: Option<PathBuf>,
    pub table: Table,
    pub spec: Option<ColumnSpec>,
    pub filters: Filters,
    /// Working subset: row ids surviving the filters, original order.
    pub subset: Vec<usize>,
    pub kpi_names: Vec<String>,
    pub lower_is_better: Vec<String>,

    pub screen: Screen,
    pub selected: usize,
    pub metric_idx: usize,
    pub scatter_x: usize,
    pub scatter_y: usize,
    pub ref_line: RefLine,
    pub compare_players: Vec<String>,

    pub similarity: Option<SimilarityOutput>,

    pub logs: VecDeque<String>,
    pub help_overlay: bool,
}

impl AppState {
    pub fn new() -> Self {
        let min_minutes = env::var("SCOUT_MIN_MINUTES")
            .ok()
            .and_then(|v| v.parse::<f64>().ok())
            .unwrap_or(300.0);
        Self {
            dataset_path: None,
            table: Table::default(),
            spec: None,
            filters: Filters {
                min_minutes: Some(min_minutes),
                ..Filters::default()
            },
            subset: Vec::new(),
            kpi_names: Vec::new(),
            lower_is_better: Vec::new(),
            screen: Screen::Explore,
            selected: 0,
            metric_idx: 0,
            scatter_x: 0,
            scatter_y: 1,
            ref_line: RefLine::Median,
            compare_players: Vec::new(),
            similarity: None,
            logs: VecDeque::with_capacity(200),
            help_overlay: false,
        }
    }

    pub fn load_dataset(&mut self, path: &Path) -> Result<()> {
        let table = dataset::load_table(path)
            .with_context(|| format!("load dataset {}", path.display()))?;
        self.dataset_path = Some(path.to_path_buf());
        self.set_table(table)
    }

    /// Install a table, resolve its column layout, pick default KPIs,
    /// and rebuild the working subset.
    pub fn set_table(&mut self, table: Table) -> Result<()> {
        let spec = ColumnSpec::resolve(&table)?;
        if spec.minutes.is_none() {
            // No minutes column: drop the floor so the header does not
            // advertise a filter that cannot apply.
            self.filters.min_minutes = None;
        }
        self.table = table;
        self.spec = Some(spec);
        self.kpi_names = self.default_kpis();
        self.similarity = None;
        self.selected = 0;
        self.refresh_subset();
        Ok(())
    }

    fn default_kpis(&self) -> Vec<String> {
        if let Ok(raw) = env::var("SCOUT_KPIS") {
            let names: Vec<String> = raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !names.is_empty() {
                return names;
            }
        }
        let preset: Vec<String> = DEFAULT_KPIS.iter().map(|s| s.to_string()).collect();
        if !resolve_kpis(&self.table, &preset).is_empty() {
            return preset;
        }
        // Unknown schema: fall back to the first numeric columns.
        self.table
            .numeric_columns()
            .into_iter()
            .take(MAX_DEFAULT_KPIS)
            .map(|col| self.table.columns[col].clone())
            .collect()
    }

    pub fn refresh_subset(&mut self) {
        let Some(spec) = &self.spec else {
            self.subset.clear();
            return;
        };
        self.subset = self.filters.apply(&self.table, spec);
        if self.selected >= self.subset.len() {
            self.selected = 0;
        }
    }

    pub fn numeric_cols(&self) -> Vec<usize> {
        self.table.numeric_columns()
    }

    /// (player, season) pairs of the working subset, for the reference
    /// picker on the Similarity screen.
    pub fn player_seasons(&self) -> Vec<(String, String)> {
        let Some(spec) = &self.spec else {
            return Vec::new();
        };
        self.subset
            .iter()
            .map(|&row| {
                (
                    self.table.cell(row, spec.player).display(),
                    self.table.cell(row, spec.season).display(),
                )
            })
            .collect()
    }

    /// Run the engine with the currently selected reference. Errors are
    /// user-correctable and land in the log instead of tearing the UI
    /// down.
    pub fn run_similarity(&mut self) {
        let Some(spec) = self.spec.clone() else {
            self.push_log("[WARN] No dataset loaded");
            return;
        };
        let pairs = self.player_seasons();
        let Some((player, season)) = pairs.get(self.selected).cloned() else {
            self.push_log("[INFO] No player-season selected");
            return;
        };
        match similarity::compute_similarity(
            &self.table,
            &spec,
            &self.subset,
            &self.kpi_names,
            &player,
            &season,
        ) {
            Ok(output) => {
                self.push_log(format!(
                    "[INFO] Similarity for {player} ({season}): {} candidates over {} KPIs",
                    output.ranked.len(),
                    output.kpi_names.len()
                ));
                self.similarity = Some(output);
            }
            Err(err) => {
                self.push_log(format!("[WARN] {err}"));
            }
        }
    }

    fn list_len(&self) -> usize {
        match self.screen {
            Screen::Explore => self.table.columns.len(),
            Screen::Swarm => self.numeric_cols().len(),
            Screen::Scatter | Screen::Radar | Screen::Similarity => self.subset.len(),
        }
    }

    pub fn select_next(&mut self) {
        let total = self.list_len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + 1) % total;
    }

    pub fn select_prev(&mut self) {
        let total = self.list_len();
        if total == 0 {
            self.selected = 0;
            return;
        }
        self.selected = (self.selected + total - 1) % total;
    }

    pub fn cycle_metric(&mut self) {
        let cols = self.numeric_cols();
        if cols.is_empty() {
            return;
        }
        self.metric_idx = (self.metric_idx + 1) % cols.len();
    }

    pub fn cycle_scatter_x(&mut self) {
        let cols = self.numeric_cols();
        if cols.is_empty() {
            return;
        }
        self.scatter_x = (self.scatter_x + 1) % cols.len();
    }

    pub fn cycle_scatter_y(&mut self) {
        let cols = self.numeric_cols();
        if cols.is_empty() {
            return;
        }
        self.scatter_y = (self.scatter_y + 1) % cols.len();
    }

    pub fn toggle_ref_line(&mut self) {
        self.ref_line = match self.ref_line {
            RefLine::Median => RefLine::Mean,
            RefLine::Mean => RefLine::Median,
        };
    }

    /// Toggle the selected player into the compare list (max two, FIFO).
    pub fn toggle_compare(&mut self) {
        let pairs = self.player_seasons();
        let Some((player, _)) = pairs.get(self.selected).cloned() else {
            return;
        };
        if let Some(pos) = self.compare_players.iter().position(|p| p == &player) {
            self.compare_players.remove(pos);
            return;
        }
        self.compare_players.push(player);
        while self.compare_players.len() > 2 {
            self.compare_players.remove(0);
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        const MAX_LOGS: usize = 200;
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Cell;

    fn small_table() -> Table {
        Table {
            columns: vec![
                "Player".into(),
                "Season".into(),
                "Goals".into(),
                "xG".into(),
            ],
            rows: (0..4)
                .map(|i| {
                    vec![
                        Cell::Text(format!("P{i}")),
                        Cell::Text("2024".into()),
                        Cell::Num(i as f64),
                        Cell::Num(i as f64 * 0.7),
                    ]
                })
                .collect(),
        }
    }

    #[test]
    fn set_table_resolves_defaults_and_subset() {
        let mut state = AppState::new();
        state.set_table(small_table()).unwrap();
        // No minutes column: the default floor must not empty the pool.
        assert_eq!(state.subset.len(), 4);
        assert!(!state.kpi_names.is_empty());
    }

    #[test]
    fn run_similarity_populates_output_and_log() {
        let mut state = AppState::new();
        state.set_table(small_table()).unwrap();
        state.selected = 1;
        state.run_similarity();
        let output = state.similarity.as_ref().expect("similarity should run");
        assert_eq!(output.modeled.len(), 4);
        assert_eq!(output.ranked.len(), 3);
        assert!(state.logs.back().unwrap().starts_with("[INFO]"));
    }

    #[test]
    fn compare_list_caps_at_two() {
        let mut state = AppState::new();
        state.set_table(small_table()).unwrap();
        for idx in 0..3 {
            state.selected = idx;
            state.toggle_compare();
        }
        assert_eq!(state.compare_players, vec!["P1", "P2"]);
    }
}
