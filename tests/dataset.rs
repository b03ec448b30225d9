use std::path::PathBuf;

use scout_terminal::columns::{ColumnSpec, resolve_kpis};
use scout_terminal::dataset::{Cell, load_table};
use scout_terminal::filters::Filters;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

#[test]
fn csv_fixture_loads_with_canonical_headers() {
    let table = load_table(&fixture_path("players_small.csv")).expect("fixture should load");
    assert_eq!(table.rows.len(), 4);
    assert_eq!(table.columns[0], "Player");
    assert_eq!(table.columns[1], "Season");
    assert_eq!(table.columns[6], "Position");
    assert_eq!(table.columns[7], "Minutes played");
    // Untranslated headers pass through unchanged.
    assert_eq!(table.columns[9], "xG");
}

#[test]
fn csv_cells_are_coerced_once_at_load() {
    let table = load_table(&fixture_path("players_small.csv")).unwrap();
    let minutes = table.column_index("Minutes played").unwrap();
    let xg = table.column_index("xG").unwrap();
    let duels = table.column_index("Duels won").unwrap();

    assert_eq!(table.cell(0, minutes), &Cell::Num(2430.0));
    // Percent values parse as plain numbers.
    assert_eq!(table.cell(0, duels), &Cell::Num(58.0));
    // "-" and empty cells are missing, not text.
    assert_eq!(table.cell(2, duels), &Cell::Missing);
    assert_eq!(table.cell(3, xg), &Cell::Missing);
}

#[test]
fn resolved_spec_and_filters_work_against_the_fixture() {
    let table = load_table(&fixture_path("players_small.csv")).unwrap();
    let spec = ColumnSpec::resolve(&table).expect("player and season present");
    assert!(spec.minutes.is_some());
    assert!(spec.team.is_some());

    let filters = Filters {
        seasons: vec!["2023/24".to_string()],
        min_minutes: Some(300.0),
        ..Filters::default()
    };
    let subset = filters.apply(&table, &spec);
    assert_eq!(subset, vec![0, 1, 3]);
}

#[test]
fn kpi_resolution_drops_text_and_absent_columns() {
    let table = load_table(&fixture_path("players_small.csv")).unwrap();
    let requested = vec![
        "Goals".to_string(),
        "Foot".to_string(),
        "xG".to_string(),
        "Imaginary".to_string(),
    ];
    let cols = resolve_kpis(&table, &requested);
    assert_eq!(cols.len(), 2);
    assert_eq!(table.columns[cols[0]], "Goals");
    assert_eq!(table.columns[cols[1]], "xG");
}

#[test]
fn unsupported_extension_is_rejected() {
    let err = load_table(&fixture_path("players_small.xlsx")).unwrap_err();
    assert!(err.to_string().contains("unsupported dataset format"));
    assert!(err.to_string().contains("export-only"));
}
