use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use parquet::file::reader::{FileReader, SerializedFileReader};
use parquet::record::Field;
use serde::{Deserialize, Serialize};

/// One value in the loaded table. Numeric parsing happens once, at load
/// time, so downstream code never re-coerces strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Num(f64),
    Text(String),
    Missing,
}

impl Cell {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Cell::Num(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Cell::Missing)
    }

    /// Display form for tables and exports.
    pub fn display(&self) -> String {
        match self {
            Cell::Num(v) => {
                if v.fract() == 0.0 && v.abs() < 1e12 {
                    format!("{}", *v as i64)
                } else {
                    format!("{v:.2}")
                }
            }
            Cell::Text(s) => s.clone(),
            Cell::Missing => "-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn cell(&self, row: usize, col: usize) -> &Cell {
        &self.rows[row][col]
    }

    /// A column is numeric when it holds at least one parsed number and
    /// no free text. Missing cells do not disqualify it.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        let mut saw_num = false;
        for row in &self.rows {
            match &row[col] {
                Cell::Num(_) => saw_num = true,
                Cell::Text(_) => return false,
                Cell::Missing => {}
            }
        }
        saw_num
    }

    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&c| self.is_numeric_column(c))
            .collect()
    }
}

/// Header aliases seen across dataset exports (Wyscout-style Spanish
/// headers included). Applied once at load so the rest of the app deals
/// with a single name per concept.
const HEADER_ALIASES: &[(&str, &str)] = &[
    ("Jugador", "Player"),
    ("Temporada", "Season"),
    ("País", "Country"),
    ("País de nacimiento", "Country"),
    ("Nacionalidad", "Country"),
    ("Liga", "League"),
    ("Equipo", "Team"),
    ("Pie", "Foot"),
    ("Posición específica", "Position"),
    ("posicion", "Position"),
    ("Minutos jugados", "Minutes played"),
    ("minutos_jugados", "Minutes played"),
    ("Edad", "Age"),
    ("Altura", "Height"),
];

pub fn canonical_header(raw: &str) -> String {
    let trimmed = raw.trim();
    for (alias, canon) in HEADER_ALIASES {
        if trimmed == *alias {
            return (*canon).to_string();
        }
    }
    trimmed.to_string()
}

/// Parse one raw text cell. Empty and "-" count as missing; a trailing
/// percent sign is stripped (e.g. "58%" -> 58.0).
pub fn parse_cell(raw: &str) -> Cell {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Cell::Missing;
    }
    let candidate = trimmed.strip_suffix('%').unwrap_or(trimmed);
    match candidate.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Cell::Num(v),
        _ => Cell::Text(trimmed.to_string()),
    }
}

/// Load a tabular dataset, dispatching on the file extension.
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" => load_parquet(path),
        other => Err(anyhow!(
            "unsupported dataset format '.{other}'; use .csv or .parquet (.xlsx is export-only)"
        )),
    }
}

fn load_csv(path: &Path) -> Result<Table> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let columns: Vec<String> = reader
        .headers()
        .context("read csv headers")?
        .iter()
        .map(canonical_header)
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.context("read csv record")?;
        let mut cells: Vec<Cell> = record.iter().take(width).map(parse_cell).collect();
        // Short rows happen in hand-edited exports; pad rather than fail.
        cells.resize(width, Cell::Missing);
        rows.push(cells);
    }

    Ok(Table { columns, rows })
}

fn load_parquet(path: &Path) -> Result<Table> {
    let file = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("open parquet reader")?;

    // Flat schemas only; leaf order matches the row column iterator.
    let columns: Vec<String> = reader
        .metadata()
        .file_metadata()
        .schema_descr()
        .columns()
        .iter()
        .map(|c| canonical_header(c.name()))
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let iter = reader.get_row_iter(None).context("iterate parquet rows")?;
    for row in iter {
        let row = row.context("decode parquet row")?;
        let mut cells: Vec<Cell> = row
            .get_column_iter()
            .map(|(_, field)| field_to_cell(field))
            .collect();
        cells.resize(width, Cell::Missing);
        rows.push(cells);
    }

    Ok(Table { columns, rows })
}

fn field_to_cell(field: &Field) -> Cell {
    match field {
        Field::Null => Cell::Missing,
        Field::Bool(b) => Cell::Num(if *b { 1.0 } else { 0.0 }),
        Field::Byte(v) => Cell::Num(*v as f64),
        Field::Short(v) => Cell::Num(*v as f64),
        Field::Int(v) => Cell::Num(*v as f64),
        Field::Long(v) => Cell::Num(*v as f64),
        Field::UByte(v) => Cell::Num(*v as f64),
        Field::UShort(v) => Cell::Num(*v as f64),
        Field::UInt(v) => Cell::Num(*v as f64),
        Field::ULong(v) => Cell::Num(*v as f64),
        Field::Float(v) => {
            if v.is_finite() {
                Cell::Num(*v as f64)
            } else {
                Cell::Missing
            }
        }
        Field::Double(v) => {
            if v.is_finite() {
                Cell::Num(*v)
            } else {
                Cell::Missing
            }
        }
        Field::Str(s) => parse_cell(s),
        other => Cell::Text(format!("{other:?}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cell_handles_numbers_percent_and_missing() {
        assert_eq!(parse_cell("1.72"), Cell::Num(1.72));
        assert_eq!(parse_cell("58%"), Cell::Num(58.0));
        assert_eq!(parse_cell(" 14 "), Cell::Num(14.0));
        assert_eq!(parse_cell(""), Cell::Missing);
        assert_eq!(parse_cell("-"), Cell::Missing);
        assert_eq!(parse_cell("Left"), Cell::Text("Left".to_string()));
    }

    #[test]
    fn canonical_header_maps_aliases() {
        assert_eq!(canonical_header("Jugador"), "Player");
        assert_eq!(canonical_header(" minutos_jugados "), "Minutes played");
        assert_eq!(canonical_header("xG per 90"), "xG per 90");
    }

    #[test]
    fn numeric_column_detection() {
        let table = Table {
            columns: vec!["a".into(), "b".into(), "c".into()],
            rows: vec![
                vec![Cell::Num(1.0), Cell::Text("x".into()), Cell::Missing],
                vec![Cell::Missing, Cell::Num(2.0), Cell::Missing],
            ],
        };
        assert!(table.is_numeric_column(0));
        assert!(!table.is_numeric_column(1));
        assert!(!table.is_numeric_column(2));
        assert_eq!(table.numeric_columns(), vec![0]);
    }
}
