use ndarray::Array2;
use thiserror::Error;

use crate::columns::ColumnSpec;
use crate::dataset::Table;
use crate::embedding;

/// Failure kinds the UI can branch on. Both messages are written to be
/// shown to the user as-is.
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error(
        "no row for {player} in {season} within the filtered pool; relax the filters or pick another season"
    )]
    ReferenceNotFound { player: String, season: String },
    #[error("no usable numeric KPI columns selected; adjust the KPI list or check the dataset schema")]
    InsufficientFeatures,
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// One row of the working subset after modeling: its embedding
/// coordinates and its distance from the reference record.
#[derive(Debug, Clone)]
pub struct ModeledRecord {
    /// Index into the source table.
    pub row: usize,
    pub player: String,
    pub season: String,
    pub kpi_values: Vec<f64>,
    pub pca1: f64,
    pub pca2: f64,
    pub distance: f64,
    pub is_reference: bool,
}

#[derive(Debug, Clone)]
pub struct SimilarityOutput {
    /// KPI names actually used, in the requested order.
    pub kpi_names: Vec<String>,
    /// Working subset with embedding coordinates, reference included.
    pub modeled: Vec<ModeledRecord>,
    /// Modeled minus the reference, ascending by distance (stable).
    pub ranked: Vec<ModeledRecord>,
}

/// Rank every player-season in the working subset by similarity to one
/// reference record: standardize the KPIs, project into two principal
/// components, measure Euclidean distance in that plane.
///
/// Pure over its inputs; the caller owns all cross-call state.
pub fn compute_similarity(
    table: &Table,
    spec: &ColumnSpec,
    row_ids: &[usize],
    kpi_names: &[String],
    player: &str,
    season: &str,
) -> Result<SimilarityOutput, SimilarityError> {
    let kpis = usable_kpis(table, kpi_names);
    if kpis.is_empty() {
        return Err(SimilarityError::InsufficientFeatures);
    }

    if let Some(&bad) = row_ids.iter().find(|&&row| row >= table.rows.len()) {
        return Err(SimilarityError::InvalidInput(format!(
            "row id {bad} is out of range for a table of {} rows",
            table.rows.len()
        )));
    }

    // Drop-row-on-missing, never impute.
    let working: Vec<usize> = row_ids
        .iter()
        .copied()
        .filter(|&row| {
            kpis.iter()
                .all(|(_, col)| table.cell(row, *col).as_num().is_some())
        })
        .collect();

    let reference = working
        .iter()
        .position(|&row| {
            cell_text(table, row, spec.player) == player.trim()
                && cell_text(table, row, spec.season) == season.trim()
        })
        .ok_or_else(|| SimilarityError::ReferenceNotFound {
            player: player.trim().to_string(),
            season: season.trim().to_string(),
        })?;

    if working.len() < 2 {
        return Err(SimilarityError::InvalidInput(
            "need at least two player-season rows after dropping missing KPI values".to_string(),
        ));
    }

    let n = working.len();
    let d = kpis.len();
    let mut matrix = Array2::zeros((n, d));
    for (i, &row) in working.iter().enumerate() {
        for (j, (_, col)) in kpis.iter().enumerate() {
            // Checked above; a hole here would be a table mutation bug.
            let value = table.cell(row, *col).as_num().ok_or_else(|| {
                SimilarityError::InvalidInput(format!(
                    "KPI column '{}' lost its numeric value mid-run",
                    kpis[j].0
                ))
            })?;
            matrix[[i, j]] = value;
        }
    }

    let standardized = embedding::standardize(&matrix);
    let scores = embedding::project_2d(&standardized);

    let ref_point = (scores[[reference, 0]], scores[[reference, 1]]);
    let modeled: Vec<ModeledRecord> = working
        .iter()
        .enumerate()
        .map(|(i, &row)| {
            let pca1 = scores[[i, 0]];
            let pca2 = scores[[i, 1]];
            let dx = pca1 - ref_point.0;
            let dy = pca2 - ref_point.1;
            ModeledRecord {
                row,
                player: cell_text(table, row, spec.player),
                season: cell_text(table, row, spec.season),
                kpi_values: (0..d).map(|j| matrix[[i, j]]).collect(),
                pca1,
                pca2,
                distance: (dx * dx + dy * dy).sqrt(),
                is_reference: i == reference,
            }
        })
        .collect();

    let mut ranked: Vec<ModeledRecord> = modeled
        .iter()
        .filter(|r| !r.is_reference)
        .cloned()
        .collect();
    // Stable: equal distances keep their original row order.
    ranked.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    Ok(SimilarityOutput {
        kpi_names: kpis.into_iter().map(|(name, _)| name).collect(),
        modeled,
        ranked,
    })
}

/// KPI names paired with their column index, keeping request order and
/// dropping anything absent or non-numeric.
fn usable_kpis(table: &Table, names: &[String]) -> Vec<(String, usize)> {
    names
        .iter()
        .filter_map(|name| {
            let col = table.column_index(name)?;
            table.is_numeric_column(col).then(|| (name.clone(), col))
        })
        .collect()
}

fn cell_text(table: &Table, row: usize, col: usize) -> String {
    table.cell(row, col).display().trim().to_string()
}
