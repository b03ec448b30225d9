use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::similarity::SimilarityOutput;

pub struct ExportReport {
    pub path: PathBuf,
    pub modeled_rows: usize,
    pub ranked_rows: usize,
}

/// Write the similarity result to an .xlsx workbook: a `Modeled` sheet
/// with every surviving row plus embedding coordinates, and a `Similar`
/// sheet with the ranked list.
pub fn export_similarity(path: &Path, output: &SimilarityOutput) -> Result<ExportReport> {
    let mut workbook = Workbook::new();

    let modeled_rows = table_rows(output, false);
    let sheet = workbook.add_worksheet();
    sheet.set_name("Modeled").context("name modeled sheet")?;
    write_rows(sheet, &modeled_rows)?;

    let ranked_rows = table_rows(output, true);
    let sheet = workbook.add_worksheet();
    sheet.set_name("Similar").context("name similar sheet")?;
    write_rows(sheet, &ranked_rows)?;

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        path: path.to_path_buf(),
        modeled_rows: modeled_rows.len().saturating_sub(1),
        ranked_rows: ranked_rows.len().saturating_sub(1),
    })
}

/// Default export filename next to the current directory, timestamped so
/// repeated exports never clobber each other.
pub fn default_export_path() -> PathBuf {
    let stamp = Local::now().format("%Y%m%d_%H%M%S");
    PathBuf::from(format!("scout_similarity_{stamp}.xlsx"))
}

fn table_rows(output: &SimilarityOutput, ranked_only: bool) -> Vec<Vec<String>> {
    let mut header = vec!["Player".to_string(), "Season".to_string()];
    header.extend(output.kpi_names.iter().cloned());
    header.extend(
        ["PCA1", "PCA2", "Distance"]
            .iter()
            .map(|s| s.to_string()),
    );

    let records: Vec<_> = if ranked_only {
        output.ranked.iter().collect()
    } else {
        output.modeled.iter().collect()
    };

    let mut rows = vec![header];
    for record in records {
        let mut row = vec![record.player.clone(), record.season.clone()];
        row.extend(record.kpi_values.iter().map(|v| format!("{v:.3}")));
        row.push(format!("{:.4}", record.pca1));
        row.push(format!("{:.4}", record.pca2));
        row.push(format!("{:.4}", record.distance));
        rows.push(row);
    }
    rows
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    worksheet.autofit();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::similarity::ModeledRecord;

    fn record(player: &str, distance: f64, is_reference: bool) -> ModeledRecord {
        ModeledRecord {
            row: 0,
            player: player.to_string(),
            season: "2024".to_string(),
            kpi_values: vec![1.0, 2.0],
            pca1: 0.1,
            pca2: -0.2,
            distance,
            is_reference,
        }
    }

    #[test]
    fn table_rows_have_header_and_kpi_columns() {
        let output = SimilarityOutput {
            kpi_names: vec!["Goals".to_string(), "xG".to_string()],
            modeled: vec![record("Ana", 0.0, true), record("Bea", 1.5, false)],
            ranked: vec![record("Bea", 1.5, false)],
        };
        let modeled = table_rows(&output, false);
        assert_eq!(modeled.len(), 3);
        assert_eq!(
            modeled[0],
            vec!["Player", "Season", "Goals", "xG", "PCA1", "PCA2", "Distance"]
        );
        let ranked = table_rows(&output, true);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[1][0], "Bea");
    }
}
