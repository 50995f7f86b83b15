//! # allocgantt-io
//!
//! Loads the rectangular allocation base (.xlsx) into [`SourceRow`]s.
//!
//! The loader is intentionally best-effort: column names are trimmed before
//! matching, optional columns may be missing entirely, and cells that fail to
//! parse are treated as absent values rather than errors. Only a file that
//! cannot be opened or has no worksheet at all is a [`LoadError`].
//!
//! Expected columns, per stage `i` in 1..=3:
//! `Data_Inicio_Etapa{i}`, `Data_Termino_Etapa{i}`,
//! `Consultor_Head_Etapa_{i}_PCT`, `Analista_Etapa_{i}_PCT`;
//! plus `Head_1`, `Analista_1` and `Nome_Programa`.

use std::collections::HashMap;
use std::path::Path;

use allocgantt_core::{SourceRow, Stage, StageSpan};
use calamine::{open_workbook, Data, Reader, Xlsx};
use chrono::NaiveDate;
use thiserror::Error;

/// Column carrying the process name
pub const COL_PROCESS: &str = "Nome_Programa";
/// Column carrying the head identity
pub const COL_HEAD: &str = "Head_1";
/// Column carrying the analyst identity
pub const COL_ANALYST: &str = "Analista_1";

/// Loading error
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("workbook has no worksheets")]
    NoWorksheet,
}

/// Load the first worksheet of an .xlsx base into source rows.
///
/// Rows with no process name, no identities and no dated stage are dropped
/// (typically trailing formatting rows).
pub fn load_source_table(path: impl AsRef<Path>) -> Result<Vec<SourceRow>, LoadError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(LoadError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = column_index(header);

    let mut table = Vec::new();
    for row in rows {
        let source = parse_row(row, &columns);
        if is_meaningful(&source) {
            table.push(source);
        }
    }
    Ok(table)
}

/// Header name -> column position, with names trimmed of stray whitespace
fn column_index(header: &[Data]) -> HashMap<String, usize> {
    header
        .iter()
        .enumerate()
        .filter_map(|(idx, cell)| cell_string(cell).map(|name| (name, idx)))
        .collect()
}

fn parse_row(row: &[Data], columns: &HashMap<String, usize>) -> SourceRow {
    let cell = |name: &str| columns.get(name).and_then(|&idx| row.get(idx));

    let mut source = SourceRow::new(
        cell(COL_PROCESS)
            .and_then(cell_string)
            .unwrap_or_default(),
    );
    source.head = cell(COL_HEAD).and_then(cell_string);
    source.analyst = cell(COL_ANALYST).and_then(cell_string);

    for (slot, stage) in source.stages.iter_mut().zip(Stage::ALL) {
        let n = stage.number();
        *slot = StageSpan {
            start: cell(&format!("Data_Inicio_Etapa{n}")).and_then(cell_date),
            end: cell(&format!("Data_Termino_Etapa{n}")).and_then(cell_date),
            head_pct: cell(&format!("Consultor_Head_Etapa_{n}_PCT")).and_then(cell_number),
            analyst_pct: cell(&format!("Analista_Etapa_{n}_PCT")).and_then(cell_number),
        };
    }

    source
}

fn is_meaningful(row: &SourceRow) -> bool {
    !row.process.is_empty()
        || row.head.is_some()
        || row.analyst.is_some()
        || row.stages.iter().any(StageSpan::is_complete)
}

/// Non-empty trimmed text of a cell, if any
fn cell_string(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(cell: &Data) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Calendar date of a cell: native Excel datetimes, ISO strings and the
/// common dd/mm/yyyy spelling are all accepted
fn cell_date(cell: &Data) -> Option<NaiveDate> {
    match cell {
        Data::DateTime(dt) => dt.as_datetime().map(|d| d.date()),
        Data::DateTimeIso(s) => parse_date_text(s),
        Data::String(s) => parse_date_text(s),
        _ => None,
    }
}

fn parse_date_text(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let datelike = text.split(['T', ' ']).next().unwrap_or(text);
    NaiveDate::parse_from_str(datelike, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(datelike, "%d/%m/%Y"))
        .ok()
}
