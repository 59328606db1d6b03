//! CSV import of surgery cases with per-row error reporting.
//!
//! Structural problems (empty input, unterminated quote, missing required
//! column) fail the whole import. Everything else is collected per row; a row
//! with any error is left out of the result and the rest still import.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::columns::Column;
use super::{CsvError, CsvResult};
use crate::extractor::{
    normalize_date, parse_bool, parse_sex_strict, parse_species_strict, LabelResolver,
    NormalizeError,
};
use crate::models::{CaseDraft, CaseError, FieldId, SurgeryCase, TaskKind, REQUIRED_FIELDS};

/// A problem with one row (and optionally one column) of an import.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowError {
    /// 1-based line where the row starts
    pub line: usize,
    /// Column header, when the problem is confined to one cell
    pub column: Option<String>,
    pub message: String,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.column {
            Some(column) => write!(f, "line {}, {}: {}", self.line, column, self.message),
            None => write!(f, "line {}: {}", self.line, self.message),
        }
    }
}

/// Outcome of an import.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ImportReport {
    /// Rows that imported cleanly
    pub cases: Vec<SurgeryCase>,
    /// Problems found, in row order
    pub errors: Vec<RowError>,
    /// Data rows read (blank rows excluded)
    pub rows_read: usize,
}

impl ImportReport {
    /// Check if every row imported.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of rows that were rejected.
    pub fn rejected_rows(&self) -> usize {
        self.rows_read - self.cases.len()
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One CSV record and the line it starts on.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Record {
    line: usize,
    cells: Vec<String>,
}

impl Record {
    fn is_blank(&self) -> bool {
        self.cells.iter().all(|c| c.trim().is_empty())
    }
}

/// Case importer.
pub struct CaseImporter {
    labels: LabelResolver,
}

impl Default for CaseImporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CaseImporter {
    /// Create an importer that accepts the built-in header synonyms.
    pub fn new() -> Self {
        Self {
            labels: LabelResolver::new(),
        }
    }

    /// Create an importer with a custom label resolver.
    pub fn with_labels(labels: LabelResolver) -> Self {
        Self { labels }
    }

    /// Import cases from CSV text.
    pub fn import(&self, text: &str) -> CsvResult<ImportReport> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = read_records(text)?.into_iter().skip_while(Record::is_blank);

        let header = records.next().ok_or(CsvError::Empty)?;
        let columns = self.map_header(&header)?;

        let mut report = ImportReport::default();
        for record in records.filter(|r| !r.is_blank()) {
            report.rows_read += 1;
            match import_row(&record, &columns) {
                Ok(case) => report.cases.push(case),
                Err(mut errors) => report.errors.append(&mut errors),
            }
        }

        debug!(
            rows = report.rows_read,
            imported = report.cases.len(),
            errors = report.errors.len(),
            "CSV import finished"
        );
        Ok(report)
    }

    fn map_header(&self, header: &Record) -> CsvResult<Vec<Option<(Column, String)>>> {
        let columns: Vec<Option<(Column, String)>> = header
            .cells
            .iter()
            .map(|cell| {
                let name = cell.trim();
                let column = Column::from_header(name, &self.labels);
                if column.is_none() && !name.is_empty() {
                    warn!(header = name, "ignoring unknown CSV column");
                }
                column.map(|c| (c, name.to_string()))
            })
            .collect();

        for field in REQUIRED_FIELDS {
            let present = columns
                .iter()
                .flatten()
                .any(|(column, _)| *column == Column::Field(field));
            if !present {
                return Err(CsvError::MissingColumn(field.label().to_string()));
            }
        }

        Ok(columns)
    }
}

/// Import cases from CSV text with the default importer.
pub fn import_cases_csv(text: &str) -> CsvResult<ImportReport> {
    CaseImporter::new().import(text)
}

fn import_row(
    record: &Record,
    columns: &[Option<(Column, String)>],
) -> Result<SurgeryCase, Vec<RowError>> {
    if record.cells.len() != columns.len() {
        return Err(vec![RowError {
            line: record.line,
            column: None,
            message: format!(
                "expected {} cells, found {}",
                columns.len(),
                record.cells.len()
            ),
        }]);
    }

    let mut draft = CaseDraft::new();
    let mut done: Vec<(TaskKind, &str)> = Vec::new();
    let mut errors = Vec::new();

    for (cell, column) in record.cells.iter().zip(columns) {
        let Some((column, header)) = column else {
            continue;
        };
        let value = cell.trim();

        match column {
            Column::Field(field) => {
                if value.is_empty() {
                    continue;
                }
                if let Err(e) = set_field(&mut draft, *field, value) {
                    errors.push(RowError {
                        line: record.line,
                        column: Some(header.clone()),
                        message: e.to_string(),
                    });
                }
            }
            Column::Task(task) => {
                if parse_bool(value) {
                    draft.tasks.select(*task);
                }
            }
            Column::TaskDone(task) => {
                if parse_bool(value) {
                    done.push((*task, header.as_str()));
                }
            }
        }
    }

    // Selection columns may come after their done columns
    for (task, header) in done {
        if draft.tasks.set_completed(task, true).is_err() {
            errors.push(RowError {
                line: record.line,
                column: Some(header.to_string()),
                message: format!("{} is marked done but not selected", task.label()),
            });
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    draft.validate().map_err(|e| case_errors(record.line, columns, e))
}

/// Text cells are taken as written so an export imports back unchanged.
fn set_field(draft: &mut CaseDraft, field: FieldId, value: &str) -> Result<(), NormalizeError> {
    match field {
        FieldId::MedicalRecordNumber => draft.medical_record_number = Some(value.to_string()),
        FieldId::ArrivalDate => draft.arrival_date = Some(normalize_date(value)?),
        FieldId::PetName => draft.pet_name = Some(value.to_string()),
        FieldId::OwnerLastName => draft.owner_last_name = Some(value.to_string()),
        FieldId::Species => draft.species = Some(parse_species_strict(value)?),
        FieldId::Breed => draft.breed = Some(value.to_string()),
        FieldId::Sex => draft.sex = Some(parse_sex_strict(value)?),
        FieldId::DateOfBirth => draft.date_of_birth = Some(normalize_date(value)?),
        FieldId::PresentingComplaint => draft.presenting_complaint = Some(value.to_string()),
        FieldId::Notes => draft.notes = Some(value.to_string()),
    }
    Ok(())
}

fn case_errors(line: usize, columns: &[Option<(Column, String)>], error: CaseError) -> Vec<RowError> {
    let header_for = |field: FieldId| {
        columns
            .iter()
            .flatten()
            .find(|(column, _)| *column == Column::Field(field))
            .map(|(_, header)| header.clone())
            .unwrap_or_else(|| field.label().to_string())
    };

    match error {
        CaseError::MissingFields(fields) => fields
            .into_iter()
            .map(|field| RowError {
                line,
                column: Some(header_for(field)),
                message: "required value is missing".to_string(),
            })
            .collect(),
        e @ CaseError::BirthAfterArrival { .. } => vec![RowError {
            line,
            column: Some(header_for(FieldId::DateOfBirth)),
            message: e.to_string(),
        }],
    }
}

/// Split CSV text into records. Quoted cells may contain commas, doubled
/// quotes and line breaks.
fn read_records(text: &str) -> CsvResult<Vec<Record>> {
    let mut records = Vec::new();
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    cell.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    cell.push(c);
                }
                _ => cell.push(c),
            }
            continue;
        }

        match c {
            '"' if cell.is_empty() => in_quotes = true,
            ',' => cells.push(std::mem::take(&mut cell)),
            '\r' | '\n' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                cells.push(std::mem::take(&mut cell));
                records.push(Record {
                    line: record_line,
                    cells: std::mem::take(&mut cells),
                });
                line += 1;
                record_line = line;
            }
            _ => cell.push(c),
        }
    }

    if in_quotes {
        return Err(CsvError::UnterminatedQuote { line: record_line });
    }
    if !cell.is_empty() || !cells.is_empty() {
        cells.push(cell);
        records.push(Record {
            line: record_line,
            cells,
        });
    }

    Ok(records)
}
