//! Surgery Tracker Core Library
//!
//! Client-side core for a veterinary surgery case tracker: turns pasted or
//! dictated notes into case fields, manages per-case task checklists, and
//! moves case lists in and out of CSV.
//!
//! # Architecture
//!
//! ```text
//! Pasted notes / dictation transcript
//!              │
//!              ▼
//!   ┌─────────────────────────┐
//!   │ StructuredTextParser    │  label resolver → value normalizers
//!   │                         │  → date parser (spoken, numeric, ISO)
//!   └────────────┬────────────┘
//!                │ ParsedFieldSet
//!                ▼
//!        CaseDraft (form state) ──validate──► SurgeryCase
//!                                                  │
//!                         ┌────────────────────────┼──────────────────┐
//!                         ▼                        ▼                  ▼
//!                   TaskChecklist             Case browsing       CSV export
//!                 (remaining/done)         (filter and sort)      and import
//! ```
//!
//! Persistence and authentication belong to the remote backend; nothing here
//! performs I/O.
//!
//! # Modules
//!
//! - [`extractor`]: Structured text field extraction
//! - [`models`]: Domain types (SurgeryCase, CaseDraft, TaskChecklist, etc.)
//! - [`query`]: Case list filtering and sorting
//! - [`export`]: CSV export and import

pub mod export;
pub mod extractor;
pub mod models;
pub mod query;

// Re-export commonly used types
pub use export::{export_cases_csv, import_cases_csv, CaseImporter, CsvError, ImportReport, RowError};
pub use extractor::{
    parse_date, parse_structured_text, Diagnostic, DiagnosticSink, ExtractorConfig,
    LabelResolver, StructuredTextParser,
};
pub use models::{
    CaseDraft, CaseError, FieldId, ParsedFieldSet, Sex, Species, SurgeryCase, TaskChecklist,
    TaskFilter, TaskKind,
};
pub use query::{filter_cases, CaseQuery, CaseSort, CaseStatus};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum SurgeryTrackerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Import error: {0}")]
    ImportError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for SurgeryTrackerError {
    fn from(e: serde_json::Error) -> Self {
        SurgeryTrackerError::SerializationError(e.to_string())
    }
}

impl From<extractor::ExtractorError> for SurgeryTrackerError {
    fn from(e: extractor::ExtractorError) -> Self {
        SurgeryTrackerError::InvalidInput(e.to_string())
    }
}

impl From<CaseError> for SurgeryTrackerError {
    fn from(e: CaseError) -> Self {
        SurgeryTrackerError::ValidationError(e.to_string())
    }
}

impl From<CsvError> for SurgeryTrackerError {
    fn from(e: CsvError) -> Self {
        SurgeryTrackerError::ImportError(e.to_string())
    }
}

impl From<models::ChecklistError> for SurgeryTrackerError {
    fn from(e: models::ChecklistError) -> Self {
        SurgeryTrackerError::InvalidInput(e.to_string())
    }
}

// =========================================================================
// Extraction (exported to FFI)
// =========================================================================

/// Extract case fields from pasted notes or a dictation transcript.
#[uniffi::export]
pub fn extract_case_fields(text: String) -> FfiParsedFields {
    parse_structured_text(&text).into()
}

/// Extract case fields with a JSON extractor config.
#[uniffi::export]
pub fn extract_case_fields_with_config(
    text: String,
    config_json: String,
) -> Result<FfiParsedFields, SurgeryTrackerError> {
    let config = ExtractorConfig::from_json(&config_json)?;
    let parser = StructuredTextParser::from_config(&config);
    Ok(parser.parse(&text).into())
}

/// Merge extracted fields into a JSON case draft.
#[uniffi::export]
pub fn apply_text_to_draft(
    draft_json: String,
    text: String,
) -> Result<FfiDraftUpdate, SurgeryTrackerError> {
    let mut draft: CaseDraft = serde_json::from_str(&draft_json)?;
    let parsed = parse_structured_text(&text);
    let fields_filled = draft.apply_parsed(&parsed) as u32;

    Ok(FfiDraftUpdate {
        draft_json: serde_json::to_string(&draft)?,
        fields_filled,
    })
}

// =========================================================================
// Cases (exported to FFI)
// =========================================================================

/// Validate a JSON case draft, returning the case as JSON.
#[uniffi::export]
pub fn validate_draft(draft_json: String) -> Result<String, SurgeryTrackerError> {
    let draft: CaseDraft = serde_json::from_str(&draft_json)?;
    let case = draft.validate()?;
    Ok(serde_json::to_string(&case)?)
}

/// Mark a task on a JSON case completed or not, returning the updated case.
#[uniffi::export]
pub fn set_task_completed(
    case_json: String,
    task: String,
    done: bool,
) -> Result<String, SurgeryTrackerError> {
    let mut case: SurgeryCase = serde_json::from_str(&case_json)?;
    let task = TaskKind::from_name(&task)?;
    case.tasks.set_completed(task, done)?;
    case.touch();
    Ok(serde_json::to_string(&case)?)
}

/// Remaining task keys for a JSON case, in checklist order.
#[uniffi::export]
pub fn remaining_tasks(case_json: String) -> Result<Vec<String>, SurgeryTrackerError> {
    let case: SurgeryCase = serde_json::from_str(&case_json)?;
    Ok(case
        .tasks
        .remaining()
        .into_iter()
        .map(|t| t.key().to_string())
        .collect())
}

/// Filter and sort a JSON case list with a JSON query.
#[uniffi::export]
pub fn filter_case_list(
    cases_json: String,
    query_json: String,
) -> Result<String, SurgeryTrackerError> {
    let cases: Vec<SurgeryCase> = serde_json::from_str(&cases_json)?;
    let query: CaseQuery = serde_json::from_str(&query_json)?;
    Ok(serde_json::to_string(&filter_cases(&cases, &query))?)
}

// =========================================================================
// CSV (exported to FFI)
// =========================================================================

/// Export a JSON case list as CSV.
#[uniffi::export]
pub fn export_cases_to_csv(cases_json: String) -> Result<String, SurgeryTrackerError> {
    let cases: Vec<SurgeryCase> = serde_json::from_str(&cases_json)?;
    Ok(export_cases_csv(&cases))
}

/// Import cases from CSV.
#[uniffi::export]
pub fn import_cases_from_csv(csv: String) -> Result<FfiImportReport, SurgeryTrackerError> {
    let report = import_cases_csv(&csv)?;
    Ok(FfiImportReport {
        cases_json: serde_json::to_string(&report.cases)?,
        imported: report.cases.len() as u32,
        rows_read: report.rows_read as u32,
        errors: report.errors.into_iter().map(|e| e.into()).collect(),
    })
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe extraction result. Dates are ISO strings, species and sex are
/// canonical codes.
#[derive(Debug, Clone, PartialEq, uniffi::Record)]
pub struct FfiParsedFields {
    pub medical_record_number: Option<String>,
    pub arrival_date: Option<String>,
    pub pet_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub species: Option<String>,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<String>,
    pub presenting_complaint: Option<String>,
    pub notes: Option<String>,
    pub filled_count: u32,
}

impl From<ParsedFieldSet> for FfiParsedFields {
    fn from(fields: ParsedFieldSet) -> Self {
        let filled_count = fields.filled_count() as u32;
        Self {
            medical_record_number: fields.medical_record_number,
            arrival_date: fields.arrival_date.map(|d| d.to_string()),
            pet_name: fields.pet_name,
            owner_last_name: fields.owner_last_name,
            species: fields.species.map(|s| s.as_str().to_string()),
            breed: fields.breed,
            sex: fields.sex.map(|s| s.as_str().to_string()),
            date_of_birth: fields.date_of_birth.map(|d| d.to_string()),
            presenting_complaint: fields.presenting_complaint,
            notes: fields.notes,
            filled_count,
        }
    }
}

/// FFI-safe draft update.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDraftUpdate {
    pub draft_json: String,
    pub fields_filled: u32,
}

/// FFI-safe import report.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiImportReport {
    pub cases_json: String,
    pub imported: u32,
    pub rows_read: u32,
    pub errors: Vec<FfiRowError>,
}

/// FFI-safe row error.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRowError {
    pub line: u32,
    pub column: Option<String>,
    pub message: String,
}

impl From<RowError> for FfiRowError {
    fn from(e: RowError) -> Self {
        Self {
            line: e.line as u32,
            column: e.column,
            message: e.message,
        }
    }
}
