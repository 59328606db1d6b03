//! CSV export of surgery cases.

use chrono::NaiveDate;

use super::columns::{csv_columns, Column};
use crate::models::{FieldId, SurgeryCase};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Export cases to CSV, one row per case, header first.
pub fn export_cases_csv(cases: &[SurgeryCase]) -> String {
    let columns = csv_columns();
    let mut csv = String::new();

    // Header
    let header: Vec<String> = columns.iter().map(|c| escape_csv(&c.header())).collect();
    csv.push_str(&header.join(","));
    csv.push('\n');

    for case in cases {
        let row: Vec<String> = columns
            .iter()
            .map(|column| escape_csv(&cell_value(case, column)))
            .collect();
        csv.push_str(&row.join(","));
        csv.push('\n');
    }

    csv
}

fn cell_value(case: &SurgeryCase, column: &Column) -> String {
    match column {
        Column::Field(field) => match field {
            FieldId::MedicalRecordNumber => case.medical_record_number.clone(),
            FieldId::ArrivalDate => format_date(Some(case.arrival_date)),
            FieldId::PetName => case.pet_name.clone(),
            FieldId::OwnerLastName => case.owner_last_name.clone(),
            FieldId::Species => case.species.as_str().to_string(),
            FieldId::Breed => case.breed.clone().unwrap_or_default(),
            FieldId::Sex => case.sex.map(|s| s.as_str().to_string()).unwrap_or_default(),
            FieldId::DateOfBirth => format_date(case.date_of_birth),
            FieldId::PresentingComplaint => case.presenting_complaint.clone().unwrap_or_default(),
            FieldId::Notes => case.notes.clone().unwrap_or_default(),
        },
        Column::Task(task) => yes_no(case.tasks.is_selected(*task)),
        Column::TaskDone(task) => yes_no(case.tasks.is_completed(*task)),
    }
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}

/// Escape a string for CSV output.
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}
