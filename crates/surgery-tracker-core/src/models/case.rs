//! Surgery case models: editable drafts and validated cases.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::fields::{FieldId, ParsedFieldSet, Sex, Species};
use super::tasks::TaskChecklist;

/// Case validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaseError {
    #[error("Missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<FieldId>),

    #[error("Date of birth {date_of_birth} is after arrival date {arrival_date}")]
    BirthAfterArrival {
        date_of_birth: NaiveDate,
        arrival_date: NaiveDate,
    },
}

pub type CaseResult<T> = Result<T, CaseError>;

fn join_fields(fields: &[FieldId]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fields that must be present before a draft becomes a case.
pub const REQUIRED_FIELDS: [FieldId; 5] = [
    FieldId::MedicalRecordNumber,
    FieldId::ArrivalDate,
    FieldId::PetName,
    FieldId::OwnerLastName,
    FieldId::Species,
];

/// A validated surgery case.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SurgeryCase {
    /// Local UUID
    pub case_id: String,
    /// Medical record number
    pub medical_record_number: String,
    /// Date the patient arrived
    pub arrival_date: NaiveDate,
    pub pet_name: String,
    pub owner_last_name: String,
    pub species: Species,
    pub breed: Option<String>,
    pub sex: Option<Sex>,
    pub date_of_birth: Option<NaiveDate>,
    /// Reason for presentation
    pub presenting_complaint: Option<String>,
    pub notes: Option<String>,
    /// Task checklist
    pub tasks: TaskChecklist,
    /// Creation timestamp
    pub created_at: String,
    /// Last update timestamp
    pub updated_at: String,
}

impl SurgeryCase {
    /// Touch the updated_at timestamp.
    pub fn touch(&mut self) {
        self.updated_at = chrono::Utc::now().to_rfc3339();
    }

    /// Check whether every selected task is completed.
    pub fn is_done(&self) -> bool {
        self.tasks.is_done()
    }
}

/// Editable case form state. Every field is optional until validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CaseDraft {
    /// Set when editing an existing case
    pub case_id: Option<String>,
    pub medical_record_number: Option<String>,
    pub arrival_date: Option<NaiveDate>,
    pub pet_name: Option<String>,
    pub owner_last_name: Option<String>,
    pub species: Option<Species>,
    pub breed: Option<String>,
    pub sex: Option<Sex>,
    pub date_of_birth: Option<NaiveDate>,
    pub presenting_complaint: Option<String>,
    pub notes: Option<String>,
    pub tasks: TaskChecklist,
    /// Preserved when editing an existing case
    pub created_at: Option<String>,
}

impl CaseDraft {
    /// Create an empty draft.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing an existing case.
    pub fn from_case(case: &SurgeryCase) -> Self {
        Self {
            case_id: Some(case.case_id.clone()),
            medical_record_number: Some(case.medical_record_number.clone()),
            arrival_date: Some(case.arrival_date),
            pet_name: Some(case.pet_name.clone()),
            owner_last_name: Some(case.owner_last_name.clone()),
            species: Some(case.species),
            breed: case.breed.clone(),
            sex: case.sex,
            date_of_birth: case.date_of_birth,
            presenting_complaint: case.presenting_complaint.clone(),
            notes: case.notes.clone(),
            tasks: case.tasks.clone(),
            created_at: Some(case.created_at.clone()),
        }
    }

    /// Merge extracted fields into the draft.
    ///
    /// Only fields present in `parsed` are written; everything else keeps its
    /// current value. Returns the number of fields written.
    pub fn apply_parsed(&mut self, parsed: &ParsedFieldSet) -> usize {
        fn put<T: Clone>(slot: &mut Option<T>, value: &Option<T>) -> usize {
            match value {
                Some(v) => {
                    *slot = Some(v.clone());
                    1
                }
                None => 0,
            }
        }

        put(&mut self.medical_record_number, &parsed.medical_record_number)
            + put(&mut self.arrival_date, &parsed.arrival_date)
            + put(&mut self.pet_name, &parsed.pet_name)
            + put(&mut self.owner_last_name, &parsed.owner_last_name)
            + put(&mut self.species, &parsed.species)
            + put(&mut self.breed, &parsed.breed)
            + put(&mut self.sex, &parsed.sex)
            + put(&mut self.date_of_birth, &parsed.date_of_birth)
            + put(&mut self.presenting_complaint, &parsed.presenting_complaint)
            + put(&mut self.notes, &parsed.notes)
    }

    /// Required fields that are still empty, in form order.
    pub fn missing_fields(&self) -> Vec<FieldId> {
        let filled = |s: &Option<String>| s.as_deref().is_some_and(|v| !v.trim().is_empty());

        REQUIRED_FIELDS
            .into_iter()
            .filter(|field| match field {
                FieldId::MedicalRecordNumber => !filled(&self.medical_record_number),
                FieldId::ArrivalDate => self.arrival_date.is_none(),
                FieldId::PetName => !filled(&self.pet_name),
                FieldId::OwnerLastName => !filled(&self.owner_last_name),
                FieldId::Species => self.species.is_none(),
                _ => false,
            })
            .collect()
    }

    /// Validate the draft into a case.
    pub fn validate(&self) -> CaseResult<SurgeryCase> {
        let (
            Some(medical_record_number),
            Some(arrival_date),
            Some(pet_name),
            Some(owner_last_name),
            Some(species),
        ) = (
            non_blank(&self.medical_record_number),
            self.arrival_date,
            non_blank(&self.pet_name),
            non_blank(&self.owner_last_name),
            self.species,
        )
        else {
            return Err(CaseError::MissingFields(self.missing_fields()));
        };

        if let Some(date_of_birth) = self.date_of_birth {
            if date_of_birth > arrival_date {
                return Err(CaseError::BirthAfterArrival {
                    date_of_birth,
                    arrival_date,
                });
            }
        }

        let now = chrono::Utc::now().to_rfc3339();
        Ok(SurgeryCase {
            case_id: self
                .case_id
                .clone()
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            medical_record_number,
            arrival_date,
            pet_name,
            owner_last_name,
            species,
            breed: non_blank(&self.breed),
            sex: self.sex,
            date_of_birth: self.date_of_birth,
            presenting_complaint: non_blank(&self.presenting_complaint),
            notes: non_blank(&self.notes),
            tasks: self.tasks.clone(),
            created_at: self.created_at.clone().unwrap_or_else(|| now.clone()),
            updated_at: now,
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
