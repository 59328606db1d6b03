//! Extractable case fields and the sparse result of a text extraction.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Canonical identifier for one structured case field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FieldId {
    MedicalRecordNumber,
    ArrivalDate,
    PetName,
    OwnerLastName,
    Species,
    Breed,
    Sex,
    DateOfBirth,
    PresentingComplaint,
    Notes,
}

impl FieldId {
    /// All fields in form order.
    pub const ALL: [FieldId; 10] = [
        FieldId::MedicalRecordNumber,
        FieldId::ArrivalDate,
        FieldId::PetName,
        FieldId::OwnerLastName,
        FieldId::Species,
        FieldId::Breed,
        FieldId::Sex,
        FieldId::DateOfBirth,
        FieldId::PresentingComplaint,
        FieldId::Notes,
    ];

    /// Stable snake_case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldId::MedicalRecordNumber => "medical_record_number",
            FieldId::ArrivalDate => "arrival_date",
            FieldId::PetName => "pet_name",
            FieldId::OwnerLastName => "owner_last_name",
            FieldId::Species => "species",
            FieldId::Breed => "breed",
            FieldId::Sex => "sex",
            FieldId::DateOfBirth => "date_of_birth",
            FieldId::PresentingComplaint => "presenting_complaint",
            FieldId::Notes => "notes",
        }
    }

    /// Column/label text used in forms and CSV headers.
    pub fn label(&self) -> &'static str {
        match self {
            FieldId::MedicalRecordNumber => "MRN",
            FieldId::ArrivalDate => "Arrival Date",
            FieldId::PetName => "Pet Name",
            FieldId::OwnerLastName => "Owner Last Name",
            FieldId::Species => "Species",
            FieldId::Breed => "Breed",
            FieldId::Sex => "Sex",
            FieldId::DateOfBirth => "Date of Birth",
            FieldId::PresentingComplaint => "Presenting Complaint",
            FieldId::Notes => "Notes",
        }
    }
}

impl std::fmt::Display for FieldId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Patient species group.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    Canine,
    Feline,
    Other,
}

impl Species {
    /// Canonical code (e.g., "canine").
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Canine => "canine",
            Species::Feline => "feline",
            Species::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Species::Canine => "Canine",
            Species::Feline => "Feline",
            Species::Other => "Other",
        }
    }
}

/// Sex and neuter status.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    MaleNeutered,
    Female,
    FemaleSpayed,
}

impl Sex {
    /// Canonical code (e.g., "male_neutered").
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::MaleNeutered => "male_neutered",
            Sex::Female => "female",
            Sex::FemaleSpayed => "female_spayed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::MaleNeutered => "Male Neutered",
            Sex::Female => "Female",
            Sex::FemaleSpayed => "Female Spayed",
        }
    }
}

/// Sparse set of fields extracted from free text.
///
/// A `None` field means the input never mentioned it (or its value could not
/// be normalized). Every `Some` value has already passed its normalizer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParsedFieldSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_record_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arrival_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pet_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<Species>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<Sex>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presenting_complaint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ParsedFieldSet {
    /// Check whether nothing was extracted.
    pub fn is_empty(&self) -> bool {
        self.filled_count() == 0
    }

    /// Number of fields that were filled.
    pub fn filled_count(&self) -> usize {
        self.filled_fields().len()
    }

    /// Fields that were filled, in form order.
    pub fn filled_fields(&self) -> Vec<FieldId> {
        FieldId::ALL
            .into_iter()
            .filter(|field| self.has(*field))
            .collect()
    }

    /// Check whether a given field was filled.
    pub fn has(&self, field: FieldId) -> bool {
        match field {
            FieldId::MedicalRecordNumber => self.medical_record_number.is_some(),
            FieldId::ArrivalDate => self.arrival_date.is_some(),
            FieldId::PetName => self.pet_name.is_some(),
            FieldId::OwnerLastName => self.owner_last_name.is_some(),
            FieldId::Species => self.species.is_some(),
            FieldId::Breed => self.breed.is_some(),
            FieldId::Sex => self.sex.is_some(),
            FieldId::DateOfBirth => self.date_of_birth.is_some(),
            FieldId::PresentingComplaint => self.presenting_complaint.is_some(),
            FieldId::Notes => self.notes.is_some(),
        }
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
