//! Label resolver: maps a line label ("DOB", "owner", "chief complaint") to
//! the field it names.
//!
//! Matching is exact against a synonym table after lower-casing and collapsing
//! whitespace. There is no partial or fuzzy matching.

use std::collections::HashMap;

use crate::models::FieldId;

/// Built-in synonyms, per field.
pub const LABEL_SYNONYMS: &[(FieldId, &[&str])] = &[
    (
        FieldId::MedicalRecordNumber,
        &[
            "mrn",
            "medical record number",
            "medical record",
            "record number",
            "record no",
            "record #",
            "medical record #",
            "med rec",
            "chart number",
        ],
    ),
    (
        FieldId::ArrivalDate,
        &[
            "arrival date",
            "arrival",
            "date of arrival",
            "arrived",
            "admit date",
            "admission date",
            "date admitted",
            "check in date",
            "check-in date",
        ],
    ),
    (
        FieldId::PetName,
        &[
            "pet name",
            "pet",
            "patient name",
            "patient",
            "animal name",
            "name",
        ],
    ),
    (
        FieldId::OwnerLastName,
        &[
            "owner last name",
            "owner",
            "owner name",
            "owner surname",
            "owners last name",
            "owner's last name",
            "client",
            "client name",
            "client last name",
            "last name",
        ],
    ),
    (
        FieldId::Species,
        &["species", "animal type", "animal", "type"],
    ),
    (FieldId::Breed, &["breed", "breed type"]),
    (
        FieldId::Sex,
        &[
            "sex",
            "gender",
            "sex/status",
            "neuter status",
            "spay/neuter status",
            "reproductive status",
        ],
    ),
    (
        FieldId::DateOfBirth,
        &[
            "dob",
            "d.o.b.",
            "date of birth",
            "birth date",
            "birthdate",
            "birthday",
            "born",
        ],
    ),
    (
        FieldId::PresentingComplaint,
        &[
            "presenting complaint",
            "chief complaint",
            "complaint",
            "cc",
            "presenting problem",
            "reason for visit",
            "reason for surgery",
            "reason",
            "problem",
        ],
    ),
    (
        FieldId::Notes,
        &[
            "notes",
            "note",
            "additional notes",
            "comments",
            "comment",
            "remarks",
        ],
    ),
];

/// Resolver from label text to field identity.
#[derive(Debug, Clone)]
pub struct LabelResolver {
    /// Normalized label → field
    synonyms: HashMap<String, FieldId>,
}

impl Default for LabelResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelResolver {
    /// Create a resolver with the built-in synonym table.
    pub fn new() -> Self {
        let synonyms = LABEL_SYNONYMS
            .iter()
            .flat_map(|(field, labels)| labels.iter().map(move |label| (label.to_string(), *field)))
            .collect();
        Self { synonyms }
    }

    /// Resolve label text to a field.
    pub fn resolve(&self, label: &str) -> Option<FieldId> {
        self.synonyms.get(&normalize_label(label)).copied()
    }

    /// Add a custom synonym. Later additions override earlier ones.
    pub fn add_synonym(&mut self, label: &str, field: FieldId) {
        self.synonyms.insert(normalize_label(label), field);
    }

    /// Number of known labels.
    pub fn len(&self) -> usize {
        self.synonyms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synonyms.is_empty()
    }
}

/// Lower-case and collapse internal whitespace to single spaces.
pub fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_table_entry_resolves() {
        let resolver = LabelResolver::new();

        for (field, labels) in LABEL_SYNONYMS {
            for label in *labels {
                assert_eq!(resolver.resolve(label), Some(*field), "label {:?}", label);
            }
        }
    }

    #[test]
    fn test_table_has_no_conflicting_duplicates() {
        let total: usize = LABEL_SYNONYMS.iter().map(|(_, labels)| labels.len()).sum();
        assert_eq!(LabelResolver::new().len(), total);
    }

    #[test]
    fn test_every_field_has_synonyms() {
        for field in FieldId::ALL {
            assert!(
                LABEL_SYNONYMS.iter().any(|(f, labels)| *f == field && !labels.is_empty()),
                "no synonyms for {}",
                field
            );
        }
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let resolver = LabelResolver::new();

        assert_eq!(resolver.resolve("DOB"), Some(FieldId::DateOfBirth));
        assert_eq!(
            resolver.resolve("  Medical   Record\tNumber "),
            Some(FieldId::MedicalRecordNumber)
        );
        assert_eq!(resolver.resolve("Chief Complaint"), Some(FieldId::PresentingComplaint));
        assert_eq!(resolver.resolve("Record #"), Some(FieldId::MedicalRecordNumber));
    }

    #[test]
    fn test_no_partial_matching() {
        let resolver = LabelResolver::new();

        assert_eq!(resolver.resolve("owner first name"), None);
        assert_eq!(resolver.resolve("mr"), None);
        assert_eq!(resolver.resolve("dob please"), None);
        assert_eq!(resolver.resolve(""), None);
    }

    #[test]
    fn test_custom_synonym() {
        let mut resolver = LabelResolver::new();
        resolver.add_synonym("Tag  Number", FieldId::MedicalRecordNumber);

        assert_eq!(resolver.resolve("tag number"), Some(FieldId::MedicalRecordNumber));
    }
}
