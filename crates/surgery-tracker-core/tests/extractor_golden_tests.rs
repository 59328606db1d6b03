//! Golden tests for the structured text extractor.
//!
//! These tests verify extraction against known dictation and paste inputs.

use std::sync::Arc;

use chrono::NaiveDate;
use proptest::prelude::*;
use surgery_tracker_core::extractor::{
    parse_structured_text, CollectingSink, Diagnostic, ExtractorConfig, SkipReason,
    StructuredTextParser,
};
use surgery_tracker_core::models::{FieldId, ParsedFieldSet, Sex, Species};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    input: &'static str,
    expected: ParsedFieldSet,
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "basic-names",
            input: "MRN: 12345\nPet Name: buddy\nOwner: smith",
            expected: ParsedFieldSet {
                medical_record_number: Some("12345".into()),
                pet_name: Some("Buddy".into()),
                owner_last_name: Some("Smith".into()),
                ..Default::default()
            },
        },
        GoldenCase {
            id: "mrn-not-capitalized",
            input: "Medical Record Number: ab-77c",
            expected: ParsedFieldSet {
                medical_record_number: Some("ab-77c".into()),
                ..Default::default()
            },
        },
        GoldenCase {
            id: "full-intake-paste",
            input: "MRN: A-1001\r\n\
                    Arrival Date: 12/15/2024\r\n\
                    Patient: BUDDY\r\n\
                    Client: o'neil\r\n\
                    Species: Dog\r\n\
                    Breed: golden retriever\r\n\
                    Sex: MN\r\n\
                    DOB: 2019-06-01\r\n\
                    Chief Complaint: Left CCL rupture\r\n\
                    Notes: NPO after midnight: 10pm last meal\r\n",
            expected: ParsedFieldSet {
                medical_record_number: Some("A-1001".into()),
                arrival_date: Some(date(2024, 12, 15)),
                pet_name: Some("Buddy".into()),
                owner_last_name: Some("O'neil".into()),
                species: Some(Species::Canine),
                breed: Some("Golden Retriever".into()),
                sex: Some(Sex::MaleNeutered),
                date_of_birth: Some(date(2019, 6, 1)),
                presenting_complaint: Some("Left CCL rupture".into()),
                notes: Some("NPO after midnight: 10pm last meal".into()),
            },
        },
        GoldenCase {
            id: "dictated-intake",
            input: "pet name: whiskers\n\
                    species: a fluffy cat\n\
                    sex: spayed female\n\
                    date of birth: march 3rd twenty twenty",
            expected: ParsedFieldSet {
                pet_name: Some("Whiskers".into()),
                species: Some(Species::Feline),
                sex: Some(Sex::FemaleSpayed),
                date_of_birth: Some(date(2020, 3, 3)),
                ..Default::default()
            },
        },
        GoldenCase {
            id: "noise-lines-skipped",
            input: "Surgery intake form\n\
                    \n\
                    Weight: 32 kg\n\
                    Species:    \n\
                    Breed: beagle",
            expected: ParsedFieldSet {
                breed: Some("Beagle".into()),
                ..Default::default()
            },
        },
        GoldenCase {
            id: "later-line-wins",
            input: "Pet: rex\nPet: max",
            expected: ParsedFieldSet {
                pet_name: Some("Max".into()),
                ..Default::default()
            },
        },
        GoldenCase {
            id: "bad-value-drops-only-its-field",
            input: "Species: giraffe\nSex: unsure\nArrival Date: 13/45/2024\nOwner: lee",
            expected: ParsedFieldSet {
                owner_last_name: Some("Lee".into()),
                ..Default::default()
            },
        },
    ]
}

#[test]
fn test_golden_cases() {
    for case in get_golden_cases() {
        let parsed = parse_structured_text(case.input);
        assert_eq!(parsed, case.expected, "Case {}: fields mismatch", case.id);
    }
}

#[test]
fn test_species_classification() {
    let species_tests = vec![
        ("dog", Species::Canine),
        ("cat", Species::Feline),
        ("ferret", Species::Other),
        ("Canine", Species::Canine),
        ("feline", Species::Feline),
        ("rabbit", Species::Other),
    ];

    for (spoken, expected) in species_tests {
        let parsed = parse_structured_text(&format!("Species: {}", spoken));
        assert_eq!(
            parsed.species,
            Some(expected),
            "Species {} should classify as {:?}",
            spoken,
            expected
        );
    }
}

#[test]
fn test_sex_classification() {
    let sex_tests = vec![
        ("neutered male", Sex::MaleNeutered),
        ("male neutered", Sex::MaleNeutered),
        ("castrated", Sex::MaleNeutered),
        ("female spayed", Sex::FemaleSpayed),
        ("FS", Sex::FemaleSpayed),
        ("male", Sex::Male),
        ("intact female", Sex::Female),
        ("F", Sex::Female),
    ];

    for (spoken, expected) in sex_tests {
        let parsed = parse_structured_text(&format!("Sex: {}", spoken));
        assert_eq!(
            parsed.sex,
            Some(expected),
            "Sex {} should classify as {:?}",
            spoken,
            expected
        );
    }
}

#[test]
fn test_date_forms_agree() {
    let inputs = [
        "DOB: 12/15/2024",
        "DOB: 2024-12-15",
        "DOB: december fifteen twenty twenty four",
        "DOB: Dec 15th twenty twenty-four",
        "DOB: one two one five two zero two four",
        "DOB: twelve fifteen twenty twenty four",
        "DOB: December 15, 2024",
    ];

    for input in inputs {
        let parsed = parse_structured_text(input);
        assert_eq!(
            parsed.date_of_birth,
            Some(date(2024, 12, 15)),
            "Input {:?} should parse to 2024-12-15",
            input
        );
    }
}

#[test]
fn test_invalid_date_omitted() {
    let parsed = parse_structured_text("Arrival Date: 13/45/2024");
    assert!(parsed.is_empty());
    assert!(!parsed.has(FieldId::ArrivalDate));
}

#[test]
fn test_date_without_full_year_omitted() {
    let inputs = [
        "DOB: March 2020",
        "DOB: June 2019",
        "DOB: Dec 1 24",
        "Arrival Date: 12.15.24",
    ];

    for input in inputs {
        let parsed = parse_structured_text(input);
        assert!(parsed.is_empty(), "Input {:?} should not produce a date", input);
    }
}

#[test]
fn test_empty_and_blank_input() {
    assert!(parse_structured_text("").is_empty());
    assert!(parse_structured_text("\n\n   \n").is_empty());
    assert!(parse_structured_text("MRN:").is_empty());
    assert!(parse_structured_text("MRN: \t ").is_empty());
}

#[test]
fn test_extra_labels_from_config() {
    let config = ExtractorConfig::from_json(
        r#"{"extra_labels": {"tag number": "medical_record_number", "Fur Baby": "pet_name"}}"#,
    )
    .unwrap();
    let parser = StructuredTextParser::from_config(&config);

    let parsed = parser.parse("Tag Number: 881\nfur   baby: pip");
    assert_eq!(parsed.medical_record_number.as_deref(), Some("881"));
    assert_eq!(parsed.pet_name.as_deref(), Some("Pip"));

    // The default parser does not know them
    assert!(parse_structured_text("Tag Number: 881").is_empty());
}

#[test]
fn test_unknown_config_key_rejected() {
    assert!(ExtractorConfig::from_json(r#"{"fuzzy": true}"#).is_err());
}

#[test]
fn test_strict_mode_rejects_dictated_phrases() {
    let config = ExtractorConfig {
        voice_tolerant: false,
        ..Default::default()
    };
    let parser = StructuredTextParser::from_config(&config);

    let parsed = parser.parse("Species: a big dog\nSex: neutered male\nBreed: pug");
    assert_eq!(parsed.species, None);
    assert_eq!(parsed.sex, None);
    assert_eq!(parsed.breed.as_deref(), Some("Pug"));

    let parsed = parser.parse("Species: dog\nSex: mn");
    assert_eq!(parsed.species, Some(Species::Canine));
    assert_eq!(parsed.sex, Some(Sex::MaleNeutered));
}

#[test]
fn test_diagnostics_capture_does_not_change_result() {
    let input = "intro line\nFoo: bar\nPet:\nSpecies: unicorn\nPet: rex";
    let sink = Arc::new(CollectingSink::new());
    let parser = StructuredTextParser::new().with_sink(sink.clone());

    let parsed = parser.parse(input);
    assert_eq!(parsed, parse_structured_text(input));

    let events = sink.take();
    assert_eq!(
        events[0],
        Diagnostic::LineSkipped {
            line: 1,
            reason: SkipReason::NoColon
        }
    );
    assert_eq!(
        events[1],
        Diagnostic::LineSkipped {
            line: 2,
            reason: SkipReason::UnknownLabel("foo".into())
        }
    );
    assert_eq!(
        events[2],
        Diagnostic::LineSkipped {
            line: 3,
            reason: SkipReason::EmptyValue
        }
    );
    assert!(matches!(
        events[3],
        Diagnostic::NormalizationFailed {
            line: 4,
            field: FieldId::Species,
            ..
        }
    ));
    assert_eq!(
        events[4],
        Diagnostic::FieldExtracted {
            line: 5,
            field: FieldId::PetName
        }
    );
    assert_eq!(events[5], Diagnostic::Finished { lines: 5, fields: 1 });
}

const LABELS: &[&str] = &[
    "MRN",
    "Pet Name",
    "Owner",
    "Species",
    "Breed",
    "Sex",
    "DOB",
    "Arrival Date",
    "Notes",
];

proptest! {
    /// Property: text without a colon never yields a field
    #[test]
    fn test_no_colon_yields_nothing(text in "[^:]{0,200}") {
        prop_assert!(parse_structured_text(&text).is_empty());
    }

    /// Property: arbitrary input never panics and parsing is repeatable
    #[test]
    fn test_parse_is_total_and_idempotent(text in "\\PC{0,300}") {
        let first = parse_structured_text(&text);
        let second = parse_structured_text(&text);
        prop_assert_eq!(first, second);
    }

    /// Property: arbitrary values under known labels never panic
    #[test]
    fn test_known_labels_any_value(
        label in proptest::sample::select(LABELS),
        value in "\\PC{0,60}",
    ) {
        let parsed = parse_structured_text(&format!("{}: {}", label, value));
        prop_assert!(parsed.filled_count() <= 1);
    }

    /// Property: a whitespace-only value is treated as empty
    #[test]
    fn test_whitespace_value_omitted(
        label in proptest::sample::select(LABELS),
        value in "[ \t]{0,10}",
    ) {
        let parsed = parse_structured_text(&format!("{}:{}", label, value));
        prop_assert!(parsed.is_empty());
    }
}
