//! CSV export/import tests.

use chrono::NaiveDate;
use surgery_tracker_core::export::{export_cases_csv, import_cases_csv, CaseImporter, CsvError};
use surgery_tracker_core::extractor::LabelResolver;
use surgery_tracker_core::models::{CaseDraft, FieldId, Sex, Species, SurgeryCase, TaskKind};

fn make_case(mrn: &str, pet: &str, notes: Option<&str>, tasks: &[(TaskKind, bool)]) -> SurgeryCase {
    let mut draft = CaseDraft {
        medical_record_number: Some(mrn.into()),
        arrival_date: NaiveDate::from_ymd_opt(2024, 12, 15),
        pet_name: Some(pet.into()),
        owner_last_name: Some("Smith".into()),
        species: Some(Species::Feline),
        breed: Some("Domestic Shorthair".into()),
        sex: Some(Sex::FemaleSpayed),
        date_of_birth: NaiveDate::from_ymd_opt(2018, 2, 28),
        presenting_complaint: Some("Dental, extractions".into()),
        notes: notes.map(str::to_string),
        ..Default::default()
    };
    for (task, done) in tasks {
        draft.tasks.select(*task);
        if *done {
            draft.tasks.set_completed(*task, true).unwrap();
        }
    }
    draft.validate().unwrap()
}

/// Fields that survive a CSV round trip (identity and timestamps do not).
fn assert_same_case(actual: &SurgeryCase, expected: &SurgeryCase) {
    assert_eq!(actual.medical_record_number, expected.medical_record_number);
    assert_eq!(actual.arrival_date, expected.arrival_date);
    assert_eq!(actual.pet_name, expected.pet_name);
    assert_eq!(actual.owner_last_name, expected.owner_last_name);
    assert_eq!(actual.species, expected.species);
    assert_eq!(actual.breed, expected.breed);
    assert_eq!(actual.sex, expected.sex);
    assert_eq!(actual.date_of_birth, expected.date_of_birth);
    assert_eq!(actual.presenting_complaint, expected.presenting_complaint);
    assert_eq!(actual.notes, expected.notes);
    assert_eq!(actual.tasks, expected.tasks);
}

#[test]
fn test_export_import_round_trip() {
    let mut cases = vec![
        make_case(
            "F-1",
            "Mittens",
            Some("Owner says \"bites\", use towel\nNPO since 8pm"),
            &[(TaskKind::Bloodwork, true), (TaskKind::Consent, false)],
        ),
        make_case("F-2", "Tom", None, &[]),
        make_case(
            "F-3",
            "Luna",
            Some("  "),
            &[(TaskKind::SurgeryReport, true), (TaskKind::RecheckCall, true)],
        ),
    ];
    let mut mixed_case = make_case("F-4", "McDuff", None, &[(TaskKind::History, false)]);
    mixed_case.owner_last_name = "O'Neil".into();
    mixed_case.breed = Some("DSH".into());
    cases.push(mixed_case);

    let csv = export_cases_csv(&cases);
    let report = import_cases_csv(&csv).unwrap();

    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(report.rows_read, 4);
    assert_eq!(report.cases.len(), 4);
    for (actual, expected) in report.cases.iter().zip(&cases) {
        assert_same_case(actual, expected);
    }

    assert!(!report.cases[0].is_done());
    assert!(!report.cases[1].is_done());
    assert!(report.cases[2].is_done());

    // Names keep their exact casing
    assert_eq!(report.cases[3].pet_name, "McDuff");
    assert_eq!(report.cases[3].owner_last_name, "O'Neil");
    assert_eq!(report.cases[3].breed.as_deref(), Some("DSH"));
}

#[test]
fn test_round_trip_is_stable() {
    let cases = vec![make_case("X", "Cleo", Some("a,b"), &[(TaskKind::Imaging, false)])];

    let first = export_cases_csv(&cases);
    let reimported = import_cases_csv(&first).unwrap().cases;
    let second = export_cases_csv(&reimported);

    assert_eq!(first, second);
}

#[test]
fn test_import_hand_written_sheet() {
    let csv = "\u{feff}Record #,Arrival,Patient,Client,Species,Sex,DOB,Bloodwork,Bloodwork Done,Consent Form\r\n\
               101,1/5/2024,rex,doe,Canine,MN,2020-01-01,yes,no,x\r\n\
               \r\n\
               102,2024-01-06,\"Bella, Jr\",ray,cat,,,,,\r\n";
    let report = import_cases_csv(csv).unwrap();

    assert!(report.is_clean(), "{:?}", report.errors);
    assert_eq!(report.rows_read, 2);

    let rex = &report.cases[0];
    assert_eq!(rex.arrival_date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
    assert_eq!(rex.sex, Some(Sex::MaleNeutered));
    assert_eq!(rex.tasks.selected(), vec![TaskKind::Bloodwork, TaskKind::Consent]);
    assert_eq!(rex.tasks.remaining_count(), 2);

    let bella = &report.cases[1];
    assert_eq!(bella.pet_name, "Bella, Jr");
    assert_eq!(bella.species, Species::Feline);
    assert!(bella.tasks.selected().is_empty());
}

#[test]
fn test_import_keeps_good_rows() {
    let csv = "MRN,Arrival Date,Pet Name,Owner Last Name,Species,DOB\n\
               1,2024-01-01,rex,doe,dog,2025-01-01\n\
               2,2024-01-01,max,lee,canine,2019-01-01\n";
    let report = import_cases_csv(csv).unwrap();

    assert_eq!(report.cases.len(), 1);
    assert_eq!(report.cases[0].medical_record_number, "2");
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].line, 2);
    assert_eq!(report.errors[0].column.as_deref(), Some("DOB"));
}

#[test]
fn test_import_fatal_errors() {
    assert_eq!(import_cases_csv("   \n"), Err(CsvError::Empty));
    assert_eq!(
        import_cases_csv("MRN,Pet Name\n1,rex\n"),
        Err(CsvError::MissingColumn("Arrival Date".into()))
    );
    assert!(matches!(
        import_cases_csv("MRN,Arrival Date,Pet Name,Owner Last Name,Species\n1,\"2024"),
        Err(CsvError::UnterminatedQuote { line: 2 })
    ));
}

#[test]
fn test_importer_with_custom_labels() {
    let mut labels = LabelResolver::new();
    labels.add_synonym("Chart", FieldId::MedicalRecordNumber);
    let importer = CaseImporter::with_labels(labels);

    let csv = "Chart,Arrival Date,Pet Name,Owner Last Name,Species\nC9,2024-03-03,pip,wu,other\n";
    let report = importer.import(csv).unwrap();

    assert!(report.is_clean());
    assert_eq!(report.cases[0].medical_record_number, "C9");
    assert_eq!(report.cases[0].species, Species::Other);

    assert!(matches!(
        import_cases_csv(csv),
        Err(CsvError::MissingColumn(_))
    ));
}
