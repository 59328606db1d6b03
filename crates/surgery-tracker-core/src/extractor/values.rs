//! Per-field value normalizers.
//!
//! Handles:
//! - Species classification (canine/feline/other)
//! - Sex and neuter status
//! - Yes/no flags
//! - Name capitalization
//!
//! Each classifier comes in a strict flavour (exact codes, as written by the
//! CSV export) and a voice-tolerant flavour that keyword-matches dictated
//! text and falls back to the strict one.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::models::{Sex, Species};

/// Normalization errors. Always per-field and never fatal to a parse.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Empty value")]
    Empty,

    #[error("Unrecognized species: {0}")]
    UnrecognizedSpecies(String),

    #[error("Unrecognized sex: {0}")]
    UnrecognizedSex(String),

    #[error("Unparseable date: {0}")]
    InvalidDate(String),
}

pub type NormalizeResult<T> = Result<T, NormalizeError>;

/// Keyword groups for dictated species, checked in order.
static SPECIES_PATTERNS: Lazy<Vec<(Regex, Species)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(canine|dog|dogs)\b").expect("valid canine regex"),
            Species::Canine,
        ),
        (
            Regex::new(r"\b(feline|cat|cats)\b").expect("valid feline regex"),
            Species::Feline,
        ),
        (
            Regex::new(r"\b(other|exotic|bird|reptile|rabbit|ferret|avian)\b")
                .expect("valid other-species regex"),
            Species::Other,
        ),
    ]
});

/// Exact species tokens.
const SPECIES_CODES: &[(&str, Species)] = &[
    ("canine", Species::Canine),
    ("dog", Species::Canine),
    ("feline", Species::Feline),
    ("cat", Species::Feline),
    ("other", Species::Other),
    ("exotic", Species::Other),
    ("avian", Species::Other),
];

/// Dictated sex patterns. Neuter/spay groups come before intact groups
/// because "male neutered" must not stop at "male".
enum SexPattern {
    /// Substring of the value
    Contains(&'static str),
    /// Whole value
    Exact(&'static str),
}

const SEX_PATTERNS: &[(Sex, &[SexPattern])] = &[
    (
        Sex::MaleNeutered,
        &[
            SexPattern::Contains("male neutered"),
            SexPattern::Contains("neutered male"),
            SexPattern::Contains("neutered"),
            SexPattern::Contains("castrated"),
            SexPattern::Exact("mn"),
        ],
    ),
    (
        Sex::FemaleSpayed,
        &[
            SexPattern::Contains("female spayed"),
            SexPattern::Contains("spayed female"),
            SexPattern::Contains("spayed"),
            SexPattern::Exact("fs"),
        ],
    ),
    (
        Sex::Male,
        &[
            SexPattern::Contains("intact male"),
            SexPattern::Exact("male"),
            SexPattern::Exact("m"),
        ],
    ),
    (
        Sex::Female,
        &[
            SexPattern::Contains("intact female"),
            SexPattern::Exact("female"),
            SexPattern::Exact("f"),
        ],
    ),
];

/// Exact sex codes.
const SEX_CODES: &[(&str, Sex)] = &[
    ("male", Sex::Male),
    ("m", Sex::Male),
    ("mi", Sex::Male),
    ("male intact", Sex::Male),
    ("male_neutered", Sex::MaleNeutered),
    ("male-neutered", Sex::MaleNeutered),
    ("mn", Sex::MaleNeutered),
    ("m/n", Sex::MaleNeutered),
    ("mc", Sex::MaleNeutered),
    ("female", Sex::Female),
    ("f", Sex::Female),
    ("fi", Sex::Female),
    ("female intact", Sex::Female),
    ("female_spayed", Sex::FemaleSpayed),
    ("female-spayed", Sex::FemaleSpayed),
    ("fs", Sex::FemaleSpayed),
    ("f/s", Sex::FemaleSpayed),
];

const TRUE_VALUES: &[&str] = &["true", "yes", "x", "1"];

/// Parse a species code exactly ("dog", "feline", ...).
pub fn parse_species_strict(value: &str) -> NormalizeResult<Species> {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() {
        return Err(NormalizeError::Empty);
    }
    SPECIES_CODES
        .iter()
        .find(|(code, _)| *code == lower)
        .map(|(_, species)| *species)
        .ok_or_else(|| NormalizeError::UnrecognizedSpecies(value.trim().to_string()))
}

/// Classify dictated species text ("a neutered dog", "Cats").
pub fn parse_species(value: &str) -> NormalizeResult<Species> {
    let lower = value.trim().to_lowercase();
    SPECIES_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(&lower))
        .map(|(_, species)| Ok(*species))
        .unwrap_or_else(|| parse_species_strict(value))
}

/// Parse a sex code exactly ("male_neutered", "FS", ...).
pub fn parse_sex_strict(value: &str) -> NormalizeResult<Sex> {
    let lower = value.trim().to_lowercase();
    if lower.is_empty() {
        return Err(NormalizeError::Empty);
    }
    SEX_CODES
        .iter()
        .find(|(code, _)| *code == lower)
        .map(|(_, sex)| *sex)
        .ok_or_else(|| NormalizeError::UnrecognizedSex(value.trim().to_string()))
}

/// Classify dictated sex/neuter text ("neutered male", "spayed").
pub fn parse_sex(value: &str) -> NormalizeResult<Sex> {
    let lower = value.trim().to_lowercase();
    let matched = SEX_PATTERNS.iter().find(|(_, patterns)| {
        patterns.iter().any(|pattern| match pattern {
            SexPattern::Contains(needle) => lower.contains(needle),
            SexPattern::Exact(code) => lower == *code,
        })
    });

    match matched {
        Some((sex, _)) => Ok(*sex),
        None => parse_sex_strict(value),
    }
}

/// Parse a yes/no flag. Anything unrecognized is false.
pub fn parse_bool(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    TRUE_VALUES.contains(&lower.as_str())
}

/// Capitalize each space-separated word ("mc DONALD" → "Mc Donald").
pub fn capitalize_words(value: &str) -> String {
    value
        .split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
