//! Structured text extractor for pasted notes and dictation transcripts.
//!
//! Pipeline, per line: split on the first colon → resolve the label →
//! normalize the value for that field → store it in a [`ParsedFieldSet`].
//!
//! ```text
//! MRN: 12345                      medical_record_number = "12345"
//! Pet Name: buddy          →      pet_name              = "Buddy"
//! DOB: december fifteen           date_of_birth         = 2024-12-15
//!      twenty twenty four
//! ```
//!
//! Lines without a colon, with an unknown label, or with an empty value are
//! skipped. A value that fails to normalize drops only that field. Parsing
//! never fails as a whole.

mod dates;
mod diagnostics;
mod labels;
mod spoken;
mod values;

pub use dates::*;
pub use diagnostics::*;
pub use labels::*;
pub use spoken::*;
pub use values::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FieldId, ParsedFieldSet};

/// Extractor errors.
#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Invalid extractor config: {0}")]
    Config(#[from] serde_json::Error),
}

pub type ExtractorResult<T> = Result<T, ExtractorError>;

/// Extractor settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Keyword-match dictated species/sex before the strict parsers
    pub voice_tolerant: bool,
    /// Extra label synonyms on top of the built-in table
    pub extra_labels: BTreeMap<String, FieldId>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            voice_tolerant: true,
            extra_labels: BTreeMap::new(),
        }
    }
}

impl ExtractorConfig {
    /// Load settings from JSON. Missing keys take their defaults.
    pub fn from_json(json: &str) -> ExtractorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

static DEFAULT_PARSER: Lazy<StructuredTextParser> = Lazy::new(StructuredTextParser::new);

/// Extract case fields from free text with the default parser.
pub fn parse_structured_text(text: &str) -> ParsedFieldSet {
    DEFAULT_PARSER.parse(text)
}

/// Line-oriented field extractor.
pub struct StructuredTextParser {
    labels: LabelResolver,
    voice_tolerant: bool,
    sink: Arc<dyn DiagnosticSink>,
}

impl Default for StructuredTextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredTextParser {
    /// Create a parser with default settings, logging through `tracing`.
    pub fn new() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }

    /// Create a parser from settings.
    pub fn from_config(config: &ExtractorConfig) -> Self {
        let mut labels = LabelResolver::new();
        for (label, field) in &config.extra_labels {
            labels.add_synonym(label, *field);
        }

        Self {
            labels,
            voice_tolerant: config.voice_tolerant,
            sink: Arc::new(TracingSink),
        }
    }

    /// Route diagnostics to a different sink.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Get the label resolver for direct access.
    pub fn labels(&self) -> &LabelResolver {
        &self.labels
    }

    /// Get the label resolver for adding synonyms.
    pub fn labels_mut(&mut self) -> &mut LabelResolver {
        &mut self.labels
    }

    /// Extract fields from text. Later lines override earlier ones for the
    /// same field.
    pub fn parse(&self, text: &str) -> ParsedFieldSet {
        let mut fields = ParsedFieldSet::default();
        let mut line_count = 0;

        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            line_count += 1;
            let line_no = idx + 1;

            let Some((label, value)) = line.split_once(':') else {
                self.skip(line_no, SkipReason::NoColon);
                continue;
            };

            let label = label.trim().to_lowercase();
            let value = value.trim();
            if value.is_empty() {
                self.skip(line_no, SkipReason::EmptyValue);
                continue;
            }

            let Some(field) = self.labels.resolve(&label) else {
                self.skip(line_no, SkipReason::UnknownLabel(label));
                continue;
            };

            match self.apply(&mut fields, field, value) {
                Ok(()) => self.sink.record(&Diagnostic::FieldExtracted {
                    line: line_no,
                    field,
                }),
                Err(error) => self.sink.record(&Diagnostic::NormalizationFailed {
                    line: line_no,
                    field,
                    error,
                }),
            }
        }

        self.sink.record(&Diagnostic::Finished {
            lines: line_count,
            fields: fields.filled_count(),
        });
        fields
    }

    fn skip(&self, line: usize, reason: SkipReason) {
        self.sink.record(&Diagnostic::LineSkipped { line, reason });
    }

    /// Normalize one value and store it.
    fn apply(&self, fields: &mut ParsedFieldSet, field: FieldId, value: &str) -> NormalizeResult<()> {
        match field {
            FieldId::MedicalRecordNumber => fields.medical_record_number = Some(value.to_string()),
            FieldId::ArrivalDate => fields.arrival_date = Some(normalize_date(value)?),
            FieldId::PetName => fields.pet_name = Some(capitalize_words(value)),
            FieldId::OwnerLastName => fields.owner_last_name = Some(capitalize_words(value)),
            FieldId::Species => {
                fields.species = Some(if self.voice_tolerant {
                    parse_species(value)?
                } else {
                    parse_species_strict(value)?
                })
            }
            FieldId::Breed => fields.breed = Some(capitalize_words(value)),
            FieldId::Sex => {
                fields.sex = Some(if self.voice_tolerant {
                    parse_sex(value)?
                } else {
                    parse_sex_strict(value)?
                })
            }
            FieldId::DateOfBirth => fields.date_of_birth = Some(normalize_date(value)?),
            FieldId::PresentingComplaint => fields.presenting_complaint = Some(value.to_string()),
            FieldId::Notes => fields.notes = Some(value.to_string()),
        }
        Ok(())
    }
}
