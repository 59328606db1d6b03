//! CSV exchange for surgery cases.

mod columns;
mod import;
mod writer;

pub use columns::*;
pub use import::*;
pub use writer::*;

use thiserror::Error;

/// Fatal CSV errors. Problems confined to one row are reported as
/// [`RowError`]s instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsvError {
    #[error("CSV input is empty")]
    Empty,

    #[error("Unterminated quoted field starting on line {line}")]
    UnterminatedQuote { line: usize },

    #[error("Missing required column: {0}")]
    MissingColumn(String),
}

pub type CsvResult<T> = Result<T, CsvError>;
