//! CSV column layout: the ten case fields, then a selected/done pair per task.

use crate::extractor::LabelResolver;
use crate::models::{FieldId, TaskKind};

/// One CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Field(FieldId),
    /// Task is selected
    Task(TaskKind),
    /// Task is completed
    TaskDone(TaskKind),
}

const DONE_SUFFIX: &str = " done";

impl Column {
    /// Header text written on export.
    pub fn header(&self) -> String {
        match self {
            Column::Field(field) => field.label().to_string(),
            Column::Task(task) => task.label().to_string(),
            Column::TaskDone(task) => format!("{} Done", task.label()),
        }
    }

    /// Resolve header text on import. Field synonyms are accepted; task
    /// columns match by label or key.
    pub fn from_header(header: &str, labels: &LabelResolver) -> Option<Column> {
        if let Some(field) = labels.resolve(header) {
            return Some(Column::Field(field));
        }
        if let Ok(task) = TaskKind::from_name(header) {
            return Some(Column::Task(task));
        }

        let lower = header.trim().to_lowercase();
        let prefix = lower
            .strip_suffix(DONE_SUFFIX)
            .or_else(|| lower.strip_suffix("_done"))?;
        TaskKind::from_name(prefix).ok().map(Column::TaskDone)
    }
}

/// Export column order.
pub fn csv_columns() -> Vec<Column> {
    FieldId::ALL
        .into_iter()
        .map(Column::Field)
        .chain(TaskKind::all().flat_map(|task| [Column::Task(task), Column::TaskDone(task)]))
        .collect()
}
