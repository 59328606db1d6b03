//! Per-case task checklist.
//!
//! A case selects the tasks that apply to it from a fixed catalog and marks
//! them completed as the case moves through surgery and discharge. Only
//! selected tasks can be completed.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Checklist errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecklistError {
    #[error("Task not selected: {0}")]
    NotSelected(&'static str),

    #[error("Unknown task: {0}")]
    UnknownTask(String),
}

pub type ChecklistResult<T> = Result<T, ChecklistError>;

/// Catalog of checklist tasks. Declaration order is display order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    History,
    Bloodwork,
    Imaging,
    Consent,
    Estimate,
    SurgeryReport,
    DischargeInstructions,
    Histopathology,
    ReferralLetter,
    RecheckCall,
}

/// (task, key, label)
const CATALOG: [(TaskKind, &str, &str); 10] = [
    (TaskKind::History, "history", "History"),
    (TaskKind::Bloodwork, "bloodwork", "Bloodwork"),
    (TaskKind::Imaging, "imaging", "Imaging"),
    (TaskKind::Consent, "consent", "Consent Form"),
    (TaskKind::Estimate, "estimate", "Estimate"),
    (TaskKind::SurgeryReport, "surgery_report", "Surgery Report"),
    (
        TaskKind::DischargeInstructions,
        "discharge_instructions",
        "Discharge Instructions",
    ),
    (TaskKind::Histopathology, "histopathology", "Histopathology"),
    (TaskKind::ReferralLetter, "referral_letter", "Referral Letter"),
    (TaskKind::RecheckCall, "recheck_call", "Recheck Call"),
];

impl TaskKind {
    /// All tasks in display order.
    pub fn all() -> impl Iterator<Item = TaskKind> {
        CATALOG.iter().map(|(task, _, _)| *task)
    }

    /// Stable snake_case key.
    pub fn key(&self) -> &'static str {
        CATALOG[self.index()].1
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        CATALOG[self.index()].2
    }

    /// Look up a task by key or label (case-insensitive).
    pub fn from_name(name: &str) -> ChecklistResult<TaskKind> {
        let wanted = name.trim().to_lowercase();
        CATALOG
            .iter()
            .find(|(_, key, label)| *key == wanted || label.to_lowercase() == wanted)
            .map(|(task, _, _)| *task)
            .ok_or_else(|| ChecklistError::UnknownTask(name.to_string()))
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Which slice of a checklist to show.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TaskFilter {
    #[default]
    All,
    Remaining,
    Completed,
}

/// Selected and completed tasks for one case.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskChecklist {
    selected: BTreeSet<TaskKind>,
    completed: BTreeSet<TaskKind>,
}

impl TaskChecklist {
    /// Create an empty checklist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a checklist with the given tasks selected.
    pub fn with_selected(tasks: impl IntoIterator<Item = TaskKind>) -> Self {
        Self {
            selected: tasks.into_iter().collect(),
            completed: BTreeSet::new(),
        }
    }

    pub fn select(&mut self, task: TaskKind) {
        self.selected.insert(task);
    }

    /// Deselect a task. Its completion is cleared as well.
    pub fn deselect(&mut self, task: TaskKind) {
        self.selected.remove(&task);
        self.completed.remove(&task);
    }

    /// Mark a selected task completed or not completed.
    pub fn set_completed(&mut self, task: TaskKind, done: bool) -> ChecklistResult<()> {
        if !self.selected.contains(&task) {
            return Err(ChecklistError::NotSelected(task.key()));
        }
        if done {
            self.completed.insert(task);
        } else {
            self.completed.remove(&task);
        }
        Ok(())
    }

    /// Flip the completion state of a selected task, returning the new state.
    pub fn toggle(&mut self, task: TaskKind) -> ChecklistResult<bool> {
        let done = !self.is_completed(task);
        self.set_completed(task, done)?;
        Ok(done)
    }

    pub fn is_selected(&self, task: TaskKind) -> bool {
        self.selected.contains(&task)
    }

    pub fn is_completed(&self, task: TaskKind) -> bool {
        self.completed.contains(&task)
    }

    /// Selected tasks in catalog order.
    pub fn selected(&self) -> Vec<TaskKind> {
        self.selected.iter().copied().collect()
    }

    /// Completed tasks in catalog order.
    pub fn completed(&self) -> Vec<TaskKind> {
        self.selected.intersection(&self.completed).copied().collect()
    }

    /// Selected tasks not yet completed, in catalog order.
    pub fn remaining(&self) -> Vec<TaskKind> {
        self.selected.difference(&self.completed).copied().collect()
    }

    /// Number of selected tasks not yet completed.
    pub fn remaining_count(&self) -> usize {
        self.selected.difference(&self.completed).count()
    }

    /// (completed, selected)
    pub fn progress(&self) -> (usize, usize) {
        let done = self.selected.intersection(&self.completed).count();
        (done, self.selected.len())
    }

    /// True when at least one task is selected and none remain.
    pub fn is_done(&self) -> bool {
        !self.selected.is_empty() && self.remaining_count() == 0
    }

    /// Tasks matching a filter, in catalog order.
    pub fn filtered(&self, filter: TaskFilter) -> Vec<TaskKind> {
        match filter {
            TaskFilter::All => self.selected(),
            TaskFilter::Remaining => self.remaining(),
            TaskFilter::Completed => self.completed(),
        }
    }
}
