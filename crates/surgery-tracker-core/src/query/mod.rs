//! Case list browsing: text search, species/status/date filters and sorting.

use std::cmp::Ordering;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Species, SurgeryCase};

/// Task status filter for the case list.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Any,
    /// At least one selected task remains (or nothing selected yet)
    Open,
    /// Every selected task is completed
    Done,
}

/// Case list ordering. Ties are broken by MRN.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseSort {
    #[default]
    ArrivalNewest,
    ArrivalOldest,
    PetName,
    OwnerName,
    /// Most remaining tasks first
    MostRemaining,
}

/// Case list query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CaseQuery {
    /// Case-insensitive substring over MRN, pet name, owner and breed
    pub text: Option<String>,
    pub species: Option<Species>,
    pub status: CaseStatus,
    /// Inclusive lower bound on arrival date
    pub arrived_from: Option<NaiveDate>,
    /// Inclusive upper bound on arrival date
    pub arrived_to: Option<NaiveDate>,
    pub sort: CaseSort,
}

impl CaseQuery {
    /// Check whether a case passes every filter.
    pub fn matches(&self, case: &SurgeryCase) -> bool {
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            let haystacks = [
                Some(case.medical_record_number.as_str()),
                Some(case.pet_name.as_str()),
                Some(case.owner_last_name.as_str()),
                case.breed.as_deref(),
            ];
            let found = haystacks
                .into_iter()
                .flatten()
                .any(|h| h.to_lowercase().contains(&needle));
            if !found {
                return false;
            }
        }

        if self.species.is_some_and(|s| s != case.species) {
            return false;
        }

        match self.status {
            CaseStatus::Any => {}
            CaseStatus::Open if case.is_done() => return false,
            CaseStatus::Done if !case.is_done() => return false,
            _ => {}
        }

        if self.arrived_from.is_some_and(|from| case.arrival_date < from) {
            return false;
        }
        if self.arrived_to.is_some_and(|to| case.arrival_date > to) {
            return false;
        }

        true
    }

    fn compare(&self, a: &SurgeryCase, b: &SurgeryCase) -> Ordering {
        let primary = match self.sort {
            CaseSort::ArrivalNewest => b.arrival_date.cmp(&a.arrival_date),
            CaseSort::ArrivalOldest => a.arrival_date.cmp(&b.arrival_date),
            CaseSort::PetName => a.pet_name.to_lowercase().cmp(&b.pet_name.to_lowercase()),
            CaseSort::OwnerName => a
                .owner_last_name
                .to_lowercase()
                .cmp(&b.owner_last_name.to_lowercase()),
            CaseSort::MostRemaining => b.tasks.remaining_count().cmp(&a.tasks.remaining_count()),
        };
        primary.then_with(|| a.medical_record_number.cmp(&b.medical_record_number))
    }
}

/// Filter and sort a case list.
pub fn filter_cases<'a>(cases: &'a [SurgeryCase], query: &CaseQuery) -> Vec<&'a SurgeryCase> {
    let mut matched: Vec<&SurgeryCase> = cases.iter().filter(|c| query.matches(c)).collect();
    matched.sort_by(|a, b| query.compare(a, b));
    matched
}
