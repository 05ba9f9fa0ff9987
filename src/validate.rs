//! Ordering and placement validators.
//!
//! Both validators are pure functions of (current arrangement, ground truth).
//! They never mutate their inputs, so validating the same arrangement twice
//! yields identical scores.
//!
//! Scoring: a section worth `budget` points with `n` items awards
//! `floor(correct * budget / n)` points. Partial credit always rounds down.

#[cfg(test)]
#[path = "validate_test.rs"]
mod validate_test;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::error::QuizError;
use crate::geometry::Point;
use crate::item::{Item, ItemId};

/// Correctness of a single item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemVerdict {
    pub id: ItemId,
    pub correct: bool,
}

/// Outcome of validating one section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionScore {
    pub earned: u32,
    pub total: u32,
    /// Per-item correctness, in ground-truth order.
    pub verdicts: Vec<ItemVerdict>,
}

impl SectionScore {
    #[must_use]
    pub fn correct_count(&self) -> usize {
        self.verdicts.iter().filter(|v| v.correct).count()
    }

    /// Ids of items that were not arranged correctly.
    #[must_use]
    pub fn incorrect_ids(&self) -> Vec<&str> {
        self.verdicts
            .iter()
            .filter(|v| !v.correct)
            .map(|v| v.id.as_str())
            .collect()
    }
}

/// Points earned for `correct` of `len` items in a section worth `budget`.
#[must_use]
pub fn section_points(correct: usize, len: usize, budget: u32) -> u32 {
    if len == 0 {
        return 0;
    }
    let earned = (correct.min(len) as u64 * u64::from(budget)) / len as u64;
    u32::try_from(earned).unwrap_or(budget)
}

/// Describe how `candidate` fails to be a permutation of `reference`.
///
/// Returns `None` when both contain exactly the same ids, each once.
#[must_use]
pub fn permutation_defect(candidate: &[ItemId], reference: &[ItemId]) -> Option<String> {
    let mut seen = HashSet::new();
    for id in candidate {
        if !seen.insert(id.as_str()) {
            return Some(format!("duplicate id {id}"));
        }
    }
    let expected: HashSet<&str> = reference.iter().map(String::as_str).collect();
    if let Some(missing) = reference.iter().find(|id| !seen.contains(id.as_str())) {
        return Some(format!("missing id {missing}"));
    }
    if let Some(extra) = candidate.iter().find(|id| !expected.contains(id.as_str())) {
        return Some(format!("unexpected id {extra}"));
    }
    None
}

/// Score a sequence arrangement by exact index matching.
///
/// An item is correct only if it sits at the same index as in `correct_order`.
///
/// # Errors
///
/// `ArrangementMismatch` if `current` is not a permutation of `correct_order`.
pub fn validate_sequence(
    section: &str,
    current: &[ItemId],
    correct_order: &[ItemId],
    budget: u32,
) -> Result<SectionScore, QuizError> {
    if let Some(reason) = permutation_defect(current, correct_order) {
        return Err(QuizError::ArrangementMismatch { section: section.to_string(), reason });
    }
    let verdicts: Vec<ItemVerdict> = correct_order
        .iter()
        .zip(current)
        .map(|(expected, actual)| ItemVerdict { id: expected.clone(), correct: expected == actual })
        .collect();
    let correct = verdicts.iter().filter(|v| v.correct).count();
    Ok(SectionScore { earned: section_points(correct, verdicts.len(), budget), total: budget, verdicts })
}

/// Score a placement arrangement by per-axis proximity to each item's
/// `correct_position`. Both `|dx|` and `|dy|` must be within `tolerance`
/// (inclusive). Items missing from `current` are incorrect.
///
/// # Errors
///
/// `InvalidGroundTruth` if an item has no `correct_position`;
/// `ArrangementMismatch` if `current` names an item not in the section.
pub fn validate_placement(
    section: &str,
    items: &[Item],
    current: &BTreeMap<ItemId, Point>,
    tolerance: f64,
    budget: u32,
) -> Result<SectionScore, QuizError> {
    if let Some(extra) = current.keys().find(|id| !items.iter().any(|item| &item.id == *id)) {
        return Err(QuizError::ArrangementMismatch {
            section: section.to_string(),
            reason: format!("unexpected id {extra}"),
        });
    }
    let mut verdicts = Vec::with_capacity(items.len());
    for item in items {
        let Some(target) = item.correct_position else {
            return Err(QuizError::InvalidGroundTruth {
                section: section.to_string(),
                reason: format!("item {} has no correct position", item.id),
            });
        };
        let correct = current.get(&item.id).is_some_and(|placed| {
            (placed.x - target.x).abs() <= tolerance && (placed.y - target.y).abs() <= tolerance
        });
        verdicts.push(ItemVerdict { id: item.id.clone(), correct });
    }
    let correct = verdicts.iter().filter(|v| v.correct).count();
    Ok(SectionScore { earned: section_points(correct, verdicts.len(), budget), total: budget, verdicts })
}
