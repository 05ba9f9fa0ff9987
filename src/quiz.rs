//! Section quiz aggregator.
//!
//! DESIGN
//! ======
//! A quiz is a fixed set of sections loaded once from the data source. Each
//! section is submitted at most once; a second submission is refused with
//! `AlreadySubmitted` until the host explicitly resets that section. This
//! keeps duplicate submit events from double-counting a section.
//!
//! Session phases:
//!
//! ```text
//! NotStarted -> InProgress -> SectionSubmitted(id) -> ... -> AllSubmitted -> Completed
//!                    ^                                                          |
//!                    +------------------------ reset ---------------------------+
//! ```

#[cfg(test)]
#[path = "quiz_test.rs"]
mod quiz_test;

use std::collections::{BTreeMap, HashSet};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::error::QuizError;
use crate::geometry::Point;
use crate::item::{Item, ItemId};
use crate::validate::{SectionScore, permutation_defect, validate_placement, validate_sequence};

/// Identifier of a quiz section.
pub type SectionId = String;

// =============================================================================
// TYPES
// =============================================================================

/// Quiz category of a section. Unknown strings are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectionKind {
    Tongue,
    Lip,
    Length,
    Other(String),
}

impl From<String> for SectionKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "tongue" => Self::Tongue,
            "lip" => Self::Lip,
            "length" => Self::Length,
            _ => Self::Other(value),
        }
    }
}

impl From<SectionKind> for String {
    fn from(kind: SectionKind) -> Self {
        match kind {
            SectionKind::Tongue => "tongue".into(),
            SectionKind::Lip => "lip".into(),
            SectionKind::Length => "length".into(),
            SectionKind::Other(other) => other,
        }
    }
}

/// How a section's arrangement is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Order of items is compared index by index with `correct_order`.
    #[default]
    Sequence,
    /// Each item's position is compared with its `correct_position`.
    Placement,
}

/// A named group of items forming one quiz category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: SectionId,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub mode: ValidationMode,
    /// Current arrangement; not necessarily the correct order.
    pub items: Vec<Item>,
    /// Ground-truth order of item ids (sequence mode).
    #[serde(default)]
    pub correct_order: Vec<ItemId>,
    /// Point budget; defaults to one unit of `points_per_item` per item.
    #[serde(default)]
    pub points: Option<u32>,
}

impl Section {
    /// Check the section's ground truth.
    ///
    /// # Errors
    ///
    /// `InvalidGroundTruth` if item ids repeat, if a sequence section's
    /// `correct_order` is not a permutation of its items, or if a placement
    /// item lacks a `correct_position`.
    pub fn validate(&self) -> Result<(), QuizError> {
        let invalid = |reason: String| QuizError::InvalidGroundTruth { section: self.id.clone(), reason };
        let mut seen = HashSet::new();
        if let Some(dup) = self.items.iter().find(|item| !seen.insert(item.id.as_str())) {
            return Err(invalid(format!("duplicate item id {}", dup.id)));
        }
        match self.mode {
            ValidationMode::Sequence => {
                if let Some(reason) = permutation_defect(&self.correct_order, &self.current_order()) {
                    return Err(invalid(format!("correct order: {reason}")));
                }
            }
            ValidationMode::Placement => {
                if let Some(item) = self.items.iter().find(|item| item.correct_position.is_none()) {
                    return Err(invalid(format!("item {} has no correct position", item.id)));
                }
            }
        }
        Ok(())
    }

    /// Ids of the items in their current order.
    #[must_use]
    pub fn current_order(&self) -> Vec<ItemId> {
        self.items.iter().map(|item| item.id.clone()).collect()
    }

    /// Total points this section is worth.
    #[must_use]
    pub fn budget(&self, points_per_item: u32) -> u32 {
        self.points.unwrap_or_else(|| {
            u32::try_from(self.items.len())
                .unwrap_or(u32::MAX)
                .saturating_mul(points_per_item)
        })
    }

    /// The section with its items in random order.
    ///
    /// For sequence sections with two or more items the result never equals
    /// `correct_order`, so the learner always has something to sort.
    #[must_use]
    pub fn shuffled<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        self.items.shuffle(rng);
        if self.mode == ValidationMode::Sequence && self.items.len() > 1 && self.current_order() == self.correct_order {
            self.items.swap(0, 1);
        }
        self
    }
}

/// A learner's arrangement of one section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arrangement {
    /// Item ids in the order the learner placed them.
    Sequence(Vec<ItemId>),
    /// Top-left corner where the learner dropped each item.
    Placement(BTreeMap<ItemId, Point>),
}

/// Where a quiz session stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuizPhase {
    #[default]
    NotStarted,
    InProgress,
    /// The named section was the most recent submission; others remain.
    SectionSubmitted(SectionId),
    AllSubmitted,
    Completed,
}

/// Aggregate outcome of a completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub total: u32,
    pub earned: u32,
    pub per_section: BTreeMap<SectionId, u32>,
}

impl QuizResult {
    /// Earned points as a whole-number percentage, rounded down. Zero for an empty quiz.
    #[must_use]
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let pct = u64::from(self.earned) * 100 / u64::from(self.total);
        u32::try_from(pct).unwrap_or(100)
    }
}

// =============================================================================
// SESSION
// =============================================================================

pub struct QuizSession {
    sections: Vec<Section>,
    results: BTreeMap<SectionId, SectionScore>,
    phase: QuizPhase,
    completed: Option<QuizResult>,
    tolerance: f64,
    points_per_item: u32,
}

impl QuizSession {
    /// Load a quiz, checking every section's ground truth up front.
    ///
    /// # Errors
    ///
    /// `DuplicateSection` for repeated section ids, `InvalidGroundTruth` for
    /// a section whose ground truth is inconsistent or whose point budget
    /// would push the quiz total past `u32::MAX`.
    pub fn new(sections: Vec<Section>, config: &EngineConfig) -> Result<Self, QuizError> {
        let mut seen = HashSet::new();
        let mut total: u32 = 0;
        for section in &sections {
            if !seen.insert(section.id.as_str()) {
                return Err(QuizError::DuplicateSection(section.id.clone()));
            }
            section.validate()?;
            total = total
                .checked_add(section.budget(config.points_per_item))
                .ok_or_else(|| QuizError::InvalidGroundTruth {
                    section: section.id.clone(),
                    reason: "point budget overflows the quiz total".into(),
                })?;
        }
        debug!(sections = sections.len(), "quiz loaded");
        Ok(Self {
            sections,
            results: BTreeMap::new(),
            phase: QuizPhase::NotStarted,
            completed: None,
            tolerance: config.placement_tolerance,
            points_per_item: config.points_per_item,
        })
    }

    /// Validate and record one section.
    ///
    /// # Errors
    ///
    /// `UnknownSection` if the id was not loaded, `AlreadySubmitted` if the
    /// section already has a recorded result, `ArrangementMismatch` if the
    /// arrangement does not fit the section.
    pub fn submit_section(&mut self, section_id: &str, arrangement: &Arrangement) -> Result<SectionScore, QuizError> {
        let section = self
            .section(section_id)
            .ok_or_else(|| QuizError::UnknownSection(section_id.to_string()))?;
        if self.results.contains_key(section_id) {
            return Err(QuizError::AlreadySubmitted(section_id.to_string()));
        }

        let budget = section.budget(self.points_per_item);
        let score = match (section.mode, arrangement) {
            (ValidationMode::Sequence, Arrangement::Sequence(order)) => {
                validate_sequence(&section.id, order, &section.correct_order, budget)?
            }
            (ValidationMode::Placement, Arrangement::Placement(positions)) => {
                validate_placement(&section.id, &section.items, positions, self.tolerance, budget)?
            }
            (mode, _) => {
                return Err(QuizError::ArrangementMismatch {
                    section: section.id.clone(),
                    reason: format!("expected a {mode:?} arrangement").to_lowercase(),
                });
            }
        };

        info!(section = %section_id, earned = score.earned, total = score.total, "section submitted");
        self.results.insert(section_id.to_string(), score.clone());
        self.phase = if self.pending_sections().is_empty() {
            QuizPhase::AllSubmitted
        } else {
            QuizPhase::SectionSubmitted(section_id.to_string())
        };
        Ok(score)
    }

    /// Roll every section's result into the final quiz result.
    ///
    /// Calling again after completion returns the same result.
    ///
    /// # Errors
    ///
    /// `IncompleteQuiz` while any section is still unsubmitted.
    pub fn complete(&mut self) -> Result<QuizResult, QuizError> {
        if let Some(result) = &self.completed {
            return Ok(result.clone());
        }
        let pending = self.pending_sections().len();
        if pending > 0 {
            return Err(QuizError::IncompleteQuiz { pending });
        }

        let per_section: BTreeMap<SectionId, u32> = self
            .results
            .iter()
            .map(|(id, score)| (id.clone(), score.earned))
            .collect();
        let result = QuizResult {
            total: self.results.values().map(|s| s.total).sum(),
            earned: per_section.values().sum(),
            per_section,
        };
        info!(earned = result.earned, total = result.total, "quiz completed");
        self.completed = Some(result.clone());
        self.phase = QuizPhase::Completed;
        Ok(result)
    }

    /// Clear one section's result, or every result when `section_id` is `None`.
    ///
    /// # Errors
    ///
    /// `UnknownSection` if `section_id` names a section that was not loaded.
    pub fn reset(&mut self, section_id: Option<&str>) -> Result<(), QuizError> {
        match section_id {
            Some(id) => {
                if self.section(id).is_none() {
                    return Err(QuizError::UnknownSection(id.to_string()));
                }
                self.results.remove(id);
                debug!(section = %id, "section reset");
            }
            None => {
                self.results.clear();
                debug!("quiz reset");
            }
        }
        self.completed = None;
        self.phase = QuizPhase::InProgress;
        Ok(())
    }

    /// Mark the quiz as started without submitting anything.
    pub fn start(&mut self) {
        if self.phase == QuizPhase::NotStarted {
            self.phase = QuizPhase::InProgress;
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Recorded result for a section, if it has been submitted.
    #[must_use]
    pub fn section_result(&self, id: &str) -> Option<&SectionScore> {
        self.results.get(id)
    }

    /// Ids of sections not yet submitted, in load order.
    #[must_use]
    pub fn pending_sections(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter(|s| !self.results.contains_key(&s.id))
            .map(|s| s.id.as_str())
            .collect()
    }
}
