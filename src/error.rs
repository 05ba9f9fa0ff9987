//! Error types for the layout and quiz engines.
//!
//! Geometry errors are local and recoverable: the rejected mutation leaves the
//! store untouched. Quiz errors signal a sequencing mistake in the host; the
//! aggregator refuses the operation and reports the kind.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use crate::item::ItemId;
use crate::quiz::SectionId;

/// Stable machine-readable code for an error, suitable for host UIs and logs.
pub trait ErrorCode {
    fn error_code(&self) -> &'static str;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("duplicate item id: {0}")]
    DuplicateId(ItemId),
    #[error("invalid geometry for {id}: {reason}")]
    InvalidGeometry { id: ItemId, reason: String },
    #[error("invalid style patch for {0}: expected a JSON object")]
    InvalidStyle(ItemId),
}

impl ErrorCode for LayoutError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::ItemNotFound(_) => "E_ITEM_NOT_FOUND",
            Self::DuplicateId(_) => "E_DUPLICATE_ID",
            Self::InvalidGeometry { .. } => "E_INVALID_GEOMETRY",
            Self::InvalidStyle(_) => "E_INVALID_STYLE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("unknown section: {0}")]
    UnknownSection(SectionId),
    #[error("section already submitted: {0}")]
    AlreadySubmitted(SectionId),
    #[error("quiz incomplete: {pending} section(s) not submitted")]
    IncompleteQuiz { pending: usize },
    #[error("section {section} has invalid ground truth: {reason}")]
    InvalidGroundTruth { section: SectionId, reason: String },
    #[error("duplicate section id: {0}")]
    DuplicateSection(SectionId),
    #[error("arrangement for section {section} does not match: {reason}")]
    ArrangementMismatch { section: SectionId, reason: String },
}

impl ErrorCode for QuizError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownSection(_) => "E_UNKNOWN_SECTION",
            Self::AlreadySubmitted(_) => "E_ALREADY_SUBMITTED",
            Self::IncompleteQuiz { .. } => "E_INCOMPLETE_QUIZ",
            Self::InvalidGroundTruth { .. } => "E_INVALID_GROUND_TRUTH",
            Self::DuplicateSection(_) => "E_DUPLICATE_SECTION",
            Self::ArrangementMismatch { .. } => "E_ARRANGEMENT_MISMATCH",
        }
    }
}
