//! Scores, status enums and failure kinds.
//!
//! Status enums serialize as `snake_case`. `SaveStatus` carries the
//! auto-save state machine via `allowed_next_states()`.

use std::borrow::Cow;
use std::fmt;

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Score
// ---------------------------------------------------------------------------

/// Compliance score of an answered question.
///
/// Serialized as the bare integers `1`, `2` and `3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Score {
    One,
    Two,
    Three,
}

impl Score {
    /// Highest attainable score per answered question.
    pub const MAX_POINTS: u32 = 3;

    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl TryFrom<u8> for Score {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            3 => Ok(Self::Three),
            other => Err(CoreError::Validation(format!(
                "score must be 1, 2 or 3 (got {other})"
            ))),
        }
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        match score {
            Score::One => 1,
            Score::Two => 2,
            Score::Three => 3,
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.points())
    }
}

impl JsonSchema for Score {
    fn schema_name() -> Cow<'static, str> {
        "Score".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "integer",
            "minimum": 1,
            "maximum": 3
        })
    }
}

// ---------------------------------------------------------------------------
// SaveStatus
// ---------------------------------------------------------------------------

/// Observable state of the auto-save controller.
///
/// ```text
/// idle → unsaved → saving → saved → idle
///        unsaved → unsaved            (debounce reset)
///                  saving → error → unsaved
///                           saved → unsaved (edit during grace)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Unsaved,
    Saving,
    Saved,
    Error,
}

impl SaveStatus {
    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Idle | Self::Error => &[Self::Unsaved],
            Self::Unsaved => &[Self::Unsaved, Self::Saving],
            Self::Saving => &[Self::Saved, Self::Error],
            Self::Saved => &[Self::Idle, Self::Unsaved],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Unsaved => "unsaved",
            Self::Saving => "saving",
            Self::Saved => "saved",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SectionStatus
// ---------------------------------------------------------------------------

/// Completion status of a section, derived from its own answered/total counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    NotApplicable,
    Empty,
    Partial,
    Complete,
}

impl SectionStatus {
    /// Derive the status from answered and total question counts.
    #[must_use]
    pub const fn from_counts(answered: u32, total: u32) -> Self {
        if total == 0 {
            Self::NotApplicable
        } else if answered == 0 {
            Self::Empty
        } else if answered >= total {
            Self::Complete
        } else {
            Self::Partial
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotApplicable => "not_applicable",
            Self::Empty => "empty",
            Self::Partial => "partial",
            Self::Complete => "complete",
        }
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SaveFailureKind
// ---------------------------------------------------------------------------

/// Why a bulk upsert failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaveFailureKind {
    /// Network failure, timeout or server-side error.
    Transient,
    /// The batch was rejected with a structured reason.
    Rejected,
}

impl SaveFailureKind {
    /// Whether the controller schedules a retry on its own.
    #[must_use]
    pub const fn auto_retries(self) -> bool {
        matches!(self, Self::Transient)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SaveFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
