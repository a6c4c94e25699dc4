//! Moderation state machine for artist-profile subjects.
//!
//! Profile posts feature a subject that must pass editorial review
//! before publishing. The status moves forward only: a rejected or
//! published subject never changes state again.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Review status of a moderation subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationStatus {
    Pending,
    Approved,
    Rejected,
    Published,
}

impl ModerationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ModerationStatus::Pending => "pending",
            ModerationStatus::Approved => "approved",
            ModerationStatus::Rejected => "rejected",
            ModerationStatus::Published => "published",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ModerationStatus::Pending),
            "approved" => Some(ModerationStatus::Approved),
            "rejected" => Some(ModerationStatus::Rejected),
            "published" => Some(ModerationStatus::Published),
            _ => None,
        }
    }

    /// Terminal states admit no further transition.
    pub fn is_terminal(self) -> bool {
        matches!(self, ModerationStatus::Rejected | ModerationStatus::Published)
    }

    /// Only an approved subject may be featured in a published post.
    pub fn is_publishable(self) -> bool {
        self == ModerationStatus::Approved
    }

    /// Allowed forward transitions:
    /// pending → approved | rejected, approved → published.
    pub fn can_transition(self, to: ModerationStatus) -> bool {
        use ModerationStatus::*;
        matches!(
            (self, to),
            (Pending, Approved) | (Pending, Rejected) | (Approved, Published)
        )
    }

    /// Apply a transition, rejecting anything the machine disallows.
    pub fn transition(self, to: ModerationStatus) -> Result<ModerationStatus, CoreError> {
        if self.can_transition(to) {
            Ok(to)
        } else {
            Err(CoreError::Conflict(format!(
                "Cannot move moderation status from '{}' to '{}'",
                self.as_str(),
                to.as_str()
            )))
        }
    }
}
