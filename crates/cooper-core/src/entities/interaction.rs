use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::InteractionKind;

/// An immutable log entry (call, email, meeting, ...) on an opportunity.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Interaction {
    pub id: String,
    pub opportunity_id: String,
    #[schemars(with = "String")]
    pub kind: InteractionKind,
    pub notes: Option<String>,
    /// When the contact happened, as reported by the caller.
    pub occurred_at: DateTime<Utc>,
    pub logged_by: String,
    pub created_at: DateTime<Utc>,
}

/// Input for logging an interaction.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct NewInteraction {
    #[schemars(with = "String")]
    pub kind: InteractionKind,
    pub notes: Option<String>,
    /// Defaults to the mutation's `now` when absent.
    pub occurred_at: Option<DateTime<Utc>>,
}

impl NewInteraction {
    #[must_use]
    pub const fn new(kind: InteractionKind) -> Self {
        Self {
            kind,
            notes: None,
            occurred_at: None,
        }
    }

    #[must_use]
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    #[must_use]
    pub fn occurred_at(mut self, at: DateTime<Utc>) -> Self {
        self.occurred_at = Some(at);
        self
    }
}
