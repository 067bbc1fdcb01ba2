//! Ownership claim policy.
//!
//! An opportunity belongs to its owner until it goes stale. Once more than
//! `window_days` whole days have passed since the last interaction, any user
//! may edit it, and editing it transfers ownership to that user.
//!
//! ```text
//! actor == owner                      → Allowed { new_owner_id: None }
//! actor != owner, elapsed > window    → Allowed { new_owner_id: Some(actor) }
//! actor != owner, elapsed <= window   → Denied  { NotOwnerWindowOpen }
//! ```
//!
//! Elapsed days are truncated toward zero, so exactly `window_days` days is
//! still inside the window. A `last_interaction_at` in the future yields a
//! negative count and keeps non-owners out.
//!
//! Everything here is pure: the caller supplies `now`, and nothing is cached
//! between evaluations.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::Opportunity;

/// Days of inactivity after which an opportunity is free to claim.
pub const DEFAULT_CLAIM_WINDOW_DAYS: u32 = 90;

/// Outcome of evaluating a mutation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    /// The mutation may proceed. `new_owner_id` is set when it also claims
    /// the opportunity for the acting user.
    Allowed { new_owner_id: Option<String> },
    Denied { reason: DenialReason },
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// The user that takes over ownership, if this decision transfers it.
    #[must_use]
    pub fn transfers_to(&self) -> Option<&str> {
        match self {
            Self::Allowed { new_owner_id } => new_owner_id.as_deref(),
            Self::Denied { .. } => None,
        }
    }
}

/// Why a mutation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DenialReason {
    NotOwnerWindowOpen {
        days_since_interaction: i64,
        window_days: u32,
    },
}

impl fmt::Display for DenialReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwnerWindowOpen {
                days_since_interaction,
                window_days,
            } => write!(
                f,
                "not owner and claim window not elapsed \
                 ({days_since_interaction} of more than {window_days} days since last interaction)"
            ),
        }
    }
}

/// Read-only claim view of one opportunity from one user's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ClaimStatus {
    pub opportunity_id: String,
    pub owner_id: String,
    pub owned_by_actor: bool,
    pub days_since_interaction: i64,
    pub free_to_claim: bool,
    /// First instant at which the opportunity becomes free to claim.
    pub claimable_at: Option<DateTime<Utc>>,
}

/// The free-to-claim rule, parameterized by window length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimPolicy {
    window_days: u32,
}

impl Default for ClaimPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_CLAIM_WINDOW_DAYS)
    }
}

impl ClaimPolicy {
    #[must_use]
    pub const fn new(window_days: u32) -> Self {
        Self { window_days }
    }

    #[must_use]
    pub const fn window_days(self) -> u32 {
        self.window_days
    }

    /// Whole days between `last_interaction_at` and `now`, truncated toward zero.
    #[must_use]
    pub fn elapsed_days(last_interaction_at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
        (now - last_interaction_at).num_days()
    }

    #[must_use]
    pub fn is_free_to_claim(self, last_interaction_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        Self::elapsed_days(last_interaction_at, now) > i64::from(self.window_days)
    }

    /// First instant where the elapsed whole-day count exceeds the window.
    #[must_use]
    pub fn claimable_at(self, last_interaction_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        let delta = TimeDelta::try_days(i64::from(self.window_days) + 1)?;
        last_interaction_at.checked_add_signed(delta)
    }

    /// Decide whether `acting_user_id` may mutate an opportunity currently
    /// owned by `owner_id`, and whether doing so transfers ownership.
    #[must_use]
    pub fn evaluate(
        self,
        owner_id: &str,
        last_interaction_at: DateTime<Utc>,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Decision {
        if acting_user_id == owner_id {
            return Decision::Allowed { new_owner_id: None };
        }

        let days_since_interaction = Self::elapsed_days(last_interaction_at, now);
        if days_since_interaction > i64::from(self.window_days) {
            tracing::debug!(
                owner_id,
                acting_user_id,
                days_since_interaction,
                "claim window elapsed; ownership will transfer"
            );
            Decision::Allowed {
                new_owner_id: Some(acting_user_id.to_string()),
            }
        } else {
            tracing::debug!(
                owner_id,
                acting_user_id,
                days_since_interaction,
                window_days = self.window_days,
                "non-owner mutation denied"
            );
            Decision::Denied {
                reason: DenialReason::NotOwnerWindowOpen {
                    days_since_interaction,
                    window_days: self.window_days,
                },
            }
        }
    }

    /// Evaluate against a loaded opportunity.
    #[must_use]
    pub fn evaluate_for(
        self,
        opportunity: &Opportunity,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> Decision {
        self.evaluate(
            &opportunity.owner_id,
            opportunity.last_interaction_at,
            acting_user_id,
            now,
        )
    }

    #[must_use]
    pub fn claim_status(
        self,
        opportunity: &Opportunity,
        acting_user_id: &str,
        now: DateTime<Utc>,
    ) -> ClaimStatus {
        ClaimStatus {
            opportunity_id: opportunity.id.clone(),
            owner_id: opportunity.owner_id.clone(),
            owned_by_actor: opportunity.owner_id == acting_user_id,
            days_since_interaction: Self::elapsed_days(opportunity.last_interaction_at, now),
            free_to_claim: self.is_free_to_claim(opportunity.last_interaction_at, now),
            claimable_at: self.claimable_at(opportunity.last_interaction_at),
        }
    }
}
