//! Pipeline enums, entity types, and audit actions for Cooper.
//!
//! Status, temperature, and product are closed sets stored by their display
//! label (`"Negociação"`, `"Quente"`, `"4L"`). Free-text legacy values are
//! rejected at the boundary: `parse` folds case and accents, then either maps
//! to a known variant or fails with `CoreError::Validation`.
//!
//! Interaction kinds are open-ended: anything that is not a known kind is kept
//! as `InteractionKind::Other(label)`.

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

/// Lowercase and strip the Portuguese diacritics that show up in labels.
fn fold(raw: &str) -> String {
    raw.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'à' | 'â' | 'ã' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            '_' | '-' => ' ',
            other => other,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// PipelineStatus
// ---------------------------------------------------------------------------

/// Sales stage of an opportunity.
///
/// ```text
/// Qualificação → Prospecção → Proposta → Negociação → Fechado
/// ```
///
/// Any stage may be set from any other; the ownership policy, not the stage,
/// decides who may write. `Fechado` covers the legacy closed stages.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
pub enum PipelineStatus {
    #[default]
    #[serde(rename = "Qualificação")]
    Qualification,
    #[serde(rename = "Prospecção")]
    Prospecting,
    #[serde(rename = "Proposta")]
    Proposal,
    #[serde(rename = "Negociação")]
    Negotiation,
    #[serde(rename = "Fechado")]
    Closed,
}

impl PipelineStatus {
    pub const ALL: [Self; 5] = [
        Self::Qualification,
        Self::Prospecting,
        Self::Proposal,
        Self::Negotiation,
        Self::Closed,
    ];

    /// Return the label used in SQL storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Qualification => "Qualificação",
            Self::Prospecting => "Prospecção",
            Self::Proposal => "Proposta",
            Self::Negotiation => "Negociação",
            Self::Closed => "Fechado",
        }
    }

    /// Stages shown as board columns; closed opportunities are off the board.
    #[must_use]
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

impl FromStr for PipelineStatus {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match fold(raw).as_str() {
            "qualificacao" => Ok(Self::Qualification),
            "prospeccao" => Ok(Self::Prospecting),
            "proposta" => Ok(Self::Proposal),
            "negociacao" => Ok(Self::Negotiation),
            "fechado" => Ok(Self::Closed),
            _ => Err(CoreError::Validation(format!(
                "unknown status '{raw}' (expected one of: Qualificação, Prospecção, Proposta, Negociação, Fechado)"
            ))),
        }
    }
}

impl fmt::Display for PipelineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Temperature
// ---------------------------------------------------------------------------

/// How warm the lead is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Temperature {
    #[serde(rename = "Frio")]
    Cold,
    #[serde(rename = "Morno")]
    Warm,
    #[serde(rename = "Quente")]
    Hot,
    #[serde(rename = "Fervendo")]
    Boiling,
}

impl Temperature {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "Frio",
            Self::Warm => "Morno",
            Self::Hot => "Quente",
            Self::Boiling => "Fervendo",
        }
    }
}

impl FromStr for Temperature {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match fold(raw).as_str() {
            "frio" => Ok(Self::Cold),
            "morno" => Ok(Self::Warm),
            "quente" => Ok(Self::Hot),
            "fervendo" => Ok(Self::Boiling),
            _ => Err(CoreError::Validation(format!(
                "unknown temperature '{raw}' (expected one of: Frio, Morno, Quente, Fervendo)"
            ))),
        }
    }
}

impl fmt::Display for Temperature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

/// Product line being sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Product {
    #[serde(rename = "Cooper")]
    Cooper,
    #[serde(rename = "4L")]
    FourthLine,
    #[serde(rename = "Personalizados")]
    Custom,
}

impl Product {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cooper => "Cooper",
            Self::FourthLine => "4L",
            Self::Custom => "Personalizados",
        }
    }
}

impl FromStr for Product {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match fold(raw).as_str() {
            "cooper" => Ok(Self::Cooper),
            "4l" | "4ª linha" | "quarta linha" => Ok(Self::FourthLine),
            "personalizados" | "personalizado" => Ok(Self::Custom),
            _ => Err(CoreError::Validation(format!(
                "unknown product '{raw}' (expected one of: Cooper, 4L, Personalizados)"
            ))),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// InteractionKind
// ---------------------------------------------------------------------------

/// Kind of a logged interaction. Unknown labels are kept verbatim (lowercased).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum InteractionKind {
    Call,
    Email,
    Meeting,
    Other(String),
}

impl InteractionKind {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Other(label) => label,
        }
    }
}

impl FromStr for InteractionKind {
    type Err = CoreError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let label = raw.trim().to_lowercase();
        match label.as_str() {
            "" => Err(CoreError::Validation(
                "interaction type must not be empty".to_string(),
            )),
            "call" | "ligação" | "ligacao" => Ok(Self::Call),
            "email" | "e-mail" => Ok(Self::Email),
            "meeting" | "reunião" | "reuniao" => Ok(Self::Meeting),
            _ => Ok(Self::Other(label)),
        }
    }
}

impl fmt::Display for InteractionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for InteractionKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InteractionKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Entity kinds referenced by audit entries and not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    User,
    Opportunity,
    Interaction,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Opportunity => "opportunity",
            Self::Interaction => "interaction",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// AuditAction
// ---------------------------------------------------------------------------

/// Mutation recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    OwnershipTransferred,
    InteractionLogged,
}

impl AuditAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::OwnershipTransferred => "ownership_transferred",
            Self::InteractionLogged => "interaction_logged",
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
