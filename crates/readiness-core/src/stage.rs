//! Stage and classification identifiers
//!
//! The wizard is not a linear sequence: stage 2 has three mutually exclusive
//! variants selected by [`Classification`], and the compliance stage exists
//! only on the owner branch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One screen of the wizard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    /// Stage 1: registration code and demographics
    #[default]
    #[serde(rename = "1")]
    Basics,
    /// Stage 1.5: business ownership question for adults
    #[serde(rename = "1.5")]
    OwnershipGate,
    /// Stage 2 for respondents below 18
    #[serde(rename = "2-future")]
    FutureAssessment,
    /// Stage 2 for adults not running a business
    #[serde(rename = "2-starter")]
    StarterAssessment,
    /// Stage 2 for business owners
    #[serde(rename = "2-owner")]
    OwnerProfile,
    /// Stage 3, owners only: mandatory requirements checklist
    #[serde(rename = "3-owner")]
    OwnerCompliance,
    /// Stage 4: report generated, record persisted
    #[serde(rename = "4-terminal")]
    Complete,
}

impl Stage {
    /// Every stage in catalog order
    pub const ALL: [Stage; 7] = [
        Stage::Basics,
        Stage::OwnershipGate,
        Stage::FutureAssessment,
        Stage::StarterAssessment,
        Stage::OwnerProfile,
        Stage::OwnerCompliance,
        Stage::Complete,
    ];

    /// Short identifier used in logs, scripts and the CLI
    #[inline]
    #[must_use]
    pub fn id(self) -> &'static str {
        match self {
            Stage::Basics => "1",
            Stage::OwnershipGate => "1.5",
            Stage::FutureAssessment => "2-future",
            Stage::StarterAssessment => "2-starter",
            Stage::OwnerProfile => "2-owner",
            Stage::OwnerCompliance => "3-owner",
            Stage::Complete => "4-terminal",
        }
    }

    /// Whether this is the terminal stage
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Complete)
    }

    /// Classification a session must carry to be on this stage.
    ///
    /// `None` means the stage is shared by every branch.
    #[must_use]
    pub fn required_classification(self) -> Option<Classification> {
        match self {
            Stage::FutureAssessment => Some(Classification::Future),
            Stage::StarterAssessment => Some(Classification::Starter),
            Stage::OwnerProfile | Stage::OwnerCompliance => Some(Classification::Owner),
            Stage::Basics | Stage::OwnershipGate | Stage::Complete => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Error returned when parsing an unknown stage identifier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown stage identifier: {0}")]
pub struct UnknownStage(pub String);

impl FromStr for Stage {
    type Err = UnknownStage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Stage::ALL
            .into_iter()
            .find(|stage| stage.id() == s)
            .ok_or_else(|| UnknownStage(s.to_string()))
    }
}

/// Respondent category that selects the remaining question path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    /// Not yet derived (stage 1 / 1.5)
    #[default]
    Unclassified,
    /// Adult currently running a business
    Owner,
    /// Adult planning to start a business
    Starter,
    /// Respondent below 18
    Future,
}

impl Classification {
    /// Whether the classification has been derived
    #[inline]
    #[must_use]
    pub fn is_set(self) -> bool {
        !matches!(self, Classification::Unclassified)
    }

    /// Lowercase name
    #[inline]
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Unclassified => "unclassified",
            Classification::Owner => "owner",
            Classification::Starter => "starter",
            Classification::Future => "future",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
