//! Verification outcomes and the append-only audit record.

use crate::{ActorId, Coordinate, SubjectId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse confidence in an identity claim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal outcome of a verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    Verified,
    Suspicious,
    Failed,
}

impl VerificationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Verified => "verified",
            Self::Suspicious => "suspicious",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which flow produced a record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationKind {
    Full,
}

/// Result of one modality check.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModalityOutcome {
    pub matched: bool,
    /// In `[0.0, 1.0]`.
    pub confidence: f64,
}

impl ModalityOutcome {
    pub const NO_MATCH: Self = Self {
        matched: false,
        confidence: 0.0,
    };

    pub fn new(matched: bool, confidence: f64) -> Self {
        Self {
            matched,
            confidence,
        }
    }
}

/// Per-modality outcomes of a full verification.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OutcomeSet {
    pub face: ModalityOutcome,
    pub fingerprint: ModalityOutcome,
    pub tag: ModalityOutcome,
}

impl OutcomeSet {
    pub fn match_count(&self) -> usize {
        [self.face, self.fingerprint, self.tag]
            .iter()
            .filter(|o| o.matched)
            .count()
    }
}

/// One entry of the verification audit trail. Never updated once appended.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// `None` when no subject could be resolved.
    pub subject: Option<SubjectId>,
    pub actor: ActorId,
    pub kind: VerificationKind,
    pub outcomes: OutcomeSet,
    pub risk_level: RiskLevel,
    pub status: VerificationStatus,
    pub location: Option<Coordinate>,
    pub recorded_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn match_count_counts_true_outcomes() {
        let set = OutcomeSet {
            face: ModalityOutcome::new(true, 0.95),
            fingerprint: ModalityOutcome::NO_MATCH,
            tag: ModalityOutcome::new(true, 1.0),
        };
        assert_eq!(set.match_count(), 2);
    }

    #[test]
    fn enums_render_lowercase() {
        assert_eq!(RiskLevel::Medium.to_string(), "medium");
        assert_eq!(VerificationStatus::Suspicious.to_string(), "suspicious");
        assert_eq!(
            serde_json::to_string(&VerificationStatus::Verified).unwrap(),
            "\"verified\""
        );
    }
}
