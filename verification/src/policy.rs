//! Tunable matching and audit policy.

use crate::error::VerificationError;
use serde::{Deserialize, Serialize};

/// Parameters of the placeholder biometric matchers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Number of leading characters a face probe must share with a template.
    #[serde(default = "default_face_prefix_len")]
    pub face_prefix_len: usize,

    #[serde(default = "default_face_match_confidence")]
    pub face_match_confidence: f64,

    #[serde(default = "default_face_mismatch_confidence")]
    pub face_mismatch_confidence: f64,

    #[serde(default = "default_fingerprint_match_confidence")]
    pub fingerprint_match_confidence: f64,

    #[serde(default = "default_fingerprint_mismatch_confidence")]
    pub fingerprint_mismatch_confidence: f64,
}

fn default_face_prefix_len() -> usize {
    10
}

fn default_face_match_confidence() -> f64 {
    0.95
}

fn default_face_mismatch_confidence() -> f64 {
    0.32
}

fn default_fingerprint_match_confidence() -> f64 {
    0.98
}

fn default_fingerprint_mismatch_confidence() -> f64 {
    0.15
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            face_prefix_len: default_face_prefix_len(),
            face_match_confidence: default_face_match_confidence(),
            face_mismatch_confidence: default_face_mismatch_confidence(),
            fingerprint_match_confidence: default_fingerprint_match_confidence(),
            fingerprint_mismatch_confidence: default_fingerprint_mismatch_confidence(),
        }
    }
}

impl MatchPolicy {
    pub fn validate(&self) -> Result<(), VerificationError> {
        if self.face_prefix_len == 0 {
            return Err(VerificationError::InvalidPolicy(
                "face_prefix_len must be at least 1".into(),
            ));
        }
        let confidences = [
            ("face_match_confidence", self.face_match_confidence),
            ("face_mismatch_confidence", self.face_mismatch_confidence),
            ("fingerprint_match_confidence", self.fingerprint_match_confidence),
            (
                "fingerprint_mismatch_confidence",
                self.fingerprint_mismatch_confidence,
            ),
        ];
        for (name, value) in confidences {
            if !(0.0..=1.0).contains(&value) {
                return Err(VerificationError::InvalidPolicy(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// What gets written to the audit trail.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditPolicy {
    /// Also record full verifications in which no subject was resolved.
    /// Off by default: such attempts are dropped from the trail.
    #[serde(default)]
    pub audit_on_no_match: bool,
}
