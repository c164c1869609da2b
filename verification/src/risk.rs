//! Risk scoring over the three check outcomes.

use herdguard_types::{RiskLevel, VerificationStatus};

/// Risk level as a function of how many checks matched.
pub fn risk_level(matches: usize) -> RiskLevel {
    match matches {
        0 | 1 => RiskLevel::High,
        2 => RiskLevel::Medium,
        _ => RiskLevel::Low,
    }
}

/// `Verified` only when all three checks pass; `Suspicious` when at least one
/// biometric matched; `Failed` otherwise. A tag match on its own is `Failed`
/// even though it still counts towards the risk level.
pub fn status_for(face: bool, fingerprint: bool, tag: bool) -> VerificationStatus {
    if face && fingerprint && tag {
        VerificationStatus::Verified
    } else if face || fingerprint {
        VerificationStatus::Suspicious
    } else {
        VerificationStatus::Failed
    }
}

pub fn score(face: bool, fingerprint: bool, tag: bool) -> (VerificationStatus, RiskLevel) {
    let matches = [face, fingerprint, tag].iter().filter(|m| **m).count();
    (status_for(face, fingerprint, tag), risk_level(matches))
}
