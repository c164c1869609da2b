//! Multi-factor identity verification.
//!
//! A full verification runs three checks against the enrolled corpus:
//! 1. **Face**: scan every face template; the first match resolves the subject.
//! 2. **Fingerprint**: compare only against the fingerprint of the subject
//!    resolved in step 1.
//! 3. **Tag**: look the tag up independently; it counts only when it belongs
//!    to that same subject.
//!
//! The three booleans are scored into a [`RiskLevel`](herdguard_types::RiskLevel)
//! and a [`VerificationStatus`](herdguard_types::VerificationStatus), and a
//! record is appended to the audit trail.
//!
//! Biometric comparison is pluggable per modality ([`BiometricMatcher`]); the
//! bundled matchers are placeholders that compare prefixes and exact hashes.
//! Corpus search is pluggable too ([`IdentityResolver`]); the bundled resolver
//! is a linear first-match scan.

pub mod error;
pub mod matcher;
pub mod orchestrator;
pub mod policy;
pub mod resolver;
pub mod risk;

pub use error::VerificationError;
pub use matcher::{BiometricMatcher, ExactHashMatcher, MatcherSet, PrefixFaceMatcher};
pub use orchestrator::{
    FullVerificationRequest, SingleFactorResult, TagCheckResult, VerificationOrchestrator,
    VerificationReport,
};
pub use policy::{AuditPolicy, MatchPolicy};
pub use resolver::{IdentityResolver, LinearScanResolver, Resolution};
pub use risk::{risk_level, score, status_for};
