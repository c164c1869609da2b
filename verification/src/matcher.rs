//! Pluggable per-modality biometric comparison.
//!
//! The matchers here are placeholders: face matching compares a fixed-length
//! prefix and fingerprint matching compares hashes exactly. A real similarity
//! model (feature vectors with a distance threshold, minutiae matching)
//! implements [`BiometricMatcher`] and is installed through [`MatcherSet`]
//! without touching the resolver or the orchestrator.

use crate::policy::MatchPolicy;
use herdguard_types::{Modality, ModalityOutcome};
use std::sync::Arc;

/// Compares one probe against one stored template.
///
/// Must be pure, and must never fail: unusable input is a non-match with
/// confidence `0.0`.
pub trait BiometricMatcher: Send + Sync {
    fn compare(&self, probe: &str, template: &str) -> ModalityOutcome;
}

/// Matches when the first `prefix_len` characters of probe and template agree.
#[derive(Clone, Debug)]
pub struct PrefixFaceMatcher {
    prefix_len: usize,
    match_confidence: f64,
    mismatch_confidence: f64,
}

impl PrefixFaceMatcher {
    pub fn new(prefix_len: usize, match_confidence: f64, mismatch_confidence: f64) -> Self {
        Self {
            prefix_len,
            match_confidence,
            mismatch_confidence,
        }
    }

    pub fn from_policy(policy: &MatchPolicy) -> Self {
        Self::new(
            policy.face_prefix_len,
            policy.face_match_confidence,
            policy.face_mismatch_confidence,
        )
    }
}

impl BiometricMatcher for PrefixFaceMatcher {
    fn compare(&self, probe: &str, template: &str) -> ModalityOutcome {
        match (
            char_prefix(probe, self.prefix_len),
            char_prefix(template, self.prefix_len),
        ) {
            (Some(p), Some(t)) if p == t => ModalityOutcome::new(true, self.match_confidence),
            (Some(_), Some(_)) => ModalityOutcome::new(false, self.mismatch_confidence),
            _ => ModalityOutcome::NO_MATCH,
        }
    }
}

/// The first `k` characters of `s`, or `None` if `s` is shorter.
fn char_prefix(s: &str, k: usize) -> Option<&str> {
    match s.char_indices().nth(k) {
        Some((end, _)) => Some(&s[..end]),
        None if s.chars().count() == k => Some(s),
        None => None,
    }
}

/// Matches on byte-for-byte equality.
#[derive(Clone, Debug)]
pub struct ExactHashMatcher {
    match_confidence: f64,
    mismatch_confidence: f64,
}

impl ExactHashMatcher {
    pub fn new(match_confidence: f64, mismatch_confidence: f64) -> Self {
        Self {
            match_confidence,
            mismatch_confidence,
        }
    }

    pub fn from_policy(policy: &MatchPolicy) -> Self {
        Self::new(
            policy.fingerprint_match_confidence,
            policy.fingerprint_mismatch_confidence,
        )
    }
}

impl BiometricMatcher for ExactHashMatcher {
    fn compare(&self, probe: &str, template: &str) -> ModalityOutcome {
        if probe.is_empty() || template.is_empty() {
            return ModalityOutcome::NO_MATCH;
        }
        if probe.as_bytes() == template.as_bytes() {
            ModalityOutcome::new(true, self.match_confidence)
        } else {
            ModalityOutcome::new(false, self.mismatch_confidence)
        }
    }
}

/// One matcher per modality.
#[derive(Clone)]
pub struct MatcherSet {
    face: Arc<dyn BiometricMatcher>,
    fingerprint: Arc<dyn BiometricMatcher>,
}

impl MatcherSet {
    pub fn new(face: Arc<dyn BiometricMatcher>, fingerprint: Arc<dyn BiometricMatcher>) -> Self {
        Self { face, fingerprint }
    }

    /// The placeholder matchers configured from `policy`.
    pub fn from_policy(policy: &MatchPolicy) -> Self {
        Self::new(
            Arc::new(PrefixFaceMatcher::from_policy(policy)),
            Arc::new(ExactHashMatcher::from_policy(policy)),
        )
    }

    pub fn for_modality(&self, modality: Modality) -> &dyn BiometricMatcher {
        match modality {
            Modality::Face => self.face.as_ref(),
            Modality::Fingerprint => self.fingerprint.as_ref(),
        }
    }

    pub fn compare(&self, probe: &str, template: &str, modality: Modality) -> ModalityOutcome {
        self.for_modality(modality).compare(probe, template)
    }
}

impl Default for MatcherSet {
    fn default() -> Self {
        Self::from_policy(&MatchPolicy::default())
    }
}
