//! Identity resolution over the enrolled corpus.

use crate::matcher::MatcherSet;
use herdguard_types::{BiometricTemplate, Modality, SubjectId};

/// A subject found for a probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    pub subject: SubjectId,
    pub confidence: f64,
}

/// Finds the subject a probe belongs to.
///
/// The corpus arrives in the store's enumeration order. An indexed
/// implementation (exact-match table for fingerprints, nearest-neighbour
/// search for faces) can replace the linear scan behind this trait.
pub trait IdentityResolver: Send + Sync {
    fn resolve(
        &self,
        probe: &str,
        modality: Modality,
        corpus: &[BiometricTemplate],
    ) -> Option<Resolution>;
}

/// Scans the corpus in order and returns the first match.
///
/// A later template with higher confidence does not override an earlier
/// match.
#[derive(Clone, Default)]
pub struct LinearScanResolver {
    matchers: MatcherSet,
}

impl LinearScanResolver {
    pub fn new(matchers: MatcherSet) -> Self {
        Self { matchers }
    }
}

impl IdentityResolver for LinearScanResolver {
    fn resolve(
        &self,
        probe: &str,
        modality: Modality,
        corpus: &[BiometricTemplate],
    ) -> Option<Resolution> {
        let matcher = self.matchers.for_modality(modality);
        corpus
            .iter()
            .filter(|t| t.modality == modality)
            .find_map(|t| {
                let outcome = matcher.compare(probe, &t.payload);
                outcome.matched.then_some(Resolution {
                    subject: t.subject,
                    confidence: outcome.confidence,
                })
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::BiometricMatcher;
    use herdguard_types::ModalityOutcome;
    use std::sync::Arc;

    fn face(subject: u64, payload: &str) -> BiometricTemplate {
        BiometricTemplate::new(SubjectId::new(subject), Modality::Face, payload)
    }

    #[test]
    fn returns_first_match_in_corpus_order() {
        let corpus = vec![
            face(1, "AAAAAAAAAA_one"),
            face(2, "FACE_TEST_two"),
            face(3, "FACE_TEST_three"),
        ];
        let r = LinearScanResolver::default()
            .resolve("FACE_TEST_probe", Modality::Face, &corpus)
            .unwrap();
        assert_eq!(r.subject, SubjectId::new(2));
        assert_eq!(r.confidence, 0.95);
    }

    #[test]
    fn later_higher_confidence_does_not_win() {
        // Confidence is the template's trailing digit / 10.
        struct DigitConfidence;
        impl BiometricMatcher for DigitConfidence {
            fn compare(&self, _probe: &str, template: &str) -> ModalityOutcome {
                let digit = template
                    .chars()
                    .last()
                    .and_then(|c| c.to_digit(10))
                    .unwrap_or(0);
                ModalityOutcome::new(digit > 0, f64::from(digit) / 10.0)
            }
        }
        let matchers = MatcherSet::new(Arc::new(DigitConfidence), Arc::new(DigitConfidence));
        let corpus = vec![face(1, "x0"), face(2, "x3"), face(3, "x9")];
        let r = LinearScanResolver::new(matchers)
            .resolve("anything", Modality::Face, &corpus)
            .unwrap();
        assert_eq!(r.subject, SubjectId::new(2));
        assert_eq!(r.confidence, 0.3);
    }

    #[test]
    fn no_match_is_none() {
        let corpus = vec![face(1, "AAAAAAAAAA")];
        assert!(LinearScanResolver::default()
            .resolve("BBBBBBBBBB", Modality::Face, &corpus)
            .is_none());
        assert!(LinearScanResolver::default()
            .resolve("BBBBBBBBBB", Modality::Face, &[])
            .is_none());
    }

    #[test]
    fn templates_of_other_modalities_are_ignored() {
        let corpus = vec![BiometricTemplate::new(
            SubjectId::new(1),
            Modality::Fingerprint,
            "FACE_TEST_HERDER",
        )];
        assert!(LinearScanResolver::default()
            .resolve("FACE_TEST_HERDER", Modality::Face, &corpus)
            .is_none());
    }
}
