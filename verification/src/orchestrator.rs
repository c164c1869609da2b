//! Sequences the face, fingerprint and tag checks of a full verification,
//! scores them and appends the audit record.

use crate::error::VerificationError;
use crate::matcher::MatcherSet;
use crate::policy::{AuditPolicy, MatchPolicy};
use crate::resolver::{IdentityResolver, LinearScanResolver, Resolution};
use crate::risk::score;
use herdguard_store::{AuditSink, EnrollmentStore, TagStore};
use herdguard_types::{
    ActorId, Clock, Coordinate, Modality, ModalityOutcome, OutcomeSet, RiskLevel, SubjectId,
    SubjectView, SystemClock, Tag, TagView, VerificationKind, VerificationRecord,
    VerificationStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const MSG_VERIFIED: &str = "All verification checks passed";
const MSG_SUSPICIOUS: &str = "Partial verification - some checks failed";
const MSG_FAILED: &str = "Verification failed - identity could not be confirmed";

/// Evidence submitted for a full verification.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FullVerificationRequest {
    pub face_probe: String,
    pub fingerprint_probe: String,
    pub tag_code: String,
    pub location: Option<Coordinate>,
}

/// Result of a full verification.
#[derive(Clone, Debug, PartialEq)]
pub struct VerificationReport {
    pub status: VerificationStatus,
    pub risk_level: RiskLevel,
    pub subject_id: Option<SubjectId>,
    pub subject: Option<SubjectView>,
    /// The tagged animal, when the tag code exists at all (whoever owns it).
    pub livestock: Vec<Tag>,
    pub outcomes: OutcomeSet,
    /// Whether an audit record was appended for this call.
    pub audit_recorded: bool,
}

impl VerificationReport {
    pub fn message(&self) -> &'static str {
        match self.status {
            VerificationStatus::Verified => MSG_VERIFIED,
            VerificationStatus::Suspicious => MSG_SUSPICIOUS,
            VerificationStatus::Failed => MSG_FAILED,
        }
    }
}

/// Result of a face-only or fingerprint-only check.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleFactorResult {
    pub matched: bool,
    pub confidence: f64,
    pub subject_id: Option<SubjectId>,
    pub subject: Option<SubjectView>,
}

/// Result of a tag-only check.
#[derive(Clone, Debug, PartialEq)]
pub struct TagCheckResult {
    pub matched: bool,
    pub livestock: Option<TagView>,
    pub subject: Option<SubjectView>,
}

/// Runs verifications against the enrollment, tag and audit stores.
///
/// Holds no mutable state: every call re-reads the corpus, so one instance
/// can serve any number of concurrent requests. The three checks of a full
/// verification are separate store reads with no transaction around them; an
/// enrollment change between them can produce a mixed outcome.
pub struct VerificationOrchestrator {
    enrollment: Arc<dyn EnrollmentStore>,
    tags: Arc<dyn TagStore>,
    audit: Arc<dyn AuditSink>,
    matchers: MatcherSet,
    resolver: Arc<dyn IdentityResolver>,
    audit_policy: AuditPolicy,
    clock: Arc<dyn Clock>,
}

impl VerificationOrchestrator {
    /// Build an orchestrator with the placeholder matchers and a linear-scan
    /// resolver configured from `policy`.
    pub fn new(
        enrollment: Arc<dyn EnrollmentStore>,
        tags: Arc<dyn TagStore>,
        audit: Arc<dyn AuditSink>,
        policy: &MatchPolicy,
    ) -> Result<Self, VerificationError> {
        policy.validate()?;
        let matchers = MatcherSet::from_policy(policy);
        Ok(Self {
            enrollment,
            tags,
            audit,
            resolver: Arc::new(LinearScanResolver::new(matchers.clone())),
            matchers,
            audit_policy: AuditPolicy::default(),
            clock: Arc::new(SystemClock),
        })
    }

    pub fn with_resolver(mut self, resolver: Arc<dyn IdentityResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_audit_policy(mut self, policy: AuditPolicy) -> Self {
        self.audit_policy = policy;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // ── Single-factor checks ────────────────────────────────────────────

    /// Resolve a face probe against every enrolled face template.
    pub fn verify_face(&self, probe: &str) -> Result<SingleFactorResult, VerificationError> {
        self.single_factor(probe, Modality::Face)
    }

    /// Resolve a fingerprint probe against every enrolled fingerprint.
    pub fn verify_fingerprint(
        &self,
        probe: &str,
    ) -> Result<SingleFactorResult, VerificationError> {
        self.single_factor(probe, Modality::Fingerprint)
    }

    /// Look up a tag code and its owner.
    pub fn verify_tag(&self, code: &str) -> Result<TagCheckResult, VerificationError> {
        let Some(tag) = self.tags.lookup_by_tag(code)? else {
            return Ok(TagCheckResult {
                matched: false,
                livestock: None,
                subject: None,
            });
        };
        let subject = self.enrollment.subject_snapshot(tag.owner)?;
        Ok(TagCheckResult {
            matched: true,
            livestock: Some(tag.view()),
            subject,
        })
    }

    fn single_factor(
        &self,
        probe: &str,
        modality: Modality,
    ) -> Result<SingleFactorResult, VerificationError> {
        let Some(found) = self.resolve(probe, modality)? else {
            return Ok(SingleFactorResult {
                matched: false,
                confidence: 0.0,
                subject_id: None,
                subject: None,
            });
        };
        let subject = self.snapshot(found.subject)?;
        Ok(SingleFactorResult {
            matched: true,
            confidence: found.confidence,
            subject_id: Some(found.subject),
            subject,
        })
    }

    // ── Full verification ───────────────────────────────────────────────

    /// Run the face → fingerprint → tag sequence for `actor`.
    ///
    /// Only an unreachable store fails the call. A failed audit append is
    /// logged and reported through [`VerificationReport::audit_recorded`].
    pub fn verify_full(
        &self,
        request: &FullVerificationRequest,
        actor: &ActorId,
    ) -> Result<VerificationReport, VerificationError> {
        let (face, resolved) = self.face_check(&request.face_probe)?;
        let subject = match resolved {
            Some(id) => self.snapshot(id)?,
            None => None,
        };
        let fingerprint = self.fingerprint_check(resolved, &request.fingerprint_probe)?;
        let (tag, livestock) = self.tag_check(resolved, &request.tag_code)?;

        let outcomes = OutcomeSet {
            face,
            fingerprint,
            tag,
        };
        let (status, risk_level) = score(face.matched, fingerprint.matched, tag.matched);
        tracing::debug!(
            subject = ?resolved,
            face = face.matched,
            fingerprint = fingerprint.matched,
            tag = tag.matched,
            %status,
            %risk_level,
            "full verification scored"
        );

        let audit_recorded = if resolved.is_some() || self.audit_policy.audit_on_no_match {
            self.append_record(VerificationRecord {
                subject: resolved,
                actor: actor.clone(),
                kind: VerificationKind::Full,
                outcomes,
                risk_level,
                status,
                location: request.location,
                recorded_at: self.clock.now(),
            })
        } else {
            tracing::debug!("no subject resolved, verification not audited");
            false
        };

        Ok(VerificationReport {
            status,
            risk_level,
            subject_id: resolved,
            subject,
            livestock: livestock.into_iter().collect(),
            outcomes,
            audit_recorded,
        })
    }

    /// Step 1: scan the full face corpus.
    fn face_check(
        &self,
        probe: &str,
    ) -> Result<(ModalityOutcome, Option<SubjectId>), VerificationError> {
        Ok(match self.resolve(probe, Modality::Face)? {
            Some(found) => (
                ModalityOutcome::new(true, found.confidence),
                Some(found.subject),
            ),
            None => (ModalityOutcome::NO_MATCH, None),
        })
    }

    /// Step 2: compare against the fingerprint of the subject resolved by the
    /// face check only. Without a resolved subject there is nothing to compare.
    fn fingerprint_check(
        &self,
        resolved: Option<SubjectId>,
        probe: &str,
    ) -> Result<ModalityOutcome, VerificationError> {
        let Some(subject) = resolved else {
            return Ok(ModalityOutcome::NO_MATCH);
        };
        Ok(match self.enrollment.fingerprint_of(subject)? {
            Some(template) => self
                .matchers
                .compare(probe, &template, Modality::Fingerprint),
            None => ModalityOutcome::NO_MATCH,
        })
    }

    /// Step 3: the tag is always looked up; it only matches when its owner is
    /// the resolved subject. A tag owned by someone else is a plain non-match.
    fn tag_check(
        &self,
        resolved: Option<SubjectId>,
        code: &str,
    ) -> Result<(ModalityOutcome, Option<Tag>), VerificationError> {
        let tag = self.tags.lookup_by_tag(code)?;
        let owned = matches!((&tag, resolved), (Some(t), Some(s)) if t.owner == s);
        let outcome = if owned {
            ModalityOutcome::new(true, 1.0)
        } else {
            ModalityOutcome::NO_MATCH
        };
        Ok((outcome, tag))
    }

    fn resolve(
        &self,
        probe: &str,
        modality: Modality,
    ) -> Result<Option<Resolution>, VerificationError> {
        let corpus = self.enrollment.templates(modality)?;
        Ok(self.resolver.resolve(probe, modality, &corpus))
    }

    fn snapshot(&self, subject: SubjectId) -> Result<Option<SubjectView>, VerificationError> {
        let view = self.enrollment.subject_snapshot(subject)?;
        if view.is_none() {
            tracing::warn!(%subject, "template references a subject that is not enrolled");
        }
        Ok(view)
    }

    fn append_record(&self, record: VerificationRecord) -> bool {
        match self.audit.append(record) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to append verification record");
                false
            }
        }
    }
}
