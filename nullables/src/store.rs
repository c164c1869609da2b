//! Nullable stores: unreachable backends and observable audit sinks.

use herdguard_store::{
    AuditLog, AuditSink, EnrollmentStore, NewSubject, NewTag, RouteStore, StoreError,
    SubjectRegistry, TagStore,
};
use herdguard_types::{
    BiometricTemplate, Modality, Route, RouteId, Subject, SubjectId, SubjectView, Tag,
    VerificationRecord,
};
use std::sync::Mutex;

/// A store whose backend is never reachable. Every call fails with
/// [`StoreError::Unavailable`].
#[derive(Default)]
pub struct UnavailableStore;

impl UnavailableStore {
    fn err<T>() -> Result<T, StoreError> {
        Err(StoreError::Unavailable("null store is offline".into()))
    }
}

impl EnrollmentStore for UnavailableStore {
    fn templates(&self, _modality: Modality) -> Result<Vec<BiometricTemplate>, StoreError> {
        Self::err()
    }

    fn template_of(
        &self,
        _subject: SubjectId,
        _modality: Modality,
    ) -> Result<Option<BiometricTemplate>, StoreError> {
        Self::err()
    }

    fn subject_snapshot(&self, _subject: SubjectId) -> Result<Option<SubjectView>, StoreError> {
        Self::err()
    }
}

impl TagStore for UnavailableStore {
    fn lookup_by_tag(&self, _code: &str) -> Result<Option<Tag>, StoreError> {
        Self::err()
    }
}

impl RouteStore for UnavailableStore {
    fn active_routes(&self) -> Result<Vec<Route>, StoreError> {
        Self::err()
    }

    fn route(&self, _id: RouteId) -> Result<Option<Route>, StoreError> {
        Self::err()
    }
}

impl AuditSink for UnavailableStore {
    fn append(&self, _record: VerificationRecord) -> Result<(), StoreError> {
        Self::err()
    }
}

impl AuditLog for UnavailableStore {
    fn recent(&self, _limit: usize) -> Result<Vec<VerificationRecord>, StoreError> {
        Self::err()
    }
}

impl SubjectRegistry for UnavailableStore {
    fn register_subject(&self, _new: NewSubject) -> Result<Subject, StoreError> {
        Self::err()
    }

    fn add_tag(&self, _new: NewTag) -> Result<Tag, StoreError> {
        Self::err()
    }

    fn subject(&self, _id: SubjectId) -> Result<Option<Subject>, StoreError> {
        Self::err()
    }

    fn subjects(&self) -> Result<Vec<Subject>, StoreError> {
        Self::err()
    }

    fn tags_of(&self, _owner: SubjectId) -> Result<Vec<Tag>, StoreError> {
        Self::err()
    }

    fn subject_count(&self) -> Result<u64, StoreError> {
        Self::err()
    }

    fn tag_count(&self) -> Result<u64, StoreError> {
        Self::err()
    }
}

/// An audit sink that keeps every appended record for inspection.
#[derive(Default)]
pub struct RecordingAuditSink {
    records: Mutex<Vec<VerificationRecord>>,
}

impl RecordingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<VerificationRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for RecordingAuditSink {
    fn append(&self, record: VerificationRecord) -> Result<(), StoreError> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

/// An audit sink that rejects every append and counts the attempts.
#[derive(Default)]
pub struct FailingAuditSink {
    attempts: Mutex<usize>,
}

impl FailingAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

impl AuditSink for FailingAuditSink {
    fn append(&self, _record: VerificationRecord) -> Result<(), StoreError> {
        *self.attempts.lock().unwrap() += 1;
        Err(StoreError::Unavailable("audit log offline".into()))
    }
}
