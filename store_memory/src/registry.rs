//! The in-memory registry.

use herdguard_store::{
    AuditLog, AuditSink, EnrollmentStore, NewSubject, NewTag, RouteStore, StoreError,
    SubjectRegistry, TagStore,
};
use herdguard_types::{
    BiometricTemplate, Modality, Route, RouteId, RouteStatus, Subject, SubjectId, SubjectStatus,
    SubjectView, Tag, TagId, Timestamp, VerificationRecord,
};
use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Inner {
    /// Enrollment order.
    subjects: Vec<Subject>,
    templates: Vec<BiometricTemplate>,
    tags: Vec<Tag>,
    /// rfid_code -> index into `tags`.
    tag_index: HashMap<String, usize>,
    routes: Vec<Route>,
    audit: Vec<VerificationRecord>,
    next_subject: u64,
    next_tag: u64,
    next_route: u64,
}

/// Thread-safe in-memory store for subjects, templates, tags, routes and the
/// verification audit trail.
pub struct MemoryRegistry {
    inner: RwLock<Inner>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_subject: 1,
                next_tag: 1,
                next_route: 1,
                ..Inner::default()
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Unavailable("registry lock poisoned".into()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Unavailable("registry lock poisoned".into()))
    }

    /// Add a route and return its assigned id.
    pub fn add_route(
        &self,
        name: impl Into<String>,
        jurisdiction: impl Into<String>,
        geometry: serde_json::Value,
        status: RouteStatus,
    ) -> Result<Route, StoreError> {
        let mut inner = self.write()?;
        let route = Route {
            id: RouteId::new(inner.next_route),
            name: name.into(),
            jurisdiction: jurisdiction.into(),
            geometry,
            status,
        };
        inner.next_route += 1;
        inner.routes.push(route.clone());
        Ok(route)
    }

    /// Change a subject's lifecycle status.
    pub fn set_subject_status(
        &self,
        id: SubjectId,
        status: SubjectStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let subject = inner
            .subjects
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("subject {id}")))?;
        subject.status = status;
        Ok(())
    }
}

impl Default for MemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EnrollmentStore for MemoryRegistry {
    fn templates(&self, modality: Modality) -> Result<Vec<BiometricTemplate>, StoreError> {
        Ok(self
            .read()?
            .templates
            .iter()
            .filter(|t| t.modality == modality)
            .cloned()
            .collect())
    }

    fn template_of(
        &self,
        subject: SubjectId,
        modality: Modality,
    ) -> Result<Option<BiometricTemplate>, StoreError> {
        Ok(self
            .read()?
            .templates
            .iter()
            .find(|t| t.subject == subject && t.modality == modality)
            .cloned())
    }

    fn subject_snapshot(&self, subject: SubjectId) -> Result<Option<SubjectView>, StoreError> {
        Ok(self
            .read()?
            .subjects
            .iter()
            .find(|s| s.id == subject)
            .map(Subject::view))
    }
}

impl TagStore for MemoryRegistry {
    fn lookup_by_tag(&self, code: &str) -> Result<Option<Tag>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .tag_index
            .get(code)
            .and_then(|&i| inner.tags.get(i))
            .cloned())
    }
}

impl RouteStore for MemoryRegistry {
    fn active_routes(&self) -> Result<Vec<Route>, StoreError> {
        Ok(self
            .read()?
            .routes
            .iter()
            .filter(|r| r.status.is_active())
            .cloned()
            .collect())
    }

    fn route(&self, id: RouteId) -> Result<Option<Route>, StoreError> {
        Ok(self.read()?.routes.iter().find(|r| r.id == id).cloned())
    }
}

impl AuditSink for MemoryRegistry {
    fn append(&self, record: VerificationRecord) -> Result<(), StoreError> {
        self.write()?.audit.push(record);
        Ok(())
    }
}

impl AuditLog for MemoryRegistry {
    fn recent(&self, limit: usize) -> Result<Vec<VerificationRecord>, StoreError> {
        Ok(self
            .read()?
            .audit
            .iter()
            .rev()
            .take(limit)
            .cloned()
            .collect())
    }
}

impl SubjectRegistry for MemoryRegistry {
    fn register_subject(&self, new: NewSubject) -> Result<Subject, StoreError> {
        if new.full_name.trim().is_empty() {
            return Err(StoreError::Invalid("full_name must not be empty".into()));
        }
        let mut inner = self.write()?;
        let subject = Subject {
            id: SubjectId::new(inner.next_subject),
            full_name: new.full_name,
            age: new.age,
            state_of_origin: new.state_of_origin,
            phone_number: new.phone_number,
            national_id: new.national_id,
            photo_url: new.photo_url,
            status: SubjectStatus::Active,
            created_at: Timestamp::now(),
        };
        inner.next_subject += 1;
        inner.templates.push(BiometricTemplate::new(
            subject.id,
            Modality::Face,
            new.face_vector,
        ));
        inner.templates.push(BiometricTemplate::new(
            subject.id,
            Modality::Fingerprint,
            new.fingerprint_hash,
        ));
        inner.subjects.push(subject.clone());
        tracing::debug!(subject = %subject.id, "subject enrolled");
        Ok(subject)
    }

    fn add_tag(&self, new: NewTag) -> Result<Tag, StoreError> {
        if new.rfid_code.is_empty() {
            return Err(StoreError::Invalid("rfid_code must not be empty".into()));
        }
        let mut inner = self.write()?;
        if !inner.subjects.iter().any(|s| s.id == new.herder_id) {
            return Err(StoreError::NotFound(format!("subject {}", new.herder_id)));
        }
        if inner.tag_index.contains_key(&new.rfid_code) {
            return Err(StoreError::Duplicate(new.rfid_code));
        }
        let tag = Tag {
            id: TagId::new(inner.next_tag),
            owner: new.herder_id,
            rfid_code: new.rfid_code,
            animal_type: new.animal_type,
            breed: new.breed,
            age_years: new.age_years,
            health_status: "healthy".to_string(),
        };
        inner.next_tag += 1;
        let index = inner.tags.len();
        inner.tag_index.insert(tag.rfid_code.clone(), index);
        inner.tags.push(tag.clone());
        Ok(tag)
    }

    fn subject(&self, id: SubjectId) -> Result<Option<Subject>, StoreError> {
        Ok(self.read()?.subjects.iter().find(|s| s.id == id).cloned())
    }

    fn subjects(&self) -> Result<Vec<Subject>, StoreError> {
        Ok(self.read()?.subjects.iter().rev().cloned().collect())
    }

    fn tags_of(&self, owner: SubjectId) -> Result<Vec<Tag>, StoreError> {
        Ok(self
            .read()?
            .tags
            .iter()
            .filter(|t| t.owner == owner)
            .cloned()
            .collect())
    }

    fn subject_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.subjects.len() as u64)
    }

    fn tag_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.tags.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdguard_types::{ActorId, ModalityOutcome, OutcomeSet, RiskLevel, VerificationKind};
    use herdguard_types::VerificationStatus;

    fn new_subject(name: &str, face: &str, finger: &str) -> NewSubject {
        NewSubject {
            full_name: name.into(),
            age: 35,
            state_of_origin: "Plateau".into(),
            phone_number: None,
            national_id: None,
            photo_url: None,
            fingerprint_hash: finger.into(),
            face_vector: face.into(),
        }
    }

    fn new_tag(owner: SubjectId, code: &str) -> NewTag {
        NewTag {
            herder_id: owner,
            rfid_code: code.into(),
            animal_type: "cattle".into(),
            breed: Some("Fulani White".into()),
            age_years: Some(3),
        }
    }

    fn record(subject: Option<SubjectId>, secs: u64) -> VerificationRecord {
        VerificationRecord {
            subject,
            actor: ActorId::new("officer-1"),
            kind: VerificationKind::Full,
            outcomes: OutcomeSet {
                face: ModalityOutcome::NO_MATCH,
                fingerprint: ModalityOutcome::NO_MATCH,
                tag: ModalityOutcome::NO_MATCH,
            },
            risk_level: RiskLevel::High,
            status: VerificationStatus::Failed,
            location: None,
            recorded_at: Timestamp::new(secs),
        }
    }

    #[test]
    fn register_stores_one_template_per_modality() {
        let reg = MemoryRegistry::new();
        let s = reg
            .register_subject(new_subject("Amina", "FACE_AMINA_000", "FP_AMINA"))
            .unwrap();
        assert_eq!(s.status, SubjectStatus::Active);
        assert_eq!(reg.all_face_templates().unwrap().len(), 1);
        assert_eq!(reg.fingerprint_of(s.id).unwrap().as_deref(), Some("FP_AMINA"));
        assert!(reg.subject_snapshot(s.id).unwrap().is_some());
    }

    #[test]
    fn templates_keep_enrollment_order() {
        let reg = MemoryRegistry::new();
        let a = reg.register_subject(new_subject("A", "FACE_A_0000", "FA")).unwrap();
        let b = reg.register_subject(new_subject("B", "FACE_B_0000", "FB")).unwrap();
        let faces = reg.all_face_templates().unwrap();
        assert_eq!(faces[0].subject, a.id);
        assert_eq!(faces[1].subject, b.id);
        // Listing is newest first.
        assert_eq!(reg.subjects().unwrap()[0].id, b.id);
    }

    #[test]
    fn duplicate_tag_code_is_rejected() {
        let reg = MemoryRegistry::new();
        let s = reg.register_subject(new_subject("A", "FACE_A_0000", "FA")).unwrap();
        reg.add_tag(new_tag(s.id, "RFID_001")).unwrap();
        let err = reg.add_tag(new_tag(s.id, "RFID_001")).unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
        assert_eq!(reg.tag_count().unwrap(), 1);
    }

    #[test]
    fn tag_for_unknown_subject_is_not_found() {
        let reg = MemoryRegistry::new();
        let err = reg.add_tag(new_tag(SubjectId::new(99), "RFID_X")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[test]
    fn lookup_by_tag_returns_owner() {
        let reg = MemoryRegistry::new();
        let s = reg.register_subject(new_subject("A", "FACE_A_0000", "FA")).unwrap();
        reg.add_tag(new_tag(s.id, "RFID_001")).unwrap();
        let tag = reg.lookup_by_tag("RFID_001").unwrap().unwrap();
        assert_eq!(tag.owner, s.id);
        assert_eq!(tag.health_status, "healthy");
        assert!(reg.lookup_by_tag("RFID_404").unwrap().is_none());
    }

    #[test]
    fn only_active_routes_are_listed() {
        let reg = MemoryRegistry::new();
        let geometry = serde_json::json!({"type": "Polygon", "coordinates": []});
        reg.add_route("A", "Kaduna", geometry.clone(), RouteStatus::Active)
            .unwrap();
        let pending = reg
            .add_route("B", "Kaduna", geometry, RouteStatus::Pending)
            .unwrap();
        assert_eq!(reg.active_routes().unwrap().len(), 1);
        assert_eq!(reg.active_route_count().unwrap(), 1);
        assert_eq!(reg.route(pending.id).unwrap().unwrap().name, "B");
    }

    #[test]
    fn recent_audit_is_newest_first() {
        let reg = MemoryRegistry::new();
        for secs in 1..=5 {
            reg.append(record(Some(SubjectId::new(1)), secs)).unwrap();
        }
        let recent = reg.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].recorded_at, Timestamp::new(5));
        assert_eq!(recent[2].recorded_at, Timestamp::new(3));
    }

    #[test]
    fn status_update_changes_snapshot() {
        let reg = MemoryRegistry::new();
        let s = reg.register_subject(new_subject("A", "FACE_A_0000", "FA")).unwrap();
        reg.set_subject_status(s.id, SubjectStatus::Inactive).unwrap();
        let view = reg.subject_snapshot(s.id).unwrap().unwrap();
        assert_eq!(view.status, SubjectStatus::Inactive);
    }
}
