//! Enrollment storage: subjects and their biometric templates.

use crate::StoreError;
use herdguard_types::{BiometricTemplate, Modality, Subject, SubjectId, SubjectView, Tag};
use serde::{Deserialize, Serialize};

/// Read side of the enrolled corpus, as consumed by the matching engine.
pub trait EnrollmentStore: Send + Sync {
    /// Every template of `modality`, in stable enumeration order.
    ///
    /// Identity resolution is first-match, so implementations must return the
    /// same order for the same corpus.
    fn templates(&self, modality: Modality) -> Result<Vec<BiometricTemplate>, StoreError>;

    /// The template a subject enrolled for `modality`, if any.
    fn template_of(
        &self,
        subject: SubjectId,
        modality: Modality,
    ) -> Result<Option<BiometricTemplate>, StoreError>;

    fn subject_snapshot(&self, subject: SubjectId) -> Result<Option<SubjectView>, StoreError>;

    fn all_face_templates(&self) -> Result<Vec<BiometricTemplate>, StoreError> {
        self.templates(Modality::Face)
    }

    fn all_fingerprint_templates(&self) -> Result<Vec<BiometricTemplate>, StoreError> {
        self.templates(Modality::Fingerprint)
    }

    fn fingerprint_of(&self, subject: SubjectId) -> Result<Option<String>, StoreError> {
        Ok(self
            .template_of(subject, Modality::Fingerprint)?
            .map(|t| t.payload))
    }
}

/// Enrollment request for a new subject with one template per modality.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewSubject {
    pub full_name: String,
    pub age: u32,
    pub state_of_origin: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub national_id: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    pub fingerprint_hash: String,
    pub face_vector: String,
}

/// Request to attach a tagged animal to an enrolled subject.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewTag {
    pub herder_id: SubjectId,
    pub rfid_code: String,
    #[serde(default = "default_animal_type")]
    pub animal_type: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age_years: Option<u32>,
}

fn default_animal_type() -> String {
    "cattle".to_string()
}

/// Administrative CRUD over the enrollment data.
pub trait SubjectRegistry: Send + Sync {
    /// Enroll a subject as `active` together with its face and fingerprint
    /// templates.
    fn register_subject(&self, new: NewSubject) -> Result<Subject, StoreError>;

    /// Fails with `NotFound` for an unknown owner and `Duplicate` for a tag
    /// code that is already assigned.
    fn add_tag(&self, new: NewTag) -> Result<Tag, StoreError>;

    fn subject(&self, id: SubjectId) -> Result<Option<Subject>, StoreError>;

    /// All subjects, newest enrollment first.
    fn subjects(&self) -> Result<Vec<Subject>, StoreError>;

    fn tags_of(&self, owner: SubjectId) -> Result<Vec<Tag>, StoreError>;

    fn subject_count(&self) -> Result<u64, StoreError>;

    fn tag_count(&self) -> Result<u64, StoreError>;
}
