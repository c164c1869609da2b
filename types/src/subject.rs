//! Enrolled subjects and their biometric templates.

use crate::{SubjectId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of an enrolled subject.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectStatus {
    Active,
    Inactive,
}

impl SubjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

/// A herder as held by the enrollment store.
///
/// Identity fields are fixed at enrollment; only `status` changes afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub full_name: String,
    pub age: u32,
    pub state_of_origin: String,
    pub phone_number: Option<String>,
    pub national_id: Option<String>,
    pub photo_url: Option<String>,
    pub status: SubjectStatus,
    pub created_at: Timestamp,
}

impl Subject {
    /// The display snapshot handed back to callers of a verification.
    pub fn view(&self) -> SubjectView {
        SubjectView {
            id: self.id,
            full_name: self.full_name.clone(),
            age: self.age,
            state_of_origin: self.state_of_origin.clone(),
            phone_number: self.phone_number.clone(),
            national_id: self.national_id.clone(),
            photo_url: self.photo_url.clone(),
            status: self.status,
        }
    }
}

/// Read-only snapshot of a subject, as captured during a verification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubjectView {
    pub id: SubjectId,
    pub full_name: String,
    pub age: u32,
    pub state_of_origin: String,
    pub phone_number: Option<String>,
    pub national_id: Option<String>,
    pub photo_url: Option<String>,
    pub status: SubjectStatus,
}

/// Biometric modality of a template or probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Face,
    Fingerprint,
}

impl Modality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Face => "face",
            Self::Fingerprint => "fingerprint",
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored reference data for one subject and modality.
///
/// The payload is opaque to everything except the matcher for its modality.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BiometricTemplate {
    pub subject: SubjectId,
    pub modality: Modality,
    pub payload: String,
}

impl BiometricTemplate {
    pub fn new(subject: SubjectId, modality: Modality, payload: impl Into<String>) -> Self {
        Self {
            subject,
            modality,
            payload: payload.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Subject {
        Subject {
            id: SubjectId::new(3),
            full_name: "Musa Bello".into(),
            age: 41,
            state_of_origin: "Kaduna".into(),
            phone_number: Some("+2348010000003".into()),
            national_id: None,
            photo_url: None,
            status: SubjectStatus::Active,
            created_at: Timestamp::new(1_700_000_000),
        }
    }

    #[test]
    fn view_copies_display_fields() {
        let s = subject();
        let view = s.view();
        assert_eq!(view.id, s.id);
        assert_eq!(view.full_name, "Musa Bello");
        assert_eq!(view.status, SubjectStatus::Active);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(subject().view()).unwrap();
        assert_eq!(json["status"], "active");
        assert_eq!(json["id"], 3);
    }
}
