//! Livestock tags (RFID) linked to an owning subject.

use crate::{SubjectId, TagId};
use serde::{Deserialize, Serialize};

/// A livestock record carrying a globally unique tag code.
///
/// Uniqueness of `rfid_code` is the store's responsibility.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    #[serde(rename = "herder_id")]
    pub owner: SubjectId,
    pub rfid_code: String,
    pub animal_type: String,
    pub breed: Option<String>,
    pub age_years: Option<u32>,
    pub health_status: String,
}

impl Tag {
    pub fn view(&self) -> TagView {
        TagView {
            id: self.id,
            rfid_code: self.rfid_code.clone(),
            animal_type: self.animal_type.clone(),
            breed: self.breed.clone(),
        }
    }
}

/// Descriptive attributes returned by a tag-only lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TagView {
    pub id: TagId,
    pub rfid_code: String,
    pub animal_type: String,
    pub breed: Option<String>,
}
