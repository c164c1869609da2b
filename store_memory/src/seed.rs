//! JSON seed data for the in-memory registry.

use crate::MemoryRegistry;
use herdguard_store::{NewSubject, NewTag, StoreError, SubjectRegistry};
use herdguard_types::RouteStatus;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The seed bundled with the crate: five routes (one pending) and two demo
/// herders with livestock.
pub const DEFAULT_SEED: &str = include_str!("default_seed.json");

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SeedFile {
    #[serde(default)]
    pub herders: Vec<SeedHerder>,
    #[serde(default)]
    pub routes: Vec<SeedRoute>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedHerder {
    #[serde(flatten)]
    pub subject: NewSubject,
    #[serde(default)]
    pub livestock: Vec<SeedLivestock>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedLivestock {
    pub rfid_code: String,
    #[serde(default = "default_animal_type")]
    pub animal_type: String,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age_years: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SeedRoute {
    pub route_name: String,
    pub state: String,
    pub geojson_data: serde_json::Value,
    #[serde(default = "default_route_status")]
    pub status: RouteStatus,
}

fn default_animal_type() -> String {
    "cattle".to_string()
}

fn default_route_status() -> RouteStatus {
    RouteStatus::Active
}

impl SeedFile {
    pub fn from_json_str(s: &str) -> Result<Self, StoreError> {
        serde_json::from_str(s).map_err(|e| StoreError::Serialization(e.to_string()))
    }

    pub fn from_path(path: &Path) -> Result<Self, StoreError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| StoreError::Unavailable(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&content)
    }

    pub fn builtin() -> Result<Self, StoreError> {
        Self::from_json_str(DEFAULT_SEED)
    }
}

/// Counts of what a seed added.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub herders: usize,
    pub livestock: usize,
    pub routes: usize,
}

impl MemoryRegistry {
    /// Load `seed` into this registry. Geometry is stored as-is; a bad polygon
    /// only surfaces when a location is checked against it.
    pub fn load_seed(&self, seed: &SeedFile) -> Result<SeedSummary, StoreError> {
        let mut summary = SeedSummary::default();
        for herder in &seed.herders {
            let subject = self.register_subject(herder.subject.clone())?;
            summary.herders += 1;
            for animal in &herder.livestock {
                self.add_tag(NewTag {
                    herder_id: subject.id,
                    rfid_code: animal.rfid_code.clone(),
                    animal_type: animal.animal_type.clone(),
                    breed: animal.breed.clone(),
                    age_years: animal.age_years,
                })?;
                summary.livestock += 1;
            }
        }
        for route in &seed.routes {
            self.add_route(
                route.route_name.clone(),
                route.state.clone(),
                route.geojson_data.clone(),
                route.status,
            )?;
            summary.routes += 1;
        }
        tracing::info!(
            herders = summary.herders,
            livestock = summary.livestock,
            routes = summary.routes,
            "seed loaded"
        );
        Ok(summary)
    }

    /// A registry populated from [`DEFAULT_SEED`].
    pub fn with_default_seed() -> Result<Self, StoreError> {
        let registry = Self::new();
        registry.load_seed(&SeedFile::builtin()?)?;
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdguard_store::{RouteStore, TagStore};
    use std::io::Write;

    #[test]
    fn builtin_seed_parses_and_loads() {
        let registry = MemoryRegistry::new();
        let summary = registry.load_seed(&SeedFile::builtin().unwrap()).unwrap();
        assert_eq!(
            summary,
            SeedSummary {
                herders: 2,
                livestock: 3,
                routes: 5
            }
        );
        // The pending extension is not active.
        assert_eq!(registry.active_routes().unwrap().len(), 4);
        assert!(registry
            .active_routes()
            .unwrap()
            .iter()
            .any(|r| r.name == "Kaduna North Corridor"));
        assert!(registry.lookup_by_tag("RFID_KD_0002").unwrap().is_some());
    }

    #[test]
    fn route_status_defaults_to_active() {
        let seed = SeedFile::from_json_str(
            r#"{"routes": [{"route_name": "R", "state": "S", "geojson_data": {}}]}"#,
        )
        .unwrap();
        assert_eq!(seed.routes[0].status, RouteStatus::Active);
        assert!(seed.herders.is_empty());
    }

    #[test]
    fn malformed_seed_is_a_serialization_error() {
        let err = SeedFile::from_json_str("{\"routes\": 7}").unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn seed_loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"herders": [{{"full_name": "Test", "age": 30, "state_of_origin": "Kano",
                "face_vector": "FACE_TEST_0001", "fingerprint_hash": "FP_TEST"}}]}}"#
        )
        .unwrap();
        let seed = SeedFile::from_path(file.path()).unwrap();
        assert_eq!(seed.herders.len(), 1);
        assert!(seed.herders[0].livestock.is_empty());
    }

    #[test]
    fn missing_seed_file_is_unavailable() {
        let err = SeedFile::from_path(Path::new("/nonexistent/seed.json")).unwrap_err();
        assert!(err.is_unavailable());
    }
}
