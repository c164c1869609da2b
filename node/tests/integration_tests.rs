//! End-to-end scenarios against the fully wired service:
//! config → seed → stores → engines → HTTP router.
//!
//! These go through the same router the daemon serves, so they exercise
//! extraction, blocking hand-off, error mapping and audit together.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use herdguard_geofence::{point_in_polygon, GeofenceEngine};
use herdguard_node::{HerdguardService, ServiceConfig};
use herdguard_nullables::{NullClock, RecordingAuditSink};
use herdguard_store::{AuditLog, NewSubject, NewTag, SubjectRegistry};
use herdguard_types::{ActorId, Coordinate, RiskLevel, SubjectId, VerificationStatus};
use herdguard_verification::{FullVerificationRequest, MatchPolicy, VerificationOrchestrator};
use serde_json::{json, Value};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const FACE: &str = "FACE_TEST_HERDER_12345";
const FINGER: &str = "FINGER_TEST_HERDER_12345";
const TAG: &str = "RFID_001";

/// A service on the built-in seed plus the test herder S owning `RFID_001`.
fn service_with_test_herder() -> (HerdguardService, SubjectId) {
    let service = HerdguardService::new(ServiceConfig::default()).expect("service");
    let registry = service.registry();
    let subject = registry
        .register_subject(NewSubject {
            full_name: "Test Herder".into(),
            age: 30,
            state_of_origin: "Kaduna".into(),
            phone_number: None,
            national_id: None,
            photo_url: None,
            fingerprint_hash: FINGER.into(),
            face_vector: FACE.into(),
        })
        .expect("register");
    registry
        .add_tag(NewTag {
            herder_id: subject.id,
            rfid_code: TAG.into(),
            animal_type: "cattle".into(),
            breed: None,
            age_years: None,
        })
        .expect("tag");
    (service, subject.id)
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::post(uri)
        .header("x-actor-id", "officer-42")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn all_three_factors_verify_and_are_audited() {
    let (service, subject) = service_with_test_herder();
    let app = herdguard_rpc::router(service.state());

    let (status, body) = post(
        &app,
        "/verify/full",
        json!({
            "face_vector": FACE,
            "fingerprint_hash": FINGER,
            "rfid_code": TAG,
            "location_lat": 10.6,
            "location_lng": 7.5
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "verified");
    assert_eq!(body["risk_level"], "low");
    assert_eq!(body["herder"]["id"], subject.get());
    assert_eq!(body["audit_recorded"], true);

    let records = service.registry().recent(10).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].subject, Some(subject));
    assert_eq!(records[0].actor, ActorId::new("officer-42"));
    assert_eq!(records[0].location, Some(Coordinate::new(10.6, 7.5)));
}

#[tokio::test]
async fn wrong_fingerprint_is_suspicious() {
    let (service, _) = service_with_test_herder();
    let app = herdguard_rpc::router(service.state());

    let (_, body) = post(
        &app,
        "/verify/full",
        json!({
            "face_vector": FACE,
            "fingerprint_hash": "WRONG",
            "rfid_code": TAG
        }),
    )
    .await;
    assert_eq!(body["status"], "suspicious");
    assert_eq!(body["risk_level"], "medium");
    assert_eq!(body["message"], "Partial verification - some checks failed");
}

#[tokio::test]
async fn unknown_face_fails_and_is_not_audited() {
    let (service, _) = service_with_test_herder();
    let app = herdguard_rpc::router(service.state());

    let (_, body) = post(
        &app,
        "/verify/full",
        json!({
            "face_vector": "UNKNOWN_PERSON_000",
            "fingerprint_hash": FINGER,
            "rfid_code": TAG
        }),
    )
    .await;
    assert_eq!(body["status"], "failed");
    assert_eq!(body["risk_level"], "high");
    assert_eq!(body["audit_recorded"], false);
    assert!(service.registry().recent(10).unwrap().is_empty());
}

#[tokio::test]
async fn location_inside_kaduna_north_is_authorized() {
    let (service, _) = service_with_test_herder();
    let app = herdguard_rpc::router(service.state());

    let (_, inside) = post(
        &app,
        "/routes/check-location",
        json!({ "latitude": 10.6, "longitude": 7.5 }),
    )
    .await;
    assert_eq!(inside["authorized"], true);
    let names: Vec<&str> = inside["routes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["route_name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"Kaduna North Corridor"));

    let (_, outside) = post(
        &app,
        "/routes/check-location",
        json!({ "latitude": 6.5, "longitude": 3.3 }),
    )
    .await;
    assert_eq!(outside["authorized"], false);
    assert!(outside["routes"].as_array().unwrap().is_empty());
}

#[test]
fn square_polygon_containment() {
    let square = json!({
        "type": "Polygon",
        "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 1], [0, 0]]]
    });
    assert!(point_in_polygon(0.5, 0.5, &square).unwrap());
    assert!(!point_in_polygon(1.5, 0.5, &square).unwrap());
}

#[test]
fn geofence_engine_over_seeded_registry() {
    let (service, _) = service_with_test_herder();
    let engine = GeofenceEngine::new(service.registry().clone());
    let report = engine.check(Coordinate::new(10.6, 7.5), None).unwrap();
    assert!(report.is_authorized());
    assert!(report.skipped.is_empty());
}

#[test]
fn orchestrator_over_seeded_registry_with_null_collaborators() {
    let (service, subject) = service_with_test_herder();
    let registry = service.registry().clone();
    let audit = Arc::new(RecordingAuditSink::new());
    let orchestrator = VerificationOrchestrator::new(
        registry.clone(),
        registry,
        audit.clone(),
        &MatchPolicy::default(),
    )
    .unwrap()
    .with_clock(Arc::new(NullClock::new(42)));

    let report = orchestrator
        .verify_full(
            &FullVerificationRequest {
                face_probe: FACE.into(),
                fingerprint_probe: FINGER.into(),
                tag_code: TAG.into(),
                location: None,
            },
            &ActorId::new("officer-1"),
        )
        .unwrap();
    assert_eq!(report.status, VerificationStatus::Verified);
    assert_eq!(report.risk_level, RiskLevel::Low);
    assert_eq!(audit.records()[0].subject, Some(subject));
    assert_eq!(audit.records()[0].recorded_at.as_secs(), 42);
}
