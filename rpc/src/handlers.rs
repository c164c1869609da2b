//! HTTP request handlers.
//!
//! Store reads and corpus scans are synchronous, so every handler that
//! touches a store hops onto the blocking pool first.

use crate::auth::Actor;
use crate::error::RpcError;
use crate::server::AppState;
use axum::extract::{Path, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use herdguard_geofence::GeofenceReport;
use herdguard_store::{NewSubject, NewTag};
use herdguard_types::{
    ActorId, Coordinate, Modality, OutcomeSet, RiskLevel, Route, RouteId, Subject, SubjectId,
    SubjectView, Tag, TagView, Timestamp, VerificationKind, VerificationRecord,
    VerificationStatus,
};
use herdguard_verification::{FullVerificationRequest, SingleFactorResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

type Shared = State<Arc<AppState>>;

/// Run synchronous store work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, RpcError>
where
    F: FnOnce() -> Result<T, RpcError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| RpcError::Internal(format!("blocking task failed: {e}")))?
}

// ── Liveness ────────────────────────────────────────────────────────────

pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": "HerdGuard verification service",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

// ── Herders ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub herder_id: SubjectId,
    pub herder: Subject,
}

#[derive(Serialize)]
pub struct HerderDetailResponse {
    pub herder: Subject,
    pub livestock: Vec<Tag>,
}

pub async fn register_herder(
    State(state): Shared,
    Actor(actor): Actor,
    Json(req): Json<NewSubject>,
) -> Result<Json<RegisterResponse>, RpcError> {
    if req.face_vector.is_empty() || req.fingerprint_hash.is_empty() {
        return Err(RpcError::InvalidRequest(
            "face_vector and fingerprint_hash are required".into(),
        ));
    }
    let subject = blocking(move || Ok(state.registry.register_subject(req)?)).await?;
    tracing::info!(%actor, herder = %subject.id, "herder registered");
    Ok(Json(RegisterResponse {
        message: "Herder registered successfully",
        herder_id: subject.id,
        herder: subject,
    }))
}

pub async fn list_herders(
    State(state): Shared,
    _actor: Actor,
) -> Result<Json<Vec<Subject>>, RpcError> {
    let subjects = blocking(move || Ok(state.registry.subjects()?)).await?;
    Ok(Json(subjects))
}

pub async fn get_herder(
    State(state): Shared,
    _actor: Actor,
    Path(id): Path<u64>,
) -> Result<Json<HerderDetailResponse>, RpcError> {
    let id = SubjectId::new(id);
    blocking(move || {
        let subject = state
            .registry
            .subject(id)?
            .ok_or_else(|| RpcError::NotFound(format!("herder {id} not found")))?;
        let livestock = state.registry.tags_of(id)?;
        Ok(Json(HerderDetailResponse {
            herder: subject,
            livestock,
        }))
    })
    .await
}

pub async fn add_livestock(
    State(state): Shared,
    Actor(actor): Actor,
    Json(req): Json<NewTag>,
) -> Result<Json<Tag>, RpcError> {
    let tag = blocking(move || {
        state.registry.add_tag(req).map_err(|e| match e {
            // An unknown owner is a bad request here, not a missing resource.
            herdguard_store::StoreError::NotFound(what) => {
                RpcError::InvalidRequest(format!("{what} not found"))
            }
            other => other.into(),
        })
    })
    .await?;
    tracing::info!(%actor, herder = %tag.owner, rfid = %tag.rfid_code, "livestock registered");
    Ok(Json(tag))
}

// ── Verification ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct FaceVerifyRequest {
    pub face_vector: String,
}

#[derive(Deserialize)]
pub struct FingerprintVerifyRequest {
    pub fingerprint_hash: String,
}

#[derive(Deserialize)]
pub struct RfidVerifyRequest {
    pub rfid_code: String,
}

#[derive(Deserialize)]
pub struct FullVerifyRequest {
    pub face_vector: String,
    pub fingerprint_hash: String,
    pub rfid_code: String,
    #[serde(default)]
    pub location_lat: Option<f64>,
    #[serde(default)]
    pub location_lng: Option<f64>,
}

impl FullVerifyRequest {
    /// A location is recorded only when both coordinates are present.
    fn location(&self) -> Option<Coordinate> {
        match (self.location_lat, self.location_lng) {
            (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BiometricVerifyResponse {
    #[serde(rename = "match")]
    pub matched: bool,
    pub confidence: f64,
    pub herder_id: Option<SubjectId>,
    pub herder: Option<SubjectView>,
}

impl From<SingleFactorResult> for BiometricVerifyResponse {
    fn from(r: SingleFactorResult) -> Self {
        Self {
            matched: r.matched,
            confidence: r.confidence,
            herder_id: r.subject_id,
            herder: r.subject,
        }
    }
}

#[derive(Serialize)]
pub struct RfidVerifyResponse {
    #[serde(rename = "match")]
    pub matched: bool,
    pub livestock: Option<TagView>,
    pub herder: Option<SubjectView>,
}

#[derive(Serialize)]
pub struct FullVerifyResponse {
    pub status: VerificationStatus,
    pub risk_level: RiskLevel,
    pub herder: Option<SubjectView>,
    pub livestock: Vec<Tag>,
    pub checks: OutcomeSet,
    pub message: &'static str,
    pub audit_recorded: bool,
}

pub async fn verify_face(
    State(state): Shared,
    _actor: Actor,
    Json(req): Json<FaceVerifyRequest>,
) -> Result<Json<BiometricVerifyResponse>, RpcError> {
    biometric(state, req.face_vector, Modality::Face).await
}

pub async fn verify_fingerprint(
    State(state): Shared,
    _actor: Actor,
    Json(req): Json<FingerprintVerifyRequest>,
) -> Result<Json<BiometricVerifyResponse>, RpcError> {
    biometric(state, req.fingerprint_hash, Modality::Fingerprint).await
}

async fn biometric(
    state: Arc<AppState>,
    probe: String,
    modality: Modality,
) -> Result<Json<BiometricVerifyResponse>, RpcError> {
    let metrics = state.metrics.clone();
    let result = blocking(move || {
        Ok(match modality {
            Modality::Face => state.orchestrator.verify_face(&probe)?,
            Modality::Fingerprint => state.orchestrator.verify_fingerprint(&probe)?,
        })
    })
    .await?;
    metrics.record_biometric(modality, result.matched);
    Ok(Json(result.into()))
}

pub async fn verify_rfid(
    State(state): Shared,
    _actor: Actor,
    Json(req): Json<RfidVerifyRequest>,
) -> Result<Json<RfidVerifyResponse>, RpcError> {
    let metrics = state.metrics.clone();
    let result = blocking(move || Ok(state.orchestrator.verify_tag(&req.rfid_code)?)).await?;
    metrics.record_single_factor("rfid", result.matched);
    Ok(Json(RfidVerifyResponse {
        matched: result.matched,
        livestock: result.livestock,
        herder: result.subject,
    }))
}

pub async fn verify_full(
    State(state): Shared,
    Actor(actor): Actor,
    Json(req): Json<FullVerifyRequest>,
) -> Result<Json<FullVerifyResponse>, RpcError> {
    let request = FullVerificationRequest {
        location: req.location(),
        face_probe: req.face_vector,
        fingerprint_probe: req.fingerprint_hash,
        tag_code: req.rfid_code,
    };
    let metrics = state.metrics.clone();
    let report = {
        let actor = actor.clone();
        blocking(move || Ok(state.orchestrator.verify_full(&request, &actor)?)).await?
    };
    metrics.record_verification(report.status);
    tracing::info!(
        %actor,
        herder = ?report.subject_id,
        status = %report.status,
        risk = %report.risk_level,
        "full verification"
    );
    Ok(Json(FullVerifyResponse {
        status: report.status,
        risk_level: report.risk_level,
        message: report.message(),
        herder: report.subject,
        livestock: report.livestock,
        checks: report.outcomes,
        audit_recorded: report.audit_recorded,
    }))
}

// ── Routes ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CheckLocationRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub route_id: Option<RouteId>,
}

#[derive(Debug, Serialize)]
pub struct SkippedRouteBody {
    pub route_id: RouteId,
    pub route_name: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct CheckLocationResponse {
    pub authorized: bool,
    pub message: String,
    pub routes: Vec<Route>,
    pub skipped_routes: Vec<SkippedRouteBody>,
}

impl From<GeofenceReport> for CheckLocationResponse {
    fn from(report: GeofenceReport) -> Self {
        let message = if report.evaluated == 0 {
            "No active routes found".to_string()
        } else if report.is_authorized() {
            format!(
                "Location is within {} authorized route(s)",
                report.authorized.len()
            )
        } else {
            "Location is outside all authorized grazing routes".to_string()
        };
        Self {
            authorized: report.is_authorized(),
            message,
            skipped_routes: report
                .skipped
                .into_iter()
                .map(|s| SkippedRouteBody {
                    route_id: s.route,
                    route_name: s.name,
                    reason: s.reason.to_string(),
                })
                .collect(),
            routes: report.authorized,
        }
    }
}

pub async fn list_routes(
    State(state): Shared,
    _actor: Actor,
) -> Result<Json<Vec<Route>>, RpcError> {
    Ok(Json(
        blocking(move || Ok(state.routes.active_routes()?)).await?,
    ))
}

pub async fn get_route(
    State(state): Shared,
    _actor: Actor,
    Path(id): Path<u64>,
) -> Result<Json<Route>, RpcError> {
    let id = RouteId::new(id);
    blocking(move || {
        state
            .routes
            .route(id)?
            .map(Json)
            .ok_or_else(|| RpcError::NotFound(format!("route {id} not found")))
    })
    .await
}

pub async fn check_location(
    State(state): Shared,
    _actor: Actor,
    Json(req): Json<CheckLocationRequest>,
) -> Result<Json<CheckLocationResponse>, RpcError> {
    let coordinate = Coordinate::new(req.latitude, req.longitude);
    if !coordinate.is_finite() {
        return Err(RpcError::InvalidRequest(
            "latitude and longitude must be finite".into(),
        ));
    }
    let metrics = state.metrics.clone();
    let report = blocking(move || Ok(state.geofence.check(coordinate, req.route_id)?)).await?;
    metrics.record_location(report.is_authorized(), report.skipped.len());
    Ok(Json(report.into()))
}

// ── Dashboard ───────────────────────────────────────────────────────────

/// An audit record joined with the herder's name.
#[derive(Serialize)]
pub struct RecentVerification {
    pub verification_type: VerificationKind,
    pub result: VerificationStatus,
    pub risk_level: RiskLevel,
    pub created_at: Timestamp,
    pub herder_id: Option<SubjectId>,
    pub herder_name: Option<String>,
    pub officer: ActorId,
}

#[derive(Serialize)]
pub struct DashboardStats {
    pub total_herders: u64,
    pub total_livestock: u64,
    pub recent_verifications: Vec<RecentVerification>,
    pub active_routes: u64,
}

fn recent_verification(
    record: VerificationRecord,
    herder_name: Option<String>,
) -> RecentVerification {
    RecentVerification {
        verification_type: record.kind,
        result: record.status,
        risk_level: record.risk_level,
        created_at: record.recorded_at,
        herder_id: record.subject,
        herder_name,
        officer: record.actor,
    }
}

pub async fn dashboard_stats(
    State(state): Shared,
    _actor: Actor,
) -> Result<Json<DashboardStats>, RpcError> {
    blocking(move || {
        let records = state
            .audit_log
            .recent(state.settings.recent_verifications_limit)?;
        let mut recent_verifications = Vec::with_capacity(records.len());
        for record in records {
            let herder_name = match record.subject {
                Some(id) => state.registry.subject(id)?.map(|s| s.full_name),
                None => None,
            };
            recent_verifications.push(recent_verification(record, herder_name));
        }
        Ok(Json(DashboardStats {
            total_herders: state.registry.subject_count()?,
            total_livestock: state.registry.tag_count()?,
            recent_verifications,
            active_routes: state.routes.active_route_count()?,
        }))
    })
    .await
}

// ── Metrics ─────────────────────────────────────────────────────────────

pub async fn metrics(State(state): Shared) -> Result<impl IntoResponse, RpcError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| RpcError::Internal(format!("metrics encoding failed: {e}")))?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body))
}
