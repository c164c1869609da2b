//! Axum-based HTTP server.

use crate::error::RpcError;
use crate::handlers;
use crate::metrics::{MeteredAuditSink, ServiceMetrics};
use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use herdguard_geofence::GeofenceEngine;
use herdguard_store::{AuditLog, AuditSink, EnrollmentStore, RouteStore, SubjectRegistry, TagStore};
use herdguard_verification::{AuditPolicy, MatchPolicy, VerificationOrchestrator};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

/// Knobs of the HTTP surface itself.
#[derive(Clone, Debug)]
pub struct RpcSettings {
    pub recent_verifications_limit: usize,
    pub enable_metrics: bool,
    pub cors_origins: Vec<String>,
}

impl Default for RpcSettings {
    fn default() -> Self {
        Self {
            recent_verifications_limit: 10,
            enable_metrics: true,
            cors_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

/// Everything a handler can reach.
pub struct AppState {
    pub registry: Arc<dyn SubjectRegistry>,
    pub routes: Arc<dyn RouteStore>,
    pub audit_log: Arc<dyn AuditLog>,
    pub orchestrator: VerificationOrchestrator,
    pub geofence: GeofenceEngine,
    pub metrics: Arc<ServiceMetrics>,
    pub settings: RpcSettings,
}

impl AppState {
    /// Wire engines and metrics over a single backend that implements every
    /// store trait.
    pub fn new<B>(
        backend: Arc<B>,
        policy: &MatchPolicy,
        audit_policy: AuditPolicy,
        settings: RpcSettings,
    ) -> Result<Self, RpcError>
    where
        B: EnrollmentStore + TagStore + RouteStore + AuditSink + AuditLog + SubjectRegistry + 'static,
    {
        let metrics = Arc::new(
            ServiceMetrics::new().map_err(|e| RpcError::Server(format!("metrics: {e}")))?,
        );
        let audit = Arc::new(MeteredAuditSink::new(backend.clone(), metrics.clone()));
        let orchestrator =
            VerificationOrchestrator::new(backend.clone(), backend.clone(), audit, policy)?
                .with_audit_policy(audit_policy);
        Ok(Self {
            registry: backend.clone(),
            routes: backend.clone(),
            audit_log: backend.clone(),
            orchestrator,
            geofence: GeofenceEngine::new(backend),
            metrics,
            settings,
        })
    }
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let mut app = Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/herders", get(handlers::list_herders))
        .route("/herders/register", post(handlers::register_herder))
        .route("/herders/livestock", post(handlers::add_livestock))
        .route("/herders/:id", get(handlers::get_herder))
        .route("/verify/face", post(handlers::verify_face))
        .route("/verify/fingerprint", post(handlers::verify_fingerprint))
        .route("/verify/rfid", post(handlers::verify_rfid))
        .route("/verify/full", post(handlers::verify_full))
        .route("/routes", get(handlers::list_routes))
        .route("/routes/check-location", post(handlers::check_location))
        .route("/routes/:id", get(handlers::get_route))
        .route("/dashboard/stats", get(handlers::dashboard_stats));
    if state.settings.enable_metrics {
        app = app.route("/metrics", get(handlers::metrics));
    }
    let cors = cors_layer(&state.settings.cors_origins);
    app.layer(cors).with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}

pub struct RpcServer {
    pub addr: SocketAddr,
    pub state: Arc<AppState>,
}

impl RpcServer {
    pub fn new(addr: SocketAddr, state: Arc<AppState>) -> Self {
        Self { addr, state }
    }

    /// Serve until `shutdown` resolves, then drain in-flight requests.
    pub async fn start<F>(self, shutdown: F) -> Result<(), RpcError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| RpcError::Server(format!("failed to bind {}: {e}", self.addr)))?;
        info!(addr = %self.addr, "HTTP API listening");
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| RpcError::Server(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ACTOR_HEADER;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use herdguard_nullables::UnavailableStore;
    use herdguard_store_memory::MemoryRegistry;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn seeded_state() -> Arc<AppState> {
        let backend = Arc::new(MemoryRegistry::with_default_seed().unwrap());
        Arc::new(
            AppState::new(
                backend,
                &MatchPolicy::default(),
                AuditPolicy::default(),
                RpcSettings::default(),
            )
            .unwrap(),
        )
    }

    async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(ACTOR_HEADER, "officer-7")
            .header("content-type", "application/json");
        let body = match body {
            Some(v) => Body::from(v.to_string()),
            None => Body::empty(),
        };
        let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn health_needs_no_actor() {
        let app = router(seeded_state());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_actor_is_unauthorized() {
        let app = router(seeded_state());
        let response = app
            .oneshot(Request::get("/herders").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].as_str().unwrap().contains("x-actor-id"));
    }

    #[tokio::test]
    async fn register_then_fetch_herder() {
        let app = router(seeded_state());
        let (status, body) = call(
            &app,
            "POST",
            "/herders/register",
            Some(json!({
                "full_name": "Musa Bello",
                "age": 33,
                "state_of_origin": "Niger",
                "fingerprint_hash": "FP_MUSA_BELLO",
                "face_vector": "FACE_MUSA_BELLO_0003"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Herder registered successfully");
        assert_eq!(body["herder"]["status"], "active");
        assert!(!body["herder"]["created_at"].is_null());
        let id = body["herder_id"].as_u64().unwrap();

        let (status, body) = call(
            &app,
            "POST",
            "/herders/livestock",
            Some(json!({ "herder_id": id, "rfid_code": "RFID_NG_0001" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["animal_type"], "cattle");
        assert_eq!(body["health_status"], "healthy");

        let (status, body) = call(&app, "GET", &format!("/herders/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["herder"]["full_name"], "Musa Bello");
        assert_eq!(body["livestock"][0]["rfid_code"], "RFID_NG_0001");

        let (_, list) = call(&app, "GET", "/herders", None).await;
        assert_eq!(list[0]["full_name"], "Musa Bello", "newest first");
        assert!(!list[0]["created_at"].is_null());
    }

    #[tokio::test]
    async fn livestock_errors_are_bad_requests() {
        let app = router(seeded_state());
        let (status, _) = call(
            &app,
            "POST",
            "/herders/livestock",
            Some(json!({ "herder_id": 999, "rfid_code": "RFID_X" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            "/herders/livestock",
            Some(json!({ "herder_id": 1, "rfid_code": "RFID_KD_0001" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_herder_and_route_are_not_found() {
        let app = router(seeded_state());
        assert_eq!(call(&app, "GET", "/herders/999", None).await.0, StatusCode::NOT_FOUND);
        assert_eq!(call(&app, "GET", "/routes/999", None).await.0, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn single_factor_checks() {
        let app = router(seeded_state());
        let (_, face) = call(
            &app,
            "POST",
            "/verify/face",
            Some(json!({ "face_vector": "FACE_ALIYU_GARBA_probe" })),
        )
        .await;
        assert_eq!(face["match"], true);
        assert_eq!(face["confidence"], 0.95);
        assert_eq!(face["herder"]["full_name"], "Aliyu Garba");

        let (_, finger) = call(
            &app,
            "POST",
            "/verify/fingerprint",
            Some(json!({ "fingerprint_hash": "FP_HAUWA_DANJUMA_0002" })),
        )
        .await;
        assert_eq!(finger["match"], true);
        assert_eq!(finger["herder"]["full_name"], "Hauwa Danjuma");

        let (_, rfid) = call(
            &app,
            "POST",
            "/verify/rfid",
            Some(json!({ "rfid_code": "RFID_UNKNOWN" })),
        )
        .await;
        assert_eq!(rfid["match"], false);
        assert!(rfid["livestock"].is_null());
    }

    #[tokio::test]
    async fn full_verification_is_audited_and_counted() {
        let app = router(seeded_state());
        let (status, body) = call(
            &app,
            "POST",
            "/verify/full",
            Some(json!({
                "face_vector": "FACE_ALIYU_GARBA_0001",
                "fingerprint_hash": "FP_ALIYU_GARBA_0001",
                "rfid_code": "RFID_KD_0002",
                "location_lat": 10.6,
                "location_lng": 7.5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "verified");
        assert_eq!(body["risk_level"], "low");
        assert_eq!(body["message"], "All verification checks passed");
        assert_eq!(body["audit_recorded"], true);

        let (_, stats) = call(&app, "GET", "/dashboard/stats", None).await;
        assert_eq!(stats["total_herders"], 2);
        assert_eq!(stats["total_livestock"], 3);
        assert_eq!(stats["active_routes"], 4);
        let recent = stats["recent_verifications"].as_array().unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0]["officer"], "officer-7");
        assert_eq!(recent[0]["herder_name"], "Aliyu Garba");
        assert_eq!(recent[0]["verification_type"], "full");
        assert_eq!(recent[0]["result"], "verified");

        let (status, _) = call(&app, "GET", "/metrics", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn metrics_endpoint_reports_verifications() {
        let state = seeded_state();
        state.metrics.record_verification(herdguard_types::VerificationStatus::Failed);
        let response = router(state)
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.contains("herdguard_verifications_total{status=\"failed\"} 1"));
    }

    #[tokio::test]
    async fn check_location_inside_and_outside() {
        let app = router(seeded_state());
        let (_, inside) = call(
            &app,
            "POST",
            "/routes/check-location",
            Some(json!({ "latitude": 10.6, "longitude": 7.5 })),
        )
        .await;
        assert_eq!(inside["authorized"], true);
        assert_eq!(inside["routes"][0]["route_name"], "Kaduna North Corridor");

        let (_, outside) = call(
            &app,
            "POST",
            "/routes/check-location",
            Some(json!({ "latitude": 6.5, "longitude": 3.3 })),
        )
        .await;
        assert_eq!(outside["authorized"], false);
        assert_eq!(
            outside["message"],
            "Location is outside all authorized grazing routes"
        );
    }

    #[tokio::test]
    async fn unreachable_store_is_service_unavailable() {
        let state = Arc::new(
            AppState::new(
                Arc::new(UnavailableStore),
                &MatchPolicy::default(),
                AuditPolicy::default(),
                RpcSettings::default(),
            )
            .unwrap(),
        );
        let app = router(state);
        let (status, body) = call(
            &app,
            "POST",
            "/verify/face",
            Some(json!({ "face_vector": "FACE_ALIYU_GARBA_0001" })),
        )
        .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn metrics_route_can_be_disabled() {
        let backend = Arc::new(MemoryRegistry::new());
        let settings = RpcSettings {
            enable_metrics: false,
            ..RpcSettings::default()
        };
        let state =
            AppState::new(backend, &MatchPolicy::default(), AuditPolicy::default(), settings)
                .unwrap();
        let app = router(Arc::new(state));
        assert_eq!(call(&app, "GET", "/metrics", None).await.0, StatusCode::NOT_FOUND);
    }
}
