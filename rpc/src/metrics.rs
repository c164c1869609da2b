//! Prometheus metrics for the HTTP service.
//!
//! [`ServiceMetrics`] owns a dedicated [`Registry`] that `GET /metrics`
//! encodes into the Prometheus text exposition format.

use herdguard_store::{AuditSink, StoreError};
use herdguard_types::{Modality, VerificationRecord, VerificationStatus};
use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, Encoder,
    IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

pub struct ServiceMetrics {
    pub registry: Registry,

    /// Full verifications by outcome status.
    pub verifications: IntCounterVec,
    /// Face-only, fingerprint-only and tag-only checks.
    pub single_factor_checks: IntCounterVec,
    /// Location checks by result.
    pub location_checks: IntCounterVec,
    /// Routes skipped because their geometry could not be parsed.
    pub geometry_errors: IntCounter,
    /// Audit appends that failed.
    pub audit_failures: IntCounter,
}

impl ServiceMetrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let verifications = register_int_counter_vec_with_registry!(
            Opts::new(
                "herdguard_verifications_total",
                "Full verifications by outcome status"
            ),
            &["status"],
            registry
        )?;

        let single_factor_checks = register_int_counter_vec_with_registry!(
            Opts::new(
                "herdguard_single_factor_checks_total",
                "Single-factor checks by modality and result"
            ),
            &["modality", "matched"],
            registry
        )?;

        let location_checks = register_int_counter_vec_with_registry!(
            Opts::new(
                "herdguard_location_checks_total",
                "Location authorization checks by result"
            ),
            &["authorized"],
            registry
        )?;

        let geometry_errors = register_int_counter_with_registry!(
            Opts::new(
                "herdguard_geometry_errors_total",
                "Routes skipped due to malformed geometry"
            ),
            registry
        )?;

        let audit_failures = register_int_counter_with_registry!(
            Opts::new(
                "herdguard_audit_failures_total",
                "Verification records that could not be appended"
            ),
            registry
        )?;

        Ok(Self {
            registry,
            verifications,
            single_factor_checks,
            location_checks,
            geometry_errors,
            audit_failures,
        })
    }

    pub fn record_verification(&self, status: VerificationStatus) {
        self.verifications.with_label_values(&[status.as_str()]).inc();
    }

    /// `modality` is `face`, `fingerprint` or `rfid`.
    pub fn record_single_factor(&self, modality: &str, matched: bool) {
        self.single_factor_checks
            .with_label_values(&[modality, bool_label(matched)])
            .inc();
    }

    pub fn record_biometric(&self, modality: Modality, matched: bool) {
        self.record_single_factor(modality.as_str(), matched);
    }

    pub fn record_location(&self, authorized: bool, skipped: usize) {
        self.location_checks
            .with_label_values(&[bool_label(authorized)])
            .inc();
        self.geometry_errors.inc_by(skipped as u64);
    }

    /// Encode every registered metric in the text exposition format.
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

fn bool_label(b: bool) -> &'static str {
    if b {
        "true"
    } else {
        "false"
    }
}

/// Counts failed appends on the way to the real sink.
pub struct MeteredAuditSink {
    inner: Arc<dyn AuditSink>,
    metrics: Arc<ServiceMetrics>,
}

impl MeteredAuditSink {
    pub fn new(inner: Arc<dyn AuditSink>, metrics: Arc<ServiceMetrics>) -> Self {
        Self { inner, metrics }
    }
}

impl AuditSink for MeteredAuditSink {
    fn append(&self, record: VerificationRecord) -> Result<(), StoreError> {
        self.inner.append(record).inspect_err(|_| {
            self.metrics.audit_failures.inc();
        })
    }
}
