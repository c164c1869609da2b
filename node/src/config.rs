//! Service configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use herdguard_rpc::RpcSettings;
use herdguard_verification::{AuditPolicy, MatchPolicy};

use crate::{LogFormat, NodeError};

/// Configuration for the herdguard service.
///
/// Can be loaded from a TOML file via [`ServiceConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Every field has a default, so an
/// empty file is a valid configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Address the HTTP API binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: IpAddr,

    /// HTTP API port.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log format: "human" or "json".
    #[serde(default)]
    pub log_format: LogFormat,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// JSON seed file with routes and demo herders. The bundled seed is used
    /// when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed_path: Option<PathBuf>,

    /// Whether to expose `GET /metrics`.
    #[serde(default = "default_true")]
    pub enable_metrics: bool,

    /// Origins allowed by CORS.
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// How many recent verifications the dashboard shows.
    #[serde(default = "default_recent_verifications_limit")]
    pub recent_verifications_limit: usize,

    #[serde(default)]
    pub matching: MatchPolicy,

    #[serde(default)]
    pub audit: AuditPolicy,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_listen_addr() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_rpc_port() -> u16 {
    8000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cors_origins() -> Vec<String> {
    vec!["http://localhost:3000".to_string()]
}

fn default_recent_verifications_limit() -> usize {
    10
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ServiceConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, NodeError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| NodeError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, NodeError> {
        toml::from_str(s).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, NodeError> {
        toml::to_string_pretty(self).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> Result<(), NodeError> {
        self.matching
            .validate()
            .map_err(|e| NodeError::Config(e.to_string()))?;
        if self.recent_verifications_limit == 0 {
            return Err(NodeError::Config(
                "recent_verifications_limit must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.listen_addr, self.rpc_port)
    }

    pub fn rpc_settings(&self) -> RpcSettings {
        RpcSettings {
            recent_verifications_limit: self.recent_verifications_limit,
            enable_metrics: self.enable_metrics,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            rpc_port: default_rpc_port(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            seed_path: None,
            enable_metrics: default_true(),
            cors_origins: default_cors_origins(),
            recent_verifications_limit: default_recent_verifications_limit(),
            matching: MatchPolicy::default(),
            audit: AuditPolicy::default(),
        }
    }
}
