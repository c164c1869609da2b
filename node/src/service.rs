//! The herdguard service: wires the store, engines and HTTP API together.

use std::sync::Arc;

use herdguard_rpc::{AppState, RpcServer};
use herdguard_store_memory::{MemoryRegistry, SeedFile, SeedSummary};
use tracing::info;

use crate::config::ServiceConfig;
use crate::error::NodeError;
use crate::shutdown::ShutdownController;

pub struct HerdguardService {
    config: ServiceConfig,
    registry: Arc<MemoryRegistry>,
    state: Arc<AppState>,
    seed: SeedSummary,
}

impl HerdguardService {
    /// Validate `config`, load the seed, and build the application state.
    pub fn new(config: ServiceConfig) -> Result<Self, NodeError> {
        config.validate()?;
        let seed_file = match &config.seed_path {
            Some(path) => {
                info!(path = %path.display(), "loading seed file");
                SeedFile::from_path(path)?
            }
            None => SeedFile::builtin()?,
        };
        let registry = Arc::new(MemoryRegistry::new());
        let seed = registry.load_seed(&seed_file)?;
        let state = Arc::new(AppState::new(
            registry.clone(),
            &config.matching,
            config.audit.clone(),
            config.rpc_settings(),
        )?);
        Ok(Self {
            config,
            registry,
            state,
            seed,
        })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The backing registry, for administrative access outside HTTP.
    pub fn registry(&self) -> &Arc<MemoryRegistry> {
        &self.registry
    }

    pub fn state(&self) -> Arc<AppState> {
        self.state.clone()
    }

    pub fn seed_summary(&self) -> SeedSummary {
        self.seed
    }

    /// Serve the HTTP API until `shutdown` fires.
    pub async fn run(self, shutdown: &ShutdownController) -> Result<(), NodeError> {
        let addr = self.config.socket_addr();
        info!(
            %addr,
            herders = self.seed.herders,
            routes = self.seed.routes,
            metrics = self.config.enable_metrics,
            "starting herdguard service"
        );
        RpcServer::new(addr, self.state)
            .start(shutdown.shutdown_signal())
            .await?;
        info!("herdguard service stopped");
        Ok(())
    }
}
