use thiserror::Error;

#[derive(Debug, Error)]
pub enum NodeError {
    #[error("config error: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(#[from] herdguard_store::StoreError),

    #[error("RPC server error: {0}")]
    Rpc(#[from] herdguard_rpc::RpcError),
}
