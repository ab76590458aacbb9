use registry_core::StoreError;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("producer is not registered")]
    NotFound,
    #[error("caller is not authorized")]
    NotAuthorized,
    #[error("grid status ledger is empty")]
    EmptyLedger,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}
