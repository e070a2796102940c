use thiserror::Error;

use openlca_client::OpenLcaError;

#[derive(Error, Debug)]
pub enum MetaLcaError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Upstream(#[from] OpenLcaError),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Malformed multipart body: {0}")]
    Multipart(String),
}

impl From<std::io::Error> for MetaLcaError {
    fn from(err: std::io::Error) -> Self {
        MetaLcaError::Storage(err.to_string())
    }
}
