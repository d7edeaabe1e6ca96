use page_adapter::AdapterError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PerceiverError {
    #[error("page read failed: {0}")]
    Adapter(#[from] AdapterError),
}
