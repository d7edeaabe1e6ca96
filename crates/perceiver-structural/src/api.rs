use async_trait::async_trait;
use page_adapter::PageDocument;

use crate::errors::PerceiverError;
use crate::model::PageSnapshot;

#[async_trait]
pub trait StructuralPerceiver: Send + Sync {
    /// Pure read of the document; never mutates it.
    async fn snapshot(&self, document: &dyn PageDocument) -> Result<PageSnapshot, PerceiverError>;
}
