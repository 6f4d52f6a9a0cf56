use crate::domain::model::{ProviderPayload, ProviderReply};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Outbound shipping-rate provider.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Issues exactly one request and returns the raw status and body.
    async fn calculate(&self, payload: &ProviderPayload) -> Result<ProviderReply>;
}
