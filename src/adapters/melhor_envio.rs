use crate::config::ProviderConfig;
use crate::domain::model::{ProviderPayload, ProviderReply};
use crate::domain::ports::RateProvider;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;

pub const CALCULATE_PATH: &str = "/me/shipment/calculate";

/// Melhor Envio shipment calculator client.
#[derive(Clone)]
pub struct MelhorEnvioClient {
    client: Client,
    calculate_url: String,
    access_token: String,
}

impl MelhorEnvioClient {
    pub fn new(config: &ProviderConfig) -> Self {
        Self::with_client(Client::new(), &config.base_url, &config.access_token)
    }

    pub fn with_client(client: Client, base_url: &str, access_token: &str) -> Self {
        Self {
            client,
            calculate_url: format!("{}{}", base_url.trim_end_matches('/'), CALCULATE_PATH),
            access_token: access_token.to_string(),
        }
    }

    pub fn calculate_url(&self) -> &str {
        &self.calculate_url
    }
}

impl std::fmt::Debug for MelhorEnvioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MelhorEnvioClient")
            .field("calculate_url", &self.calculate_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl RateProvider for MelhorEnvioClient {
    async fn calculate(&self, payload: &ProviderPayload) -> Result<ProviderReply> {
        tracing::debug!(
            "Making API request to: {} (destination {})",
            self.calculate_url,
            payload.to.postal_code
        );

        let response = self
            .client
            .post(&self.calculate_url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(&self.access_token)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        tracing::debug!("API response status: {}", status);

        let body = response.text().await?;
        Ok(ProviderReply { status, body })
    }
}
