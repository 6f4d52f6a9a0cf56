use crate::config::ShipmentSettings;
use crate::core::normalizer::normalize;
use crate::core::payload::PayloadBuilder;
use crate::core::sanitizer::sanitize;
use crate::domain::model::{QuoteResult, RawQuoteRequest};
use crate::domain::ports::RateProvider;
use crate::utils::error::{RelayError, Result};
use std::future::Future;

/// Sanitize → build payload → one provider call → normalize.
pub struct QuoteService<P: RateProvider> {
    provider: P,
    builder: PayloadBuilder,
}

impl<P: RateProvider> QuoteService<P> {
    pub fn new(provider: P, settings: ShipmentSettings) -> Self {
        Self {
            provider,
            builder: PayloadBuilder::new(settings),
        }
    }

    pub async fn quote(&self, raw: &RawQuoteRequest) -> Result<QuoteResult> {
        let request = sanitize(raw)?;
        let payload = self.builder.build(&request);

        tracing::debug!(
            "Quoting {} -> {} ({:?})",
            payload.from.postal_code,
            payload.to.postal_code,
            request.package()
        );

        let reply = self.provider.calculate(&payload).await?;
        let result = normalize(&reply)?;

        tracing::info!(
            "Quote for {} resolved to {} option(s)",
            request.destination_postal_code(),
            result.len()
        );
        Ok(result)
    }

    /// Like [`quote`](Self::quote), but gives up as soon as `cancel` completes. The
    /// in-flight provider request is dropped and no partial result is returned.
    pub async fn quote_until<F>(&self, raw: &RawQuoteRequest, cancel: F) -> Result<QuoteResult>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.quote(raw) => result,
            _ = cancel => {
                tracing::warn!("Quote request canceled while waiting on the provider");
                Err(RelayError::Canceled)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{ProviderPayload, ProviderReply, PICKUP_KEY};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    #[derive(Clone)]
    struct MockProvider {
        reply: ProviderReply,
        delay: Option<Duration>,
        calls: Arc<AtomicUsize>,
        last_payload: Arc<Mutex<Option<ProviderPayload>>>,
    }

    impl MockProvider {
        fn new(status: u16, body: serde_json::Value) -> Self {
            Self {
                reply: ProviderReply::new(status, body.to_string()),
                delay: None,
                calls: Arc::new(AtomicUsize::new(0)),
                last_payload: Arc::new(Mutex::new(None)),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateProvider for MockProvider {
        async fn calculate(&self, payload: &ProviderPayload) -> Result<ProviderReply> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_payload.lock().unwrap() = Some(payload.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.reply.clone())
        }
    }

    fn raw(cep: &str) -> RawQuoteRequest {
        RawQuoteRequest {
            cep_destino: Some(cep.to_string()),
            peso_total: 0.5,
            comprimento: 16.0,
            largura: 11.0,
            altura: 2.0,
        }
    }

    #[tokio::test]
    async fn test_quote_runs_full_pipeline() {
        let provider = MockProvider::new(
            200,
            serde_json::json!([
                {"name": "PAC", "price": 23.4},
                {"name": "SEDEX", "price": 41.9}
            ]),
        );
        let service = QuoteService::new(provider.clone(), ShipmentSettings::default());

        let result = service.quote(&raw("01310-100")).await.unwrap();

        assert_eq!(result.get("pac"), Some(23.4));
        assert_eq!(result.get("sedex"), Some(41.9));
        assert_eq!(result.get(PICKUP_KEY), Some(0.0));
        assert_eq!(provider.calls(), 1);

        let payload = provider.last_payload.lock().unwrap().clone().unwrap();
        assert_eq!(payload.to.postal_code, "01310100");
        assert_eq!(payload.from.postal_code, "56318620");
    }

    #[tokio::test]
    async fn test_invalid_cep_never_reaches_provider() {
        let provider = MockProvider::new(200, serde_json::json!([]));
        let service = QuoteService::new(provider.clone(), ShipmentSettings::default());

        let err = service.quote(&raw("")).await.unwrap_err();

        assert!(err.is_client_error());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_provider_yields_pickup_only() {
        let provider = MockProvider::new(401, serde_json::json!({"message": "Unauthenticated."}));
        let service = QuoteService::new(provider, ShipmentSettings::default());

        let result = service.quote(&raw("01310100")).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result.get(PICKUP_KEY), Some(0.0));
    }

    #[tokio::test]
    async fn test_identical_inputs_give_identical_results() {
        let provider = MockProvider::new(200, serde_json::json!([{"name": "PAC", "price": 23.4}]));
        let service = QuoteService::new(provider, ShipmentSettings::default());

        let first = service.quote(&raw("01310100")).await.unwrap();
        let second = service.quote(&raw("01310-100")).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_quote_until_cancels_slow_provider() {
        let mut provider = MockProvider::new(200, serde_json::json!([{"name": "PAC", "price": 23.4}]));
        provider.delay = Some(Duration::from_secs(30));
        let service = QuoteService::new(provider, ShipmentSettings::default());

        let cancel = tokio::time::sleep(Duration::from_millis(10));
        let err = service.quote_until(&raw("01310100"), cancel).await.unwrap_err();

        assert!(matches!(err, RelayError::Canceled));
    }

    #[tokio::test]
    async fn test_quote_until_returns_result_when_not_canceled() {
        let provider = MockProvider::new(200, serde_json::json!([{"name": "SEDEX", "price": 41.9}]));
        let service = QuoteService::new(provider, ShipmentSettings::default());

        let result = service
            .quote_until(&raw("01310100"), std::future::pending())
            .await
            .unwrap();
        assert_eq!(result.get("sedex"), Some(41.9));
    }
}
