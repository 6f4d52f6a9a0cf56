use anyhow::Result;
use httpmock::prelude::*;
use shipquote_relay::config::ShipmentSettings;
use shipquote_relay::domain::model::ProviderReply;
use shipquote_relay::domain::ports::RateProvider;
use shipquote_relay::{MelhorEnvioClient, QuoteService, RawQuoteRequest, RelayError};

fn sample_request() -> RawQuoteRequest {
    RawQuoteRequest {
        cep_destino: Some("01310-100".to_string()),
        peso_total: 0.5,
        comprimento: 16.0,
        largura: 11.0,
        altura: 2.0,
    }
}

fn client_for(server: &MockServer) -> MelhorEnvioClient {
    MelhorEnvioClient::with_client(reqwest::Client::new(), &server.base_url(), "test-token")
}

#[tokio::test]
async fn test_provider_receives_documented_headers_and_body() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/me/shipment/calculate")
                .header("Accept", "application/json")
                .header("Content-Type", "application/json")
                .header("Authorization", "Bearer test-token")
                .json_body(serde_json::json!({
                    "from": {"postal_code": "56318620"},
                    "to": {"postal_code": "01310100"},
                    "products": [{
                        "name": "Produto Checkout",
                        "quantity": 1,
                        "weight": 0.5,
                        "height": 2.0,
                        "width": 11.0,
                        "length": 16.0,
                        "insurance_value": 100.0
                    }],
                    "receipt": false,
                    "own_hand": false,
                    "platform": "ChatBolt E-commerce"
                }));
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!([
                    {"id": 1, "name": "PAC", "price": "23.40", "company": {"name": "Correios"}},
                    {"id": 2, "name": "SEDEX", "price": "41.90", "company": {"name": "Correios"}},
                    {"id": 3, "name": "Mini Envios", "error": "Dimensões inválidas"}
                ]));
        })
        .await;

    let service = QuoteService::new(client_for(&server), ShipmentSettings::default());
    let result = service.quote(&sample_request()).await?;

    api_mock.assert_async().await;
    assert_eq!(result.get("pac"), Some(23.4));
    assert_eq!(result.get("sedex"), Some(41.9));
    assert_eq!(result.get("pickup"), Some(0.0));
    assert_eq!(result.len(), 3);
    Ok(())
}

#[tokio::test]
async fn test_client_returns_raw_status_and_body() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/me/shipment/calculate");
            then.status(422).body(r#"{"message":"The given data was invalid."}"#);
        })
        .await;

    let client = client_for(&server);
    let payload = shipquote_relay::core::payload::PayloadBuilder::new(ShipmentSettings::default())
        .build(&shipquote_relay::core::sanitizer::sanitize(&sample_request())?);

    let reply = client.calculate(&payload).await?;

    api_mock.assert_async().await;
    assert_eq!(
        reply,
        ProviderReply::new(422, r#"{"message":"The given data was invalid."}"#)
    );
    Ok(())
}

#[tokio::test]
async fn test_provider_unauthorized_degrades_to_pickup_only() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/me/shipment/calculate");
            then.status(401).json_body(serde_json::json!({"message": "Unauthenticated."}));
        })
        .await;

    let service = QuoteService::new(client_for(&server), ShipmentSettings::default());
    let result = service.quote(&sample_request()).await?;

    api_mock.assert_async().await;
    assert_eq!(serde_json::to_value(&result)?, serde_json::json!({"pickup": 0.0}));
    Ok(())
}

#[tokio::test]
async fn test_provider_is_called_exactly_once_on_failure() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/me/shipment/calculate");
            then.status(500).body("upstream exploded");
        })
        .await;

    let service = QuoteService::new(client_for(&server), ShipmentSettings::default());
    let result = service.quote(&sample_request()).await?;

    api_mock.assert_hits_async(1).await;
    assert_eq!(result.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_malformed_success_body_propagates() -> Result<()> {
    let server = MockServer::start_async().await;

    server
        .mock_async(|when, then| {
            when.method(POST).path("/me/shipment/calculate");
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let service = QuoteService::new(client_for(&server), ShipmentSettings::default());
    let err = service.quote(&sample_request()).await.unwrap_err();

    assert!(matches!(err, RelayError::ProviderResponseMalformed(_)));
    Ok(())
}

#[tokio::test]
async fn test_invalid_destination_makes_no_provider_call() -> Result<()> {
    let server = MockServer::start_async().await;

    let api_mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/me/shipment/calculate");
            then.status(200).json_body(serde_json::json!([]));
        })
        .await;

    let service = QuoteService::new(client_for(&server), ShipmentSettings::default());
    let request = RawQuoteRequest {
        cep_destino: Some(String::new()),
        ..sample_request()
    };

    let err = service.quote(&request).await.unwrap_err();

    assert!(err.is_client_error());
    api_mock.assert_hits_async(0).await;
    Ok(())
}
