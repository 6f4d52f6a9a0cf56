use crate::core::quote::QuoteService;
use crate::domain::model::{QuoteResult, RawQuoteRequest};
use crate::domain::ports::RateProvider;
use crate::utils::error::RelayError;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header::CONTENT_TYPE, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub const QUOTE_ROUTE: &str = "/api/frete/calcular";

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorInfo,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorInfo {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    NotFound { code: String, message: String },
    InternalServerError { code: String, message: String },
}

impl ApiError {
    pub fn bad_request(code: &str, message: &str) -> Self {
        Self::BadRequest {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn not_found(code: &str, message: &str) -> Self {
        Self::NotFound {
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    pub fn internal_server_error(message: &str) -> Self {
        Self::InternalServerError {
            code: "INTERNAL_ERROR".to_string(),
            message: message.to_string(),
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::InternalServerError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_response_data(&self) -> ApiErrorResponse {
        let (code, message) = match self {
            Self::BadRequest { code, message }
            | Self::NotFound { code, message }
            | Self::InternalServerError { code, message } => (code, message),
        };

        ApiErrorResponse {
            error: ApiErrorInfo {
                code: code.clone(),
                message: message.clone(),
                details: None,
            },
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest { message, .. }
            | Self::NotFound { message, .. }
            | Self::InternalServerError { message, .. } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let response_data = self.to_response_data();
        (status, Json(response_data)).into_response()
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        if err.is_client_error() {
            return Self::bad_request("INVALID_POSTAL_CODE", &err.user_friendly_message());
        }

        // Provider details stay in the logs.
        tracing::error!("Shipping quote failed: {}", err);
        Self::internal_server_error("Internal error while calculating shipping")
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!("Rejected quote request body: {}", rejection.body_text());
        Self::bad_request("INVALID_REQUEST_BODY", "Request body must be a JSON quote request")
    }
}

pub async fn calculate_quote<P: RateProvider + 'static>(
    State(service): State<Arc<QuoteService<P>>>,
    payload: Result<Json<RawQuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResult>, ApiError> {
    let Json(request) = payload?;
    let result = service.quote(&request).await?;
    quote_response(result)
}

/// An empty map is a 404. The normalizer always adds pickup, so only other providers hit it.
fn quote_response(result: QuoteResult) -> Result<Json<QuoteResult>, ApiError> {
    if result.is_empty() {
        return Err(ApiError::not_found("NO_SHIPPING_OPTIONS", "No shipping options available"));
    }

    Ok(Json(result))
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
}

pub fn router<P: RateProvider + 'static>(
    service: Arc<QuoteService<P>>,
    allowed_origins: &[String],
) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route(QUOTE_ROUTE, post(calculate_quote::<P>))
        .with_state(service)
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
}
