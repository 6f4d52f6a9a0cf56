pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::ServerArgs;

pub use adapters::{http::router, melhor_envio::MelhorEnvioClient};
pub use config::{RelayConfig, ShipmentSettings};
pub use core::quote::QuoteService;
pub use domain::model::{QuoteResult, RawQuoteRequest};
pub use utils::error::{RelayError, Result};
