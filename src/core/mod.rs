pub mod normalizer;
pub mod payload;
pub mod quote;
pub mod sanitizer;

pub use crate::domain::model::{QuoteResult, RawQuoteRequest, ShipmentQuoteRequest};
pub use crate::domain::ports::RateProvider;
pub use crate::utils::error::Result;
