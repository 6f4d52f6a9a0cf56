use crate::domain::model::{ProviderReply, ProviderServiceQuote, QuoteResult, PICKUP_KEY};
use crate::utils::error::{RelayError, Result};

/// Carrier services the storefront knows how to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Pac,
    Sedex,
}

impl ServiceKind {
    /// Substring match on the lowercased provider name; `pac` is checked first, so a name
    /// containing both ends up as `pac`.
    pub fn classify(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        if name.contains("pac") {
            Some(Self::Pac)
        } else if name.contains("sedex") {
            Some(Self::Sedex)
        } else {
            None
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Pac => "pac",
            Self::Sedex => "sedex",
        }
    }
}

/// Turns a raw provider reply into the canonical quote set.
///
/// A non-200 status is logged and degrades to pickup-only; a 200 whose body is not JSON
/// is an error.
pub fn normalize(reply: &ProviderReply) -> Result<QuoteResult> {
    let mut result = QuoteResult::new();

    if reply.status == 200 {
        let root: serde_json::Value = serde_json::from_str(&reply.body)?;

        match root {
            serde_json::Value::Array(entries) => {
                for entry in entries {
                    // Non-object elements carry neither error nor price.
                    let Ok(quote) = serde_json::from_value::<ProviderServiceQuote>(entry) else {
                        continue;
                    };
                    apply_entry(&mut result, &quote);
                }
            }
            other => {
                tracing::warn!("Provider answered 200 with a non-array body: {}", other);
            }
        }
    } else {
        let rejection = RelayError::ProviderRejected {
            status: reply.status,
            body: reply.body.clone(),
        };
        tracing::warn!("{}", rejection);
    }

    result.insert(PICKUP_KEY, 0.0);
    result.remove_negative_prices();

    Ok(result)
}

fn apply_entry(result: &mut QuoteResult, quote: &ProviderServiceQuote) {
    if quote.has_error() {
        tracing::debug!(name = ?quote.name, error = ?quote.error, "Skipping unavailable service");
        return;
    }

    if !quote.has_price() {
        return;
    }

    let Some(kind) = ServiceKind::classify(quote.name()) else {
        tracing::debug!("Ignoring unrecognized service '{}'", quote.name());
        return;
    };

    result.insert(kind.key(), quote.price_value());
}
