use crate::domain::model::{PackageDimensions, RawQuoteRequest, ShipmentQuoteRequest};
use crate::utils::error::{RelayError, Result};
use crate::utils::validation::POSTAL_CODE_LEN;

/// Normalizes an inbound request: digits-only destination CEP of exactly eight digits, and
/// the default package whenever any measurement is not positive.
pub fn sanitize(raw: &RawQuoteRequest) -> Result<ShipmentQuoteRequest> {
    let destination = raw
        .cep_destino
        .as_deref()
        .map(digits_only)
        .unwrap_or_default();

    if destination.len() != POSTAL_CODE_LEN {
        return Err(RelayError::invalid_request(
            "Destination postal code (cepDestino) is missing or invalid",
        ));
    }

    let requested = PackageDimensions {
        weight: raw.peso_total,
        length: raw.comprimento,
        width: raw.largura,
        height: raw.altura,
    };

    // All-or-nothing: one bad measurement discards the whole set.
    let package = if requested.all_positive() {
        requested
    } else {
        tracing::debug!(?requested, "Package measurements incomplete, using defaults");
        PackageDimensions::DEFAULT
    };

    Ok(ShipmentQuoteRequest {
        destination_postal_code: destination,
        package,
    })
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}
