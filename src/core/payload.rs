use crate::config::ShipmentSettings;
use crate::domain::model::{PostalAddress, ProductLine, ProviderPayload, ShipmentQuoteRequest};

/// Maps a sanitized request onto the provider's nested calculate schema.
#[derive(Debug, Clone)]
pub struct PayloadBuilder {
    settings: ShipmentSettings,
}

impl PayloadBuilder {
    pub fn new(settings: ShipmentSettings) -> Self {
        Self { settings }
    }

    pub fn build(&self, request: &ShipmentQuoteRequest) -> ProviderPayload {
        let package = request.package();

        ProviderPayload {
            from: PostalAddress {
                postal_code: self.settings.origin_postal_code.clone(),
            },
            to: PostalAddress {
                postal_code: request.destination_postal_code().to_string(),
            },
            // The provider only accepts dimensions inside a product list; one parcel per quote.
            products: vec![ProductLine {
                name: self.settings.product_name.clone(),
                quantity: 1,
                weight: package.weight,
                height: package.height,
                width: package.width,
                length: package.length,
                insurance_value: self.settings.insurance_value,
            }],
            receipt: false,
            own_hand: false,
            platform: self.settings.platform.clone(),
        }
    }
}
