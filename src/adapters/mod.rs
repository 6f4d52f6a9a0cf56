// Adapters layer: concrete implementations for external systems (provider API, inbound HTTP).

pub mod http;
pub mod melhor_envio;
