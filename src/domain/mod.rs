// Domain layer: quote models and the outbound provider port.

pub mod model;
pub mod ports;
