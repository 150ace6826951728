// Domain layer: queue models and the client port. The AWS adapter lives under adapters/.

pub mod model;
pub mod ports;
