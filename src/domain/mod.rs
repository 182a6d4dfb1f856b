// Domain layer: request/result models and the generation backend port.

pub mod model;
pub mod ports;
