// Domain layer: passenger model, request schema and ports.
// Concrete implementations live under `adapters` and `core`.

pub mod model;
pub mod ports;
pub mod request;
