// Domain layer: value types and provider ports. Adapters live under src/adapters.

pub mod model;
pub mod ports;
