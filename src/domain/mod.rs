// Domain layer: value types and ports (interfaces) for the injected collaborators.

pub mod model;
pub mod ports;
