// Domain layer: models, constants and ports. No HTTP or config types here.

pub mod constants;
pub mod model;
pub mod ports;
