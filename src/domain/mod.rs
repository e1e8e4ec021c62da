// Domain layer: entities and ports. No knowledge of concrete storage.

pub mod model;
pub mod ports;
