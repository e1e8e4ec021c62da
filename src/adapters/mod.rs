// Adapters layer: concrete implementations against the store port.

pub mod batch;
pub mod memory;
pub mod repository;
