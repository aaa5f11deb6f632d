//! The resolution core: identifier model, normalization, mapping and
//! command synthesis. Nothing in here performs I/O; the registry comes in
//! through the `MappingRegistry` port.
pub mod domain;
pub mod policies;
pub mod services;
