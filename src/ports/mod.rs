/// Ports module defining interfaces for hexagonal architecture
///
/// The resolution use case is the only driving entry point, so only the
/// outbound (driven) ports are modelled as traits.
pub mod outbound;
