/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the resolution core isolated.
mod output_format;
mod resolve_request;
mod resolve_response;

pub use output_format::OutputFormat;
pub use resolve_request::{ResolveRequest, TargetSelection};
pub use resolve_response::ResolveResponse;
