mod resolve_external;

pub use resolve_external::ResolveExternalUseCase;
