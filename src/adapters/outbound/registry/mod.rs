mod dataset;
mod in_memory_registry;
mod loader;
mod location_source;

pub use dataset::{
    parse_document, EcosystemsDocument, MappingDocument, RegistryDataset, RegistryDocument,
    SUPPORTED_SCHEMA_VERSIONS,
};
pub use in_memory_registry::InMemoryRegistry;
pub use loader::{is_url, resolve_location, RegistryLoader, RegistryLocations};
pub use location_source::LocationRegistrySource;
