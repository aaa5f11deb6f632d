/// Network adapters for fetching remote registry data
mod caching_registry_source;
mod http_registry_source;

pub use caching_registry_source::CachingRegistrySource;
pub use http_registry_source::HttpRegistrySource;
