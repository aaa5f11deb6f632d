use crate::shared::Result;
use async_trait::async_trait;

/// RegistrySource port for fetching raw registry documents
///
/// This port abstracts where the registry, known-ecosystems and mapping
/// JSON documents come from: local files, HTTP, or an in-memory cache.
///
/// # Async Support
/// Fetching is async so that the loader can request several mapping
/// documents concurrently. Implementations must be `Send + Sync`.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    /// Fetches the document at `location` as text
    ///
    /// # Arguments
    /// * `location` - A file path or an `http(s)://` URL
    ///
    /// # Errors
    /// Returns an error if:
    /// - The location does not exist or cannot be read
    /// - The network request fails or returns an error status
    /// - The document exceeds the size limit
    async fn fetch(&self, location: &str) -> Result<String>;
}
