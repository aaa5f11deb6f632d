use crate::ports::outbound::RegistrySource;
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// CachingRegistrySource wraps a RegistrySource and keeps every fetched
/// document in memory, keyed by location.
///
/// Only successful fetches are cached; a failed location is fetched again
/// on the next request. The cache is thread-safe and suitable for the
/// concurrent fetches of the registry loader.
pub struct CachingRegistrySource<S: RegistrySource> {
    inner: S,
    cache: Arc<DashMap<String, String>>,
}

impl<S: RegistrySource> CachingRegistrySource<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            cache: Arc::new(DashMap::new()),
        }
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[async_trait]
impl<S: RegistrySource> RegistrySource for CachingRegistrySource<S> {
    async fn fetch(&self, location: &str) -> Result<String> {
        if let Some(cached) = self.cache.get(location) {
            tracing::debug!(location, "registry document served from cache");
            return Ok(cached.clone());
        }

        let text = self.inner.fetch(location).await?;
        self.cache.insert(location.to_string(), text.clone());
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RegistrySource for CountingSource {
        async fn fetch(&self, location: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if location.ends_with("missing.json") {
                anyhow::bail!("not found");
            }
            Ok(format!("{{\"location\": \"{}\"}}", location))
        }
    }

    fn caching() -> CachingRegistrySource<CountingSource> {
        CachingRegistrySource::new(CountingSource {
            calls: AtomicUsize::new(0),
        })
    }

    #[tokio::test]
    async fn test_second_fetch_is_cached() {
        let source = caching();
        let first = source.fetch("registry.json").await.unwrap();
        let second = source.fetch("registry.json").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 1);
        assert_eq!(source.cache_size(), 1);
    }

    #[tokio::test]
    async fn test_locations_are_cached_separately() {
        let source = caching();
        source.fetch("a.json").await.unwrap();
        source.fetch("b.json").await.unwrap();
        assert_eq!(source.cache_size(), 2);
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let source = caching();
        assert!(source.fetch("missing.json").await.is_err());
        assert!(source.fetch("missing.json").await.is_err());

        assert_eq!(source.inner.calls.load(Ordering::SeqCst), 2);
        assert_eq!(source.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_fetches() {
        let source = Arc::new(caching());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let source = Arc::clone(&source);
                tokio::spawn(async move { source.fetch("registry.json").await })
            })
            .collect();
        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(source.cache_size(), 1);
    }
}
