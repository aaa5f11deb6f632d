use super::loader::is_url;
use crate::ports::outbound::RegistrySource;
use crate::shared::Result;
use async_trait::async_trait;

/// LocationRegistrySource: routes `http(s)://` locations to one source and
/// everything else (file paths) to another.
pub struct LocationRegistrySource<L: RegistrySource, R: RegistrySource> {
    local: L,
    remote: R,
}

impl<L: RegistrySource, R: RegistrySource> LocationRegistrySource<L, R> {
    pub fn new(local: L, remote: R) -> Self {
        Self { local, remote }
    }
}

#[async_trait]
impl<L: RegistrySource, R: RegistrySource> RegistrySource for LocationRegistrySource<L, R> {
    async fn fetch(&self, location: &str) -> Result<String> {
        if is_url(location) {
            self.remote.fetch(location).await
        } else {
            self.local.fetch(location).await
        }
    }
}
