use crate::external_metadata::domain::SpecsKind;
use std::collections::BTreeSet;

/// MappingRegistry port: read-only view over the external mapping dataset
///
/// This port abstracts the loaded registry: the alias table from raw
/// identifiers to canonical ones, and the per-(ecosystem, package manager)
/// tables from canonical identifiers to provider package names.
///
/// Implementations are immutable once built and must be `Send + Sync`, so a
/// single registry can serve concurrent resolutions without locking.
pub trait MappingRegistry: Send + Sync {
    /// Resolves an identifier to its canonical form
    ///
    /// # Arguments
    /// * `identifier` - A `dep:` lookup key (type, namespace and name)
    ///
    /// # Returns
    /// The canonical identifier, which is `identifier` itself when it is
    /// already canonical, or None when the registry does not know it
    fn lookup_alias(&self, identifier: &str) -> Option<String>;

    /// Provider package names for one canonical identifier and target
    ///
    /// Returns the union of build, host and run names, deduplicated in that
    /// order. An empty list means the identifier has no mapping for the target.
    fn lookup_package(&self, canonical: &str, ecosystem: &str, package_manager: &str) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for kind in SpecsKind::ALL {
            for name in self.lookup_package_for(canonical, ecosystem, package_manager, kind) {
                if !names.contains(&name) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Provider package names for one use (build, host or run)
    fn lookup_package_for(
        &self,
        canonical: &str,
        ecosystem: &str,
        package_manager: &str,
        kind: SpecsKind,
    ) -> Vec<String>;

    /// Names of every ecosystem with a loaded mapping
    fn known_ecosystems(&self) -> BTreeSet<String>;

    /// Package managers of an ecosystem, in the order the mapping declares them
    fn known_package_managers(&self, ecosystem: &str) -> Vec<String>;

    /// Whether the identifier is defined in the registry or appears in a mapping
    fn is_known(&self, identifier: &str) -> bool;

    /// Identifiers a definition declares it provides (its alias targets)
    fn provides(&self, identifier: &str) -> Vec<String>;

    /// The first ecosystem that declares this package manager
    fn ecosystem_for_package_manager(&self, package_manager: &str) -> Option<String>;
}
