use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

use super::traits::BackendFactory;

/// Reserved name of the abstract capability itself; never a registrable variant.
const RESERVED_BASE_NAME: &str = "base";

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("duplicate backend name: {0}")]
    DuplicateName(String),
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("unknown backend: {0}")]
    UnknownBackend(String),
}

/// Registry mapping backend names to their factories.
///
/// Built once at startup from the built-in factory list and immutable
/// afterward; a rebuild replaces the whole mapping, never patches it.
#[derive(Clone)]
pub struct BackendRegistry {
    factories: BTreeMap<String, Arc<dyn BackendFactory>>,
}

impl BackendRegistry {
    /// Discover all built-in backend variants.
    pub fn discover() -> Result<Self, DiscoveryError> {
        Self::from_factories(super::builtin_factories())
    }

    /// Build a registry from an explicit factory list.
    ///
    /// Factories carrying the reserved base name or an underscore-prefixed
    /// name are skipped with a warning. A duplicate name across factories is
    /// a startup configuration error rather than a silent overwrite.
    pub fn from_factories(
        factories: impl IntoIterator<Item = Arc<dyn BackendFactory>>,
    ) -> Result<Self, DiscoveryError> {
        let mut map: BTreeMap<String, Arc<dyn BackendFactory>> = BTreeMap::new();

        for factory in factories {
            let name = factory.name();
            if name == RESERVED_BASE_NAME || name.starts_with('_') {
                warn!(name, "Skipping backend with reserved or private name");
                continue;
            }
            if map.contains_key(name) {
                return Err(DiscoveryError::DuplicateName(name.to_string()));
            }
            map.insert(name.to_string(), factory);
        }

        Ok(Self { factories: map })
    }

    /// Resolve a backend factory by its registered name.
    pub fn resolve(&self, name: &str) -> Result<Arc<dyn BackendFactory>, RegistryError> {
        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownBackend(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered backend names, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::traits::{
        BackendSettings, ConfigField, UploadBackend, UploadError,
    };
    use async_trait::async_trait;
    use std::path::Path;

    struct NullBackend;

    #[async_trait]
    impl UploadBackend for NullBackend {
        async fn upload(&self, _path: &Path) -> Result<bool, UploadError> {
            Ok(true)
        }
    }

    struct NamedFactory(&'static str);

    impl BackendFactory for NamedFactory {
        fn name(&self) -> &'static str {
            self.0
        }

        fn display_name(&self) -> &'static str {
            "Named"
        }

        fn config_schema(&self) -> Vec<ConfigField> {
            Vec::new()
        }

        fn build(
            &self,
            _settings: &BackendSettings,
        ) -> Result<Box<dyn UploadBackend>, UploadError> {
            Ok(Box::new(NullBackend))
        }
    }

    fn factory(name: &'static str) -> Arc<dyn BackendFactory> {
        Arc::new(NamedFactory(name))
    }

    #[test]
    fn test_discover_registers_builtins() {
        let registry = BackendRegistry::discover().unwrap();

        assert!(registry.contains("file_copy"));
        assert!(registry.contains("http_put"));
        assert!(registry.contains("object_store"));
    }

    #[test]
    fn test_reserved_and_private_names_filtered() {
        let registry = BackendRegistry::from_factories([
            factory("base"),
            factory("_hidden"),
            factory("file_drop"),
        ])
        .unwrap();

        assert_eq!(registry.len(), 1);
        assert!(registry.contains("file_drop"));
        assert!(!registry.contains("base"));
        assert!(!registry.contains("_hidden"));
    }

    #[test]
    fn test_duplicate_name_is_startup_error() {
        let result =
            BackendRegistry::from_factories([factory("file_drop"), factory("file_drop")]);

        assert!(matches!(result, Err(DiscoveryError::DuplicateName(name)) if name == "file_drop"));
    }

    #[test]
    fn test_resolve_unknown_backend() {
        let registry = BackendRegistry::from_factories([factory("file_drop")]).unwrap();

        let result = registry.resolve("nonexistent");
        assert!(matches!(
            result,
            Err(RegistryError::UnknownBackend(name)) if name == "nonexistent"
        ));
    }
}
