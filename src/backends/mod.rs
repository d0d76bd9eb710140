//! Upload backend system
//!
//! Backends are pluggable destinations capable of receiving one produced
//! artifact file. Each variant lives in its own module under `backends/` and
//! exports a [`BackendFactory`]; adding a variant means adding the module
//! and listing its factory in [`builtin_factories`] — dispatch code never
//! changes.
//!
//! ## Key Components
//!
//! - [`UploadBackend`] - capability trait every variant implements
//! - [`BackendFactory`] - identity, config schema, and construction
//! - [`BackendRegistry`] - startup-built name-to-factory catalog
//! - [`FileCopyBackend`] - reference variant copying into a local directory

mod file_copy;
mod http_put;
mod object_store;
mod registry;
mod traits;

use std::sync::Arc;

pub use file_copy::{FileCopyBackend, FileCopyFactory};
pub use http_put::{HttpPutBackend, HttpPutFactory};
pub use object_store::{ObjectStoreBackend, ObjectStoreFactory};
pub use registry::{BackendRegistry, DiscoveryError, RegistryError};
pub use traits::{BackendFactory, BackendSettings, ConfigField, UploadBackend, UploadError};

/// Every built-in backend variant, collected for registry discovery.
pub fn builtin_factories() -> Vec<Arc<dyn BackendFactory>> {
    vec![
        Arc::new(FileCopyFactory),
        Arc::new(HttpPutFactory),
        Arc::new(ObjectStoreFactory),
    ]
}
