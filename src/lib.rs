//! pyproject-external - resolve PEP 725 `[external]` metadata
//!
//! This library reads the `[external]` table of a Python project, normalizes
//! its `dep:` identifiers against the external-metadata mapping registry,
//! maps them onto the packages of one ecosystem and package manager, and
//! renders the install command. It follows hexagonal architecture and
//! Domain-Driven Design principles.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`external_metadata`): identifiers, documents, mapping
//!   results and the pure services that transform them
//! - **Application Layer** (`application`): the resolution use case, DTOs and factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use pyproject_external::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn run() -> Result<()> {
//! // Create adapters
//! let registry_source = LocationRegistrySource::new(
//!     FileSystemReader::new(),
//!     CachingRegistrySource::new(HttpRegistrySource::new()?),
//! );
//!
//! // Create use case
//! let use_case = ResolveExternalUseCase::new(
//!     FileSystemReader::new(),
//!     registry_source,
//!     SystemEnvironmentDetector::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! // Execute
//! let request = ResolveRequest::new(PathBuf::from("."), OutputFormat::Command)
//!     .with_target(TargetSelection::new(Some("ubuntu".to_string()), None));
//! let response = use_case.execute(request).await?;
//!
//! // Format output
//! let output = CommandFormatter::new().format(&response)?;
//! println!("{}", output);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod external_metadata;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemReader, FileSystemWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{
        CommandFormatter, JsonFormatter, MappedListFormatter, MappedTableFormatter,
        NormalizedTableFormatter, RawTableFormatter,
    };
    pub use crate::adapters::outbound::network::{CachingRegistrySource, HttpRegistrySource};
    pub use crate::adapters::outbound::registry::{
        InMemoryRegistry, LocationRegistrySource, RegistryLoader, RegistryLocations,
    };
    pub use crate::adapters::outbound::system::SystemEnvironmentDetector;
    pub use crate::application::dto::{
        OutputFormat, ResolveRequest, ResolveResponse, TargetSelection,
    };
    pub use crate::application::use_cases::ResolveExternalUseCase;
    pub use crate::external_metadata::domain::{
        DepUrl, ExternalMetadataDocument, ExternalRequirement, InstallCommand, MappingResult,
        NormalizedDocument, Purpose,
    };
    pub use crate::external_metadata::services::{
        CommandSynthesizer, DocumentParser, Mapper, Normalizer, ValidationWarning, Validator,
    };
    pub use crate::ports::outbound::{
        EnvironmentDetector, MappingRegistry, OutputPresenter, ProgressReporter, PyprojectReader,
        RegistrySource, ResolutionFormatter, TargetEnvironment,
    };
    pub use crate::shared::Result;
}
