/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the resolution core uses
/// to interact with external systems (file system, network, console, host).
pub mod environment_detector;
pub mod formatter;
pub mod mapping_registry;
pub mod output_presenter;
pub mod progress_reporter;
pub mod pyproject_reader;
pub mod registry_source;

pub use environment_detector::{EnvironmentDetector, TargetEnvironment};
pub use formatter::ResolutionFormatter;
pub use mapping_registry::MappingRegistry;
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
pub use pyproject_reader::{PyprojectReader, PyprojectSource};
pub use registry_source::RegistrySource;
