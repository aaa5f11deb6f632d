/// Mock implementations for testing
mod mock_environment_detector;
mod mock_progress_reporter;
mod mock_pyproject_reader;
mod mock_registry_source;

pub use mock_environment_detector::MockEnvironmentDetector;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_pyproject_reader::MockPyprojectReader;
pub use mock_registry_source::MockRegistrySource;
