/// Host inspection adapters
mod environment_detector;

pub use environment_detector::{HostInfo, SystemEnvironmentDetector};
