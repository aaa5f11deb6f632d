/// Console adapters for user-facing progress and warnings
mod progress_reporter;

pub use progress_reporter::StderrProgressReporter;
