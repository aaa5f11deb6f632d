/// ProgressReporter port for reporting progress during a resolution
///
/// This port abstracts user-facing feedback (e.g., to stderr): progress
/// while the registry loads, and the warnings a resolution produces.
pub trait ProgressReporter {
    /// Reports a progress message
    ///
    /// # Arguments
    /// * `message` - The progress message to report
    fn report(&self, message: &str);

    /// Reports progress with a count
    ///
    /// # Arguments
    /// * `current` - Current progress value
    /// * `total` - Total expected value
    /// * `message` - Optional message to include
    fn report_progress(&self, current: usize, total: usize, message: Option<&str>);

    /// Reports a non-fatal problem (unmapped requirement, dropped constraint, ...)
    fn report_warning(&self, message: &str);

    /// Reports an error message
    fn report_error(&self, message: &str);

    /// Reports completion of an operation
    fn report_completion(&self, message: &str);
}
