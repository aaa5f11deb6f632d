use crate::adapters::outbound::formatters::{
    CommandFormatter, JsonFormatter, MappedListFormatter, MappedTableFormatter,
    NormalizedTableFormatter, RawTableFormatter,
};
use crate::application::dto::OutputFormat;
use crate::ports::outbound::ResolutionFormatter;

/// Factory for creating resolution formatters
///
/// Picks the formatter adapter for an `OutputFormat`, so the use case and
/// `main` never name a concrete formatter.
pub struct FormatterFactory;

impl FormatterFactory {
    /// Creates a formatter instance for the specified output format
    ///
    /// # Examples
    /// ```
    /// use pyproject_external::application::dto::OutputFormat;
    /// use pyproject_external::application::factories::FormatterFactory;
    ///
    /// let formatter = FormatterFactory::create(OutputFormat::Command);
    /// ```
    pub fn create(format: OutputFormat) -> Box<dyn ResolutionFormatter> {
        match format {
            OutputFormat::Raw => Box::new(RawTableFormatter::new()),
            OutputFormat::Normalized => Box::new(NormalizedTableFormatter::new()),
            OutputFormat::Mapped => Box::new(MappedTableFormatter::new()),
            OutputFormat::MappedList => Box::new(MappedListFormatter::new()),
            OutputFormat::Command => Box::new(CommandFormatter::new()),
            OutputFormat::Json => Box::new(JsonFormatter::new()),
        }
    }

    /// Returns the progress message for the specified output format
    ///
    /// # Examples
    /// ```
    /// use pyproject_external::application::dto::OutputFormat;
    /// use pyproject_external::application::factories::FormatterFactory;
    ///
    /// let message = FormatterFactory::progress_message(OutputFormat::Json);
    /// assert_eq!(message, "📝 Generating JSON output...");
    /// ```
    pub fn progress_message(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Raw => "📝 Printing [external] table...",
            OutputFormat::Normalized => "📝 Printing normalized [external] table...",
            OutputFormat::Mapped => "📝 Printing mapped [external] table...",
            OutputFormat::MappedList => "📝 Printing mapped package list...",
            OutputFormat::Command => "📝 Printing install command...",
            OutputFormat::Json => "📝 Generating JSON output...",
        }
    }
}
