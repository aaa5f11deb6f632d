/// Formatter adapters for the resolution output formats
mod json_formatter;
mod table_formatter;
mod text_formatter;

pub use json_formatter::JsonFormatter;
pub use table_formatter::{MappedTableFormatter, NormalizedTableFormatter, RawTableFormatter};
pub use text_formatter::{CommandFormatter, MappedListFormatter};
