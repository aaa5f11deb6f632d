use crate::application::dto::ResolveResponse;
use crate::shared::Result;

/// ResolutionFormatter port for rendering a resolution
///
/// This port abstracts the rendering of a resolution in the different
/// output formats (TOML tables, package lists, commands, JSON).
pub trait ResolutionFormatter {
    /// Formats the parts of the resolution this format shows
    ///
    /// # Errors
    /// Returns an error if the resolution lacks what the format needs (for
    /// example a mapping for `mapped`), or if serialization fails
    fn format(&self, response: &ResolveResponse) -> Result<String>;
}
