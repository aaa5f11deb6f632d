mod command_templates;
mod constraint_translation;

pub use command_templates::{CommandTemplate, CommandTemplates, PACKAGE_SLOT};
pub use constraint_translation::{ConstraintTranslation, RangeSyntax, SpecifierSyntax};
