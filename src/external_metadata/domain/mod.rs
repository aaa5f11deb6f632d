pub mod dep_url;
pub mod document;
pub mod install_command;
pub mod mapping_result;
pub mod purpose;
pub mod requirement;
pub mod version_constraint;

pub use dep_url::DepUrl;
pub use document::{ExternalMetadataDocument, NormalizedDocument, RequirementGroup};
pub use install_command::{shell_join, InstallCommand};
pub use mapping_result::{
    MappedGroup, MappedRequirement, MappingOutcome, MappingResult, ProviderSpec,
    TranslationWarning, UnmappedReason,
};
pub use purpose::{Purpose, SpecsKind};
pub use requirement::ExternalRequirement;
pub use version_constraint::{ConstraintClause, Operator, VersionConstraint};
