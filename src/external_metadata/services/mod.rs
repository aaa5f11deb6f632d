mod command_synthesizer;
mod document_parser;
mod mapper;
mod normalizer;
mod validator;

pub use command_synthesizer::CommandSynthesizer;
pub use document_parser::DocumentParser;
pub use mapper::Mapper;
pub use normalizer::Normalizer;
pub use validator::{ValidationWarning, Validator};
