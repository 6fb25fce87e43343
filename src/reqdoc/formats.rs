//! Output formats for documents
//!
//! - canonical reqdoc text (serializer), the inverse of the parser
//! - a registry of named formatters, which adds JSON and YAML dumps of the model

pub mod registry;
pub mod serializer;

pub use registry::{FormatError, FormatRegistry, Formatter, JsonFormatter, ReqdocFormatter, YamlFormatter};
pub use serializer::{
    serialize_document, stringify_collection_root, stringify_environment, stringify_folder,
    stringify_request, try_serialize_document, validate_document,
};
