#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod convert;
pub mod error;
pub mod formats;
pub mod logging;
pub mod table;
pub mod validate;

pub use convert::{
    ConvertOptions, NameToIdMapper, TopicIdentity, color_by_index, convert, convert_bytes,
    convert_file, convert_with, generate_id,
};
pub use error::{CollectedValidationError, ConvertError};
pub use formats::{Phase, Section, Template, Topic, TopicStatus};
pub use validate::{Statistics, ValidationResult, validate, validate_bytes};
