use std::path::PathBuf;

/// Every error the validator reported, carried as one failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("CSV validation failed:\n{}", .errors.join("\n"))]
pub struct CollectedValidationError {
    pub errors: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error(transparent)]
    Validation(#[from] CollectedValidationError),

    #[error("read csv: {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConvertError {
    /// The individual validation messages, if this is a validation failure.
    pub fn validation_errors(&self) -> Option<&[String]> {
        match self {
            Self::Validation(err) => Some(&err.errors),
            Self::Io { .. } => None,
        }
    }
}
