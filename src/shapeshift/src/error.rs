use std::fmt;

/// The result type used throughout the engine.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// An error that aborted a (de)serialization call or the construction
/// of a definition.
///
/// Every failure is call-aborting; no partial results are produced.
/// Use [`Error::kind`] to branch on the category.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Attribute misuse or an inconsistent definition.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// No processor in the chain accepted the value.
    #[error("no processor accepts `{type_name}` at {path}")]
    Unsupported {
        type_name: &'static str,
        path: String,
    },

    /// An abstract type was never refined to a concrete one.
    #[error("cannot resolve a concrete type for `{type_name}` at {path}")]
    TypeResolution {
        type_name: &'static str,
        path: String,
    },

    /// A required member was absent from the source data.
    #[error("required member `{member}` is missing at {path}")]
    RequiredMissing { member: &'static str, path: String },

    /// A required, non-null member was present but null.
    #[error("required member `{member}` is null at {path}")]
    RequiredNull { member: &'static str, path: String },

    /// The source data does not fit the target type.
    #[error("invalid data at {path}: {message}")]
    InvalidData { message: String, path: String },

    /// A lifecycle hook reported a failure.
    #[error("{hook} hook of `{type_name}` failed at {path}")]
    Callback {
        hook: &'static str,
        type_name: &'static str,
        path: String,
        #[source]
        source: anyhow::Error,
    },

    /// Nesting exceeded the definition's depth limit.
    #[error("recursion limit of {limit} exceeded at {path}")]
    RecursionLimit { limit: usize, path: String },
}

/// The category of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Unsupported,
    TypeResolution,
    RequiredValue,
    InvalidData,
    Callback,
    RecursionLimit,
}

impl Error {
    /// Creates a new configuration error from a message.
    pub fn configuration<T: fmt::Display>(msg: T) -> Self {
        Self::Configuration(msg.to_string())
    }

    /// Creates a new invalid data error at a given path.
    pub fn invalid_data<T: fmt::Display>(msg: T, path: String) -> Self {
        Self::InvalidData {
            message: msg.to_string(),
            path,
        }
    }

    /// Gets the [`ErrorKind`] of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration(_) => ErrorKind::Configuration,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::TypeResolution { .. } => ErrorKind::TypeResolution,
            Self::RequiredMissing { .. } | Self::RequiredNull { .. } => ErrorKind::RequiredValue,
            Self::InvalidData { .. } => ErrorKind::InvalidData,
            Self::Callback { .. } => ErrorKind::Callback,
            Self::RecursionLimit { .. } => ErrorKind::RecursionLimit,
        }
    }
}
