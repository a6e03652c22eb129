//! Error types for registry parsing and header generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort generation.
///
/// Recoverable conditions (unresolved references, nameless elements,
/// duplicate emission) never surface here; they are logged where they are
/// detected and the affected item is left out of the output.
#[derive(Debug, Error)]
pub enum GenError {
    /// XML parsing error.
    #[error("XML error: {0}")]
    Xml(String),

    /// IO error while reading a registry or writing an output file.
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An explicit include list names a set the registry does not have.
    #[error("Unknown API set `{name}` requested by {output}")]
    UnknownApiSet { name: String, output: PathBuf },

    /// A reset entry names a registry no output uses.
    #[error("Unknown registry: {0}")]
    UnknownRegistry(PathBuf),

    /// A declaration kind reached a rendering step with no case for it.
    #[error("Internal consistency error: {0}")]
    InternalConsistency(String),

    /// Two outputs resolve to the same satellite file.
    #[error("Annex `{annex}` collides with an already generated file: {path}")]
    AnnexCollision { annex: String, path: PathBuf },

    /// A function pointer's stored text cannot be re-expressed.
    #[error("Malformed function pointer `{name}`: {text}")]
    MalformedFunctionPointer { name: String, text: String },
}

impl GenError {
    /// Create an XML error.
    pub fn xml(message: impl Into<String>) -> Self {
        Self::Xml(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an IO error bound to a path.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an internal consistency error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalConsistency(message.into())
    }
}
