use std::path::PathBuf;
use thiserror::Error;

/// Underlying cause reported by a registry that could not identify a resource.
pub type RegistryCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned when resolving the type of a resource.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The registry could not determine a type and reported why.
    #[error("cannot determine type of {}: {source}", locator.display())]
    Resolution {
        /// Resource whose type was requested.
        locator: PathBuf,
        /// Cause reported by the registry.
        #[source]
        source: RegistryCause,
    },
    /// The registry broke its contract (no answer and no cause).
    #[error("type registry contract violated: {0}")]
    ContractViolation(String),
}

/// Errors raised by the process-wide registry slot.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A registry was installed (or the default was initialized) already.
    #[error("a type registry is already installed")]
    AlreadyInstalled,
}

/// Errors raised while building a [`crate::DeclaredRegistry`].
#[derive(Debug, Error)]
pub enum DeclarationError {
    /// A declaration file could not be read.
    #[error("failed to read declarations from {}: {source}", path.display())]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// I/O error from the filesystem.
        #[source]
        source: std::io::Error,
    },
    /// Declaration JSON was malformed.
    #[error("invalid declaration JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// An identifier, parent or alias is not a well-formed type identifier.
    #[error("{field} ('{value}') is not a valid type identifier")]
    InvalidIdentifier {
        /// Declaration field that failed validation.
        field: &'static str,
        /// Offending value.
        value: String,
    },
    /// The same identifier was declared twice.
    #[error("{identifier} is declared more than once")]
    Duplicate {
        /// Identifier declared twice.
        identifier: String,
    },
    /// An alias collides with a declared identifier or another alias.
    #[error("alias {alias} of {identifier} is already used by {existing}")]
    AliasClash {
        /// Colliding alias.
        alias: String,
        /// Declaration that carries the alias.
        identifier: String,
        /// Identifier that already owns the name.
        existing: String,
    },
    /// A declaration conforms to a type nobody declared.
    #[error("{identifier} conforms to undeclared type {parent}")]
    UnknownParent {
        /// Declaration with the dangling parent.
        identifier: String,
        /// Parent that is not declared.
        parent: String,
    },
}
