//! Canonical file type identifiers and their conformance hierarchy.
//!
//! A [`TypeIdentifier`] names what kind of content a file or byte stream
//! holds, independent of its filename. Identifiers are lowercase, compare
//! through a [`TypeRegistry`] (so declared aliases are equal), and form a
//! reflexive, transitive conformance order: `public.png` conforms to
//! `public.image`, which conforms to `public.data`.
//!
//! ```rust
//! use utikit::{Preference, TypeIdentifier};
//!
//! let zip = TypeIdentifier::for_path_extension("zip", Some(false), Preference::Native);
//! assert!(zip.conforms_to(&TypeIdentifier::ZIP));
//! assert!(zip.conforms_to(&TypeIdentifier::DATA));
//! assert_eq!(zip.preferred_path_extension().as_deref(), Some("zip"));
//! ```
//!
//! The process-wide registry defaults to [`DeclaredRegistry::builtin`]; hosts
//! with their own declarations build a [`DeclaredRegistry`] and pass it to
//! [`registry::install`] before the first comparison.
#![deny(missing_docs)]

/// Declarative in-memory registry and its declaration schema.
pub mod declared;
/// Dynamic identifiers for unclaimed tags.
pub mod dynamic;
/// Error types for resolution and registry construction.
pub mod errors;
/// The type identifier value and its well-known constants.
pub mod identifier;
/// Registry abstraction and the process-wide registry.
pub mod registry;
/// Resolution procedures and conformance helpers.
pub mod resolve;
/// Content sniffing by magic number.
pub mod sniff;
/// Tag class constants.
pub mod tags;

pub use declared::{Declaration, DeclaredRegistry, DeclaredRegistryBuilder};
pub use errors::{DeclarationError, RegistryCause, RegistryError, ResolveError};
pub use identifier::TypeIdentifier;
pub use registry::{Preference, TypeRegistry};
pub use resolve::{
    conforms, conforms_to_any_of, file_type_preferring_native, Resolver, ResolverOptions,
};
