//! Type registry abstraction and the process-wide registry slot.
//!
//! A [`TypeRegistry`] is the database of declared types: their tags, aliases
//! and conformance graph. Every [`crate::TypeIdentifier`] comparison goes
//! through a registry, so the process keeps one installed registry that
//! equality, hashing and the convenience resolvers consult.

use crate::declared::DeclaredRegistry;
use crate::errors::{RegistryCause, RegistryError};
use std::path::Path;
use std::sync::{Arc, OnceLock};

/// Strategy selecting which registry lookup answers a tag query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Preference {
    /// Prefer types declared natively over imported or dynamic ones.
    #[default]
    Native,
    /// Take the registry's generic preferred identifier, which may be a
    /// synthesized dynamic type.
    Dynamic,
}

/// Database of declared types consumed by the resolution engine.
///
/// Identifier arguments are canonical (lowercase) strings. Implementations
/// must be total for conformance, equality and tag lookups; only
/// [`TypeRegistry::identify_resource`] may fail.
pub trait TypeRegistry: Send + Sync {
    /// Returns true if `identifier` conforms to `other`. Reflexive and
    /// transitive.
    fn conforms_to(&self, identifier: &str, other: &str) -> bool;

    /// Alias-aware equality of two identifiers.
    fn identifiers_equal(&self, a: &str, b: &str) -> bool;

    /// Canonical spelling of `identifier` when it is a declared alias.
    ///
    /// Hashing maps identifiers through this before hashing. A registry whose
    /// equality treats distinct spellings as equal must report them here,
    /// otherwise equal identifiers may hash differently.
    fn canonical_identifier(&self, _identifier: &str) -> Option<String> {
        None
    }

    /// Preferred identifier for a `(tag_class, tag_value)` pair, restricted to
    /// types conforming to `conforming_to` when given.
    ///
    /// Expected to always answer; `None` or an empty string is treated as a
    /// broken registry binding.
    fn preferred_identifier_for_tag(
        &self,
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&str>,
        preference: Preference,
    ) -> Option<String>;

    /// Identifies the resource at `path`.
    ///
    /// `Ok(None)` reports a failure without a cause, which callers surface as
    /// a contract violation.
    fn identify_resource(
        &self,
        path: &Path,
        preference: Preference,
    ) -> Result<Option<String>, RegistryCause>;

    /// Best filename extension for `identifier`, if any.
    fn preferred_extension_for_identifier(&self, identifier: &str) -> Option<String>;
}

static GLOBAL: OnceLock<Arc<dyn TypeRegistry>> = OnceLock::new();

/// Installs the process-wide registry.
///
/// Must run before the first identifier comparison; once the built-in
/// registry has been initialized lazily, installation fails.
pub fn install(registry: Arc<dyn TypeRegistry>) -> Result<(), RegistryError> {
    GLOBAL
        .set(registry)
        .map_err(|_| RegistryError::AlreadyInstalled)?;
    log::debug!("installed custom type registry");
    Ok(())
}

/// Returns the process-wide registry, initializing the built-in
/// [`DeclaredRegistry`] on first use.
pub fn global() -> &'static dyn TypeRegistry {
    GLOBAL
        .get_or_init(|| {
            log::debug!("initializing built-in type registry");
            Arc::new(DeclaredRegistry::builtin())
        })
        .as_ref()
}
