//! Resolution procedures and conformance queries.
//!
//! A [`Resolver`] pairs a [`TypeRegistry`] with [`ResolverOptions`] and turns
//! paths, filename extensions and tags into [`TypeIdentifier`] values. The
//! free functions at the bottom of this module serve callers that hold raw
//! identifier strings.

use crate::errors::ResolveError;
use crate::identifier::TypeIdentifier;
use crate::registry::{self, Preference, TypeRegistry};
use crate::tags;
use std::borrow::Borrow;
use std::path::Path;

/// Tunables for a [`Resolver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Extension that, on a directory, means "plain folder" and resolves to
    /// [`TypeIdentifier::FOLDER`] without a registry lookup.
    pub directory_path_extension: String,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            directory_path_extension: tags::DIRECTORY_PATH_EXTENSION.to_string(),
        }
    }
}

/// Resolves and compares type identifiers against one registry.
#[derive(Clone)]
pub struct Resolver<'r> {
    registry: &'r dyn TypeRegistry,
    options: ResolverOptions,
}

impl Resolver<'static> {
    /// Resolver over the process-wide registry with default options.
    pub fn global() -> Self {
        Self::new(registry::global())
    }
}

impl<'r> Resolver<'r> {
    /// Creates a resolver over `registry` with default options.
    pub fn new(registry: &'r dyn TypeRegistry) -> Self {
        Self {
            registry,
            options: ResolverOptions::default(),
        }
    }

    /// Replaces the resolver options.
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Registry backing this resolver.
    pub fn registry(&self) -> &'r dyn TypeRegistry {
        self.registry
    }

    /// Options in effect.
    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// Identifies the resource at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Resolution`] when the registry reports a cause,
    /// and [`ResolveError::ContractViolation`] when it fails without one.
    pub fn for_path(
        &self,
        path: &Path,
        preference: Preference,
    ) -> Result<TypeIdentifier, ResolveError> {
        match self.registry.identify_resource(path, preference) {
            Ok(Some(raw)) if !raw.is_empty() => {
                let identifier = TypeIdentifier::new(raw);
                log::debug!("identified {} as {}", path.display(), identifier);
                Ok(identifier)
            }
            Ok(_) => {
                let message = format!(
                    "registry failed to identify {} without reporting a cause",
                    path.display()
                );
                log::error!("{message}");
                Err(ResolveError::ContractViolation(message))
            }
            Err(source) => Err(ResolveError::Resolution {
                locator: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Resolves a filename extension.
    ///
    /// With unknown directory-ness the extension alone is looked up. A
    /// directory carrying the configured folder extension is a
    /// [`TypeIdentifier::FOLDER`]. Otherwise the lookup is narrowed to
    /// directory or data types.
    pub fn for_path_extension(
        &self,
        path_extension: &str,
        is_directory: Option<bool>,
        preference: Preference,
    ) -> TypeIdentifier {
        let Some(is_directory) = is_directory else {
            return self.for_tag(tags::FILENAME_EXTENSION, path_extension, None, preference);
        };

        if is_directory && path_extension == self.options.directory_path_extension {
            return TypeIdentifier::FOLDER;
        }

        let conforming_to = if is_directory {
            TypeIdentifier::DIRECTORY
        } else {
            TypeIdentifier::DATA
        };
        self.for_tag(
            tags::FILENAME_EXTENSION,
            path_extension,
            Some(&conforming_to),
            preference,
        )
    }

    /// Resolves a `(tag_class, tag_value)` pair, optionally narrowed to types
    /// conforming to `conforming_to`.
    ///
    /// # Panics
    ///
    /// In debug builds, panics if the registry returns no identifier. Release
    /// builds log the violation and fall back to `conforming_to` or
    /// [`TypeIdentifier::DATA`].
    pub fn for_tag(
        &self,
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&TypeIdentifier>,
        preference: Preference,
    ) -> TypeIdentifier {
        let raw = self.registry.preferred_identifier_for_tag(
            tag_class,
            tag_value,
            conforming_to.map(TypeIdentifier::as_str),
            preference,
        );
        match raw {
            Some(raw) if !raw.is_empty() => TypeIdentifier::new(raw),
            _ => {
                let message = format!(
                    "registry returned no identifier for tag {tag_class}={tag_value:?}"
                );
                log::error!("{message}");
                if cfg!(debug_assertions) {
                    panic!("type registry contract violated: {message}");
                }
                conforming_to.cloned().unwrap_or(TypeIdentifier::DATA)
            }
        }
    }

    /// Returns true if `identifier` conforms to, or is equal to, `other`.
    pub fn conforms_to(&self, identifier: &TypeIdentifier, other: &TypeIdentifier) -> bool {
        self.registry.conforms_to(identifier.as_str(), other.as_str())
    }

    /// Returns true if `identifier` conforms to at least one of `others`.
    /// Stops at the first match; an empty sequence yields false.
    pub fn conforms_to_any<I>(&self, identifier: &TypeIdentifier, others: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<TypeIdentifier>,
    {
        others
            .into_iter()
            .any(|other| self.conforms_to(identifier, other.borrow()))
    }

    /// Alias-aware equality.
    pub fn identifiers_equal(&self, a: &TypeIdentifier, b: &TypeIdentifier) -> bool {
        // Lowercased at construction; hashing relies on it.
        debug_assert_eq!(a.as_str(), a.as_str().to_lowercase());
        debug_assert_eq!(b.as_str(), b.as_str().to_lowercase());
        self.registry.identifiers_equal(a.as_str(), b.as_str())
    }

    /// Best filename extension for `identifier`.
    pub fn preferred_path_extension(&self, identifier: &TypeIdentifier) -> Option<String> {
        self.registry
            .preferred_extension_for_identifier(identifier.as_str())
    }

    /// Raw-string conformance; `None` conforms to nothing.
    pub fn raw_conforms(&self, file_type: Option<&str>, to: &str) -> bool {
        let Some(file_type) = file_type else {
            return false;
        };
        self.registry.conforms_to(file_type, to)
    }

    /// Raw-string conformance against several candidates.
    ///
    /// A literal match among the candidates answers without a registry call;
    /// otherwise candidates are checked in order.
    pub fn raw_conforms_to_any_of<S: AsRef<str>>(
        &self,
        file_type: Option<&str>,
        candidates: &[S],
    ) -> bool {
        let Some(file_type) = file_type else {
            return false;
        };
        if candidates.iter().any(|c| c.as_ref() == file_type) {
            return true;
        }
        candidates
            .iter()
            .any(|c| self.raw_conforms(Some(file_type), c.as_ref()))
    }
}

/// Returns true if the raw identifier `file_type` conforms to `to`, using the
/// process-wide registry. `None` conforms to nothing.
pub fn conforms(file_type: Option<&str>, to: &str) -> bool {
    Resolver::global().raw_conforms(file_type, to)
}

/// Returns true if the raw identifier `file_type` conforms to any of
/// `candidates`, using the process-wide registry.
pub fn conforms_to_any_of<S: AsRef<str>>(file_type: Option<&str>, candidates: &[S]) -> bool {
    Resolver::global().raw_conforms_to_any_of(file_type, candidates)
}

/// Raw identifier for a filename extension of unknown directory-ness,
/// preferring native types.
pub fn file_type_preferring_native(path_extension: &str) -> String {
    TypeIdentifier::for_path_extension(path_extension, None, Preference::Native)
        .as_str()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::RegistryCause;
    use std::cell::Cell;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Registry that answers everything with string equality and counts calls.
    #[derive(Default)]
    struct CountingRegistry {
        calls: AtomicUsize,
        tag_answer: Option<String>,
    }

    impl CountingRegistry {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn bump(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl TypeRegistry for CountingRegistry {
        fn conforms_to(&self, identifier: &str, other: &str) -> bool {
            self.bump();
            identifier == other || other == "public.data"
        }

        fn identifiers_equal(&self, a: &str, b: &str) -> bool {
            self.bump();
            a == b
        }

        fn preferred_identifier_for_tag(
            &self,
            _tag_class: &str,
            _tag_value: &str,
            _conforming_to: Option<&str>,
            _preference: Preference,
        ) -> Option<String> {
            self.bump();
            self.tag_answer.clone()
        }

        fn identify_resource(
            &self,
            _path: &Path,
            _preference: Preference,
        ) -> Result<Option<String>, RegistryCause> {
            self.bump();
            Ok(None)
        }

        fn preferred_extension_for_identifier(&self, _identifier: &str) -> Option<String> {
            self.bump();
            None
        }
    }

    #[test]
    fn directory_sentinel_skips_registry() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        let folder = resolver.for_path_extension("", Some(true), Preference::Native);
        assert_eq!(folder.as_str(), TypeIdentifier::FOLDER.as_str());
        assert_eq!(registry.calls(), 0);
    }

    #[test]
    fn custom_directory_sentinel() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry).with_options(ResolverOptions {
            directory_path_extension: "folder".into(),
        });
        let folder = resolver.for_path_extension("folder", Some(true), Preference::Native);
        assert_eq!(folder.as_str(), "public.folder");
        assert_eq!(registry.calls(), 0);
    }

    #[test]
    fn literal_match_skips_registry() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        assert!(resolver
            .raw_conforms_to_any_of(Some("public.data"), &["public.data", "public.text"]));
        assert_eq!(registry.calls(), 0);
    }

    #[test]
    fn missing_file_type_conforms_to_nothing() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        assert!(!resolver.raw_conforms(None, "public.data"));
        assert!(!resolver.raw_conforms_to_any_of(None, &["public.data"]));
        assert_eq!(registry.calls(), 0);
    }

    #[test]
    fn any_of_falls_through_to_registry_in_order() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        assert!(resolver.raw_conforms_to_any_of(Some("public.png"), &["public.text", "public.data"]));
        assert_eq!(registry.calls(), 2);
    }

    #[test]
    fn conforms_to_any_short_circuits() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        let png = TypeIdentifier::new("public.png");
        let consumed = Cell::new(0);
        let candidates = [TypeIdentifier::DATA, TypeIdentifier::ZIP, TypeIdentifier::FOLDER];
        let hit = resolver.conforms_to_any(
            &png,
            candidates.iter().inspect(|_| consumed.set(consumed.get() + 1)),
        );
        assert!(hit);
        assert_eq!(consumed.get(), 1);
        assert!(!resolver.conforms_to_any(&png, Vec::<TypeIdentifier>::new()));
    }

    #[test]
    fn path_failure_without_cause_is_contract_violation() {
        let registry = CountingRegistry::default();
        let resolver = Resolver::new(&registry);
        let err = resolver
            .for_path(Path::new("/nowhere/file.bin"), Preference::Native)
            .unwrap_err();
        assert!(matches!(err, ResolveError::ContractViolation(_)));
    }

    #[test]
    fn tag_answer_is_lowercased() {
        let registry = CountingRegistry {
            tag_answer: Some("Com.Example.Thing".into()),
            ..Default::default()
        };
        let resolver = Resolver::new(&registry);
        let id = resolver.for_tag(tags::FILENAME_EXTENSION, "thing", None, Preference::Dynamic);
        assert_eq!(id.as_str(), "com.example.thing");
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "contract violated")]
    fn empty_tag_answer_panics_in_debug() {
        let registry = CountingRegistry {
            tag_answer: Some(String::new()),
            ..Default::default()
        };
        Resolver::new(&registry).for_tag(tags::FILENAME_EXTENSION, "x", None, Preference::Native);
    }

    #[cfg(not(debug_assertions))]
    #[test]
    fn empty_tag_answer_falls_back_in_release() {
        let silent = CountingRegistry::default();
        let resolver = Resolver::new(&silent);
        let directory = resolver.for_tag(
            tags::FILENAME_EXTENSION,
            "x",
            Some(&TypeIdentifier::DIRECTORY),
            Preference::Native,
        );
        assert_eq!(directory.as_str(), "public.directory");
        let data = resolver.for_tag(tags::FILENAME_EXTENSION, "x", None, Preference::Dynamic);
        assert_eq!(data.as_str(), "public.data");
        assert_eq!(silent.calls(), 2);

        let empty = CountingRegistry {
            tag_answer: Some(String::new()),
            ..Default::default()
        };
        let folder = Resolver::new(&empty).for_tag(
            tags::MIME_TYPE,
            "inode/directory",
            Some(&TypeIdentifier::FOLDER),
            Preference::Native,
        );
        assert_eq!(folder.as_str(), "public.folder");
    }
}
