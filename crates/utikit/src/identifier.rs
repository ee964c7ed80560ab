use crate::errors::ResolveError;
use crate::registry::{self, Preference};
use crate::resolve::Resolver;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::{Borrow, Cow};
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::str::FromStr;

/// Canonical identifier naming what kind of content a file or stream holds.
///
/// The stored value is always lowercase. Equality is alias-aware and answered
/// by the process-wide registry; hashing uses the registry's canonical
/// spelling so that equal identifiers hash alike.
#[derive(Clone)]
pub struct TypeIdentifier {
    value: Cow<'static, str>,
}

impl TypeIdentifier {
    /// File system directory, packages and folders alike.
    pub const DIRECTORY: Self = Self::from_static("public.directory");
    /// User-browsable directory that is not a package.
    pub const FOLDER: Self = Self::from_static("public.folder");
    /// Base type for any simple byte stream.
    pub const DATA: Self = Self::from_static("public.data");
    /// Base zip type, usable for zip-formatted files without a `zip` extension.
    pub const ZIP: Self = Self::from_static("com.pkware.zip-archive");
    /// UTF-8 encoded plain text.
    pub const UTF8_PLAIN_TEXT: Self = Self::from_static("public.utf8-plain-text");
    /// Plain text of any encoding.
    pub const PLAIN_TEXT: Self = Self::from_static("public.plain-text");

    /// Creates an identifier, lowercasing `raw`.
    pub fn new(raw: impl AsRef<str>) -> Self {
        Self {
            value: Cow::Owned(raw.as_ref().to_lowercase()),
        }
    }

    // Callers pass lowercase literals only.
    const fn from_static(value: &'static str) -> Self {
        Self {
            value: Cow::Borrowed(value),
        }
    }

    /// Canonical lowercase value.
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Identifies the resource at `path` with the process-wide registry.
    pub fn for_path(path: &Path, preference: Preference) -> Result<Self, ResolveError> {
        Resolver::global().for_path(path, preference)
    }

    /// Resolves a filename extension; see [`Resolver::for_path_extension`].
    pub fn for_path_extension(
        path_extension: &str,
        is_directory: Option<bool>,
        preference: Preference,
    ) -> Self {
        Resolver::global().for_path_extension(path_extension, is_directory, preference)
    }

    /// Resolves a tag; see [`Resolver::for_tag`].
    pub fn for_tag(
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&TypeIdentifier>,
        preference: Preference,
    ) -> Self {
        Resolver::global().for_tag(tag_class, tag_value, conforming_to, preference)
    }

    /// Returns true if `self` conforms to, or is equal to, `other`.
    pub fn conforms_to(&self, other: &TypeIdentifier) -> bool {
        Resolver::global().conforms_to(self, other)
    }

    /// Returns true if `self` conforms to at least one of `others`.
    pub fn conforms_to_any<I>(&self, others: I) -> bool
    where
        I: IntoIterator,
        I::Item: Borrow<TypeIdentifier>,
    {
        Resolver::global().conforms_to_any(self, others)
    }

    /// Best filename extension for this type, if the registry knows one.
    pub fn preferred_path_extension(&self) -> Option<String> {
        Resolver::global().preferred_path_extension(self)
    }

    /// Returns true for identifiers synthesized for undeclared tags.
    pub fn is_dynamic(&self) -> bool {
        crate::dynamic::is_dynamic(&self.value)
    }
}

impl PartialEq for TypeIdentifier {
    fn eq(&self, other: &Self) -> bool {
        Resolver::global().identifiers_equal(self, other)
    }
}

impl Eq for TypeIdentifier {}

impl Hash for TypeIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match registry::global().canonical_identifier(&self.value) {
            Some(canonical) => canonical.as_str().hash(state),
            None => self.as_str().hash(state),
        }
    }
}

impl fmt::Debug for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<TypeIdentifier: {}>", self.value)
    }
}

impl fmt::Display for TypeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for TypeIdentifier {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl From<&str> for TypeIdentifier {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeIdentifier {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl FromStr for TypeIdentifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl Serialize for TypeIdentifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for TypeIdentifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn construction_lowercases() {
        let id = TypeIdentifier::new("Public.PNG");
        assert_eq!(id.as_str(), "public.png");
        assert_eq!(id, TypeIdentifier::new("public.png"));
    }

    #[test]
    fn constants_are_lowercase() {
        for constant in [
            TypeIdentifier::DIRECTORY,
            TypeIdentifier::FOLDER,
            TypeIdentifier::DATA,
            TypeIdentifier::ZIP,
            TypeIdentifier::UTF8_PLAIN_TEXT,
            TypeIdentifier::PLAIN_TEXT,
        ] {
            assert_eq!(constant.as_str(), constant.as_str().to_lowercase());
        }
    }

    #[test]
    fn debug_format_wraps_value() {
        assert_eq!(
            format!("{:?}", TypeIdentifier::DATA),
            "<TypeIdentifier: public.data>"
        );
        assert_eq!(TypeIdentifier::DATA.to_string(), "public.data");
    }

    #[test]
    fn aliases_are_equal_and_hash_alike() {
        let alias = TypeIdentifier::new("public.jpg");
        let canonical = TypeIdentifier::new("public.jpeg");
        assert_eq!(alias, canonical);

        let set: HashSet<TypeIdentifier> = [alias, canonical].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn serde_uses_bare_lowercase_string() {
        let id: TypeIdentifier = serde_json::from_str(r#""Public.Zip-Archive""#).unwrap();
        assert_eq!(id.as_str(), "public.zip-archive");
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""public.zip-archive""#);
    }

    #[test]
    fn from_str_never_fails() {
        let id: TypeIdentifier = "COM.PKWARE.ZIP-ARCHIVE".parse().unwrap();
        assert_eq!(id, TypeIdentifier::ZIP);
    }
}
