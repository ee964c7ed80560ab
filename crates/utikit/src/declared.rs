//! Declarative in-memory type registry.
//!
//! [`DeclaredRegistry`] is built from [`Declaration`] records: a built-in
//! table of common public types plus any JSON declaration files the host
//! loads. It answers conformance by walking declared parents, synthesizes
//! dynamic identifiers for unclaimed tags, and identifies files by extension
//! with a magic-number fallback.

use crate::dynamic;
use crate::errors::{DeclarationError, RegistryCause};
use crate::registry::{Preference, TypeRegistry};
use crate::sniff;
use crate::tags;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::io;
use std::path::Path;
use std::sync::LazyLock;

const BUILTIN_DECLARATIONS: &str = include_str!("../data/builtin.json");

const ITEM: &str = "public.item";

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9+_-]*(\.[a-z0-9+_-]+)*$").expect("invalid regex")
});

fn default_native() -> bool {
    true
}

/// One declared type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Canonical identifier, e.g. `public.png`.
    pub identifier: String,
    /// Direct parents in the conformance graph.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conforms_to: Vec<String>,
    /// Tag values keyed by tag class; the first value of a class is preferred.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, Vec<String>>,
    /// Alternate spellings that compare equal to `identifier`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,
    /// Whether the type is owned by the host rather than imported.
    #[serde(default = "default_native")]
    pub native: bool,
}

impl Declaration {
    /// Creates a native declaration with no parents, tags or aliases.
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            conforms_to: Vec::new(),
            tags: BTreeMap::new(),
            aliases: Vec::new(),
            native: true,
        }
    }

    /// Adds a parent type.
    pub fn conforming_to(mut self, parent: impl Into<String>) -> Self {
        self.conforms_to.push(parent.into());
        self
    }

    /// Adds a tag value.
    pub fn with_tag(mut self, tag_class: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags
            .entry(tag_class.into())
            .or_default()
            .push(value.into());
        self
    }

    /// Adds a filename extension tag.
    pub fn with_extension(self, extension: impl Into<String>) -> Self {
        self.with_tag(tags::FILENAME_EXTENSION, extension)
    }

    /// Adds an alias.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Marks the type as imported from a third party.
    pub fn imported(mut self) -> Self {
        self.native = false;
        self
    }

    fn normalized(self) -> Result<Self, DeclarationError> {
        let identifier = checked("identifier", &self.identifier)?;
        let conforms_to = self
            .conforms_to
            .iter()
            .map(|parent| checked("conforms_to", parent))
            .collect::<Result<Vec<_>, _>>()?;
        let aliases = self
            .aliases
            .iter()
            .map(|alias| checked("aliases", alias))
            .collect::<Result<Vec<_>, _>>()?;
        let mut tags: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (class, values) in self.tags {
            let entry = tags.entry(class.to_lowercase()).or_default();
            for value in values {
                let value = value.to_lowercase();
                if !entry.contains(&value) {
                    entry.push(value);
                }
            }
        }
        Ok(Self {
            identifier,
            conforms_to,
            tags,
            aliases,
            native: self.native,
        })
    }
}

fn checked(field: &'static str, value: &str) -> Result<String, DeclarationError> {
    let lowered = value.to_lowercase();
    if dynamic::is_dynamic(&lowered) || !IDENTIFIER_PATTERN.is_match(&lowered) {
        return Err(DeclarationError::InvalidIdentifier {
            field,
            value: value.to_string(),
        });
    }
    Ok(lowered)
}

/// Parses the embedded built-in declaration table.
pub fn builtin_declarations() -> Result<Vec<Declaration>, DeclarationError> {
    Ok(serde_json::from_str(BUILTIN_DECLARATIONS)?)
}

/// Collects declarations and validates them into a [`DeclaredRegistry`].
#[derive(Debug, Default)]
pub struct DeclaredRegistryBuilder {
    declarations: Vec<Declaration>,
}

impl DeclaredRegistryBuilder {
    /// Adds one declaration.
    pub fn declare(mut self, declaration: Declaration) -> Self {
        self.declarations.push(declaration);
        self
    }

    /// Adds the built-in declaration table.
    pub fn with_builtin(mut self) -> Result<Self, DeclarationError> {
        self.declarations.extend(builtin_declarations()?);
        Ok(self)
    }

    /// Adds declarations from a JSON array.
    pub fn load_json(mut self, json: &str) -> Result<Self, DeclarationError> {
        let declarations: Vec<Declaration> = serde_json::from_str(json)?;
        self.declarations.extend(declarations);
        Ok(self)
    }

    /// Adds declarations from a JSON file.
    pub fn load_file(self, path: impl AsRef<Path>) -> Result<Self, DeclarationError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| DeclarationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loading type declarations from {}", path.display());
        self.load_json(&json)
    }

    /// Validates the declarations and builds the registry.
    ///
    /// # Errors
    ///
    /// Fails on malformed identifiers, duplicate declarations, clashing
    /// aliases, and parents that are not declared.
    pub fn build(self) -> Result<DeclaredRegistry, DeclarationError> {
        let mut declarations = Vec::with_capacity(self.declarations.len());
        let mut index = HashMap::new();
        for declaration in self.declarations {
            let declaration = declaration.normalized()?;
            if index
                .insert(declaration.identifier.clone(), declarations.len())
                .is_some()
            {
                return Err(DeclarationError::Duplicate {
                    identifier: declaration.identifier,
                });
            }
            declarations.push(declaration);
        }

        let mut aliases: HashMap<String, String> = HashMap::new();
        for declaration in &declarations {
            for alias in &declaration.aliases {
                let existing = if index.contains_key(alias) {
                    Some(alias.clone())
                } else {
                    aliases.get(alias).cloned()
                };
                if let Some(existing) = existing {
                    return Err(DeclarationError::AliasClash {
                        alias: alias.clone(),
                        identifier: declaration.identifier.clone(),
                        existing,
                    });
                }
                aliases.insert(alias.clone(), declaration.identifier.clone());
            }
        }

        let mut tag_index: HashMap<(String, String), Vec<usize>> = HashMap::new();
        for (position, declaration) in declarations.iter().enumerate() {
            for parent in &declaration.conforms_to {
                let parent = aliases.get(parent).unwrap_or(parent);
                if !index.contains_key(parent) {
                    return Err(DeclarationError::UnknownParent {
                        identifier: declaration.identifier.clone(),
                        parent: parent.clone(),
                    });
                }
            }
            for (class, values) in &declaration.tags {
                for value in values {
                    tag_index
                        .entry((class.clone(), value.clone()))
                        .or_default()
                        .push(position);
                }
            }
        }

        log::debug!("built type registry with {} declarations", declarations.len());
        Ok(DeclaredRegistry {
            declarations,
            index,
            aliases,
            tag_index,
        })
    }
}

/// In-memory [`TypeRegistry`] backed by declarations.
#[derive(Debug)]
pub struct DeclaredRegistry {
    declarations: Vec<Declaration>,
    index: HashMap<String, usize>,
    aliases: HashMap<String, String>,
    tag_index: HashMap<(String, String), Vec<usize>>,
}

impl DeclaredRegistry {
    /// Starts an empty builder.
    pub fn builder() -> DeclaredRegistryBuilder {
        DeclaredRegistryBuilder::default()
    }

    /// Registry holding only the built-in declarations.
    pub fn builtin() -> Self {
        Self::builder()
            .with_builtin()
            .and_then(DeclaredRegistryBuilder::build)
            .expect("built-in declarations are valid")
    }

    /// Normalized declarations in declaration order.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Returns the declaration for `identifier` or one of its aliases.
    pub fn declaration(&self, identifier: &str) -> Option<&Declaration> {
        let canonical = self.canonical(identifier);
        self.index
            .get(&canonical)
            .map(|&position| &self.declarations[position])
    }

    /// Returns true if `identifier` (or an alias of it) is declared.
    pub fn is_declared(&self, identifier: &str) -> bool {
        self.declaration(identifier).is_some()
    }

    fn canonical(&self, identifier: &str) -> String {
        let lowered = identifier.to_lowercase();
        match self.aliases.get(&lowered) {
            Some(canonical) => canonical.clone(),
            None => lowered,
        }
    }

    fn parents(&self, identifier: &str) -> Vec<String> {
        if let Some(declaration) = self.declaration(identifier) {
            // Roots other than public.item hang off public.item.
            if declaration.conforms_to.is_empty() && declaration.identifier != ITEM {
                return vec![ITEM.to_string()];
            }
            return declaration
                .conforms_to
                .iter()
                .map(|parent| self.canonical(parent))
                .collect();
        }
        match dynamic::decode(identifier) {
            Some(dynamic_type) => vec![self.canonical(&dynamic_type.conforms_to)],
            None => Vec::new(),
        }
    }

    fn candidates(
        &self,
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&str>,
    ) -> Vec<&Declaration> {
        let key = (tag_class.to_lowercase(), tag_value.to_lowercase());
        let Some(positions) = self.tag_index.get(&key) else {
            return Vec::new();
        };
        positions
            .iter()
            .map(|&position| &self.declarations[position])
            .filter(|declaration| {
                conforming_to.map_or(true, |parent| {
                    self.conforms_to(&declaration.identifier, parent)
                })
            })
            .collect()
    }

    fn directory_type(&self, extension: &str, preference: Preference) -> String {
        let directory = "public.directory";
        let candidates = self.candidates(tags::FILENAME_EXTENSION, extension, Some(directory));
        match pick(&candidates, preference) {
            Some(declaration) => declaration.identifier.clone(),
            None => "public.folder".to_string(),
        }
    }

    fn file_type(
        &self,
        path: &Path,
        extension: &str,
        preference: Preference,
        exists: bool,
    ) -> String {
        let identifier = self.lookup_tag(
            tags::FILENAME_EXTENSION,
            extension,
            Some("public.data"),
            preference,
        );
        if exists && dynamic::is_dynamic(&identifier) {
            match sniff::sniff_file(path) {
                Ok(Some(sniffed)) if self.is_declared(sniffed) => {
                    log::debug!("sniffed {} as {sniffed}", path.display());
                    return sniffed.to_string();
                }
                Ok(_) => {}
                Err(err) => {
                    log::debug!("cannot sniff {}, keeping {identifier}: {err}", path.display());
                }
            }
        }
        identifier
    }

    fn lookup_tag(
        &self,
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&str>,
        preference: Preference,
    ) -> String {
        let candidates = self.candidates(tag_class, tag_value, conforming_to);
        match pick(&candidates, preference) {
            Some(declaration) => declaration.identifier.clone(),
            None => {
                let parent = conforming_to
                    .map(|parent| self.canonical(parent))
                    .unwrap_or_else(|| "public.data".to_string());
                dynamic::encode(
                    &tag_class.to_lowercase(),
                    &tag_value.to_lowercase(),
                    &parent,
                )
            }
        }
    }
}

fn pick<'a>(candidates: &[&'a Declaration], preference: Preference) -> Option<&'a Declaration> {
    match preference {
        Preference::Native => candidates
            .iter()
            .find(|declaration| declaration.native)
            .or_else(|| candidates.first())
            .copied(),
        Preference::Dynamic => candidates.first().copied(),
    }
}

impl TypeRegistry for DeclaredRegistry {
    fn conforms_to(&self, identifier: &str, other: &str) -> bool {
        let start = self.canonical(identifier);
        let target = self.canonical(other);
        if start == target {
            return true;
        }
        let mut visited = HashSet::new();
        let mut pending = vec![start];
        while let Some(current) = pending.pop() {
            if !visited.insert(current.clone()) {
                continue;
            }
            for parent in self.parents(&current) {
                if parent == target {
                    return true;
                }
                pending.push(parent);
            }
        }
        false
    }

    fn identifiers_equal(&self, a: &str, b: &str) -> bool {
        self.canonical(a) == self.canonical(b)
    }

    fn canonical_identifier(&self, identifier: &str) -> Option<String> {
        self.aliases.get(&identifier.to_lowercase()).cloned()
    }

    fn preferred_identifier_for_tag(
        &self,
        tag_class: &str,
        tag_value: &str,
        conforming_to: Option<&str>,
        preference: Preference,
    ) -> Option<String> {
        Some(self.lookup_tag(tag_class, tag_value, conforming_to, preference))
    }

    fn identify_resource(
        &self,
        path: &Path,
        preference: Preference,
    ) -> Result<Option<String>, RegistryCause> {
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let identifier = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_dir() => self.directory_type(&extension, preference),
            Ok(_) => self.file_type(path, &extension, preference, true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                let names_directory = path
                    .to_string_lossy()
                    .ends_with(std::path::MAIN_SEPARATOR);
                if names_directory {
                    self.directory_type(&extension, preference)
                } else {
                    self.file_type(path, &extension, preference, false)
                }
            }
            Err(err) => return Err(Box::new(err)),
        };
        Ok(Some(identifier))
    }

    fn preferred_extension_for_identifier(&self, identifier: &str) -> Option<String> {
        if let Some(declaration) = self.declaration(identifier) {
            return declaration
                .tags
                .get(tags::FILENAME_EXTENSION)
                .and_then(|values| values.first())
                .cloned();
        }
        dynamic::decode(identifier)
            .filter(|dynamic_type| {
                dynamic_type.tag_class == tags::FILENAME_EXTENSION
                    && !dynamic_type.tag_value.is_empty()
            })
            .map(|dynamic_type| dynamic_type.tag_value)
    }
}
