//! Registry setup shared by every command.

use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use utikit::registry;
use utikit::{DeclarationError, DeclaredRegistry, RegistryError, Resolver, ResolverOptions};

/// Errors raised while preparing the registry.
#[derive(Debug, Error)]
pub enum SetupError {
    /// Declarations failed to load or validate.
    #[error("failed to load declarations: {0}")]
    Declarations(#[from] DeclarationError),
    /// The process-wide registry was already initialized.
    #[error("failed to install registry: {0}")]
    Install(#[from] RegistryError),
}

/// Installed registry plus resolver options.
pub struct Context {
    registry: Arc<DeclaredRegistry>,
    options: ResolverOptions,
}

impl Context {
    /// Builds the registry from the built-in table and `declarations`, and
    /// installs it process-wide so identifier equality uses it too.
    pub fn load(declarations: &[PathBuf], directory_extension: String) -> Result<Self, SetupError> {
        let mut builder = DeclaredRegistry::builder().with_builtin()?;
        for path in declarations {
            builder = builder.load_file(path)?;
        }
        let registry = Arc::new(builder.build()?);
        registry::install(registry.clone())?;
        log::debug!(
            "registry ready with {} declarations",
            registry.declarations().len()
        );
        Ok(Self {
            registry,
            options: ResolverOptions {
                directory_path_extension: directory_extension,
            },
        })
    }

    pub fn registry(&self) -> &DeclaredRegistry {
        &self.registry
    }

    pub fn resolver(&self) -> Resolver<'_> {
        Resolver::new(self.registry.as_ref()).with_options(self.options.clone())
    }
}
