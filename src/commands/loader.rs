//! Command manifest discovery and loading.
//!
//! A manifest is a YAML file binding a [`Descriptor`] to a handler of the
//! [`HandlerCatalog`]:
//!
//! ```yaml
//! config:
//!   name: ffinfo
//!   version: "1.5"
//!   short_description: Get Free Fire player info by UID
//!   category: Games
//!   role: 0
//!   guide:
//!     en: "{pn} <uid> [region]"
//! handler: ffinfo
//! ```
//!
//! Manifests missing `config` or `handler` are skipped. Manifests that can't
//! be read or parsed, or that reference an unknown handler, fail to load.
//! A failing manifest never prevents the other ones from loading.

use std::{
    collections::BTreeSet,
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use figment::{
    Figment,
    providers::{Format, Yaml},
};
use log::{debug, error, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::commands::{
    CommandHandler, Descriptor, HandlerCatalog,
    registry::{CommandRegistry, RegistryBuilder},
};

/// Reasons a manifest fails to load.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file couldn't be read
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The file isn't a valid manifest
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: Box<figment::Error>,
    },
    /// The descriptor name is blank
    #[error("{} declares an empty command name", .path.display())]
    EmptyName { path: PathBuf },
    /// The manifest references a handler missing from the catalog
    #[error("{} references unknown handler {handler}", .path.display())]
    UnknownHandler { path: PathBuf, handler: String },
}

/// On-disk representation of a command manifest.
#[derive(Deserialize, Debug)]
struct CommandManifest {
    /// Command metadata
    config: Option<Descriptor>,
    /// Catalog id of the handler
    handler: Option<String>,
}

/// Lists the files matching any of `patterns`, sorted and deduplicated.
///
/// Invalid patterns and unreadable entries are logged and ignored.
pub fn discover(patterns: &[String]) -> Vec<PathBuf> {
    let mut paths = BTreeSet::new();

    for pattern in patterns {
        let entries = match glob::glob(pattern) {
            Ok(entries) => entries,
            Err(e) => {
                error!("invalid manifest pattern {}: {}", pattern, e);
                continue;
            }
        };

        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    paths.insert(path);
                }
                Ok(path) => debug!("ignore non file {}", path.display()),
                Err(e) => warn!("failed to read manifest entry: {}", e),
            }
        }
    }

    debug!("discovered manifests {:?}", paths);
    paths.into_iter().collect()
}

/// Builds the [`CommandRegistry`] from manifests and the handler catalog.
pub struct CommandLoader {
    /// Handlers manifests can reference
    catalog: HandlerCatalog,
}

impl CommandLoader {
    /// Create a new [CommandLoader].
    pub fn new(catalog: HandlerCatalog) -> Self {
        CommandLoader { catalog }
    }

    /// Loads one manifest.
    ///
    /// # Returns
    ///
    /// * `Ok(Some((descriptor, handler)))` - The manifest is valid
    /// * `Ok(None)` - The manifest lacks `config` or `handler` and is skipped
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] if the file can't be read or parsed, if the
    /// name is blank or if the handler is not in the catalog.
    pub fn load(
        &self,
        path: &Path,
    ) -> Result<Option<(Descriptor, Arc<dyn CommandHandler>)>, LoadError> {
        let content = fs::read_to_string(path).map_err(|source| LoadError::Read {
            path: path.to_owned(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let manifest: CommandManifest = Figment::from(Yaml::string(&content))
            .extract()
            .map_err(|e| LoadError::Parse {
                path: path.to_owned(),
                source: Box::new(e),
            })?;

        let (Some(descriptor), Some(handler_id)) = (manifest.config, manifest.handler) else {
            return Ok(None);
        };

        if descriptor.name.trim().is_empty() {
            return Err(LoadError::EmptyName {
                path: path.to_owned(),
            });
        }

        let Some(handler) = self.catalog.handler(&handler_id) else {
            return Err(LoadError::UnknownHandler {
                path: path.to_owned(),
                handler: handler_id,
            });
        };

        Ok(Some((descriptor, handler)))
    }

    /// Discovers and loads every manifest matching `patterns`.
    ///
    /// Without patterns, every catalog entry is registered with its built-in
    /// descriptor. Each manifest reports its own status in the logs and
    /// failures don't stop the loading.
    pub fn load_all(&self, patterns: &[String]) -> CommandRegistry {
        let mut builder = CommandRegistry::builder();

        if patterns.is_empty() {
            info!("no manifest configured, registering built-in commands");
            for entry in self.catalog.entries() {
                register(
                    &mut builder,
                    entry.descriptor.clone(),
                    Arc::clone(&entry.handler),
                    "built-in table",
                );
            }
        } else {
            for path in discover(patterns) {
                let source = path.display().to_string();
                match self.load(&path) {
                    Ok(Some((descriptor, handler))) => {
                        register(&mut builder, descriptor, handler, &source)
                    }
                    Ok(None) => warn!("skip {}: manifest lacks config or handler", source),
                    Err(e) => error!("failed to load command: {}", e),
                }
            }
        }

        let registry = builder.build();
        if registry.is_empty() {
            warn!("no command loaded, every message will be ignored");
        } else {
            info!("loaded {} commands", registry.len());
        }
        registry
    }
}

fn register(
    builder: &mut RegistryBuilder,
    descriptor: Descriptor,
    handler: Arc<dyn CommandHandler>,
    source: &str,
) {
    let name = descriptor.name.clone();
    match builder.register(descriptor, handler) {
        Ok(()) => info!("loaded command {} from {}", name, source),
        Err(e) => warn!("skip command {} from {}: {}", name, source, e),
    }
}
