//! Command registry.
//!
//! The registry is assembled with a [`RegistryBuilder`] during startup, then
//! frozen into an immutable [`CommandRegistry`] shared by every dispatch.

use std::{collections::HashMap, sync::Arc};

use thiserror::Error;

use crate::commands::{CommandHandler, Descriptor};

/// Reasons a command can't be registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The descriptor name is empty or only whitespace
    #[error("command name is empty")]
    EmptyName,
    /// Another command was registered first under the same lowercase name
    #[error("command {0} is already registered")]
    Duplicate(String),
}

/// A descriptor bound to its handler.
#[derive(Clone)]
pub struct RegisteredCommand {
    /// Command metadata
    pub descriptor: Descriptor,
    /// Command behavior
    pub handler: Arc<dyn CommandHandler>,
}

/// Immutable mapping from lowercase command name to command.
///
/// # Examples
///
/// ```ignore
/// let mut builder = CommandRegistry::builder();
/// builder.register(descriptor, Arc::new(PingHandler))?;
/// let registry = builder.build();
///
/// if let Some(command) = registry.lookup("PING") {
///     command.handler.run(ctx).await?;
/// }
/// ```
#[derive(Clone, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, RegisteredCommand>,
}

impl CommandRegistry {
    /// Starts an empty registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Finds a command, ignoring the case of `name`.
    pub fn lookup(&self, name: &str) -> Option<&RegisteredCommand> {
        self.commands.get(&name.to_lowercase())
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether no command is registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Descriptors of every command, sorted by name.
    pub fn descriptors(&self) -> Vec<&Descriptor> {
        let mut descriptors: Vec<&Descriptor> = self
            .commands
            .values()
            .map(|command| &command.descriptor)
            .collect();
        descriptors.sort_by_key(|descriptor| descriptor.name.to_lowercase());
        descriptors
    }
}

/// Mutable stage of a [`CommandRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    commands: HashMap<String, RegisteredCommand>,
}

impl RegistryBuilder {
    /// Registers a command under its lowercase name.
    ///
    /// The first registration of a name wins, later ones are refused.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::EmptyName`] for a blank name and
    /// [`RegistryError::Duplicate`] when the name is already taken.
    pub fn register(
        &mut self,
        descriptor: Descriptor,
        handler: Arc<dyn CommandHandler>,
    ) -> Result<(), RegistryError> {
        if descriptor.name.trim().is_empty() {
            return Err(RegistryError::EmptyName);
        }

        let key = descriptor.name.to_lowercase();
        if self.commands.contains_key(&key) {
            return Err(RegistryError::Duplicate(key));
        }

        self.commands.insert(
            key,
            RegisteredCommand {
                descriptor,
                handler,
            },
        );
        Ok(())
    }

    /// Freezes the registered commands.
    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            commands: self.commands,
        }
    }
}
