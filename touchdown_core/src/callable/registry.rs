use std::{collections::HashMap, sync::Arc};

use super::{Binding, Command, Handler, SharedHandler, COMMAND_MARKER};

/// A command and the handler that answers it
#[derive(Clone)]
pub struct Entry {
    pub command: Arc<Command>,
    pub handler: SharedHandler,
}

impl Entry {
    pub fn new(command: Command, handler: impl Handler) -> Self {
        Self {
            command: Arc::new(command),
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("command", &self.command)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("'{0}' must start with '!'")]
    MissingMarker(String),
    #[error("'{0}' was registered more than once")]
    Duplicate(String),
}

/// Every known command, looked up by name or alias
///
/// Built once at startup and never changed afterwards, so it can be shared
/// freely between tasks.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<Entry>,
    lookup: HashMap<Arc<str>, usize>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Looks up a command token, exactly as typed
    pub fn get(&self, command: &str) -> Option<&Entry> {
        self.lookup.get(command).map(|&index| &self.entries[index])
    }

    /// Commands in the order they were registered
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.entries.iter().map(|entry| &*entry.command)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: Vec<Entry>,
}

impl RegistryBuilder {
    pub fn entry(mut self, entry: Entry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn binding<T>(mut self, binding: Binding<T>) -> Self
    where
        T: Send + Sync + 'static,
    {
        self.entries.extend(binding.into_entries());
        self
    }

    pub fn build(self) -> Result<Registry, RegistryError> {
        let mut lookup = HashMap::new();
        for (index, entry) in self.entries.iter().enumerate() {
            for name in entry.command.names() {
                if !name.starts_with(COMMAND_MARKER) || name.len() == COMMAND_MARKER.len_utf8() {
                    return Err(RegistryError::MissingMarker(name.to_string()));
                }
                if lookup.insert(Arc::<str>::from(name), index).is_some() {
                    return Err(RegistryError::Duplicate(name.to_string()));
                }
            }
        }

        Ok(Registry {
            entries: self.entries,
            lookup,
        })
    }
}
