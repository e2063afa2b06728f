use std::sync::Arc;

use crate::args::{Usage, UsageError};

/// Every command starts with this
pub const COMMAND_MARKER: char = '!';

#[derive(Clone, Debug)]
pub struct Command {
    pub command: Arc<str>,
    pub aliases: Vec<Arc<str>>,
    pub description: Option<Arc<str>>,
    pub usage: Usage,
}

impl Command {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.into(),
            aliases: Vec::new(),
            description: None,
            usage: Usage::default(),
        }
    }

    pub fn alias(mut self, alias: &str) -> Self {
        self.aliases.push(Arc::from(alias));
        self
    }

    pub fn usage(mut self, usage: &str) -> Result<Self, UsageError> {
        self.usage = Usage::parse(usage)?;
        Ok(self)
    }

    pub fn help(mut self, help: &str) -> Self {
        self.description.get_or_insert_with(|| Arc::from(help));
        self
    }

    /// The command name followed by any aliases
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(&*self.command).chain(self.aliases.iter().map(|s| &**s))
    }

    /// e.g. `!help <command?>`
    pub fn synopsis(&self) -> String {
        match self.usage.as_str() {
            "" => self.command.to_string(),
            usage => format!("{} {usage}", self.command),
        }
    }
}
