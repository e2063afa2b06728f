use std::{future::Future, sync::Arc};

use super::{Command, Entry};
use crate::{message::Message, render::Render};

/// Binds the methods of some shared state to commands
///
/// ```ignore
/// Binding::create(Builtin::new())
///     .bind(Command::new("!ping"), Builtin::ping)
///     .bind(Command::new("!route"), Builtin::route)
/// ```
pub struct Binding<T> {
    this: Arc<T>,
    entries: Vec<Entry>,
}

impl<T> Binding<T>
where
    T: Send + Sync + 'static,
{
    pub fn create(this: T) -> Self {
        Self {
            this: Arc::new(this),
            entries: Vec::new(),
        }
    }

    pub fn bind<F, Fut, R>(mut self, cmd: Command, func: F) -> Self
    where
        F: Fn(Arc<T>, Message) -> Fut + Copy + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
        R: Render + 'static,
    {
        let this = Arc::clone(&self.this);
        let handler = move |msg: Message| func(Arc::clone(&this), msg);
        self.entries.push(Entry::new(cmd, handler));
        self
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.entries
    }
}
