use std::{future::Future, pin::Pin};

pub mod args;
pub mod callable;
pub mod event;
pub mod framer;
pub mod message;
pub mod render;

mod format;
pub use format::FormatTime;

pub mod testing;

pub type BoxedFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a + Send>>;

pub mod prelude {
    pub use std::sync::Arc;

    pub use crate::args::Arguments;
    pub use crate::callable::{Binding, Command, Dispatcher, Entry, Registry, SharedHandler};
    pub use crate::event::{Event, Privmsg};
    pub use crate::framer::{Framer, Terminators};
    pub use crate::message::Message;
    pub use crate::render::{Render, Response};
}

pub const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
