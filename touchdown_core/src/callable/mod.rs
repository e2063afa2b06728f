use std::{future::Future, sync::Arc};

use crate::{
    message::Message,
    render::{Render, Response},
    BoxedFuture,
};

mod binding;
mod command;
mod dispatch;
mod registry;

pub use binding::Binding;
pub use command::{Command, COMMAND_MARKER};
pub use dispatch::{Dispatcher, HANDLER_TIMEOUT};
pub use registry::{Entry, Registry, RegistryBuilder, RegistryError};

pub type SharedHandler = Arc<dyn Handler>;

/// Something that can answer a command
pub trait Handler
where
    Self: Send + Sync + 'static,
{
    fn call(&self, msg: Message) -> BoxedFuture<'static, anyhow::Result<Vec<Response>>>;
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Message) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<R>> + Send + 'static,
    R: Render + 'static,
{
    fn call(&self, msg: Message) -> BoxedFuture<'static, anyhow::Result<Vec<Response>>> {
        let fut = (self)(msg);
        Box::pin(async move { fut.await.map(|out| out.render()) })
    }
}
