use tokio_util::sync::CancellationToken;
use touchdown_core::callable::Dispatcher;

pub mod config;

mod bot;
mod connection;
mod error;
mod writer;

pub use bot::{Bot, MAX_TIMEOUTS};
pub use connection::{Connection, Reader, READ_TIMEOUT};
pub use error::TransportError;
pub use writer::{Writer, BOT_TAG, WRITE_TIMEOUT};

/// Runs an already connected bot until `shutdown` fires or the connection is lost
pub async fn run_bot(
    reader: Reader<tokio::net::tcp::OwnedReadHalf>,
    writer: Writer,
    dispatcher: Dispatcher,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    log::info!(
        "starting the twitch bot with {} commands",
        dispatcher.registry().len()
    );
    Bot::new(reader, writer, dispatcher).run(shutdown).await
}
