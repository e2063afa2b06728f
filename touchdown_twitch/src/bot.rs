use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use touchdown_core::{callable::Dispatcher, event::Event};

use super::{Reader, Writer};

/// How many reads in a row may time out before the connection is given up on
pub const MAX_TIMEOUTS: usize = 3;

pub struct Bot<R> {
    reader: Reader<R>,
    writer: Writer,
    dispatcher: Dispatcher,
}

impl<R> Bot<R>
where
    R: AsyncRead + Unpin,
{
    pub const fn new(reader: Reader<R>, writer: Writer, dispatcher: Dispatcher) -> Self {
        Self {
            reader,
            writer,
            dispatcher,
        }
    }

    /// Reads and handles lines until `shutdown` fires or the connection is lost
    ///
    /// Returns `Ok` only when it was asked to stop.
    pub async fn run(mut self, shutdown: CancellationToken) -> anyhow::Result<()> {
        let mut timeouts = 0;

        loop {
            let lines = tokio::select! {
                biased;
                _ = shutdown.cancelled() => {
                    log::debug!("stopping the chat loop");
                    return Ok(());
                }
                lines = self.reader.read_lines() => lines,
            };

            let lines = match lines {
                Ok(lines) => {
                    timeouts = 0;
                    lines
                }
                Err(err) if err.is_transient() => {
                    timeouts += 1;
                    log::warn!("{err} ({timeouts}/{MAX_TIMEOUTS})");
                    if timeouts >= MAX_TIMEOUTS {
                        anyhow::bail!("connection lost: {err}")
                    }
                    continue;
                }
                Err(err) => return Err(anyhow::Error::new(err).context("connection lost")),
            };

            for line in lines {
                if shutdown.is_cancelled() {
                    return Ok(());
                }
                self.handle_line(&line).await?;
            }
        }
    }

    /// Handles a single line
    ///
    /// Only fails when the connection can no longer be written to.
    pub async fn handle_line(&self, line: &str) -> anyhow::Result<()> {
        log::info!("<- {line}");

        match Event::parse(line) {
            Ok(Event::Keepalive { token }) => self.writer.pong(&token).await?,
            Ok(Event::ChatMessage(pm)) => {
                log::debug!("[{}] {}: {}", pm.target, pm.sender, pm.body);
                for resp in self.dispatcher.dispatch(&pm).await {
                    self.writer.respond(&pm.sender, &resp).await?;
                }
            }
            Ok(Event::Other) => {}
            Err(err) => log::warn!("ignoring malformed line ({err}): {line}"),
        }

        Ok(())
    }
}
