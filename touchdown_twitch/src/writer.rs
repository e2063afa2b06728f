use std::{borrow::Cow, sync::Arc, time::Duration};

use tokio::{
    io::{AsyncWrite, AsyncWriteExt},
    sync::mpsc,
    task::JoinHandle,
};
use touchdown_config::Secret;
use touchdown_core::render::Response;

/// Prepended to everything the bot says
pub const BOT_TAG: &str = "[BOT]";

/// A peer that takes longer than this to accept a line is treated as gone
pub const WRITE_TIMEOUT: Duration = Duration::from_secs(30);

/// A handle for writing to the connection
///
/// Every handle feeds the same writer task, which owns the write half of the
/// stream. Lines from different tasks can be reordered relative to each other
/// but never interleave.
#[derive(Clone, Debug)]
pub struct Writer {
    tx: mpsc::Sender<String>,
    channel: Arc<str>,
}

impl Writer {
    /// Spawns the writer task for `write`
    ///
    /// The task ends once every handle is dropped, when a write fails or when a
    /// write takes longer than [`WRITE_TIMEOUT`]. Handles fail to send after that.
    pub fn spawn<W>(write: W, channel: &str) -> (Self, JoinHandle<()>)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::channel::<String>(64);

        let handle = tokio::spawn(async move {
            let mut write = write;
            while let Some(line) = rx.recv().await {
                match tokio::time::timeout(WRITE_TIMEOUT, write_line(&mut write, &line)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        log::error!("cannot write to the connection: {err}");
                        return;
                    }
                    Err(..) => {
                        log::error!("the connection stopped accepting writes");
                        return;
                    }
                }
            }
            if let Err(err) = write.shutdown().await {
                log::debug!("cannot shut down the connection: {err}");
            }
            log::debug!("writer finished");
        });

        (Self::from_sender(tx, channel), handle)
    }

    /// A writer that isn't attached to a connection, lines show up on the receiver
    pub fn detached(channel: &str) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(64);
        (Self::from_sender(tx, channel), rx)
    }

    fn from_sender(tx: mpsc::Sender<String>, channel: &str) -> Self {
        Self {
            tx,
            channel: Arc::from(channel.trim_start_matches('#')),
        }
    }

    /// The channel name, without the `#`
    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Queues a single protocol line, the terminator is added by the writer task
    pub async fn send_raw(&self, line: &str) -> anyhow::Result<()> {
        // a line break in the data would smuggle a second command onto the wire
        let line = line.replace(['\r', '\n'], " ");

        log::info!("-> {}", loggable(&line));

        if self.tx.send(line).await.is_err() {
            anyhow::bail!("the connection is closed")
        }
        Ok(())
    }

    pub async fn pass(&self, token: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PASS {token}")).await
    }

    pub async fn nick(&self, name: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("NICK {name}")).await
    }

    pub async fn join(&self) -> anyhow::Result<()> {
        self.send_raw(&format!("JOIN #{}", self.channel)).await
    }

    pub async fn part(&self) -> anyhow::Result<()> {
        self.send_raw(&format!("PART #{}", self.channel)).await
    }

    pub async fn pong(&self, token: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PONG {token}")).await
    }

    /// Says something in the channel
    pub async fn say(&self, text: &str) -> anyhow::Result<()> {
        self.send_raw(&format!("PRIVMSG #{} :{BOT_TAG} {text}", self.channel))
            .await
    }

    /// Writes a handler's response, `sender` is who triggered it
    pub async fn respond(&self, sender: &str, resp: &Response) -> anyhow::Result<()> {
        match resp {
            Response::Say(msg) => self.say(msg).await,
            Response::Reply(msg) => self.say(&format!("{sender}: {msg}")).await,
            Response::Problem(msg) => self.say(&format!("a problem occurred: {msg}")).await,
        }
    }
}

async fn write_line<W>(write: &mut W, line: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    write.write_all(line.as_bytes()).await?;
    write.write_all(b"\r\n").await?;
    write.flush().await
}

/// The line as it may appear in the log
fn loggable(line: &str) -> Cow<'_, str> {
    match line.split_once(' ') {
        Some(("PASS", token)) => Cow::Owned(format!("PASS {}", Secret::from(token))),
        _ => Cow::Borrowed(line),
    }
}
