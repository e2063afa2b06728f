use std::time::Duration;

use tokio::{
    io::{AsyncRead, AsyncReadExt},
    net::{tcp::OwnedReadHalf, TcpStream},
    task::JoinHandle,
};
use touchdown_core::framer::{Framer, Terminators};

use super::{config::Irc, TransportError, Writer};

/// How long a read may wait before it counts as a timeout
pub const READ_TIMEOUT: Duration = Duration::from_secs(6 * 60);

const CONNECT_ATTEMPTS: usize = 5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// An established, registered connection
pub struct Connection {
    pub reader: Reader<OwnedReadHalf>,
    pub writer: Writer,
    pub writer_task: JoinHandle<()>,
}

impl Connection {
    /// Connects, then sends `PASS`, `NICK` and `JOIN`
    pub async fn connect(config: &Irc) -> anyhow::Result<Self> {
        async fn try_connect(attempts: usize, addr: &str) -> anyhow::Result<TcpStream> {
            let backoff = std::iter::successors(Some(0), |n| Some(n + 3))
                .map(Duration::from_secs)
                .take(attempts);

            use tokio_stream::StreamExt as _;
            let mut stream =
                tokio_stream::iter(backoff).map(|dur| async move { tokio::time::sleep(dur).await });

            while let Some(backoff) = stream.next().await {
                backoff.await;

                match tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr)).await {
                    Ok(Ok(stream)) => return Ok(stream),
                    Ok(Err(err)) => log::warn!("could not connect. trying again: {err}"),
                    Err(..) => log::warn!("connection attempt timed out, trying again"),
                }
            }

            anyhow::bail!("could not connect to {addr}")
        }

        let addr = config.address();
        let stream = try_connect(CONNECT_ATTEMPTS, &addr).await?;
        log::info!("connected to {addr}");

        let (read, write) = stream.into_split();
        let (writer, writer_task) = Writer::spawn(write, &config.channel);

        Self::register(&writer, config).await?;

        Ok(Self {
            reader: Reader::new(read, config.terminators()),
            writer,
            writer_task,
        })
    }

    async fn register(writer: &Writer, config: &Irc) -> anyhow::Result<()> {
        writer.pass(&config.pass).await?;
        writer.nick(&config.name).await?;
        log::info!("joining #{}", writer.channel());
        writer.join().await
    }
}

/// The read half of the connection, framed into lines
pub struct Reader<R> {
    read: R,
    framer: Framer,
    chunk: Box<[u8]>,
    timeout: Duration,
}

impl<R> Reader<R>
where
    R: AsyncRead + Unpin,
{
    pub fn new(read: R, terminators: Terminators) -> Self {
        if terminators == Terminators::WithTilde {
            log::warn!("'~' is treated as a line terminator, messages containing it will be split");
        }

        Self {
            read,
            framer: Framer::new(terminators),
            chunk: vec![0; 1024].into_boxed_slice(),
            timeout: READ_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Waits for the next chunk and returns the lines it completed
    ///
    /// This is cancel safe, nothing is lost if the future is dropped.
    pub async fn read_lines(&mut self) -> Result<Vec<String>, TransportError> {
        let n = match tokio::time::timeout(self.timeout, self.read.read(&mut self.chunk)).await {
            Err(..) => return Err(TransportError::Timeout(self.timeout)),
            Ok(Err(err)) => return Err(err.into()),
            Ok(Ok(0)) => return Err(TransportError::Closed),
            Ok(Ok(n)) => n,
        };
        Ok(self.framer.feed(&self.chunk[..n]).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt as _;

    #[tokio::test]
    async fn lines_across_reads() {
        let (mut server, client) = tokio::io::duplex(1024);
        let mut reader = Reader::new(client, Terminators::Standard);

        server.write_all(b"PING :tmi.tw").await.unwrap();
        server.flush().await.unwrap();
        assert!(reader.read_lines().await.unwrap().is_empty());

        server.write_all(b"itch.tv\r\n:a!a@a PRIVMSG #c :hi\r\n").await.unwrap();
        assert_eq!(
            reader.read_lines().await.unwrap(),
            ["PING :tmi.twitch.tv", ":a!a@a PRIVMSG #c :hi"]
        );

        drop(server);
        assert!(matches!(
            reader.read_lines().await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn timeouts_are_transient() {
        let (_server, client) = tokio::io::duplex(1024);
        let mut reader =
            Reader::new(client, Terminators::Standard).with_timeout(Duration::from_secs(1));

        let err = reader.read_lines().await.unwrap_err();
        assert!(matches!(err, TransportError::Timeout(..)));
        assert!(err.is_transient());
        assert!(!TransportError::Closed.is_transient());
    }
}
