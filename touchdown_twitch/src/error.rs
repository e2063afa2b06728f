use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("nothing was received for {0:?}")]
    Timeout(Duration),
    #[error("the server closed the connection")]
    Closed,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TransportError {
    /// Whether the connection is still usable afterwards
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(..))
    }
}
