use std::{future::Future, time::Duration};

use once_cell::sync::OnceCell;
use tokio::{sync::watch, time::Instant};
use tokio_util::sync::CancellationToken;

/// The process asks to be restarted after running this long
pub const RESTART_BUDGET: Duration = Duration::from_secs(60 * 60);

/// How long shutting down may take before whatever is left gets aborted
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    ShuttingDown,
    Terminated,
}

/// Why the process is going away
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    Signal,
    RestartBudget,
    ConnectionLost,
    /// A task panicked or stopped before it was asked to
    TaskFailed,
}

impl Reason {
    /// Whether the process should exit with a failure status
    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::ConnectionLost | Self::TaskFailed)
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Signal => "asked to exit",
            Self::RestartBudget => "the restart budget elapsed",
            Self::ConnectionLost => "the connection was lost",
            Self::TaskFailed => "a task stopped unexpectedly",
        })
    }
}

/// Decides when everything stops
///
/// Shutdown starts once, from whichever trigger fires first. Every task gets a
/// child of the token owned here, so nothing but [`Lifecycle::initiate`] can
/// start it.
pub struct Lifecycle {
    started: Instant,
    budget: Duration,
    grace: Duration,
    token: CancellationToken,
    reason: OnceCell<Reason>,
    phase: watch::Sender<Phase>,
}

impl Lifecycle {
    pub fn new(budget: Duration) -> Self {
        let (phase, _) = watch::channel(Phase::Running);
        Self {
            started: Instant::now(),
            budget,
            grace: SHUTDOWN_GRACE,
            token: CancellationToken::new(),
            reason: OnceCell::new(),
            phase,
        }
    }

    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// A token that fires when shutdown starts
    pub fn token(&self) -> CancellationToken {
        self.token.child_token()
    }

    pub fn phase(&self) -> Phase {
        *self.phase.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Phase> {
        self.phase.subscribe()
    }

    pub fn reason(&self) -> Option<Reason> {
        self.reason.get().copied()
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    /// Starts shutting down, returns `false` if that already happened
    pub fn initiate(&self, reason: Reason) -> bool {
        if self.reason.set(reason).is_err() {
            log::debug!("already shutting down, ignoring: {reason}");
            return false;
        }

        log::info!("shutting down: {reason}");
        self.phase.send_replace(Phase::ShuttingDown);
        self.token.cancel();
        true
    }

    /// Waits for a termination signal, the restart budget or another trigger
    pub async fn watch(&self) -> Reason {
        self.watch_for(shutdown_signal()).await
    }

    async fn watch_for(&self, signal: impl Future<Output = ()>) -> Reason {
        let deadline = self.started + self.budget;
        tokio::select! {
            _ = self.token.cancelled() => {}
            _ = signal => { self.initiate(Reason::Signal); }
            _ = tokio::time::sleep_until(deadline) => { self.initiate(Reason::RestartBudget); }
        }

        // only `initiate` cancels the token, so a reason is always recorded here
        self.reason().unwrap_or(Reason::Signal)
    }

    pub fn finish(&self) {
        self.phase.send_replace(Phase::Terminated);
        log::info!("terminated after {:?}", self.uptime());
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("cannot listen for ctrl-c: {err}");
            std::future::pending::<()>().await
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("cannot listen for SIGTERM: {err}");
                std::future::pending::<()>().await
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
