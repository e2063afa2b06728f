use std::{sync::Arc, time::Duration};

use tokio::{
    task::{JoinError, JoinHandle, JoinSet},
    time::Instant,
};
use touchdown_core::callable::Dispatcher;
use touchdown_twitch::{Connection, Writer};

pub mod builtin;
pub mod config;
pub mod lifecycle;
pub mod logging;

use config::Config;
pub use lifecycle::{Lifecycle, Phase, Reason, RESTART_BUDGET, SHUTDOWN_GRACE};

/// How long the goodbye may take before the connection is dropped anyway
const PART_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Task {
    Status,
    Chat,
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Status => "status listener",
            Self::Chat => "chat loop",
        })
    }
}

type Tasks = JoinSet<(Task, anyhow::Result<()>)>;

/// Runs the bot and the status listener until it is time to stop
///
/// Returns why everything stopped. A lost connection is reported as a
/// [`Reason`], not an error, so the caller can pick the exit status.
pub async fn run(config: Config) -> anyhow::Result<Reason> {
    run_with(config, Lifecycle::new(RESTART_BUDGET)).await
}

pub async fn run_with(config: Config, lifecycle: Lifecycle) -> anyhow::Result<Reason> {
    log::trace!("binding commands");
    let registry = builtin::registry(config.lookup)?;
    let dispatcher = Dispatcher::new(Arc::new(registry));

    let listener = touchdown_status::bind(&config.status).await?;

    log::info!(
        "connecting to {} (with name {})",
        config.irc.address(),
        config.irc.name
    );
    let Connection {
        reader,
        writer,
        writer_task,
    } = Connection::connect(&config.irc).await?;

    let mut tasks = Tasks::new();

    log::debug!("starting the status listener");
    let router = touchdown_status::router(writer.clone(), config.status.bearer.as_ref());
    let token = lifecycle.token();
    tasks.spawn(async move {
        let result = touchdown_status::serve(listener, router, token).await;
        (Task::Status, result)
    });

    log::debug!("starting the chat loop");
    let (chat_writer, token) = (writer.clone(), lifecycle.token());
    tasks.spawn(async move {
        let result = touchdown_twitch::run_bot(reader, chat_writer, dispatcher, token).await;
        (Task::Chat, result)
    });

    let reason = supervise(&lifecycle, &mut tasks).await;
    let deadline = Instant::now() + lifecycle.grace();

    // nothing new can be announced once the listener is gone
    join_all(tasks, deadline).await;

    if !reason.is_failure() {
        part(&writer, deadline).await;
    }

    drop(writer);
    drain(writer_task, deadline).await;

    lifecycle.finish();
    Ok(reason)
}

/// Waits for a shutdown trigger, or for a task to end on its own
///
/// Both tasks only stop once asked to, so one that ends first takes
/// everything else down with it.
async fn supervise(lifecycle: &Lifecycle, tasks: &mut Tasks) -> Reason {
    tokio::select! {
        reason = lifecycle.watch() => reason,
        Some(joined) = tasks.join_next() => {
            let reason = match &joined {
                Ok((Task::Chat, Err(..))) => Reason::ConnectionLost,
                _ => Reason::TaskFailed,
            };
            report(joined);
            lifecycle.initiate(reason);
            lifecycle.reason().unwrap_or(reason)
        }
    }
}

async fn join_all(mut tasks: Tasks, deadline: Instant) {
    loop {
        match tokio::time::timeout_at(deadline, tasks.join_next()).await {
            Ok(Some(joined)) => report(joined),
            Ok(None) => break,
            Err(..) => {
                log::warn!("{} task(s) did not stop in time, aborting them", tasks.len());
                tasks.shutdown().await;
                break;
            }
        }
    }
}

fn report(joined: Result<(Task, anyhow::Result<()>), JoinError>) {
    match joined {
        Ok((task, Ok(()))) => log::debug!("{task} finished"),
        Ok((task, Err(err))) => log::error!("{task} stopped: {err:#}"),
        Err(err) => log::error!("a task failed: {err}"),
    }
}

async fn part(writer: &Writer, deadline: Instant) {
    log::info!("leaving #{}", writer.channel());
    let deadline = deadline.min(Instant::now() + PART_TIMEOUT);
    match tokio::time::timeout_at(deadline, writer.part()).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("cannot leave the channel: {err}"),
        Err(..) => log::warn!("leaving the channel timed out"),
    }
}

async fn drain(mut writer_task: JoinHandle<()>, deadline: Instant) {
    match tokio::time::timeout_at(deadline, &mut writer_task).await {
        Ok(Ok(())) => log::debug!("writer drained"),
        Ok(Err(err)) => log::error!("the writer task panicked: {err}"),
        Err(..) => {
            log::warn!("the writer did not drain in time");
            writer_task.abort();
        }
    }
}
