use std::{sync::Arc, time::Duration};

use super::{Entry, Registry};
use crate::{
    args::Match,
    event::Privmsg,
    message::{split_command, Message},
    render::Response,
};

/// How long a single handler may run before it is abandoned
pub const HANDLER_TIMEOUT: Duration = Duration::from_secs(10);

/// Routes chat messages to the handler registered for their first word
///
/// A handler that fails, panics or hangs is logged and otherwise ignored, it
/// never takes the caller down with it.
#[derive(Clone)]
pub struct Dispatcher {
    registry: Arc<Registry>,
    timeout: Duration,
}

impl Dispatcher {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            timeout: HANDLER_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub async fn dispatch(&self, pm: &Privmsg) -> Vec<Response> {
        let (command, rest) = split_command(&pm.body);
        let Some(entry) = self.registry.get(command) else {
            return vec![];
        };

        let args = match entry.command.usage.extract(rest) {
            Match::Match(args) => args,
            Match::Required => {
                let usage = entry.command.synopsis();
                return Response::reply(format!("an argument is required: {usage}")).finish();
            }
            Match::NoMatch => {
                let usage = entry.command.synopsis();
                return Response::reply(format!("invalid arguments: {usage}")).finish();
            }
        };

        self.invoke(entry, Message::new(pm, args)).await
    }

    async fn invoke(&self, entry: &Entry, msg: Message) -> Vec<Response> {
        let name = Arc::clone(&entry.command.command);
        log::debug!("{} invoked {name}", msg.sender_name());

        let handler = Arc::clone(&entry.handler);
        let mut task = tokio::spawn(async move { handler.call(msg).await });

        match tokio::time::timeout(self.timeout, &mut task).await {
            Ok(Ok(Ok(responses))) => responses,
            Ok(Ok(Err(err))) => {
                log::warn!("command {name} failed: {err:#}");
                vec![]
            }
            Ok(Err(err)) => {
                log::error!("command {name} panicked: {err}");
                vec![]
            }
            Err(..) => {
                log::warn!("command {name} timed out after {:?}", self.timeout);
                task.abort();
                vec![]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callable::{Command, Entry};

    fn pm(body: &str) -> Privmsg {
        Privmsg {
            sender: "alice".into(),
            target: "#museun".into(),
            body: body.into(),
        }
    }

    fn dispatcher() -> Dispatcher {
        let registry = Registry::builder()
            .entry(Entry::new(Command::new("!ping"), |_: Message| async {
                anyhow::Ok("pong")
            }))
            .entry(Entry::new(
                Command::new("!guess").usage("<fpm>").unwrap(),
                |msg: Message| async move {
                    let fpm: i32 = msg.args().get_parsed("fpm").unwrap_or(Ok(0))?;
                    anyhow::Ok(Response::reply(format!("{} guessed {fpm}", msg.sender_name())))
                },
            ))
            .entry(Entry::new(Command::new("!broken"), |_: Message| async {
                Err::<(), _>(anyhow::anyhow!("the lookup service is down"))
            }))
            .entry(Entry::new(Command::new("!panic"), |_: Message| async {
                if true {
                    panic!("boom");
                }
                anyhow::Ok(())
            }))
            .entry(Entry::new(Command::new("!slow"), |_: Message| async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                anyhow::Ok("too late")
            }))
            .build()
            .unwrap();

        Dispatcher::new(Arc::new(registry))
    }

    #[tokio::test]
    async fn registered_command() {
        let out = dispatcher().dispatch(&pm("!ping")).await;
        assert_eq!(out, [Response::Say("pong".into())]);
    }

    #[tokio::test]
    async fn unknown_commands_say_nothing() {
        let dispatcher = dispatcher();
        for body in ["hello there", "!pong", "!PING", "ping", "", "   "] {
            assert!(dispatcher.dispatch(&pm(body)).await.is_empty(), "{body}");
        }
    }

    #[tokio::test]
    async fn command_must_be_the_first_word() {
        assert!(dispatcher().dispatch(&pm("say !ping")).await.is_empty());
    }

    #[tokio::test]
    async fn arguments_are_validated_before_the_handler_runs() {
        let dispatcher = dispatcher();

        let out = dispatcher.dispatch(&pm("!guess")).await;
        assert_eq!(
            out,
            [Response::Reply("an argument is required: !guess <fpm>".into())]
        );

        let out = dispatcher.dispatch(&pm("!guess -500 -480")).await;
        assert_eq!(out, [Response::Reply("invalid arguments: !guess <fpm>".into())]);

        let out = dispatcher.dispatch(&pm("!guess -500")).await;
        assert_eq!(out, [Response::Reply("alice guessed -500".into())]);

        let out = dispatcher.dispatch(&pm("!ping extra")).await;
        assert_eq!(out, [Response::Reply("invalid arguments: !ping".into())]);
    }

    #[tokio::test]
    async fn failures_are_contained() {
        let dispatcher = dispatcher();

        // a non-numeric argument makes the handler fail
        assert!(dispatcher.dispatch(&pm("!guess butter")).await.is_empty());
        assert!(dispatcher.dispatch(&pm("!broken")).await.is_empty());
        assert!(dispatcher.dispatch(&pm("!panic")).await.is_empty());

        // and the next message is handled as usual
        let out = dispatcher.dispatch(&pm("!ping")).await;
        assert_eq!(out, [Response::Say("pong".into())]);
    }

    #[tokio::test(start_paused = true)]
    async fn hung_handlers_are_abandoned() {
        let dispatcher = dispatcher().with_timeout(Duration::from_secs(1));
        assert!(dispatcher.dispatch(&pm("!slow")).await.is_empty());

        let out = dispatcher.dispatch(&pm("!ping")).await;
        assert_eq!(out, [Response::Say("pong".into())]);
    }
}
