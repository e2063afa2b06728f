use std::{sync::Arc, time::Duration};

use once_cell::sync::OnceCell;
use tokio::time::Instant;
use touchdown_core::{callable::COMMAND_MARKER, prelude::*, FormatTime};

use crate::config::Lookup;

const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);

/// The commands the bot always has
pub struct Builtin {
    started: Instant,
    client: reqwest::Client,
    lookup: Lookup,
    commands: Arc<OnceCell<Vec<Command>>>,
}

impl Builtin {
    pub fn bind(
        lookup: Lookup,
        commands: Arc<OnceCell<Vec<Command>>>,
    ) -> anyhow::Result<Binding<Self>> {
        let this = Self {
            started: Instant::now(),
            client: reqwest::Client::builder()
                .user_agent(touchdown_core::USER_AGENT)
                .timeout(LOOKUP_TIMEOUT)
                .build()?,
            lookup,
            commands,
        };

        Ok(Binding::create(this)
            .bind(
                Command::new("!ping").help("checks that the bot is alive"),
                Self::ping,
            )
            .bind(
                Command::new("!route").help("shows the current flight route"),
                Self::route,
            )
            .bind(
                Command::new("!uptime").help("shows how long the bot has been running"),
                Self::uptime,
            )
            .bind(
                Command::new("!help")
                    .alias("!commands")
                    .help("lists the commands, or describes one of them")
                    .usage("<command?>")?,
                Self::help,
            ))
    }

    async fn ping(self: Arc<Self>, _: Message) -> anyhow::Result<impl Render> {
        Ok("pong")
    }

    async fn route(self: Arc<Self>, _: Message) -> anyhow::Result<impl Render> {
        let mut req = self
            .client
            .get(&self.lookup.route_url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache");
        if let Some(key) = &self.lookup.api_key {
            req = req.bearer_auth(&key.0);
        }

        let body = req.send().await?.error_for_status()?.text().await?;
        let route = body.trim();
        anyhow::ensure!(!route.is_empty(), "the route service sent nothing back");
        Ok(format!("Current Route: {route}"))
    }

    async fn uptime(self: Arc<Self>, _: Message) -> anyhow::Result<impl Render> {
        let uptime = self.started.elapsed().as_readable_time();
        Ok(format!("I've been running for: {uptime}"))
    }

    async fn help(self: Arc<Self>, msg: Message) -> anyhow::Result<Vec<Response>> {
        let commands = self.commands.get().map(|c| &**c).unwrap_or_default();

        let Some(query) = msg.args().get("command") else {
            return Ok(list_commands(commands));
        };

        let name = if query.starts_with(COMMAND_MARKER) {
            query.to_string()
        } else {
            format!("{COMMAND_MARKER}{query}")
        };

        let out = match commands.iter().find(|cmd| cmd.names().any(|n| n == name)) {
            Some(cmd) => match &cmd.description {
                Some(desc) => Response::reply(format!("{} | {desc}", cmd.synopsis())),
                None => Response::reply(cmd.synopsis()),
            },
            None => Response::problem(format!("cannot find '{name}'")),
        };
        Ok(out.finish())
    }
}

fn list_commands(commands: &[Command]) -> Vec<Response> {
    const MAX: usize = 10;
    commands
        .chunks(MAX)
        .map(|chunk| {
            let names = chunk.iter().map(|cmd| &*cmd.command);
            Response::Say(names.collect::<Vec<_>>().join(" "))
        })
        .collect()
}

/// Builds the registry of built in commands
pub fn registry(lookup: Lookup) -> anyhow::Result<Registry> {
    let commands: Arc<OnceCell<Vec<Command>>> = Arc::default();
    let registry = Registry::builder()
        .binding(Builtin::bind(lookup, Arc::clone(&commands))?)
        .build()?;

    let _ = commands.set(registry.commands().cloned().collect());
    Ok(registry)
}
