use std::sync::Arc;

use crate::{args::Arguments, event::Privmsg};

/// A command invocation as seen by a handler
#[derive(Clone, Debug)]
pub struct Message {
    sender: Arc<str>,
    channel: Arc<str>,
    data: Arc<str>,
    args: Arguments,
}

impl Message {
    pub fn new(pm: &Privmsg, args: Arguments) -> Self {
        Self {
            sender: Arc::clone(&pm.sender),
            channel: Arc::clone(&pm.target),
            data: Arc::clone(&pm.body),
            args,
        }
    }

    /// The full chat message body, command included
    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn sender_name(&self) -> &str {
        &self.sender
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn command(&self) -> &str {
        split_command(&self.data).0
    }

    /// Everything after the command, or an empty string
    pub fn rest(&self) -> &str {
        split_command(&self.data).1
    }

    pub fn args(&self) -> &Arguments {
        &self.args
    }
}

/// Splits a body into its leading token and the trimmed remainder
pub fn split_command(input: &str) -> (&str, &str) {
    let input = input.trim_start();
    input
        .split_once(char::is_whitespace)
        .map_or((input, ""), |(head, tail)| (head, tail.trim()))
}
