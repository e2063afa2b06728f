use std::sync::Arc;

/// The verb the server uses to check that we're still here
pub const KEEPALIVE: &str = "PING";
/// The verb carrying a chat message
pub const CHAT_MESSAGE: &str = "PRIVMSG";

/// A line that broke one of the token-count assumptions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Malformed {
    #[error("PING without a token")]
    MissingKeepaliveToken,
}

/// What a single line means to the bot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Keepalive { token: Box<str> },
    ChatMessage(Privmsg),
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Privmsg {
    pub sender: Arc<str>,
    pub target: Arc<str>,
    pub body: Arc<str>,
}

impl Event {
    pub fn parse(line: &str) -> Result<Self, Malformed> {
        let tokens = line.split_whitespace().collect::<Vec<_>>();
        Self::from_tokens(&tokens)
    }

    pub fn from_tokens(tokens: &[&str]) -> Result<Self, Malformed> {
        match tokens {
            [] => Ok(Self::Other),

            [KEEPALIVE, token, ..] | [_, KEEPALIVE, token, ..] => Ok(Self::keepalive(token)),
            [KEEPALIVE] | [_, KEEPALIVE] => Err(Malformed::MissingKeepaliveToken),

            [prefix, CHAT_MESSAGE, target, rest @ ..] if !rest.is_empty() => {
                Ok(Self::ChatMessage(Privmsg {
                    sender: sender(prefix).into(),
                    target: (*target).into(),
                    body: body(rest).into(),
                }))
            }

            _ => Ok(Self::Other),
        }
    }

    fn keepalive(token: &str) -> Self {
        Self::Keepalive {
            token: token.into(),
        }
    }
}

/// The nickname part of a `:nick!user@host` prefix
pub fn sender(prefix: &str) -> &str {
    let prefix = prefix.trim_start_matches(':');
    prefix.split_once('!').map_or(prefix, |(nick, _)| nick)
}

fn body(tokens: &[&str]) -> String {
    let body = tokens.join(" ");
    match body.strip_prefix(':') {
        Some(body) => body.to_string(),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn privmsg(line: &str) -> Privmsg {
        match Event::parse(line) {
            Ok(Event::ChatMessage(pm)) => pm,
            other => panic!("expected a privmsg, got {other:?}"),
        }
    }

    #[test]
    fn keepalive() {
        assert_eq!(
            Event::parse("PING :tmi.twitch.tv"),
            Ok(Event::Keepalive {
                token: ":tmi.twitch.tv".into()
            })
        );
        assert_eq!(
            Event::parse(":tmi.twitch.tv PING 12345"),
            Ok(Event::Keepalive {
                token: "12345".into()
            })
        );
        // any second token counts, with or without the ':'
        assert_eq!(
            Event::parse("tmi.twitch.tv PING 12345"),
            Ok(Event::Keepalive {
                token: "12345".into()
            })
        );
    }

    #[test]
    fn keepalive_without_a_token() {
        assert_eq!(Event::parse("PING"), Err(Malformed::MissingKeepaliveToken));
        assert_eq!(
            Event::parse(":tmi.twitch.tv PING"),
            Err(Malformed::MissingKeepaliveToken)
        );
        assert_eq!(
            Event::parse("tmi.twitch.tv PING"),
            Err(Malformed::MissingKeepaliveToken)
        );
    }

    #[test]
    fn chat_message() {
        let pm = privmsg(":nick!user@host PRIVMSG #chan :text with spaces");
        assert_eq!(&*pm.sender, "nick");
        assert_eq!(&*pm.target, "#chan");
        // the whitespace between tokens is normalized and no trailing space is added
        assert_eq!(&*pm.body, "text with spaces");
    }

    #[test]
    fn only_one_marker_is_stripped_from_the_body() {
        let pm = privmsg(":nick!user@host PRIVMSG #chan ::)");
        assert_eq!(&*pm.body, ":)");
    }

    #[test]
    fn short_chat_messages_are_ignored() {
        assert_eq!(Event::parse(":nick!user@host PRIVMSG #chan"), Ok(Event::Other));
        assert_eq!(Event::parse(":nick!user@host PRIVMSG"), Ok(Event::Other));
    }

    #[test]
    fn other_lines() {
        assert_eq!(Event::parse(""), Ok(Event::Other));
        assert_eq!(Event::parse("   "), Ok(Event::Other));
        assert_eq!(Event::parse("NOTICE"), Ok(Event::Other));
        assert_eq!(
            Event::parse(":tmi.twitch.tv 001 touchdown :Welcome, GLHF!"),
            Ok(Event::Other)
        );
    }

    #[test]
    fn sender_extraction() {
        assert_eq!(sender(":nick!user@host"), "nick");
        assert_eq!(sender("nick!user@host"), "nick");
        assert_eq!(sender("::nick"), "nick");
        assert_eq!(sender(":tmi.twitch.tv"), "tmi.twitch.tv");
        assert_eq!(sender(":!host"), "");
    }
}
