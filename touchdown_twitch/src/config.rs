use touchdown_config::{load_from_env, parse_flag, Key, LoadFromEnv, Secret};
use touchdown_core::framer::Terminators;

pub const DEFAULT_HOST: &str = "irc.chat.twitch.tv";
pub const DEFAULT_PORT: &str = "6667";

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Irc {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub pass: Secret,
    /// without the leading `#`
    pub channel: String,
    /// also treat `~` as a line terminator
    pub split_on_tilde: bool,
}

impl Irc {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub const fn terminators(&self) -> Terminators {
        if self.split_on_tilde {
            Terminators::WithTilde
        } else {
            Terminators::Standard
        }
    }
}

impl LoadFromEnv for Irc {
    fn load_from_env() -> anyhow::Result<Self> {
        load_from_env(&[
            (Key::Default("T_HOST", DEFAULT_HOST), |t, v| {
                t.host = v;
                Ok(())
            }),
            (Key::Default("T_PORT", DEFAULT_PORT), |t, v| {
                t.port = v.trim().parse()?;
                Ok(())
            }),
            (Key::Required("T_NICK"), |t, v| {
                t.name = v;
                Ok(())
            }),
            (Key::Required("T_PASS"), |t, v| {
                t.pass = Secret(v);
                Ok(())
            }),
            (Key::Required("T_CHAN"), |t, v| {
                t.channel = v.trim().trim_start_matches('#').to_string();
                anyhow::ensure!(!t.channel.is_empty(), "the channel cannot be empty");
                Ok(())
            }),
            (Key::Default("T_SPLIT_ON_TILDE", "false"), |t, v| {
                t.split_on_tilde = parse_flag(&v)?;
                Ok(())
            }),
        ])
    }
}
