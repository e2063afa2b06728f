use touchdown_config::{load_from_env, Key, LoadFromEnv, Secret};

pub const DEFAULT_ROUTE_URL: &str = "http://maria.ryannull.com/twitch/data.php?thing=rte";

/// Where the lookup commands get their data from
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Lookup {
    pub route_url: String,
    /// sent as a bearer token with lookups, when set
    pub api_key: Option<Secret>,
}

impl LoadFromEnv for Lookup {
    fn load_from_env() -> anyhow::Result<Self> {
        load_from_env(&[
            (Key::Default("T_ROUTE_URL", DEFAULT_ROUTE_URL), |t, v| {
                t.route_url = v;
                Ok(())
            }),
            (Key::Optional("T_API_KEY"), |t, v| {
                t.api_key = Some(Secret(v)).filter(|s| !s.trim().is_empty());
                Ok(())
            }),
        ])
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Config {
    pub irc: touchdown_twitch::config::Irc,
    pub status: touchdown_status::config::Status,
    pub lookup: self::Lookup,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Ok(Self {
            irc: LoadFromEnv::load_from_env()?,
            status: LoadFromEnv::load_from_env()?,
            lookup: LoadFromEnv::load_from_env()?,
        })
    }
}
