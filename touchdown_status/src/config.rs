use touchdown_config::{load_from_env, Key, LoadFromEnv, Secret};

pub const DEFAULT_ADDRESS: &str = "0.0.0.0:8000";

#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Status {
    pub address: String,
    /// when set, announcements need `Authorization: Bearer <token>`
    pub bearer: Option<Secret>,
}

impl LoadFromEnv for Status {
    fn load_from_env() -> anyhow::Result<Self> {
        load_from_env(&[
            (Key::Default("T_STATUS_ADDRESS", DEFAULT_ADDRESS), |t, v| {
                t.address = v;
                Ok(())
            }),
            (Key::Optional("T_STATUS_BEARER"), |t, v| {
                t.bearer = Some(Secret(v)).filter(|s| !s.trim().is_empty());
                Ok(())
            }),
        ])
    }
}
