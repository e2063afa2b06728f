use anyhow::Context;

/// How a single environment variable is looked up
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Key {
    /// the variable must be set
    Required(&'static str),
    /// falls back to the default when unset
    Default(&'static str, &'static str),
    /// the assignment is skipped when unset
    Optional(&'static str),
}

impl Key {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Required(key) | Self::Default(key, ..) | Self::Optional(key) => key,
        }
    }

    fn lookup(&self) -> anyhow::Result<Option<String>> {
        let key = self.name();
        log::trace!("looking up {key}");
        match (std::env::var(key), self) {
            (Ok(value), ..) => Ok(Some(value)),
            (Err(..), Self::Default(.., default)) => Ok(Some(default.to_string())),
            (Err(..), Self::Optional(..)) => Ok(None),
            (Err(err), Self::Required(..)) => {
                Err(err).with_context(|| anyhow::anyhow!("key '{key}' was not found"))
            }
        }
    }
}

pub type Assign<T> = fn(&mut T, String) -> anyhow::Result<()>;

pub fn load_from_env<T: Default + std::fmt::Debug>(
    keys: &[(Key, Assign<T>)],
) -> anyhow::Result<T> {
    log::trace!("loading env vars for: {}", std::any::type_name::<T>());

    let this = keys.iter().try_fold(T::default(), |mut this, (key, func)| {
        if let Some(value) = key.lookup()? {
            func(&mut this, value).with_context(|| format!("invalid value for '{}'", key.name()))?;
        }
        Ok(this)
    });

    if let Ok(this) = &this {
        log::debug!("created: {:?}", this);
    }
    this
}

pub trait LoadFromEnv
where
    Self: Sized,
{
    fn load_from_env() -> anyhow::Result<Self>;
}

/// Parses the usual spellings of a boolean flag
pub fn parse_flag(value: &str) -> anyhow::Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        s => anyhow::bail!("'{s}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Debug)]
    struct Sample {
        host: String,
        port: u16,
        token: Option<String>,
    }

    // each test uses its own variable names, the environment is process-wide
    fn sample_keys(prefix: &'static str) -> [(Key, Assign<Sample>); 3] {
        let keys: [&'static str; 3] = match prefix {
            "A" => ["TD_A_HOST", "TD_A_PORT", "TD_A_TOKEN"],
            "B" => ["TD_B_HOST", "TD_B_PORT", "TD_B_TOKEN"],
            _ => ["TD_C_HOST", "TD_C_PORT", "TD_C_TOKEN"],
        };
        [
            (Key::Required(keys[0]), |t, v| {
                t.host = v;
                Ok(())
            }),
            (Key::Default(keys[1], "6667"), |t, v| {
                t.port = v.parse()?;
                Ok(())
            }),
            (Key::Optional(keys[2]), |t, v| {
                t.token = Some(v);
                Ok(())
            }),
        ]
    }

    #[test]
    fn defaults_and_optionals() {
        std::env::set_var("TD_A_HOST", "localhost");
        let sample: Sample = load_from_env(&sample_keys("A")).unwrap();
        assert_eq!(sample.host, "localhost");
        assert_eq!(sample.port, 6667);
        assert_eq!(sample.token, None);
    }

    #[test]
    fn missing_required_key() {
        let err = load_from_env(&sample_keys("B")).unwrap_err();
        assert!(format!("{err:#}").contains("TD_B_HOST"));
    }

    #[test]
    fn bad_value_names_the_key() {
        std::env::set_var("TD_C_HOST", "localhost");
        std::env::set_var("TD_C_PORT", "not a port");
        let err = load_from_env(&sample_keys("C")).unwrap_err();
        assert!(err.to_string().contains("TD_C_PORT"));
    }

    #[test]
    fn flags() {
        assert!(parse_flag("TRUE").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("off").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
