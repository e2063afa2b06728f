/// The longest name twitch allows
pub const MAX_NAME_LEN: usize = 25;

/// A validated landing announcement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    pub name: String,
    pub guess: i32,
    pub actual: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidLanding {
    #[error("invalid name: '{0}'")]
    Name(String),
    #[error("invalid guess: '{0}'")]
    Guess(String),
    #[error("invalid landing rate: '{0}'")]
    Actual(String),
}

impl Landing {
    pub fn parse(name: &str, guess: &str, actual: &str) -> Result<Self, InvalidLanding> {
        if name.is_empty()
            || name.chars().count() > MAX_NAME_LEN
            || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(InvalidLanding::Name(name.to_string()));
        }

        let guess = guess
            .parse()
            .map_err(|_| InvalidLanding::Guess(guess.to_string()))?;
        let actual = actual
            .parse()
            .map_err(|_| InvalidLanding::Actual(actual.to_string()))?;

        Ok(Self {
            name: name.to_string(),
            guess,
            actual,
        })
    }

    pub fn announcement(&self) -> String {
        let Self {
            name,
            guess,
            actual,
        } = self;
        format!(
            "We've landed at {actual} fpm! \
            Congratulations to {name} with the closest correct guess of {guess} -fpm."
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn announcement() {
        let landing = Landing::parse("Alice", "-500", "-480").unwrap();
        assert_eq!(
            landing.announcement(),
            "We've landed at -480 fpm! Congratulations to Alice with the closest correct guess of -500 -fpm."
        );
    }

    #[test]
    fn rejects_bad_segments() {
        for name in ["", "al ice", "alice!", "PRIVMSG\r\n", &"a".repeat(26)] {
            assert_eq!(
                Landing::parse(name, "1", "2"),
                Err(InvalidLanding::Name(name.to_string()))
            );
        }
        assert_eq!(
            Landing::parse("alice", "butter", "2"),
            Err(InvalidLanding::Guess("butter".into()))
        );
        assert_eq!(
            Landing::parse("alice", "1", "99999999999"),
            Err(InvalidLanding::Actual("99999999999".into()))
        );
        assert!(Landing::parse(&"a".repeat(25), "+1", "0").is_ok());
    }
}
