use std::{collections::HashMap, str::FromStr};

/// Arguments extracted for a single command invocation
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Arguments {
    map: HashMap<Box<str>, Box<str>>,
}

impl Arguments {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|s| &**s)
    }

    pub fn get_parsed<T>(&self, key: &str) -> Option<anyhow::Result<T>>
    where
        T: FromStr,
        T::Err: Into<anyhow::Error>,
    {
        self.get(key)
            .map(<str>::parse)
            .map(|c| c.map_err(Into::into))
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// The outcome of matching input against a [`Usage`]
#[derive(Debug, PartialEq, Eq)]
pub enum Match {
    /// a required argument was not provided
    Required,
    /// arguments were provided but the command doesn't take them
    NoMatch,
    Match(Arguments),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Kind {
    Required,
    Optional,
    Variadic,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arg {
    pub key: Box<str>,
    pub kind: Kind,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UsageError {
    #[error("'{0}' was already used")]
    Duplicate(String),
    #[error("'{0}' is not a valid argument pattern")]
    Invalid(String),
    #[error("'{0}' cannot follow an optional or variadic argument")]
    AfterOptional(String),
}

/// The argument shape a command declares
///
/// Written as `<required> <optional?> <rest..>`. A variadic argument takes the
/// remainder of the line and must come last.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct Usage {
    usage: Box<str>,
    args: Box<[Arg]>,
}

impl Usage {
    pub fn parse(input: &str) -> Result<Self, UsageError> {
        let mut args: Vec<Arg> = vec![];

        for token in input.split_ascii_whitespace() {
            let all_alpha = |s: &[u8]| !s.is_empty() && s.iter().all(u8::is_ascii_alphabetic);

            let (key, kind) = match token.as_bytes() {
                [b'<', arg @ .., b'.', b'.', b'>'] if all_alpha(arg) => (arg, Kind::Variadic),
                [b'<', arg @ .., b'?', b'>'] if all_alpha(arg) => (arg, Kind::Optional),
                [b'<', arg @ .., b'>'] if all_alpha(arg) => (arg, Kind::Required),
                _ => return Err(UsageError::Invalid(token.to_string())),
            };

            let key = String::from_utf8_lossy(key);
            if args.iter().any(|arg| *arg.key == *key) {
                return Err(UsageError::Duplicate(key.into_owned()));
            }

            match args.last().map(|arg| arg.kind) {
                Some(Kind::Variadic) => return Err(UsageError::AfterOptional(token.to_string())),
                Some(Kind::Optional) if kind == Kind::Required => {
                    return Err(UsageError::AfterOptional(token.to_string()))
                }
                _ => {}
            }

            args.push(Arg {
                key: key.into(),
                kind,
            });
        }

        Ok(Self {
            usage: Box::from(input),
            args: args.into(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.usage
    }

    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    fn requires_input(&self) -> bool {
        self.args.iter().any(|arg| arg.kind == Kind::Required)
    }

    /// Splits `input` into the declared arguments
    pub fn extract(&self, input: &str) -> Match {
        let mut input = input.trim();

        if input.is_empty() {
            if self.requires_input() {
                return Match::Required;
            }
            return Match::Match(Arguments::default());
        }

        if self.args.is_empty() {
            return Match::NoMatch;
        }

        let mut map = HashMap::new();
        for Arg { key, kind } in &*self.args {
            if input.is_empty() {
                if *kind == Kind::Required {
                    return Match::Required;
                }
                break;
            }

            match (kind, input.split_once(char::is_whitespace)) {
                (Kind::Variadic, ..) | (.., None) => {
                    map.insert(key.clone(), Box::from(input));
                    input = "";
                }
                (.., Some((head, tail))) => {
                    map.insert(key.clone(), Box::from(head));
                    input = tail.trim_start();
                }
            }
        }

        if !input.is_empty() {
            return Match::NoMatch;
        }

        Match::Match(Arguments { map })
    }
}

impl std::fmt::Display for Usage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.usage)
    }
}
