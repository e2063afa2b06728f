use std::time::Duration;

pub trait FormatTime {
    fn as_readable_time(&self) -> String;
}

impl FormatTime for Duration {
    fn as_readable_time(&self) -> String {
        const TABLE: [(&str, u64); 4] = [
            ("days", 86400),
            ("hours", 3600),
            ("minutes", 60),
            ("seconds", 1),
        ];

        fn pluralize(s: &str, n: u64) -> String {
            format!("{} {}", n, if n > 1 { s } else { &s[..s.len() - 1] })
        }

        let mut time = vec![];
        let mut secs = self.as_secs();
        for (name, d) in &TABLE {
            let div = secs / d;
            if div > 0 {
                time.push(pluralize(name, div));
                secs -= d * div;
            }
        }

        match time.len() {
            0 => String::from("0 seconds"),
            1 => time.remove(0),
            _ => {
                let last = time.pop().unwrap_or_default();
                format!("{} and {last}", time.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readable_time() {
        let cases = [
            (0, "0 seconds"),
            (1, "1 second"),
            (59, "59 seconds"),
            (61, "1 minute and 1 second"),
            (3600, "1 hour"),
            (90061, "1 day, 1 hour, 1 minute and 1 second"),
        ];
        for (secs, expected) in cases {
            assert_eq!(Duration::from_secs(secs).as_readable_time(), expected);
        }
    }
}
