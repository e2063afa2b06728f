/// Which bytes end a line
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Terminators {
    /// carriage-return and line-feed
    #[default]
    Standard,
    /// carriage-return, line-feed and `~`.
    ///
    /// This is not part of the protocol. Some deployments relied on it, so it
    /// can be turned on, but a message containing a `~` gets cut in two.
    WithTilde,
}

impl Terminators {
    const fn matches(self, byte: u8) -> bool {
        match self {
            Self::Standard => matches!(byte, b'\r' | b'\n'),
            Self::WithTilde => matches!(byte, b'\r' | b'\n' | b'~'),
        }
    }
}

/// The longest unterminated tail that is kept, anything longer is discarded
///
/// A Twitch line with all of its tags fits well within this.
pub const MAX_PENDING: usize = 8 * 1024;

/// Reassembles a byte stream into complete lines
///
/// Bytes are retained until a terminator shows up, so where the chunk
/// boundaries fall has no effect on the lines that come out. A tail longer
/// than [`MAX_PENDING`] is thrown away up to and including its terminator.
#[derive(Debug, Default)]
pub struct Framer {
    buf: Vec<u8>,
    terminators: Terminators,
    // the rest of an oversized line is still arriving
    discarding: bool,
}

impl Framer {
    pub fn new(terminators: Terminators) -> Self {
        Self {
            buf: Vec::with_capacity(1024),
            terminators,
            discarding: false,
        }
    }

    pub const fn terminators(&self) -> Terminators {
        self.terminators
    }

    /// Appends `chunk` and yields every line that is now complete
    ///
    /// The iterator is lazy. If it is dropped early the remaining lines stay
    /// buffered and come out of the next call.
    pub fn feed(&mut self, chunk: &[u8]) -> Lines<'_> {
        self.buf.extend_from_slice(chunk);
        Lines { framer: self }
    }

    /// The unterminated tail
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    fn next_line(&mut self) -> Option<String> {
        loop {
            let Some(end) = self.buf.iter().position(|&b| self.terminators.matches(b)) else {
                if self.buf.len() > MAX_PENDING {
                    log::warn!(
                        "discarding {} bytes without a line terminator",
                        self.buf.len()
                    );
                    self.buf.clear();
                    self.discarding = true;
                }
                return None;
            };

            let skip = self.buf[end..]
                .iter()
                .take_while(|&&b| self.terminators.matches(b))
                .count();

            if std::mem::take(&mut self.discarding) {
                self.buf.drain(..end + skip);
                continue;
            }

            let line: Vec<u8> = self.buf.drain(..end + skip).take(end).collect();
            let line = String::from_utf8_lossy(&line);
            let line = line.trim_end();
            if !line.is_empty() {
                return Some(line.to_string());
            }
        }
    }
}

pub struct Lines<'a> {
    framer: &'a mut Framer,
}

impl<'a> Iterator for Lines<'a> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        self.framer.next_line()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "PING :tmi.twitch.tv\r\n\
        :alice!alice@alice.tmi.twitch.tv PRIVMSG #museun :!route please\r\n\
        :bob!bob@bob.tmi.twitch.tv PRIVMSG #museun :caf\u{e9} \u{1f6ec}\r\n\
        :tmi.twitch.tv 001 touchdown :Welcome, GLHF!\r\n";

    fn frame_all(framer: &mut Framer, chunks: &[&[u8]]) -> Vec<String> {
        chunks
            .iter()
            .flat_map(|chunk| framer.feed(chunk).collect::<Vec<_>>())
            .collect()
    }

    #[test]
    fn keeps_the_unterminated_tail() {
        let mut framer = Framer::default();
        let lines: Vec<_> = framer.feed(b"PING :a\r\nPRIVMSG #c :hel").collect();
        assert_eq!(lines, ["PING :a"]);
        assert_eq!(framer.pending(), b"PRIVMSG #c :hel");

        let lines: Vec<_> = framer.feed(b"lo\r\n").collect();
        assert_eq!(lines, ["PRIVMSG #c :hello"]);
        assert!(framer.pending().is_empty());
    }

    #[test]
    fn runs_of_terminators_collapse() {
        let mut framer = Framer::default();
        let lines: Vec<_> = framer.feed(b"\r\n\r\na\r\r\n\nb  \t\r\n   \r\n").collect();
        assert_eq!(lines, ["a", "b"]);
    }

    #[test]
    fn tilde_is_opt_in() {
        let mut framer = Framer::default();
        let lines: Vec<_> = framer.feed(b"a~b\r\n").collect();
        assert_eq!(lines, ["a~b"]);

        let mut framer = Framer::new(Terminators::WithTilde);
        let lines: Vec<_> = framer.feed(b"a~b\r\n~~c").collect();
        assert_eq!(lines, ["a", "b"]);
        assert_eq!(framer.pending(), b"c");
    }

    #[test]
    fn dropping_the_iterator_is_restartable() {
        let mut framer = Framer::default();
        assert_eq!(framer.feed(b"a\r\nb\r\nc\r\n").next().as_deref(), Some("a"));
        let rest: Vec<_> = framer.feed(b"").collect();
        assert_eq!(rest, ["b", "c"]);
    }

    #[test]
    fn chunk_boundaries_do_not_matter() {
        let whole = frame_all(&mut Framer::default(), &[SAMPLE.as_bytes()]);
        assert_eq!(whole.len(), 4);

        let bytes = SAMPLE.as_bytes();
        for i in 0..=bytes.len() {
            let (a, b) = bytes.split_at(i);
            assert_eq!(frame_all(&mut Framer::default(), &[a, b]), whole, "split at {i}");
        }

        for i in (0..=bytes.len()).step_by(3) {
            for j in (i..=bytes.len()).step_by(5) {
                let (a, rest) = bytes.split_at(i);
                let (b, c) = rest.split_at(j - i);
                assert_eq!(
                    frame_all(&mut Framer::default(), &[a, b, c]),
                    whole,
                    "split at {i} and {j}"
                );
            }
        }

        let single: Vec<&[u8]> = bytes.chunks(1).collect();
        assert_eq!(frame_all(&mut Framer::default(), &single), whole);
    }

    #[test]
    fn oversized_lines_are_discarded() {
        let mut framer = Framer::default();
        let long = vec![b'x'; MAX_PENDING];
        assert_eq!(framer.feed(&long).count(), 0);
        assert_eq!(framer.pending().len(), MAX_PENDING);

        assert_eq!(framer.feed(b"x").count(), 0);
        assert!(framer.pending().is_empty());

        // the rest of that line goes too, the next one is intact
        let lines: Vec<_> = framer.feed(b"xxxx\r\nPING :a\r\n").collect();
        assert_eq!(lines, ["PING :a"]);
    }

    #[test]
    fn the_longest_line_is_kept() {
        let mut framer = Framer::default();
        let long = "x".repeat(MAX_PENDING);
        let lines = frame_all(&mut framer, &[long.as_bytes(), b"\r\n"]);
        assert_eq!(lines, [long]);
    }

    #[test]
    fn multibyte_characters_survive_a_split() {
        let line = "PRIVMSG #c :\u{1f6ec}\r\n".as_bytes();
        let pos = line.len() - 4;
        let lines = frame_all(&mut Framer::default(), &[&line[..pos], &line[pos..]]);
        assert_eq!(lines, ["PRIVMSG #c :\u{1f6ec}"]);
    }
}
