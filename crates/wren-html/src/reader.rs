//! Code point reader over the markup source.
//!
//! The reader walks a `&str` one `char` at a time. Positions are byte
//! offsets that always sit on a character boundary, so slices taken between
//! two positions never split a multi-byte code point.

/// Cursor over the source text.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Reader<'a> {
    /// Create a reader positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current byte offset into the input.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// True once every character has been consumed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// The unconsumed remainder of the input.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    /// Text between two positions previously returned by [`Self::position`].
    ///
    /// Out-of-range or inverted bounds yield an empty string.
    #[must_use]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.input.get(start..end).unwrap_or("")
    }

    /// Look at the next character without consuming it.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Look `offset` characters ahead without consuming anything.
    #[must_use]
    pub fn peek_nth(&self, offset: usize) -> Option<char> {
        self.rest().chars().nth(offset)
    }

    /// Consume the next character.
    pub fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume the next character, discarding it.
    pub fn advance(&mut self) {
        if let Some(c) = self.peek() {
            self.pos += c.len_utf8();
        }
    }

    /// Consume the next character if it is `expected`.
    pub fn consume_if(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// True if the unconsumed input starts with `prefix`.
    #[must_use]
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.rest().starts_with(prefix)
    }

    /// Like [`Self::starts_with`], ignoring ASCII case.
    #[must_use]
    pub fn starts_with_ignore_ascii_case(&self, prefix: &str) -> bool {
        self.rest()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    }

    /// Consume `prefix` if the input starts with it.
    pub fn skip_prefix(&mut self, prefix: &str) -> bool {
        if self.starts_with(prefix) {
            self.pos += prefix.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while `predicate` holds, returning them.
    pub fn consume_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.input[start..self.pos]
    }

    /// Consume whitespace.
    pub fn skip_whitespace(&mut self) {
        let _ = self.consume_while(char::is_whitespace);
    }

    /// Consume up to and including the next `delimiter`.
    ///
    /// Returns the text before the delimiter and whether it was found. When
    /// it is missing the rest of the input is consumed.
    pub fn consume_through(&mut self, delimiter: &str) -> (&'a str, bool) {
        let start = self.pos;
        if let Some(offset) = self.rest().find(delimiter) {
            self.pos += offset + delimiter.len();
            (&self.input[start..start + offset], true)
        } else {
            self.pos = self.input.len();
            (&self.input[start..], false)
        }
    }
}

impl Iterator for Reader<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.consume()
    }
}
