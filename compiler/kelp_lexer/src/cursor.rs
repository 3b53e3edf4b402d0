//! Character cursor over source text.
//!
//! Positions are byte offsets into the source so spans can slice the text
//! directly.

pub(crate) struct Cursor<'src> {
    source: &'src str,
    pos: usize,
}

impl<'src> Cursor<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Cursor { source, pos: 0 }
    }

    #[inline]
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    #[inline]
    fn rest(&self) -> &'src str {
        self.source.get(self.pos..).unwrap_or("")
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    #[inline]
    pub(crate) fn peek_second(&self) -> Option<char> {
        self.rest().chars().nth(1)
    }

    #[inline]
    pub(crate) fn peek_third(&self) -> Option<char> {
        self.rest().chars().nth(2)
    }

    pub(crate) fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume `expected` if it is next.
    pub(crate) fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub(crate) fn eat_while(&mut self, mut predicate: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek() {
            if !predicate(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    /// Skip whitespace and `;` line comments.
    pub(crate) fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            if self.peek() == Some(';') {
                self.eat_while(|c| c != '\n');
            } else {
                break;
            }
        }
    }

    pub(crate) fn slice_from(&self, start: usize) -> &'src str {
        self.source.get(start..self.pos).unwrap_or("")
    }
}
