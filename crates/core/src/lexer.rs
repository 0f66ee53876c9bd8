//! Streaming tokenizer for the definition language.
//!
//! Character handling is table-driven: every character in the 8-bit
//! range carries an OR-able set of classes, configured by the caller
//! before the first read. Comments and multi-character operators fall
//! out of the classification rather than being hard-coded -- `::=` is a
//! run of operator-letter characters, `/* */` is a comment-open
//! character followed by a comment-close character, and so on.

use crate::error::SyntaxError;

// Character classes. Additive: a character may carry several.
pub const WHITESPACE: u8 = 1;
pub const DIGIT: u8 = 1 << 1;
pub const ID_LETTER: u8 = 1 << 2;
pub const OP_LETTER: u8 = 1 << 3;
pub const QUOTE: u8 = 1 << 4;
pub const ESCAPE: u8 = 1 << 5;
pub const COMMENT_OPEN: u8 = 1 << 6;
pub const COMMENT_CLOSE: u8 = 1 << 7;

/// A classified token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// End of input
    Eof,
    /// Run of digit-class characters, parsed as a decimal integer
    Number(i64),
    /// Identifier or operator run
    Word(String),
    /// Quoted string (content without the quotes, escapes resolved)
    Quoted { quote: char, value: String },
    /// Any other single character
    Char(char),
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Number(n) => write!(f, "number {}", n),
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Quoted { quote, value } => write!(f, "{}{}{}", quote, value, quote),
            Token::Char(c) => write!(f, "'{}'", c),
        }
    }
}

/// A token plus the 1-based line it ended on.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: u32,
}

/// Table-driven tokenizer with one token of push-back.
pub struct Tokenizer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    filename: String,
    ctype: [u8; 256],
    block_comments: bool,
    line_comments: bool,
    pushback: Option<Spanned>,
}

impl Tokenizer {
    /// Create a tokenizer with the conventional default classification:
    /// ASCII letters and `_` are identifier letters, `0`-`9` digits,
    /// control characters and space whitespace, the usual C operator
    /// characters operator letters, `'` and `"` quotes, `\` the escape
    /// character, and `/`/`*` the comment delimiters. Both comment
    /// styles start enabled.
    pub fn new(src: &str, filename: &str) -> Self {
        let mut t = Tokenizer {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            filename: filename.to_owned(),
            ctype: [0; 256],
            block_comments: true,
            line_comments: true,
            pushback: None,
        };
        t.set_class_range('\u{0000}', ' ', WHITESPACE);
        t.set_class_range('a', 'z', ID_LETTER);
        t.set_class_range('A', 'Z', ID_LETTER);
        t.set_class_chars("_", ID_LETTER);
        t.set_class_chars("!%&*+-/<=>^~|", OP_LETTER);
        t.set_class_chars("'\"", QUOTE);
        t.set_class_chars("\\", ESCAPE);
        t.set_class_range('0', '9', DIGIT);
        t.set_class_chars("/", COMMENT_OPEN);
        t.set_class_chars("*", COMMENT_CLOSE);
        t
    }

    /// Clear every class assignment.
    pub fn reset_syntax(&mut self) {
        self.ctype = [0; 256];
    }

    /// Add `class` to every character in `low..=high` (clamped to the
    /// table range).
    pub fn set_class_range(&mut self, low: char, high: char, class: u8) {
        for code in low as u32..=high as u32 {
            if let Some(slot) = self.ctype.get_mut(code as usize) {
                *slot |= class;
            }
        }
    }

    /// Add `class` to every character in `chars`.
    pub fn set_class_chars(&mut self, chars: &str, class: u8) {
        for c in chars.chars() {
            if let Some(slot) = self.ctype.get_mut(c as usize) {
                *slot |= class;
            }
        }
    }

    pub fn use_block_comments(&mut self, enabled: bool) {
        self.block_comments = enabled;
    }

    pub fn use_line_comments(&mut self, enabled: bool) {
        self.line_comments = enabled;
    }

    /// Current 1-based line number.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Re-deliver `token` on the next read. Only one token deep.
    pub fn push_back(&mut self, token: Spanned) {
        self.pushback = Some(token);
    }

    fn is_class(&self, c: char, class: u8) -> bool {
        match self.ctype.get(c as usize) {
            Some(slot) => slot & class != 0,
            // Characters beyond the table read as identifier letters.
            None => class == ID_LETTER,
        }
    }

    fn read(&mut self) -> Option<char> {
        let c = self.chars.get(self.pos).copied();
        if c.is_some() {
            self.pos += 1;
        }
        c
    }

    fn unread(&mut self) {
        self.pos -= 1;
    }

    fn spanned(&self, token: Token) -> Spanned {
        Spanned {
            token,
            line: self.line,
        }
    }

    fn eof_in(&self, what: &str) -> SyntaxError {
        SyntaxError::lex(
            &self.filename,
            self.line,
            format!("unexpected end of input in {}", what),
        )
    }

    /// Read the next token. Whitespace and comments are consumed
    /// silently; newlines increment the line counter.
    pub fn next_token(&mut self) -> Result<Spanned, SyntaxError> {
        if let Some(t) = self.pushback.take() {
            return Ok(t);
        }
        loop {
            let Some(c) = self.read() else {
                return Ok(self.spanned(Token::Eof));
            };

            // Possible comment start; decided by the next character.
            if self.is_class(c, COMMENT_OPEN) {
                match self.read() {
                    Some(c2) if self.block_comments && self.is_class(c2, COMMENT_CLOSE) => {
                        self.skip_block_comment()?;
                        continue;
                    }
                    Some(c2) if self.line_comments && self.is_class(c2, COMMENT_OPEN) => {
                        self.skip_line_comment();
                        continue;
                    }
                    Some(_) => self.unread(),
                    None => {}
                }
                // Not a comment after all; classify `c` normally below.
            }

            if self.is_class(c, WHITESPACE) {
                if c == '\n' {
                    self.line += 1;
                }
                continue;
            }
            if self.is_class(c, DIGIT) {
                return self.lex_number(c);
            }
            if self.is_class(c, ID_LETTER) {
                return Ok(self.lex_identifier(c));
            }
            if self.is_class(c, OP_LETTER) {
                return Ok(self.lex_operator(c));
            }
            if self.is_class(c, QUOTE) {
                return self.lex_quoted(c);
            }
            return Ok(self.spanned(Token::Char(c)));
        }
    }

    fn lex_number(&mut self, first: char) -> Result<Spanned, SyntaxError> {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.read() {
            if self.is_class(c, DIGIT) {
                text.push(c);
            } else {
                self.unread();
                break;
            }
        }
        let value: i64 = text.parse().map_err(|_| {
            SyntaxError::lex(
                &self.filename,
                self.line,
                format!("integer literal '{}' out of range", text),
            )
        })?;
        Ok(self.spanned(Token::Number(value)))
    }

    fn lex_identifier(&mut self, first: char) -> Spanned {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.read() {
            if self.is_class(c, ID_LETTER | DIGIT) {
                text.push(c);
            } else {
                self.unread();
                break;
            }
        }
        self.spanned(Token::Word(text))
    }

    fn lex_operator(&mut self, first: char) -> Spanned {
        let mut text = String::new();
        text.push(first);
        while let Some(c) = self.read() {
            if self.is_class(c, OP_LETTER) {
                text.push(c);
            } else {
                self.unread();
                break;
            }
        }
        self.spanned(Token::Word(text))
    }

    fn lex_quoted(&mut self, quote: char) -> Result<Spanned, SyntaxError> {
        let mut value = String::new();
        loop {
            let Some(c) = self.read() else {
                return Err(self.eof_in("string"));
            };
            if c == '\n' {
                self.line += 1;
            }
            if c == quote {
                return Ok(self.spanned(Token::Quoted { quote, value }));
            }
            if self.is_class(c, ESCAPE) {
                let Some(e) = self.read() else {
                    return Err(self.eof_in("escape sequence"));
                };
                if e == '\n' {
                    self.line += 1;
                }
                match e {
                    'n' => value.push('\n'),
                    't' => value.push('\t'),
                    other => value.push(other),
                }
                continue;
            }
            value.push(c);
        }
    }

    /// Consume a block comment body. The comment ends at a close-class
    /// character followed by an open-class character (`*` `/` under the
    /// default classification); close-class characters may repeat
    /// before the terminator.
    fn skip_block_comment(&mut self) -> Result<(), SyntaxError> {
        loop {
            let Some(c) = self.read() else {
                return Err(self.eof_in("comment"));
            };
            if c == '\n' {
                self.line += 1;
            }
            if !self.is_class(c, COMMENT_CLOSE) {
                continue;
            }
            loop {
                let Some(c2) = self.read() else {
                    return Err(self.eof_in("comment"));
                };
                if c2 == '\n' {
                    self.line += 1;
                }
                if self.is_class(c2, COMMENT_OPEN) {
                    return Ok(());
                }
                if !self.is_class(c2, COMMENT_CLOSE) {
                    break;
                }
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.read() {
            if c == '\n' {
                self.line += 1;
                break;
            }
        }
    }
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
