//! Character cursor shared by both expression front-ends.
//!
//! Tracks the character offset for error reporting and provides the
//! matching primitives both the unicode operator table and the ASCII
//! keyword table are built on.

use crate::error::{EngineError, EngineResult};

pub struct Cursor {
    chars: Vec<char>,
    position: usize,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            position: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.position += 1;
        }
    }

    pub fn at_end(&mut self) -> bool {
        self.skip_whitespace();
        self.position >= self.chars.len()
    }

    /// Parse error at the current offset
    pub fn error(&self, message: impl Into<String>) -> EngineError {
        EngineError::parse(self.position, message)
    }

    /// Match a literal token after skipping whitespace
    pub fn match_symbol(&mut self, token: &str) -> bool {
        self.skip_whitespace();
        let token_chars: Vec<char> = token.chars().collect();
        if self.chars[self.position.min(self.chars.len())..].starts_with(&token_chars) {
            self.position += token_chars.len();
            true
        } else {
            false
        }
    }

    /// Match a case-insensitive whole word after skipping whitespace
    pub fn match_word(&mut self, word: &str) -> bool {
        self.skip_whitespace();
        let word_chars: Vec<char> = word.chars().collect();
        let end = self.position + word_chars.len();
        if end > self.chars.len() {
            return false;
        }
        let matches = self.chars[self.position..end]
            .iter()
            .zip(word_chars.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if !matches {
            return false;
        }
        if let Some(&next) = self.chars.get(end) {
            if next.is_ascii_alphanumeric() || next == '_' {
                return false;
            }
        }
        self.position = end;
        true
    }

    pub fn expect(&mut self, token: &str, message: &str) -> EngineResult<()> {
        if self.match_symbol(token) {
            Ok(())
        } else {
            Err(self.error(message))
        }
    }

    /// Bare or double-quoted relation identifier
    pub fn read_identifier(&mut self) -> EngineResult<String> {
        self.skip_whitespace();
        if self.peek() == Some('"') {
            self.position += 1;
            let mut value = String::new();
            while let Some(c) = self.peek() {
                self.position += 1;
                if c == '"' {
                    return Ok(value);
                }
                value.push(c);
            }
            return Err(self.error("Unterminated quoted identifier"));
        }

        match self.peek() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return Err(self.error("Expected identifier")),
        }
        let mut value = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '.' {
                value.push(c);
                self.position += 1;
            } else {
                break;
            }
        }
        Ok(value)
    }

    /// Optional `_{…}` or `_raw` subscript following an operator symbol.
    ///
    /// The braced form captures everything up to the closing brace; the
    /// bare form captures up to the opening parenthesis of the operand.
    pub fn read_subscript(&mut self, missing_brace: &str) -> EngineResult<String> {
        self.skip_whitespace();
        if !self.match_symbol("_") {
            return Ok(String::new());
        }
        self.skip_whitespace();
        if self.match_symbol("{") {
            let mut raw = String::new();
            while let Some(c) = self.peek() {
                if c == '}' {
                    break;
                }
                raw.push(c);
                self.position += 1;
            }
            self.expect("}", missing_brace)?;
            Ok(raw.trim().to_string())
        } else {
            let mut raw = String::new();
            while let Some(c) = self.peek() {
                if c == '(' {
                    break;
                }
                raw.push(c);
                self.position += 1;
            }
            Ok(raw.trim().to_string())
        }
    }

    /// Raw text up to the next top-level comma or closing bracket
    pub fn read_until_comma(&mut self) -> String {
        let mut depth = 0usize;
        let mut buffer = String::new();
        while let Some(c) = self.peek() {
            match c {
                '(' | '[' | '{' => depth += 1,
                ')' | ']' | '}' => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                ',' if depth == 0 => break,
                _ => {}
            }
            buffer.push(c);
            self.position += 1;
        }
        buffer
    }
}
