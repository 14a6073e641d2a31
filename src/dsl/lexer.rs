//! Lexer for the animation DSL.
//!
//! Cuts source text into [`RawToken`]s one logical token at a time.
//! Comments and strings are consumed whole; whitespace is reported as
//! tokens and dropped later by the classifier.

use super::error::CompileError;
use super::token::{RawKind, RawToken};

/// First pipeline stage: source characters to [`RawToken`]s.
pub struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
    finished: bool,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Self {
            // Carriage returns never reach the dispatcher.
            chars: source.chars().filter(|&c| c != '\r').collect(),
            pos: 0,
            line: 1,
            col: 1,
            finished: false,
        }
    }

    /// Produce the next token. `Eof` is returned exactly once; asking for
    /// another token after that is an error.
    pub fn next_token(&mut self) -> Result<RawToken, CompileError> {
        if self.finished {
            return Err(CompileError::lex(
                "token requested after end of input",
                self.line,
                self.col,
            ));
        }

        if self.is_at_end() {
            self.finished = true;
            return Ok(self.token(RawKind::Eof, String::new(), self.line, self.col));
        }

        let ch = self.peek();
        match ch {
            '@' => Ok(self.single_char(RawKind::DirectiveMarker)),
            ':' => Ok(self.single_char(RawKind::Colon)),
            ';' => Ok(self.single_char(RawKind::Semicolon)),
            '{' => Ok(self.single_char(RawKind::BraceOpen)),
            '}' => Ok(self.single_char(RawKind::BraceClose)),
            ' ' => Ok(self.single_char(RawKind::Space)),
            '\n' => {
                let tok = self.single_char(RawKind::Newline);
                self.line += 1;
                self.col = 1;
                Ok(tok)
            }
            '#' => Ok(self.lex_comment()),
            '"' => self.lex_string(),
            c if is_word_char(c) => Ok(self.lex_word()),
            _ => Err(CompileError::lex(
                format!("unsupported character: {ch:?}"),
                self.line,
                self.col,
            )),
        }
    }

    /// Drain the whole input, `Eof` included.
    pub fn tokenize(&mut self) -> Result<Vec<RawToken>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == RawKind::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn peek(&self) -> char {
        self.chars[self.pos]
    }

    fn advance(&mut self) -> char {
        let ch = self.chars[self.pos];
        self.pos += 1;
        if ch != '\n' {
            self.col += 1;
        }
        ch
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.chars.len()
    }

    fn token(&self, kind: RawKind, text: String, line: usize, col: usize) -> RawToken {
        RawToken {
            kind,
            text,
            line,
            col,
        }
    }

    fn single_char(&mut self, kind: RawKind) -> RawToken {
        let line = self.line;
        let col = self.col;
        let ch = self.advance();
        self.token(kind, ch.to_string(), line, col)
    }

    fn lex_comment(&mut self) -> RawToken {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume '#'
        let mut text = String::new();
        while !self.is_at_end() && self.peek() != '\n' {
            text.push(self.advance());
        }
        self.token(RawKind::Comment, text, line, col)
    }

    fn lex_string(&mut self) -> Result<RawToken, CompileError> {
        let line = self.line;
        let col = self.col;
        self.advance(); // consume opening '"'
        let mut text = String::new();
        while !self.is_at_end() && self.peek() != '"' {
            let ch = self.advance();
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            }
            text.push(ch);
        }
        if self.is_at_end() {
            return Err(CompileError::lex("unclosed string literal", line, col));
        }
        self.advance(); // consume closing '"'
        Ok(self.token(RawKind::String, text, line, col))
    }

    fn lex_word(&mut self) -> RawToken {
        let line = self.line;
        let col = self.col;
        let mut text = String::new();
        while !self.is_at_end() && is_word_char(self.peek()) {
            text.push(self.advance());
        }
        self.token(RawKind::Word, text, line, col)
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')
}
