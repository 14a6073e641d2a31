//! Token classifier — resolves raw words into typed literals and symbols.
//!
//! Comments and whitespace are discarded here. A word directly after a
//! directive marker must name a directive; words in argument position
//! become int, float, bool, type-code or string literals, in that order.

use super::error::CompileError;
use super::lexer::Lexer;
use super::token::{ParamType, RawKind, RawToken, Symbol, Token, TokenKind};

/// Second pipeline stage: pulls raw tokens from a [`Lexer`] and types them.
pub struct Classifier {
    lexer: Lexer,
    after_marker: bool,
}

impl Classifier {
    pub fn new(lexer: Lexer) -> Self {
        Self {
            lexer,
            after_marker: false,
        }
    }

    /// Pull raw tokens until one survives classification.
    pub fn next_token(&mut self) -> Result<Token, CompileError> {
        loop {
            let raw = self.lexer.next_token()?;
            if let Some(tok) = self.classify(raw)? {
                return Ok(tok);
            }
        }
    }

    /// Classify the whole input, `Eof` included.
    pub fn classify_all(&mut self) -> Result<Vec<Token>, CompileError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                return Ok(tokens);
            }
        }
    }

    fn classify(&mut self, raw: RawToken) -> Result<Option<Token>, CompileError> {
        let after_marker = self.after_marker;
        let kind = match raw.kind {
            RawKind::Comment | RawKind::Newline | RawKind::Space => return Ok(None),
            RawKind::DirectiveMarker => TokenKind::Marker,
            RawKind::Colon => TokenKind::Colon,
            RawKind::Semicolon => TokenKind::Semicolon,
            RawKind::BraceOpen => TokenKind::LBrace,
            RawKind::BraceClose => TokenKind::RBrace,
            RawKind::String => TokenKind::Str(raw.text.clone()),
            RawKind::Eof => TokenKind::Eof,
            RawKind::Word if after_marker => match Symbol::lookup(&raw.text) {
                Some(sym) => TokenKind::Symbol(sym),
                None => {
                    return Err(CompileError::parse(
                        format!("undefined symbol: @{}", raw.text),
                        raw.line,
                        raw.col,
                    ));
                }
            },
            RawKind::Word => classify_word(&raw.text),
        };
        self.after_marker = kind == TokenKind::Marker;
        Ok(Some(Token {
            kind,
            text: raw.text,
            line: raw.line,
            col: raw.col,
        }))
    }
}

fn classify_word(text: &str) -> TokenKind {
    if let Ok(v) = text.parse::<i64>() {
        return TokenKind::Int(v);
    }
    if looks_numeric(text) {
        if let Ok(v) = text.parse::<f64>() {
            return TokenKind::Float(v);
        }
    }
    match text {
        "true" => return TokenKind::Bool(true),
        "false" => return TokenKind::Bool(false),
        _ => {}
    }
    if let Some(ty) = ParamType::lookup(text) {
        return TokenKind::TypeCode(ty);
    }
    TokenKind::Str(text.to_string())
}

/// `f64::from_str` also accepts `inf` and `NaN`; those stay identifiers.
fn looks_numeric(text: &str) -> bool {
    text.chars().any(|c| c.is_ascii_digit())
        && text
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
