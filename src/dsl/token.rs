//! Token types for the animation DSL.
//!
//! The lexer emits [`RawToken`]s that only know their character class. The
//! classifier turns those into [`Token`]s with resolved literal values.

use std::fmt;

/// A token as cut out of the source by the lexer.
#[derive(Debug, Clone, PartialEq)]
pub struct RawToken {
    pub kind: RawKind,
    pub text: String,
    pub line: usize,
    pub col: usize,
}

/// Character class of a raw token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawKind {
    DirectiveMarker, // @
    Comment,         // # ... up to newline
    Newline,
    Space,
    Colon,
    Semicolon,
    BraceOpen,
    BraceClose,
    Word,
    String, // "..."
    Eof,
}

/// A classified token, ready for the tree builder.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Source lexeme. Quoted strings keep their contents without the quotes.
    pub text: String,
    pub line: usize,
    pub col: usize,
}

impl Token {
    /// Text of a literal token exactly as written, used for labels, names
    /// and texture paths. `None` for structural tokens.
    pub fn literal_text(&self) -> Option<&str> {
        match self.kind {
            TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Bool(_)
            | TokenKind::TypeCode(_)
            | TokenKind::Str(_) => Some(&self.text),
            _ => None,
        }
    }
}

/// Resolved token class. Literal variants carry their parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Structure
    Marker,
    Colon,
    Semicolon,
    LBrace,
    RBrace,

    // Literals
    Int(i64),
    Float(f64),
    Bool(bool),
    TypeCode(ParamType),
    Symbol(Symbol),
    /// Quoted string or unquoted identifier in argument position.
    Str(String),

    Eof,
}

/// Directive keywords. The vocabulary is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    AnimRoot,
    FramesPerUpdate,
    OneShot,
    Param,
    Value,
    UseTex,
}

pub const SYMBOLS: &[(&str, Symbol)] = &[
    ("ANIM_ROOT", Symbol::AnimRoot),
    ("FRAMES_PER_UPDATE", Symbol::FramesPerUpdate),
    ("ONE_SHOT", Symbol::OneShot),
    ("PARAM", Symbol::Param),
    ("VALUE", Symbol::Value),
    ("USE_TEX", Symbol::UseTex),
];

impl Symbol {
    pub fn lookup(word: &str) -> Option<Symbol> {
        SYMBOLS
            .iter()
            .find(|(name, _)| *name == word)
            .map(|(_, sym)| *sym)
    }

    pub fn name(self) -> &'static str {
        SYMBOLS
            .iter()
            .find(|(_, sym)| *sym == self)
            .map(|(name, _)| *name)
            .unwrap_or("?")
    }

    /// Branch directives open a braced block after a `:` terminator.
    pub fn is_branch(self) -> bool {
        matches!(self, Symbol::Param | Symbol::Value)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Declared type of an animation parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
}

pub const TYPE_CODES: &[(&str, ParamType)] = &[
    ("str", ParamType::Str),
    ("bool", ParamType::Bool),
    ("float", ParamType::Float),
    ("int", ParamType::Int),
];

impl ParamType {
    pub fn lookup(word: &str) -> Option<ParamType> {
        TYPE_CODES
            .iter()
            .find(|(code, _)| *code == word)
            .map(|(_, ty)| *ty)
    }

    pub fn code(self) -> &'static str {
        match self {
            ParamType::Str => "str",
            ParamType::Int => "int",
            ParamType::Float => "float",
            ParamType::Bool => "bool",
        }
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
