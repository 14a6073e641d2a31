//! Tree builder for the animation DSL.
//!
//! ```text
//! file      := "@ANIM_ROOT" ";" { directive } EOF
//! directive := leaf | branch
//! leaf      := ("@FRAMES_PER_UPDATE" arg | "@ONE_SHOT" arg | "@USE_TEX" arg) ";"
//! branch    := ("@PARAM" typecode arg | "@VALUE" arg) ":" "{" { directive } "}"
//! ```
//!
//! The root scope is opened by `@ANIM_ROOT;` without a brace and is closed
//! by end of input. A `}` at root level therefore leaves nothing for the end
//! of input to close and is rejected.

use super::ast::{Directive, DirectiveKind};
use super::error::CompileError;
use super::token::{Symbol, Token, TokenKind};

/// Recursive-descent builder over classified tokens.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let (line, col) = tokens.last().map_or((1, 1), |t| (t.line, t.col));
            tokens.push(Token {
                kind: TokenKind::Eof,
                text: String::new(),
                line,
                col,
            });
        }
        Self { tokens, pos: 0 }
    }

    pub fn parse(&mut self) -> Result<Directive, CompileError> {
        let start = self.peek().clone();
        self.expect(TokenKind::Marker)?;
        let sym = self.expect_symbol()?;
        if sym != Symbol::AnimRoot {
            return Err(CompileError::parse(
                format!("file must open with @ANIM_ROOT, found @{sym}"),
                start.line,
                start.col,
            ));
        }
        let (args, terminator) = self.collect_args(sym)?;
        check_terminator(sym, &terminator)?;
        let kind = build_directive(sym, &args, &start)?;

        let mut root = Directive::new(kind, 0, start.line, start.col);
        root.children = self.parse_block(1)?;
        Ok(root)
    }

    /// Parse directives until the scope at `depth` closes. The root scope
    /// (`depth == 1` children) closes on end of input, nested scopes on `}`.
    fn parse_block(&mut self, depth: usize) -> Result<Vec<Directive>, CompileError> {
        let mut children = Vec::new();
        loop {
            let t = self.peek().clone();
            match t.kind {
                TokenKind::Marker => children.push(self.parse_directive(depth)?),
                TokenKind::RBrace if depth == 1 => {
                    return Err(CompileError::parse(
                        "'}' with no open scope (the root scope is closed by end of input)",
                        t.line,
                        t.col,
                    ));
                }
                TokenKind::RBrace => {
                    self.advance();
                    return Ok(children);
                }
                TokenKind::Eof if depth == 1 => return Ok(children),
                TokenKind::Eof => {
                    return Err(CompileError::parse(
                        format!("end of input with {} unclosed scope(s)", depth - 1),
                        t.line,
                        t.col,
                    ));
                }
                other => {
                    return Err(CompileError::parse(
                        format!("expected directive, got {other:?}"),
                        t.line,
                        t.col,
                    ));
                }
            }
        }
    }

    fn parse_directive(&mut self, depth: usize) -> Result<Directive, CompileError> {
        let start = self.peek().clone();
        self.expect(TokenKind::Marker)?;
        let sym = self.expect_symbol()?;
        if sym == Symbol::AnimRoot {
            return Err(CompileError::parse(
                "@ANIM_ROOT may only open the file",
                start.line,
                start.col,
            ));
        }

        let (args, terminator) = self.collect_args(sym)?;
        check_terminator(sym, &terminator)?;
        let kind = build_directive(sym, &args, &start)?;
        let mut node = Directive::new(kind, depth, start.line, start.col);

        if node.kind.is_branch() {
            self.expect(TokenKind::LBrace)?;
            node.children = self.parse_block(depth + 1)?;
        }
        Ok(node)
    }

    /// Collect argument tokens up to and including the terminator.
    fn collect_args(&mut self, sym: Symbol) -> Result<(Vec<Token>, Token), CompileError> {
        let mut args = Vec::new();
        loop {
            let t = self.advance().clone();
            match t.kind {
                TokenKind::Colon | TokenKind::Semicolon => return Ok((args, t)),
                TokenKind::Marker
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Eof
                | TokenKind::Symbol(_) => {
                    return Err(CompileError::parse(
                        format!("@{sym}: missing terminator before {:?}", t.kind),
                        t.line,
                        t.col,
                    ));
                }
                _ => args.push(t),
            }
        }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> &Token {
        let idx = self.pos.min(self.tokens.len() - 1);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn expect(&mut self, kind: TokenKind) -> Result<(), CompileError> {
        let t = self.peek().clone();
        if t.kind == kind {
            self.advance();
            Ok(())
        } else {
            Err(CompileError::parse(
                format!("expected {kind:?}, got {:?}", t.kind),
                t.line,
                t.col,
            ))
        }
    }

    fn expect_symbol(&mut self) -> Result<Symbol, CompileError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Symbol(sym) => {
                self.advance();
                Ok(sym)
            }
            other => Err(CompileError::parse(
                format!("expected directive name after '@', got {other:?}"),
                t.line,
                t.col,
            )),
        }
    }
}

fn check_terminator(sym: Symbol, terminator: &Token) -> Result<(), CompileError> {
    let expected = if sym.is_branch() {
        TokenKind::Colon
    } else {
        TokenKind::Semicolon
    };
    if terminator.kind == expected {
        Ok(())
    } else {
        let want = if sym.is_branch() { "':'" } else { "';'" };
        Err(CompileError::parse(
            format!("@{sym} must be terminated by {want}"),
            terminator.line,
            terminator.col,
        ))
    }
}

/// Validate the argument list for `sym` and build the node's tag.
fn build_directive(
    sym: Symbol,
    args: &[Token],
    at: &Token,
) -> Result<DirectiveKind, CompileError> {
    let arity = match sym {
        Symbol::AnimRoot => 0,
        Symbol::Param => 2,
        _ => 1,
    };
    if args.len() != arity {
        return Err(CompileError::parse(
            format!(
                "@{sym} expects {arity} argument(s), got {}",
                args.len()
            ),
            at.line,
            at.col,
        ));
    }

    let kind = match sym {
        Symbol::AnimRoot => DirectiveKind::RootScope,
        Symbol::FramesPerUpdate => match args[0].kind {
            TokenKind::Int(n) if n > 0 && n <= i64::from(u32::MAX) => {
                DirectiveKind::SetFramesPerUpdate(n as u32)
            }
            ref other => return Err(arg_error(sym, "a positive integer", other, &args[0])),
        },
        Symbol::OneShot => match &args[0].kind {
            TokenKind::Bool(b) => DirectiveKind::SetOneShot(*b),
            TokenKind::Str(s) if s == "true" => DirectiveKind::SetOneShot(true),
            TokenKind::Str(s) if s == "false" => DirectiveKind::SetOneShot(false),
            other => return Err(arg_error(sym, "true or false", other, &args[0])),
        },
        Symbol::UseTex => DirectiveKind::UseTexture(literal(sym, &args[0])?),
        Symbol::Value => DirectiveKind::DeclareValue {
            label: literal(sym, &args[0])?,
        },
        Symbol::Param => match args[0].kind {
            TokenKind::TypeCode(ty) => DirectiveKind::DeclareParam {
                ty,
                name: literal(sym, &args[1])?,
            },
            ref other => {
                return Err(arg_error(sym, "a type code (str, int, float, bool)", other, &args[0]))
            }
        },
    };
    Ok(kind)
}

fn literal(sym: Symbol, tok: &Token) -> Result<String, CompileError> {
    tok.literal_text()
        .map(str::to_string)
        .ok_or_else(|| arg_error(sym, "a literal", &tok.kind, tok))
}

fn arg_error(sym: Symbol, expected: &str, got: &TokenKind, at: &Token) -> CompileError {
    CompileError::parse(
        format!("@{sym} expects {expected}, got {got:?}"),
        at.line,
        at.col,
    )
}
