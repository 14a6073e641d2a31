//! Animation DSL compiler — source text → tokens → directive tree → state tables.

pub mod ast;
pub mod classify;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod parser;
pub mod token;

pub use ast::{Directive, DirectiveKind};
pub use error::{CompileError, ErrorKind};
pub use extract::{AnimDef, DuplicateKeyPolicy, ParamDecl, StateDef, KEY_SEPARATOR};
pub use token::{ParamType, Symbol};

use classify::Classifier;
use lexer::Lexer;
use parser::Parser;

/// The animation DSL compiler.
///
/// Runs lexer → classifier → tree builder, then flattens the tree into
/// an [`AnimDef`].
pub struct Compiler;

impl Compiler {
    /// Parse source into the directive tree.
    pub fn parse(source: &str) -> Result<Directive, CompileError> {
        let mut classifier = Classifier::new(Lexer::new(source));
        let tokens = classifier.classify_all()?;
        let mut parser = Parser::new(tokens);
        parser.parse()
    }

    /// Parse and extract, letting later duplicate state keys win.
    pub fn compile(source: &str) -> Result<AnimDef, CompileError> {
        Self::compile_with(source, DuplicateKeyPolicy::default())
    }

    /// Parse and extract with an explicit duplicate-key policy.
    pub fn compile_with(
        source: &str,
        policy: DuplicateKeyPolicy,
    ) -> Result<AnimDef, CompileError> {
        let root = Self::parse(source)?;
        extract::extract(&root, policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compile_single_state() {
        let def =
            Compiler::compile(r#"@ANIM_ROOT; @PARAM str color: { @VALUE red: { @USE_TEX "r.png"; } }"#)
                .unwrap();
        assert_eq!(
            def.params,
            vec![ParamDecl {
                name: "color".into(),
                ty: ParamType::Str
            }]
        );
        assert_eq!(def.state("red").unwrap().textures, vec!["r.png"]);
    }

    #[test]
    fn lex_errors_surface_through_compile() {
        let err = Compiler::compile("@ANIM_ROOT; $").unwrap_err();
        assert_eq!(err.kind, ErrorKind::LexError);
    }

    #[test]
    fn parse_errors_surface_through_compile() {
        let err = Compiler::compile("@ANIM_ROOT; @PARAM str s: {").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
    }
}
