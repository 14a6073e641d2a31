//! Directive tree for the animation DSL.

use super::token::ParamType;

/// One node of the directive tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub kind: DirectiveKind,
    /// Nesting depth; the root scope sits at 0.
    pub depth: usize,
    pub line: usize,
    pub col: usize,
    /// Always empty for leaf kinds.
    pub children: Vec<Directive>,
}

/// Directive tag together with its validated arguments.
#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveKind {
    RootScope,
    DeclareParam { ty: ParamType, name: String },
    DeclareValue { label: String },
    SetFramesPerUpdate(u32),
    SetOneShot(bool),
    UseTexture(String),
}

impl DirectiveKind {
    pub fn is_branch(&self) -> bool {
        matches!(
            self,
            DirectiveKind::RootScope
                | DirectiveKind::DeclareParam { .. }
                | DirectiveKind::DeclareValue { .. }
        )
    }
}

impl Directive {
    pub fn new(kind: DirectiveKind, depth: usize, line: usize, col: usize) -> Self {
        Self {
            kind,
            depth,
            line,
            col,
            children: Vec::new(),
        }
    }

    /// Texture paths declared directly under this node, in order.
    pub fn textures(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|c| match &c.kind {
            DirectiveKind::UseTexture(path) => Some(path.as_str()),
            _ => None,
        })
    }

    /// Last `FRAMES_PER_UPDATE` declared directly under this node.
    pub fn frames_per_update(&self) -> Option<u32> {
        self.children.iter().rev().find_map(|c| match c.kind {
            DirectiveKind::SetFramesPerUpdate(n) => Some(n),
            _ => None,
        })
    }

    /// Last `ONE_SHOT` declared directly under this node.
    pub fn one_shot(&self) -> Option<bool> {
        self.children.iter().rev().find_map(|c| match c.kind {
            DirectiveKind::SetOneShot(b) => Some(b),
            _ => None,
        })
    }
}
