//! State extraction — flattens the directive tree into a parameter list and
//! a state table keyed by condition key.
//!
//! A condition key is the `~`-joined path of `VALUE` labels from the root
//! down to a `VALUE` block that declares at least one texture directly.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::ast::{Directive, DirectiveKind};
use super::error::CompileError;
use super::token::ParamType;
use crate::anim::ParamValue;

/// Separator between labels in a condition key.
pub const KEY_SEPARATOR: &str = "~";

/// A declared animation parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDecl {
    pub name: String,
    pub ty: ParamType,
}

/// Everything needed to build one playback state.
#[derive(Debug, Clone, PartialEq)]
pub struct StateDef {
    pub key: String,
    /// Texture paths in declaration order.
    pub textures: Vec<String>,
    /// Own or inherited cadence; `None` when no scope declares one.
    pub frames_per_update: Option<u32>,
    /// Own or inherited one-shot flag; `None` when no scope declares one.
    pub one_shot: Option<bool>,
    pub line: usize,
}

/// What to do when two `VALUE` paths produce the same condition key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicateKeyPolicy {
    /// Later state replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail the build with a semantic error.
    Reject,
}

/// The result of compiling an animation script.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnimDef {
    /// Parameters in canonical (first declaration) order.
    pub params: Vec<ParamDecl>,
    pub states: BTreeMap<String, StateDef>,
}

impl AnimDef {
    pub fn param(&self, name: &str) -> Option<&ParamDecl> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn state(&self, key: &str) -> Option<&StateDef> {
        self.states.get(key)
    }
}

#[derive(Clone, Copy, Default)]
struct Inherited {
    frames_per_update: Option<u32>,
    one_shot: Option<bool>,
}

struct Extractor {
    policy: DuplicateKeyPolicy,
    path: Vec<String>,
    def: AnimDef,
}

/// Walk the tree depth-first and build the parameter and state tables.
pub fn extract(root: &Directive, policy: DuplicateKeyPolicy) -> Result<AnimDef, CompileError> {
    let mut ex = Extractor {
        policy,
        path: Vec::new(),
        def: AnimDef::default(),
    };
    ex.walk(root, Inherited::default(), None)?;
    Ok(ex.def)
}

/// Key text for a `VALUE` label. Under a typed parameter the label goes
/// through the same rendering as a runtime write, so `007` under `int`
/// keys as `7`. Under `str`, or with no enclosing parameter, it is kept
/// exactly as written.
fn key_label(param_ty: Option<ParamType>, label: &str, node: &Directive) -> String {
    let ty = match param_ty {
        None | Some(ParamType::Str) => return label.to_string(),
        Some(ty) => ty,
    };
    match ParamValue::parse(ty, label) {
        Some(value) => value.to_string(),
        None => {
            warn!(
                label,
                ty = %ty,
                line = node.line,
                "label is not a valid {ty} value, its states can never match"
            );
            label.to_string()
        }
    }
}

impl Extractor {
    /// `param_ty` is the type of the `PARAM` block directly enclosing `node`.
    fn walk(
        &mut self,
        node: &Directive,
        inherited: Inherited,
        param_ty: Option<ParamType>,
    ) -> Result<(), CompileError> {
        let scope = Inherited {
            frames_per_update: node.frames_per_update().or(inherited.frames_per_update),
            one_shot: node.one_shot().or(inherited.one_shot),
        };

        match &node.kind {
            DirectiveKind::DeclareParam { ty, name } => {
                self.declare_param(name, *ty, node)?;
                self.walk_children(node, scope, Some(*ty))
            }
            DirectiveKind::DeclareValue { label } => {
                self.path.push(key_label(param_ty, label, node));
                let result = self
                    .emit_state(node, scope)
                    .and_then(|_| self.walk_children(node, scope, None));
                self.path.pop();
                result
            }
            DirectiveKind::RootScope => self.walk_children(node, scope, None),
            _ => Ok(()),
        }
    }

    fn walk_children(
        &mut self,
        node: &Directive,
        scope: Inherited,
        param_ty: Option<ParamType>,
    ) -> Result<(), CompileError> {
        for child in &node.children {
            self.walk(child, scope, param_ty)?;
        }
        Ok(())
    }

    fn declare_param(
        &mut self,
        name: &str,
        ty: ParamType,
        node: &Directive,
    ) -> Result<(), CompileError> {
        match self.def.param(name) {
            Some(existing) if existing.ty == ty => Ok(()),
            Some(existing) => Err(CompileError::semantic(
                format!(
                    "parameter '{name}' redeclared as {ty}, first declared as {}",
                    existing.ty
                ),
                node.line,
                node.col,
            )),
            None => {
                self.def.params.push(ParamDecl {
                    name: name.to_string(),
                    ty,
                });
                Ok(())
            }
        }
    }

    fn emit_state(&mut self, node: &Directive, scope: Inherited) -> Result<(), CompileError> {
        let textures: Vec<String> = node.textures().map(str::to_string).collect();
        if textures.is_empty() {
            return Ok(());
        }

        let key = self.path.join(KEY_SEPARATOR);
        if let Some(previous) = self.def.states.get(&key) {
            match self.policy {
                DuplicateKeyPolicy::Reject => {
                    return Err(CompileError::semantic(
                        format!(
                            "duplicate state key '{key}' (first declared on line {})",
                            previous.line
                        ),
                        node.line,
                        node.col,
                    ));
                }
                DuplicateKeyPolicy::Overwrite => {
                    warn!(
                        key = %key,
                        previous_line = previous.line,
                        line = node.line,
                        "duplicate state key, later declaration wins"
                    );
                }
            }
        }

        self.def.states.insert(
            key.clone(),
            StateDef {
                key,
                textures,
                frames_per_update: scope.frames_per_update,
                one_shot: scope.one_shot,
                line: node.line,
            },
        );
        Ok(())
    }
}
