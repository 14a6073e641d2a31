//! Parameter values — typed storage behind the textual setter boundary.

use std::fmt;

pub use crate::dsl::ParamType;

/// A validated parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ParamValue {
    /// Validate `text` against `ty`. `bool` only accepts `true`/`false`;
    /// floats must be finite.
    pub fn parse(ty: ParamType, text: &str) -> Option<ParamValue> {
        match ty {
            ParamType::Str => Some(ParamValue::Str(text.to_string())),
            ParamType::Int => text.parse().ok().map(ParamValue::Int),
            ParamType::Float => text
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(ParamValue::Float),
            ParamType::Bool => match text {
                "true" => Some(ParamValue::Bool(true)),
                "false" => Some(ParamValue::Bool(false)),
                _ => None,
            },
        }
    }
}

/// Renders the text used in condition keys. Numbers use the same
/// formatting as numeric `VALUE` labels, so `007` and `7` meet.
impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Str(s) => f.write_str(s),
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Bool(v) => write!(f, "{v}"),
        }
    }
}

/// One row of the runtime parameter table.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub name: String,
    pub ty: ParamType,
    /// `None` until first written; contributes an empty key segment.
    pub value: Option<ParamValue>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: ParamType) -> Self {
        Self {
            name: name.into(),
            ty,
            value: None,
        }
    }

    pub fn key_segment(&self) -> String {
        self.value.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}
