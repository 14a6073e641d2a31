//! sprite-anim — a sprite animation DSL compiled into a runtime state machine.
//!
//! Animation scripts declare typed parameters and, for each combination of
//! parameter values, a frame sequence with playback timing. [`dsl`] compiles
//! scripts into tables; [`anim`] drives playback from them.

pub mod anim;
pub mod config;
pub mod dsl;
