//! Runtime animation state machine.
//!
//! An [`Animation`] owns the parameter table for one compiled asset. Every
//! parameter write rebuilds the condition key from all current values in
//! canonical order; a matching state becomes active. [`Animation::tick`]
//! advances the active state's playback.

pub mod image;
pub mod loader;
pub mod playback;
pub mod value;

use std::collections::HashMap;
use std::rc::Rc;

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::dsl::{AnimDef, ParamType, KEY_SEPARATOR};

pub use image::{ImageCache, ImageError, ImageHandle, ImageLoader, ScopedLoader};
pub use loader::{AnimationLoader, LoadError};
pub use playback::PlaybackState;
pub use value::{ParamValue, Parameter};

/// Runtime failure from a parameter write or playback query.
#[derive(Debug, Error)]
pub enum AnimError {
    #[error("invalid value {value:?} for {ty} parameter '{name}'")]
    InvalidValue {
        name: String,
        ty: ParamType,
        value: String,
    },
    #[error("no active state: no parameter assignment has matched a state yet")]
    NoActiveState,
    #[error("state '{key}' has no frames")]
    EmptyState { key: String },
    #[error(transparent)]
    Image(#[from] ImageError),
}

/// One compiled asset at runtime: parameter table plus lazily built playback states.
pub struct Animation {
    def: AnimDef,
    params: Vec<Parameter>,
    loader: Rc<dyn ImageLoader>,
    states: HashMap<String, PlaybackState>,
    active: Option<String>,
    default_frames_per_update: u32,
}

impl Animation {
    pub fn new(def: AnimDef, loader: Rc<dyn ImageLoader>) -> Self {
        Self::with_defaults(def, loader, 1)
    }

    /// `default_frames_per_update` applies to states with no
    /// `FRAMES_PER_UPDATE` in scope.
    pub fn with_defaults(
        def: AnimDef,
        loader: Rc<dyn ImageLoader>,
        default_frames_per_update: u32,
    ) -> Self {
        let params = def
            .params
            .iter()
            .map(|p| Parameter::new(p.name.clone(), p.ty))
            .collect();
        Self {
            def,
            params,
            loader,
            states: HashMap::new(),
            active: None,
            default_frames_per_update: default_frames_per_update.max(1),
        }
    }

    /// Write a parameter from its textual form.
    ///
    /// Unknown names are logged and ignored. A value that doesn't match the
    /// declared type is an error and leaves the table untouched.
    pub fn set_string(&mut self, name: &str, value: &str) -> Result<(), AnimError> {
        let Some(idx) = self.params.iter().position(|p| p.name == name) else {
            warn!(param = name, value, "write to unknown parameter ignored");
            return Ok(());
        };

        let ty = self.params[idx].ty;
        let parsed = ParamValue::parse(ty, value).ok_or_else(|| AnimError::InvalidValue {
            name: name.to_string(),
            ty,
            value: value.to_string(),
        })?;

        let previous = self.params[idx].value.replace(parsed);
        let key = self.current_key();
        if !self.def.states.contains_key(&key) {
            trace!(key = %key, "no state for key, active state unchanged");
            return Ok(());
        }

        if let Err(e) = self.ensure_state(&key) {
            self.params[idx].value = previous;
            return Err(e);
        }
        if self.active.as_deref() != Some(key.as_str()) {
            debug!(from = ?self.active, to = %key, "state transition");
            self.active = Some(key);
        }
        Ok(())
    }

    pub fn set_bool(&mut self, name: &str, value: bool) -> Result<(), AnimError> {
        self.set_string(name, &value.to_string())
    }

    pub fn set_int(&mut self, name: &str, value: i64) -> Result<(), AnimError> {
        self.set_string(name, &value.to_string())
    }

    pub fn set_float(&mut self, name: &str, value: f64) -> Result<(), AnimError> {
        self.set_string(name, &value.to_string())
    }

    /// Advance the active state by one engine tick.
    pub fn tick(&mut self) -> Result<(), AnimError> {
        self.active_state_mut()?.tick();
        Ok(())
    }

    pub fn current_frame(&self) -> Result<ImageHandle, AnimError> {
        Ok(self.active_state()?.current_frame())
    }

    /// Frame index within the active state.
    pub fn frame_index(&self) -> Result<usize, AnimError> {
        Ok(self.active_state()?.frame_index())
    }

    /// True when the active state is one-shot and has reached its last frame.
    pub fn is_finished(&self) -> Result<bool, AnimError> {
        Ok(self.active_state()?.is_finished())
    }

    /// Rewind the active state to its first frame.
    pub fn restart(&mut self) -> Result<(), AnimError> {
        self.active_state_mut()?.restart();
        Ok(())
    }

    /// Build every playback state now rather than on first reference.
    pub fn preload(&mut self) -> Result<(), AnimError> {
        let keys: Vec<String> = self.def.states.keys().cloned().collect();
        for key in keys {
            self.ensure_state(&key)?;
        }
        Ok(())
    }

    /// Key built from the current parameter values in canonical order.
    pub fn current_key(&self) -> String {
        self.params
            .iter()
            .map(Parameter::key_segment)
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }

    pub fn active_key(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_state(&self) -> Result<&PlaybackState, AnimError> {
        self.active
            .as_ref()
            .and_then(|key| self.states.get(key))
            .ok_or(AnimError::NoActiveState)
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.params
    }

    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn state_keys(&self) -> impl Iterator<Item = &str> {
        self.def.states.keys().map(String::as_str)
    }

    pub fn definition(&self) -> &AnimDef {
        &self.def
    }

    /// Number of playback states built so far.
    pub fn loaded_states(&self) -> usize {
        self.states.len()
    }

    fn active_state_mut(&mut self) -> Result<&mut PlaybackState, AnimError> {
        match &self.active {
            Some(key) => self.states.get_mut(key).ok_or(AnimError::NoActiveState),
            None => Err(AnimError::NoActiveState),
        }
    }

    fn ensure_state(&mut self, key: &str) -> Result<(), AnimError> {
        if self.states.contains_key(key) {
            return Ok(());
        }
        let Some(def) = self.def.states.get(key) else {
            return Ok(());
        };

        let frames = def
            .textures
            .iter()
            .map(|path| self.loader.load(path))
            .collect::<Result<Vec<_>, _>>()?;

        let frames_per_update = def.frames_per_update.unwrap_or_else(|| {
            debug!(key, default = self.default_frames_per_update, "no FRAMES_PER_UPDATE in scope");
            self.default_frames_per_update
        });
        let one_shot = def.one_shot.unwrap_or_else(|| {
            debug!(key, "no ONE_SHOT in scope, looping");
            false
        });

        debug!(key, frames = frames.len(), frames_per_update, one_shot, "playback state built");
        let state = PlaybackState::new(frames, frames_per_update, one_shot)
            .ok_or_else(|| AnimError::EmptyState { key: key.to_string() })?;
        self.states.insert(key.to_string(), state);
        Ok(())
    }
}
