//! Playback state — frame sequence, cadence and one-shot behaviour for one
//! condition key.

use super::image::ImageHandle;

/// Frame position for one condition key.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackState {
    frames: Vec<ImageHandle>,
    frames_per_update: u32,
    one_shot: bool,
    counter: u32,
    frame: usize,
}

impl PlaybackState {
    /// `None` when `frames` is empty. A cadence of 0 is treated as 1.
    pub fn new(frames: Vec<ImageHandle>, frames_per_update: u32, one_shot: bool) -> Option<Self> {
        if frames.is_empty() {
            return None;
        }
        Some(Self {
            frames,
            frames_per_update: frames_per_update.max(1),
            one_shot,
            counter: 0,
            frame: 0,
        })
    }

    /// Advance one engine tick. Returns true when the frame index moved.
    pub fn tick(&mut self) -> bool {
        self.counter += 1;
        if self.counter < self.frames_per_update {
            return false;
        }
        self.counter = 0;

        let last = self.frames.len() - 1;
        if self.frame < last {
            self.frame += 1;
            true
        } else if self.one_shot {
            false
        } else {
            self.frame = 0;
            last != 0
        }
    }

    pub fn current_frame(&self) -> ImageHandle {
        self.frames[self.frame]
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn frames(&self) -> &[ImageHandle] {
        &self.frames
    }

    pub fn frames_per_update(&self) -> u32 {
        self.frames_per_update
    }

    pub fn is_one_shot(&self) -> bool {
        self.one_shot
    }

    /// A one-shot state parked on its last frame.
    pub fn is_finished(&self) -> bool {
        self.one_shot && self.frame == self.frames.len() - 1
    }

    pub fn restart(&mut self) {
        self.counter = 0;
        self.frame = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handles(n: u32) -> Vec<ImageHandle> {
        (0..n).map(ImageHandle).collect()
    }

    #[test]
    fn empty_frame_list_is_refused() {
        assert!(PlaybackState::new(Vec::new(), 1, false).is_none());
        assert_eq!(PlaybackState::new(handles(1), 0, false).unwrap().frames_per_update(), 1);
    }

    #[test]
    fn advances_once_per_cadence() {
        let mut state = PlaybackState::new(handles(3), 3, false).unwrap();
        assert!(!state.tick());
        assert!(!state.tick());
        assert_eq!(state.frame_index(), 0);
        assert!(state.tick());
        assert_eq!(state.frame_index(), 1);
        assert_eq!(state.current_frame(), ImageHandle(1));
    }

    #[test]
    fn looping_state_wraps() {
        let mut state = PlaybackState::new(handles(2), 1, false).unwrap();
        state.tick();
        assert_eq!(state.frame_index(), 1);
        state.tick();
        assert_eq!(state.frame_index(), 0);
        assert!(!state.is_finished());
    }

    #[test]
    fn one_shot_state_parks_on_last_frame() {
        let mut state = PlaybackState::new(handles(2), 2, true).unwrap();
        for _ in 0..10 {
            state.tick();
        }
        assert_eq!(state.frame_index(), 1);
        assert!(state.is_finished());
    }

    #[test]
    fn single_frame_never_moves() {
        let mut state = PlaybackState::new(handles(1), 1, false).unwrap();
        assert!(!state.tick());
        assert_eq!(state.current_frame(), ImageHandle(0));
    }

    #[test]
    fn restart_resets_counters() {
        let mut state = PlaybackState::new(handles(3), 2, true).unwrap();
        for _ in 0..5 {
            state.tick();
        }
        assert_eq!(state.frame_index(), 2);
        state.restart();
        assert_eq!(state.frame_index(), 0);
        state.tick();
        assert_eq!(state.frame_index(), 0);
        state.tick();
        assert_eq!(state.frame_index(), 1);
    }
}
