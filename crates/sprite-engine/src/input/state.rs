use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{InputEvent, Key, KeyState};

/// Continuous input state for the window: which keys are held right now.
#[derive(Debug, Default)]
pub struct InputState {
    /// Set of currently held keys.
    pub keys_down: HashSet<Key>,
}

impl InputState {
    /// Applies an event to the held-key state and queues it on `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            // Release events are not delivered while unfocused.
            InputEvent::Focused(false) => self.keys_down.clear(),
            InputEvent::Focused(true) | InputEvent::CloseRequested => {}

            InputEvent::Key { key, state, .. } => match state {
                KeyState::Pressed => {
                    self.keys_down.insert(*key);
                }
                KeyState::Released => {
                    self.keys_down.remove(key);
                }
            },
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    /// True if any of `keys` is held.
    pub fn any_down(&self, keys: &[Key]) -> bool {
        keys.iter().any(|&k| self.key_down(k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_held_keys() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::pressed(Key::D));
        assert!(state.key_down(Key::D));

        state.apply_event(&mut frame, InputEvent::released(Key::D));
        assert!(!state.key_down(Key::D));
        assert_eq!(frame.events.len(), 2);
    }

    #[test]
    fn repeat_press_keeps_key_held_and_is_queued() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::pressed(Key::W));
        frame.clear();
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key: Key::W,
                state: KeyState::Pressed,
                repeat: true,
            },
        );
        assert!(state.key_down(Key::W));
        assert_eq!(state.keys_down.len(), 1);
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();

        state.apply_event(&mut frame, InputEvent::Focused(true));
        state.apply_event(&mut frame, InputEvent::pressed(Key::A));
        state.apply_event(&mut frame, InputEvent::pressed(Key::W));
        state.apply_event(&mut frame, InputEvent::Focused(false));

        assert!(state.keys_down.is_empty());
        assert!(!state.any_down(&[Key::A, Key::W]));
    }
}
