use glam::Vec2;

use super::frame::InputFrame;
use super::state::InputState;
use super::types::{InputEvent, Key, KeyState};

/// Which keys drive each movement direction, and which keys quit.
///
/// Directions are read from held-key state every frame. `quit` keys are
/// edge-triggered: only a discrete press event counts.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    pub left: Vec<Key>,
    pub right: Vec<Key>,
    pub up: Vec<Key>,
    pub down: Vec<Key>,
    pub quit: Vec<Key>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            left: vec![Key::A, Key::ArrowLeft],
            right: vec![Key::D, Key::ArrowRight],
            up: vec![Key::W, Key::ArrowUp],
            down: vec![Key::S, Key::ArrowDown],
            quit: vec![Key::Q],
        }
    }
}

/// Result of one `InputMapper::poll`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MovementInput {
    /// Direction of travel; zero or at most unit length.
    pub movement: Vec2,

    /// Termination was requested, now or on an earlier poll.
    pub terminate: bool,
}

/// Maps window input to a movement direction and a quit signal.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    bindings: KeyBindings,
    terminated: bool,
}

impl InputMapper {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            terminated: false,
        }
    }

    /// Drains pending discrete events from `frame` and scans held keys in
    /// `state`.
    ///
    /// Discrete events only carry termination (close request or a quit key
    /// press). Movement comes from held-key state alone, so a press that was
    /// released again before the frame produces no movement.
    pub fn poll(&mut self, state: &InputState, frame: &mut InputFrame) -> MovementInput {
        for ev in frame.events.drain(..) {
            match ev {
                InputEvent::CloseRequested => {
                    if !self.terminated {
                        log::info!("close requested");
                    }
                    self.terminated = true;
                }
                InputEvent::Key {
                    key,
                    state: KeyState::Pressed,
                    repeat: false,
                } if self.bindings.quit.contains(&key) => {
                    if !self.terminated {
                        log::info!("quit key {key} pressed");
                    }
                    self.terminated = true;
                }
                _ => {}
            }
        }

        MovementInput {
            movement: self.movement(state),
            terminate: self.terminated,
        }
    }

    /// Movement direction from held keys, normalized when longer than 1.
    fn movement(&self, state: &InputState) -> Vec2 {
        let b = &self.bindings;
        let v = Vec2::new(
            axis(state, (b.left.as_slice(), -1.0), (b.right.as_slice(), 1.0)),
            axis(state, (b.up.as_slice(), 1.0), (b.down.as_slice(), -1.0)),
        );

        if v.length() > 1.0 { v.normalize() } else { v }
    }
}

// `first` wins when both directions are held; the two never sum.
fn axis(state: &InputState, first: (&[Key], f32), second: (&[Key], f32)) -> f32 {
    if state.any_down(first.0) {
        first.1
    } else if state.any_down(second.0) {
        second.1
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(keys: &[Key]) -> InputState {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        for k in keys {
            state.apply_event(&mut frame, InputEvent::pressed(*k));
        }
        state
    }

    fn poll_held(keys: &[Key]) -> MovementInput {
        let state = held(keys);
        InputMapper::default().poll(&state, &mut InputFrame::default())
    }

    #[test]
    fn no_keys_is_exactly_zero() {
        let out = poll_held(&[]);
        assert_eq!(out.movement, Vec2::ZERO);
        assert!(!out.terminate);
    }

    #[test]
    fn single_axis_is_unit() {
        assert_eq!(poll_held(&[Key::D]).movement, Vec2::new(1.0, 0.0));
        assert_eq!(poll_held(&[Key::A]).movement, Vec2::new(-1.0, 0.0));
        assert_eq!(poll_held(&[Key::W]).movement, Vec2::new(0.0, 1.0));
        assert_eq!(poll_held(&[Key::ArrowDown]).movement, Vec2::new(0.0, -1.0));
    }

    #[test]
    fn diagonal_is_normalized_to_unit_length() {
        let diagonals = [
            [Key::A, Key::W],
            [Key::A, Key::S],
            [Key::D, Key::W],
            [Key::D, Key::S],
        ];
        for keys in diagonals {
            let v = poll_held(&keys).movement;
            assert!((v.length() - 1.0).abs() < 1e-6, "{keys:?} -> {v}");
            assert!((v.x.abs() - v.y.abs()).abs() < 1e-6);
        }
    }

    #[test]
    fn opposing_keys_are_mutually_exclusive() {
        assert_eq!(poll_held(&[Key::A, Key::D]).movement, Vec2::new(-1.0, 0.0));
        assert_eq!(poll_held(&[Key::W, Key::S]).movement, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn up_beats_down_on_either_binding() {
        assert_eq!(poll_held(&[Key::S, Key::W]).movement, Vec2::new(0.0, 1.0));
        assert_eq!(poll_held(&[Key::ArrowDown, Key::ArrowUp]).movement, Vec2::new(0.0, 1.0));
        assert_eq!(poll_held(&[Key::S, Key::ArrowUp]).movement, Vec2::new(0.0, 1.0));
        assert_eq!(poll_held(&[Key::D, Key::ArrowLeft]).movement, Vec2::new(-1.0, 0.0));
    }

    #[test]
    fn every_held_combination_stays_within_unit_length() {
        let keys = [
            Key::A, Key::D, Key::W, Key::S,
            Key::ArrowLeft, Key::ArrowRight, Key::ArrowUp, Key::ArrowDown,
        ];
        for mask in 0u32..(1 << keys.len()) {
            let subset: Vec<Key> = keys
                .iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, k)| *k)
                .collect();
            let v = poll_held(&subset).movement;
            assert!(v.length() <= 1.0 + 1e-6, "{subset:?} -> {v}");
        }
    }

    #[test]
    fn discrete_press_without_hold_does_not_move() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(&mut frame, InputEvent::pressed(Key::ArrowRight));
        state.apply_event(&mut frame, InputEvent::released(Key::ArrowRight));

        let out = InputMapper::default().poll(&state, &mut frame);
        assert_eq!(out.movement, Vec2::ZERO);
    }

    #[test]
    fn quit_key_terminates_and_latches() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        let mut mapper = InputMapper::default();

        state.apply_event(&mut frame, InputEvent::pressed(Key::Q));
        assert!(mapper.poll(&state, &mut frame).terminate);
        assert!(frame.events.is_empty());

        state.apply_event(&mut frame, InputEvent::released(Key::Q));
        assert!(mapper.poll(&state, &mut frame).terminate);
        assert!(mapper.poll(&state, &mut frame).terminate);
    }

    #[test]
    fn close_request_terminates() {
        let state = InputState::default();
        let mut frame = InputFrame::default();
        frame.push_event(InputEvent::CloseRequested);

        let mut mapper = InputMapper::default();
        assert!(mapper.poll(&state, &mut frame).terminate);
    }

    #[test]
    fn holding_quit_key_without_press_event_does_nothing() {
        let mut state = InputState::default();
        state.keys_down.insert(Key::Q);

        let out = InputMapper::default().poll(&state, &mut InputFrame::default());
        assert!(!out.terminate);
    }

    #[test]
    fn custom_bindings_are_honoured() {
        let bindings = KeyBindings {
            left: vec![Key::J],
            right: vec![Key::L],
            up: vec![Key::I],
            down: vec![Key::K],
            quit: vec![Key::Escape],
        };
        let mut mapper = InputMapper::new(bindings);
        let state = held(&[Key::L, Key::D]);

        let out = mapper.poll(&state, &mut InputFrame::default());
        assert_eq!(out.movement, Vec2::new(1.0, 0.0));
    }
}
