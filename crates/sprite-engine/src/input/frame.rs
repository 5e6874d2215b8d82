use super::types::InputEvent;

/// Input accumulated between two frames.
///
/// `events` is the discrete event queue; the mapper drains it once per frame
/// and the runtime clears whatever is left after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }
}
