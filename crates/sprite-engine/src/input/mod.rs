//! Input subsystem.
//!
//! The public API does not expose winit types. The runtime translates window
//! events into `InputEvent`s and applies them to:
//! - `InputState`: continuous state (which keys are held right now)
//! - `InputFrame`: discrete events pending for the next frame
//!
//! `InputMapper` turns both into a movement vector and a termination flag.

mod frame;
mod mapper;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use mapper::{InputMapper, KeyBindings, MovementInput};
pub use state::InputState;
pub use types::{InputEvent, Key, KeyState};
