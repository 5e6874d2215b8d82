//! Frame timing.
//!
//! One `FrameClock` per render loop; call `tick()` once per frame to get the
//! elapsed time since the previous frame. The tick source is pluggable so the
//! loop can be driven by injected ticks in tests.

mod frame_clock;

pub use frame_clock::{FrameClock, FrameTime, SystemTicks, TickSource, MILLISECONDS_IN_SECOND};
