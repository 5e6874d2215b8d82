//! Sprite engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by the game layer:
//! a single-window `winit` runtime, the `wgpu` device, keyboard input
//! mapping, frame timing, transforms and textured-sprite rendering.

pub mod core;
pub mod device;
pub mod input;
pub mod logging;
pub mod render;
pub mod time;
pub mod transform;
pub mod window;
