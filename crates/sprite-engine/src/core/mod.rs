//! Core engine-facing contracts.
//!
//! This module defines the stable interface between the runtime (platform loop)
//! and the application: the [`App`] lifecycle, the contexts handed to it, and
//! the guard that makes shutdown happen exactly once.

mod app;
mod ctx;

pub use app::{App, AppControl, ShutdownGuard};
pub use ctx::{FrameCtx, InitCtx, WindowCtx};
