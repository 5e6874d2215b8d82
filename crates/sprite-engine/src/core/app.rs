use winit::event::WindowEvent;
use winit::window::WindowId;

use super::ctx::{FrameCtx, InitCtx};

/// Control directive returned by app callbacks.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AppControl {
    Continue,
    Exit,
}

/// Application contract implemented by higher layers.
///
/// Lifecycle: `init` once after the window and GPU exist, `on_frame` once
/// per redraw until it returns `Exit`, then `shutdown`. The runtime wraps
/// the app in a [`ShutdownGuard`] so `shutdown` runs exactly once, including
/// when `init` fails.
pub trait App {
    /// Creates GPU resources. An error aborts startup.
    fn init(&mut self, ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()>;

    /// Called for window events.
    fn on_window_event(&mut self, window_id: WindowId, event: &WindowEvent) -> AppControl {
        let _ = (window_id, event);
        AppControl::Continue
    }

    /// Called once per rendered frame.
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl;

    /// Releases app-owned resources while the GPU context is still alive.
    fn shutdown(&mut self) {}
}

/// Owns an [`App`] and calls its `shutdown` exactly once.
///
/// `shutdown` may be requested any number of times; only the first call
/// reaches the app. Dropping a guard that was never shut down shuts it down.
pub struct ShutdownGuard<A: App> {
    app: A,
    shut_down: bool,
}

impl<A: App> ShutdownGuard<A> {
    pub fn new(app: A) -> Self {
        Self {
            app,
            shut_down: false,
        }
    }

    pub fn app(&self) -> &A {
        &self.app
    }

    pub fn app_mut(&mut self) -> &mut A {
        &mut self.app
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }
        self.shut_down = true;
        log::debug!("shutting down application");
        self.app.shutdown();
    }
}

impl<A: App> Drop for ShutdownGuard<A> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;

    struct CountingApp {
        shutdowns: Rc<Cell<u32>>,
    }

    impl App for CountingApp {
        fn init(&mut self, _ctx: &mut InitCtx<'_, '_>) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_frame(&mut self, _ctx: &mut FrameCtx<'_, '_>) -> AppControl {
            AppControl::Continue
        }

        fn shutdown(&mut self) {
            self.shutdowns.set(self.shutdowns.get() + 1);
        }
    }

    fn guarded() -> (ShutdownGuard<CountingApp>, Rc<Cell<u32>>) {
        let shutdowns = Rc::new(Cell::new(0));
        let guard = ShutdownGuard::new(CountingApp {
            shutdowns: Rc::clone(&shutdowns),
        });
        (guard, shutdowns)
    }

    #[test]
    fn repeated_shutdown_reaches_app_once() {
        let (mut guard, shutdowns) = guarded();
        guard.shutdown();
        guard.shutdown();
        assert!(guard.is_shut_down());
        drop(guard);
        assert_eq!(shutdowns.get(), 1);
    }

    #[test]
    fn drop_without_shutdown_still_shuts_down() {
        let (guard, shutdowns) = guarded();
        assert!(!guard.is_shut_down());
        drop(guard);
        assert_eq!(shutdowns.get(), 1);
    }
}
