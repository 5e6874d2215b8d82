use std::time::Instant;

pub const MILLISECONDS_IN_SECOND: f64 = 1000.0;

/// Monotonic millisecond counter.
pub trait TickSource {
    /// Milliseconds elapsed since the source's origin.
    fn ticks_ms(&mut self) -> u64;
}

/// Wall-clock ticks counted from the moment the source was created.
#[derive(Debug, Clone)]
pub struct SystemTicks {
    origin: Instant,
}

impl SystemTicks {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemTicks {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for SystemTicks {
    fn ticks_ms(&mut self) -> u64 {
        self.origin.elapsed().as_millis() as u64
    }
}

impl<F> TickSource for F
where
    F: FnMut() -> u64,
{
    fn ticks_ms(&mut self) -> u64 {
        self()
    }
}

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Seconds elapsed since the previous tick.
    pub dt: f32,

    /// Seconds since the tick source's origin, as read at this tick.
    pub seconds: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Converts a millisecond tick counter into per-frame delta time.
///
/// The previous reading starts at zero, so the first frame's delta is the
/// time elapsed since the source's origin. Deltas are not clamped: a stalled
/// process produces one large delta on resume.
#[derive(Debug, Clone)]
pub struct FrameClock<S = SystemTicks> {
    source: S,
    previous_seconds: f64,
    frame_index: u64,
}

impl<S: TickSource> FrameClock<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            previous_seconds: 0.0,
            frame_index: 0,
        }
    }

    /// Seconds recorded at the last tick (0 before the first one).
    pub fn previous_seconds(&self) -> f64 {
        self.previous_seconds
    }

    /// Reads the source, returns the delta and advances the baseline.
    pub fn tick(&mut self) -> FrameTime {
        let seconds = self.source.ticks_ms() as f64 / MILLISECONDS_IN_SECOND;

        // A well-behaved source never goes backwards; if one does, report no
        // elapsed time instead of a negative delta.
        let dt = (seconds - self.previous_seconds).max(0.0) as f32;
        self.previous_seconds = seconds;

        let ft = FrameTime {
            dt,
            seconds,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scripted(ticks: Vec<u64>) -> impl FnMut() -> u64 {
        let mut it = ticks.into_iter();
        move || it.next().expect("tick script exhausted")
    }

    #[test]
    fn first_tick_measures_from_zero() {
        let mut clock = FrameClock::new(scripted(vec![1000]));
        let ft = clock.tick();
        assert_eq!(ft.dt, 1.0);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.previous_seconds(), 1.0);
    }

    #[test]
    fn delta_is_difference_between_ticks() {
        let mut clock = FrameClock::new(scripted(vec![100, 250, 250, 400]));
        let dts: Vec<f32> = (0..4).map(|_| clock.tick().dt).collect();
        assert!((dts[0] - 0.1).abs() < 1e-6);
        assert!((dts[1] - 0.15).abs() < 1e-6);
        assert_eq!(dts[2], 0.0);
        assert!((dts[3] - 0.15).abs() < 1e-6);
    }

    #[test]
    fn long_stall_is_not_clamped() {
        let mut clock = FrameClock::new(scripted(vec![16, 60_016]));
        clock.tick();
        let ft = clock.tick();
        assert!((ft.dt - 60.0).abs() < 1e-4);
        assert_eq!(ft.frame_index, 1);
    }

    #[test]
    fn backwards_source_yields_zero_delta() {
        let mut clock = FrameClock::new(scripted(vec![500, 400]));
        clock.tick();
        assert_eq!(clock.tick().dt, 0.0);
        assert!((clock.previous_seconds() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn system_ticks_are_non_decreasing() {
        let mut ticks = SystemTicks::new();
        let a = ticks.ticks_ms();
        let b = ticks.ticks_ms();
        assert!(b >= a);
    }
}
