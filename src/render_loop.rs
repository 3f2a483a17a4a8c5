//! Cancellable frame loop.
//!
//! [`RenderLoop`] paces nothing itself: a windowed host calls
//! [`RenderLoop::tick`] once per redraw, a headless host calls
//! [`RenderLoop::run`]. Either way the loop ends once its [`StopHandle`]
//! fires, and the handle can be cloned to other threads.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use web_time::Duration;

use crate::util::frame_timing::FrameTiming;

const FPS_REPORT_INTERVAL: Duration = Duration::from_secs(5);

/// Shared flag that stops a [`RenderLoop`].
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    stopped: Arc<AtomicBool>,
}

impl StopHandle {
    /// A handle that has not been stopped.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the loop to stop before its next frame.
    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    /// Whether [`stop`](Self::stop) has been called on any clone.
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }
}

/// Repeating per-frame task with an explicit stop handle.
pub struct RenderLoop {
    stop: StopHandle,
    timing: FrameTiming,
    frames: u64,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderLoop {
    /// Loop with a fresh stop handle.
    pub fn new() -> Self {
        Self::with_handle(StopHandle::new())
    }

    /// Loop controlled by an existing handle.
    pub fn with_handle(stop: StopHandle) -> Self {
        Self {
            stop,
            timing: FrameTiming::new(),
            frames: 0,
        }
    }

    /// A clone of this loop's stop handle.
    pub fn handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one frame unless stopped, passing the clamped delta in seconds.
    ///
    /// Returns `false` (without calling `frame`) once the loop is stopped.
    pub fn tick<F: FnOnce(f32)>(&mut self, frame: F) -> bool {
        if self.stop.is_stopped() {
            return false;
        }
        let dt = self.timing.tick();
        frame(dt);
        self.frames += 1;

        if self.timing.should_report(FPS_REPORT_INTERVAL) {
            log::debug!(
                "{:.1} fps over {} frames",
                self.timing.fps(),
                self.frames
            );
        }
        true
    }

    /// Call `frame` repeatedly until the handle is stopped.
    ///
    /// `frame` receives the delta and the stop handle, so it can end the
    /// loop itself.
    pub fn run<F: FnMut(f32, &StopHandle)>(&mut self, mut frame: F) {
        let stop = self.handle();
        while self.tick(|dt| frame(dt, &stop)) {}
        log::debug!("render loop stopped after {} frames", self.frames);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn stops_from_inside_the_frame() {
        let mut render_loop = RenderLoop::new();
        let mut seen = 0;
        render_loop.run(|dt, stop| {
            assert!((0.0..=0.25).contains(&dt));
            seen += 1;
            if seen == 5 {
                stop.stop();
            }
        });
        assert_eq!(seen, 5);
        assert_eq!(render_loop.frames(), 5);
    }

    #[test]
    fn tick_is_a_no_op_once_stopped() {
        let mut render_loop = RenderLoop::new();
        assert!(render_loop.tick(|_| {}));
        render_loop.handle().stop();

        let mut called = false;
        assert!(!render_loop.tick(|_| called = true));
        assert!(!called);
        assert_eq!(render_loop.frames(), 1);
    }

    #[test]
    fn stops_from_another_thread() {
        let mut render_loop = RenderLoop::new();
        let handle = render_loop.handle();

        let stopper = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            handle.stop();
        });

        render_loop.run(|_, _| thread::sleep(Duration::from_millis(1)));
        let _ = stopper.join();
        assert!(render_loop.handle().is_stopped());
        assert!(render_loop.frames() > 0);
    }

    #[test]
    fn shared_handle_controls_loop() {
        let handle = StopHandle::new();
        let mut render_loop = RenderLoop::with_handle(handle.clone());
        handle.stop();
        render_loop.run(|_, _| panic!("stopped loop must not run frames"));
        assert_eq!(render_loop.frames(), 0);
    }
}
