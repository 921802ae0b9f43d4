use crate::clock::Clock;
use crate::render::ClockFace;
use crate::surface::Surface;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    /// Another frame should be scheduled.
    Continue,
    Stopped,
}

/// Stops a [`FrameLoop`] before its next frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Repeating draw task. Every tick reads the clock and repaints the whole
/// face; nothing carries over between frames except the frame count.
pub struct FrameLoop<C> {
    face: ClockFace,
    clock: C,
    stop: StopHandle,
    frames: u64,
}

impl<C: Clock> FrameLoop<C> {
    pub fn new(face: ClockFace, clock: C) -> Self {
        Self {
            face,
            clock,
            stop: StopHandle::default(),
            frames: 0,
        }
    }

    pub fn face(&self) -> &ClockFace {
        &self.face
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws one frame unless the loop has been stopped.
    pub fn tick(&mut self, surface: &mut dyn Surface) -> FrameStatus {
        if self.stop.is_stopped() {
            return FrameStatus::Stopped;
        }
        let minute = self.clock.minute_of_day();
        trace!(frame = self.frames, minute, "drawing frame");
        self.face.draw(surface, minute);
        self.frames += 1;
        if self.stop.is_stopped() {
            debug!(frames = self.frames, "frame loop stopped");
            FrameStatus::Stopped
        } else {
            FrameStatus::Continue
        }
    }

    /// Runs at most `count` frames back to back, returning how many were drawn.
    pub fn run_frames(&mut self, surface: &mut dyn Surface, count: u64) -> u64 {
        let before = self.frames;
        for _ in 0..count {
            if self.tick(surface) == FrameStatus::Stopped {
                break;
            }
        }
        self.frames - before
    }
}
