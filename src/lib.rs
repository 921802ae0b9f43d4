//! A 24-hour day clock: a dial of colored time-of-day sections with a pointer
//! at the current time.
//!
//! Loading goes document text → [`parse_sections`] → [`build_schedule`] →
//! [`ClockFace`], after which a [`FrameLoop`] repaints the face every frame,
//! either into a native window ([`ClockWindow`]) or any other [`Surface`].

pub mod canvas;
pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod frame_loop;
pub mod logging;
pub mod render;
pub mod schedule;
pub mod snapshot;
pub mod surface;

pub use canvas::PixelCanvas;
pub use clock::{minute_to_angle, Clock, ClockState, FixedClock, SystemClock};
pub use config::{ClockConfig, Color};
pub use document::{parse_sections, DocumentSource, FileSource, SectionRecord, SECTIONS_RESOURCE};
pub use error::{ClockError, Result};
pub use frame_loop::{FrameLoop, FrameStatus, StopHandle};
pub use render::{ClockFace, Scene};
pub use schedule::{build_schedule, ScheduledSection, MINUTES_PER_DAY};
pub use snapshot::render_png;
pub use surface::{Path, Surface};

use pixels::{Pixels, SurfaceTexture};
use std::time::{Duration, Instant};
use tracing::{error, info, warn};
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

/// Native window showing a live clock face.
pub struct ClockWindow<C = SystemClock> {
    frame_loop: FrameLoop<C>,
}

impl ClockWindow<SystemClock> {
    pub fn new(face: ClockFace) -> Self {
        Self::with_clock(face, SystemClock)
    }
}

impl<C: Clock> ClockWindow<C> {
    pub fn with_clock(face: ClockFace, clock: C) -> Self {
        Self {
            frame_loop: FrameLoop::new(face, clock),
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.frame_loop.stop_handle()
    }

    /// Opens the window and repaints until it is closed or the loop is stopped.
    pub fn show(self) -> Result<()> {
        let mut frame_loop = self.frame_loop;
        let config = frame_loop.face().config().clone();

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(
                config.window_width as f64,
                config.window_height as f64,
            ))
            .with_resizable(config.resizable)
            .build(&event_loop)?;

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels = Pixels::new(size.width, size.height, surface_texture)?;

        let frame_duration = frame_interval(config.max_framerate);
        let mut last_frame = Instant::now();
        let window = &window;
        info!(width = fb_width, height = fb_height, "clock window opened");

        event_loop.run(move |event, window_target| match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => {
                    frame_loop.stop_handle().stop();
                    window_target.exit();
                }
                WindowEvent::Resized(new_size) => {
                    if new_size.width == 0 || new_size.height == 0 {
                        return;
                    }
                    let resized = pixels
                        .resize_buffer(new_size.width, new_size.height)
                        .and_then(|()| pixels.resize_surface(new_size.width, new_size.height));
                    match resized {
                        Ok(()) => {
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                        }
                        Err(err) => warn!(error = %err, "failed to resize frame buffer"),
                    }
                }
                WindowEvent::RedrawRequested => {
                    let mut canvas =
                        PixelCanvas::new(pixels.frame_mut(), fb_width, fb_height, config.background_color);
                    let status = frame_loop.tick(&mut canvas);
                    if let Err(err) = pixels.render() {
                        error!(error = %err, "failed to present frame");
                        window_target.exit();
                    }
                    if status == FrameStatus::Stopped {
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    window.request_redraw();
                    last_frame = Instant::now();
                }
                window_target.set_control_flow(ControlFlow::WaitUntil(last_frame + frame_duration));
            }
            _ => {}
        })?;

        Ok(())
    }
}

const DEFAULT_FRAMERATE: f64 = 60.0;
const MIN_FRAMERATE: f64 = 0.01;
const MAX_FRAMERATE: f64 = 240.0;

/// Time between redraws. Rates that are not positive and finite fall back to
/// 60 fps; the rest are held between one frame per 100 s and 240 fps.
fn frame_interval(max_framerate: f64) -> Duration {
    let rate = if max_framerate.is_finite() && max_framerate > 0.0 {
        max_framerate.clamp(MIN_FRAMERATE, MAX_FRAMERATE)
    } else {
        warn!(max_framerate, fallback = DEFAULT_FRAMERATE, "unusable frame rate");
        DEFAULT_FRAMERATE
    };
    Duration::from_secs_f64(1.0 / rate)
}
