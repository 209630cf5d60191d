//! Ripple background: event intake, per-frame uniform marshaling, teardown
//!
//! The effect owns the ripple ring buffer for as long as it is mounted.
//! Anything else that wants a ripple gets a `RippleSink`, which can append
//! but never read. The GPU side sits behind `RippleBackend` so the effect
//! degrades to a no-op when graphics setup fails.

use std::cell::RefCell;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

use super::error::RippleError;
use super::ripple_buffer::{RippleBuffer, RippleSnapshot};
use crate::config::RippleConfig;
use crate::consts::MAX_RIPPLES;
use crate::platform::Clock;

// ============================================================================
// GPU DATA STRUCTURES (must match ripple_shader.wgsl)
// ============================================================================

/// Everything the fragment stage needs for one frame
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RippleUniforms {
    pub resolution: [f32; 2], // offset 0
    pub time: f32,            // offset 8
    pub ripple_count: u32,    // offset 12
    pub pixel_count: f32,     // offset 16
    pub _pad: [f32; 3],       // offset 20 - align ripples to 16 bytes
    /// (center.x, center.y, start_time, unused) per slot
    pub ripples: [[f32; 4]; MAX_RIPPLES], // offset 32
}

impl RippleUniforms {
    pub fn new(
        snapshot: RippleSnapshot<'_>,
        resolution: (u32, u32),
        time: f32,
        pixel_count: f32,
    ) -> Self {
        let mut ripples = [[0.0; 4]; MAX_RIPPLES];
        for (slot, event) in ripples.iter_mut().zip(snapshot.slots.iter()) {
            *slot = [event.center[0], event.center[1], event.start_time, 0.0];
        }

        Self {
            resolution: [resolution.0 as f32, resolution.1 as f32],
            time,
            ripple_count: snapshot.live_count.min(MAX_RIPPLES) as u32,
            pixel_count,
            _pad: [0.0; 3],
            ripples,
        }
    }
}

/// GPU side of the effect
pub trait RippleBackend {
    /// Reconfigure the drawing surface to `width` x `height` pixels
    fn resize(&mut self, width: u32, height: u32);

    /// Upload `uniforms` and draw one full-screen pass
    fn draw(&mut self, uniforms: &RippleUniforms) -> Result<(), RippleError>;

    /// Free every GPU object
    fn release(self)
    where
        Self: Sized;

    /// Largest surface side the device accepts, if limited
    fn max_dimension(&self) -> Option<u32> {
        None
    }
}

/// Shrink `width` x `height` uniformly until both sides fit in `max_dimension`
pub fn fit_surface(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let max_dimension = max_dimension.max(1);
    let longest = width.max(height);
    if longest <= max_dimension {
        return (width.max(1), height.max(1));
    }
    let scale = max_dimension as f64 / longest as f64;
    let fit = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    (fit(width), fit(height))
}

/// Canvas bounding rectangle in client (CSS pixel) coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClientRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ClientRect {
    /// Map a client point into normalized [0,1] space with y pointing up.
    /// Returns `None` for non-finite input, an empty rect, or points outside it.
    pub fn normalize(&self, client_x: f64, client_y: f64) -> Option<[f32; 2]> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        if !client_x.is_finite() || !client_y.is_finite() {
            return None;
        }

        let x = (client_x - self.left) / self.width;
        let y = 1.0 - (client_y - self.top) / self.height;
        if !(0.0..=1.0).contains(&x) || !(0.0..=1.0).contains(&y) {
            return None;
        }
        Some([x as f32, y as f32])
    }
}

type RectSource = Rc<dyn Fn() -> Option<ClientRect>>;

/// Append-only handle for triggering ripples from anywhere in the app
#[derive(Clone)]
pub struct RippleSink {
    buffer: Rc<RefCell<RippleBuffer>>,
    clock: Clock,
    surface_rect: RectSource,
}

impl RippleSink {
    /// Ripple at a normalized point, timestamped now
    pub fn add_ripple(&self, norm_x: f32, norm_y: f32) {
        self.add_ripple_at(norm_x, norm_y, self.clock.elapsed_secs());
    }

    fn add_ripple_at(&self, norm_x: f32, norm_y: f32, now: f32) {
        match self.buffer.try_borrow_mut() {
            Ok(mut buffer) => buffer.add_ripple(norm_x, norm_y, now),
            Err(_) => log::warn!("Ripple buffer busy, dropping ripple"),
        }
    }

    /// Ripple at a client-space point (e.g. a pointer event's clientX/clientY).
    /// Returns false when the point could not be mapped onto the canvas.
    pub fn publish(&self, client_x: f64, client_y: f64) -> bool {
        let Some(rect) = (self.surface_rect)() else {
            return false;
        };
        match rect.normalize(client_x, client_y) {
            Some([x, y]) => {
                self.add_ripple(x, y);
                true
            }
            None => {
                log::debug!("Ignoring ripple at ({client_x}, {client_y})");
                false
            }
        }
    }

    /// Ripple from an optional pointer position (touch events may carry none)
    pub fn publish_pointer(&self, point: Option<(f64, f64)>) -> bool {
        point.is_some_and(|(x, y)| self.publish(x, y))
    }
}

/// The mounted ripple background
pub struct RippleEffect<B: RippleBackend> {
    buffer: Rc<RefCell<RippleBuffer>>,
    clock: Clock,
    backend: Option<B>,
    size: (u32, u32),
    pixel_count: f32,
}

impl<B: RippleBackend> RippleEffect<B> {
    /// Mount the effect. `backend` is `None` when graphics setup failed;
    /// ripples are still accepted but nothing is drawn.
    pub fn new(backend: Option<B>, width: u32, height: u32, config: &RippleConfig) -> Self {
        Self::with_clock(backend, width, height, config, Clock::start())
    }

    pub fn with_clock(
        backend: Option<B>,
        width: u32,
        height: u32,
        config: &RippleConfig,
        clock: Clock,
    ) -> Self {
        if backend.is_none() {
            log::warn!("Ripple effect mounted without a GPU backend; background disabled");
        }
        let size = Self::fitted(backend.as_ref(), width, height);
        Self {
            buffer: Rc::new(RefCell::new(RippleBuffer::new())),
            clock,
            backend,
            size,
            pixel_count: config.pixel_count,
        }
    }

    fn fitted(backend: Option<&B>, width: u32, height: u32) -> (u32, u32) {
        match backend.and_then(|b| b.max_dimension()) {
            Some(max) => fit_surface(width, height, max),
            None => (width, height),
        }
    }

    /// Hand out an append-only handle; `surface_rect` reports the canvas's
    /// current client rectangle for coordinate conversion
    pub fn sink<F>(&self, surface_rect: F) -> RippleSink
    where
        F: Fn() -> Option<ClientRect> + 'static,
    {
        RippleSink {
            buffer: self.buffer.clone(),
            clock: self.clock,
            surface_rect: Rc::new(surface_rect),
        }
    }

    pub fn is_active(&self) -> bool {
        self.backend.is_some()
    }

    /// Drawing resolution, after fitting to the device's limits
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Frame parameters for time `now` (seconds since mount)
    pub fn uniforms(&self, now: f32) -> RippleUniforms {
        let buffer = self.buffer.borrow();
        RippleUniforms::new(buffer.snapshot(), self.size, now, self.pixel_count)
    }

    /// Draw a frame at the current time
    pub fn render_frame(&mut self) -> bool {
        let now = self.clock.elapsed_secs();
        self.render_at(now)
    }

    /// Draw a frame at `now` seconds. Returns whether a draw was issued.
    pub fn render_at(&mut self, now: f32) -> bool {
        if self.backend.is_none() {
            return false;
        }
        let uniforms = self.uniforms(now);
        let size = self.size;
        let Some(backend) = self.backend.as_mut() else {
            return false;
        };

        match backend.draw(&uniforms) {
            Ok(()) => true,
            Err(RippleError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                backend.resize(size.0, size.1);
                false
            }
            Err(RippleError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                log::error!("Out of memory!");
                false
            }
            Err(e) => {
                log::warn!("Render error: {e}");
                false
            }
        }
    }

    /// Track a viewport resize; buffered ripples stay put in normalized space
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.size = Self::fitted(self.backend.as_ref(), width, height);
        if let Some(backend) = self.backend.as_mut() {
            backend.resize(self.size.0, self.size.1);
        }
    }

    /// Release GPU objects. Safe to call repeatedly; returns whether this
    /// call released anything.
    pub fn teardown(&mut self) -> bool {
        match self.backend.take() {
            Some(backend) => {
                backend.release();
                log::info!("Ripple effect released");
                true
            }
            None => false,
        }
    }
}

impl<B: RippleBackend> Drop for RippleEffect<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
