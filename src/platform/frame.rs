//! `requestAnimationFrame` loop with cancellation

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::consts::MAX_FRAME_DT;

type FrameCallback = Closure<dyn FnMut(f64)>;
type SharedCallback = Rc<RefCell<Option<FrameCallback>>>;

/// A self-rescheduling per-frame callback.
///
/// The loop stops when `cancel` is called (including from inside the step)
/// or when the handle is dropped.
pub struct FrameLoop {
    handle: Rc<Cell<Option<i32>>>,
    _callback: SharedCallback,
}

impl FrameLoop {
    /// Start calling `step(timestamp_ms, dt_secs)` every animation frame.
    /// `dt_secs` is 0 on the first frame and clamped to `MAX_FRAME_DT`.
    pub fn start<F>(mut step: F) -> Self
    where
        F: FnMut(f64, f32) + 'static,
    {
        let handle = Rc::new(Cell::new(None));
        let callback: SharedCallback = Rc::new(RefCell::new(None));

        let weak: Weak<RefCell<Option<FrameCallback>>> = Rc::downgrade(&callback);
        let handle_in = handle.clone();
        let mut last_time: Option<f64> = None;

        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |time: f64| {
            let dt = last_time
                .map(|last| ((time - last) / 1000.0) as f32)
                .unwrap_or(0.0)
                .clamp(0.0, MAX_FRAME_DT);
            last_time = Some(time);

            step(time, dt);

            // Cancelled during the step
            if handle_in.get().is_none() {
                return;
            }
            if let Some(callback) = weak.upgrade() {
                handle_in.set(request_frame(&callback));
            }
        }));

        handle.set(request_frame(&callback));
        Self {
            handle,
            _callback: callback,
        }
    }

    /// Cancel the pending frame; later calls are no-ops
    pub fn cancel(&self) {
        if let Some(id) = self.handle.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn request_frame(callback: &SharedCallback) -> Option<i32> {
    let window = web_sys::window()?;
    let borrowed = callback.borrow();
    let closure = borrowed.as_ref()?;
    match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
        Ok(id) => Some(id),
        Err(e) => {
            log::warn!("requestAnimationFrame failed: {:?}", e);
            None
        }
    }
}
