//! One-shot `setTimeout` callbacks that can be cancelled

use std::cell::Cell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

/// A pending one-shot callback; dropping it cancels the call
pub struct Timeout {
    id: Option<i32>,
    fired: Rc<Cell<bool>>,
    _callback: Closure<dyn FnMut()>,
}

impl Timeout {
    /// Run `f` once after `delay_ms`. Returns `None` if the browser refused.
    pub fn schedule<F>(delay_ms: u32, f: F) -> Option<Self>
    where
        F: FnOnce() + 'static,
    {
        let fired = Rc::new(Cell::new(false));
        let fired_in = fired.clone();
        let mut f = Some(f);
        let callback = Closure::<dyn FnMut()>::new(move || {
            fired_in.set(true);
            if let Some(f) = f.take() {
                f();
            }
        });

        let id = web_sys::window()?
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .ok()?;

        Some(Self {
            id: Some(id),
            fired,
            _callback: callback,
        })
    }

    /// Still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.id.is_some() && !self.fired.get()
    }

    pub fn cancel(&mut self) {
        if let Some(id) = self.id.take() {
            if !self.fired.get() {
                if let Some(window) = web_sys::window() {
                    window.clear_timeout_with_handle(id);
                }
            }
        }
    }
}

impl Drop for Timeout {
    fn drop(&mut self) {
        self.cancel();
    }
}
