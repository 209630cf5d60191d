//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (`performance.now()` vs `Instant`)
//! - Animation-frame scheduling (browser only)
//! - One-shot timers (browser only)

pub mod time;

#[cfg(target_arch = "wasm32")]
pub mod frame;
#[cfg(target_arch = "wasm32")]
pub mod timer;

pub use time::{Clock, now_ms};

#[cfg(target_arch = "wasm32")]
pub use frame::FrameLoop;
#[cfg(target_arch = "wasm32")]
pub use timer::Timeout;
