//! Monotonic wall clock

/// Milliseconds on a monotonic clock (`performance.now()` in the browser)
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    web_sys::window()
        .and_then(|w| w.performance())
        .map(|p| p.now())
        .unwrap_or_else(js_sys::Date::now)
}

/// Milliseconds since the first call in this process
#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static ORIGIN: OnceLock<Instant> = OnceLock::new();
    ORIGIN.get_or_init(Instant::now).elapsed().as_secs_f64() * 1000.0
}

/// Seconds elapsed since a fixed epoch
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    epoch_ms: f64,
}

impl Clock {
    /// Start counting from now
    pub fn start() -> Self {
        Self { epoch_ms: now_ms() }
    }

    pub fn with_epoch(epoch_ms: f64) -> Self {
        Self { epoch_ms }
    }

    /// Seconds between the epoch and `now_ms`
    pub fn seconds_at(&self, now_ms: f64) -> f32 {
        ((now_ms - self.epoch_ms) / 1000.0) as f32
    }

    pub fn elapsed_secs(&self) -> f32 {
        self.seconds_at(now_ms())
    }
}
