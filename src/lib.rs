//! Splash - a point-and-click fish catching game
//!
//! Core modules:
//! - `sim`: Agent steering, click lifecycle and game session (no rendering)
//! - `renderer`: WebGPU ripple background (ring buffer + full-screen shader)
//! - `platform`: Browser/native platform abstraction (clock, frame loop, timers)
//! - `config`: Data-driven game tuning

pub mod config;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::{Config, ConfigError};

/// Game configuration constants
pub mod consts {
    /// Simulation space spans 0..100 percent of the viewport on each axis
    pub const ARENA_MIN: f32 = 0.0;
    pub const ARENA_MAX: f32 = 100.0;

    /// Motion parameters are tuned per frame at this tick rate
    pub const BASELINE_TICK_RATE: f32 = 60.0;
    /// Largest frame delta fed to the steering engine (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Ripple ring buffer capacity (must match `MAX_RIPPLES` in the shader)
    pub const MAX_RIPPLES: usize = 10;

    /// CSS class marking an agent's clickable element
    pub const AGENT_MARKER_CLASS: &str = "fish-clickable";
}

/// Shortest signed angular delta from `from` to `to`, in (-π, π]
#[inline]
pub fn shortest_angle(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    // rem_euclid lands in [0, TAU] even for headings far from zero
    let delta = (to - from).rem_euclid(TAU);
    if delta > PI { delta - TAU } else { delta }
}
