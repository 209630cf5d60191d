//! Gameplay simulation
//!
//! Everything here is plain Rust with no browser or GPU dependencies:
//! - Each fish owns its own seeded RNG and motion state
//! - Fish never reference each other
//! - Time only enters through the `dt` handed to each tick

pub mod agent;
pub mod session;
pub mod steering;

pub use agent::{Agent, Pose, RespawnTicket, Visibility};
pub use session::{ClickOutcome, Feedback, FeedbackKind, GamePhase, GameSession, SessionId};
pub use steering::{Bounce, MotionProfile, MotionState, StepOutcome, step};

/// Spawn a school of `count` fish, each seeded from `seed`
pub fn spawn_school(
    config: &crate::config::FishConfig,
    count: usize,
    viewport_width: f32,
    seed: u64,
) -> Vec<Agent> {
    (0..count)
        .map(|id| {
            let fish_seed = seed.wrapping_add((id as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            Agent::spawn(id, config, viewport_width, fish_seed)
        })
        .collect()
}
