//! Fish lifecycle: swim, get caught, respawn

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::session::SessionId;
use super::steering::{self, MotionProfile, MotionState, StepOutcome};
use crate::config::FishConfig;

/// Whether the fish is on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Visible,
    Hidden,
}

/// Where to draw a visible fish
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    /// Viewport width percent
    pub x: f32,
    /// Viewport height percent
    pub y: f32,
    pub rotation_deg: f32,
}

impl Pose {
    /// CSS transform placing the fish element
    pub fn css_transform(&self) -> String {
        format!(
            "translate({}vw, {}vh) rotate({}deg)",
            self.x, self.y, self.rotation_deg
        )
    }
}

/// Permission to bring a caught fish back after `delay_ms`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RespawnTicket {
    pub agent: usize,
    pub session: SessionId,
    pub delay_ms: u32,
}

/// One autonomous fish
#[derive(Debug, Clone)]
pub struct Agent {
    id: usize,
    visibility: Visibility,
    color_index: usize,
    motion: MotionState,
    profile: MotionProfile,
    config: FishConfig,
    rng: Pcg32,
}

impl Agent {
    /// Spawn a visible fish with a fresh profile, position, target and color
    pub fn spawn(id: usize, config: &FishConfig, viewport_width: f32, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let profile = MotionProfile::roll(config, viewport_width, &mut rng);
        let motion = MotionState::spawn(&config.bounds, &mut rng);
        let color_index = rng.random_range(0..config.palette.len().max(1));

        Self {
            id,
            visibility: Visibility::Visible,
            color_index,
            motion,
            profile,
            config: config.clone(),
            rng,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_visible(&self) -> bool {
        self.visibility == Visibility::Visible
    }

    pub fn color_index(&self) -> usize {
        self.color_index
    }

    /// CSS color of this fish
    pub fn color(&self) -> &str {
        self.config
            .palette
            .get(self.color_index)
            .map(String::as_str)
            .unwrap_or("#FFFFFF")
    }

    pub fn motion(&self) -> &MotionState {
        &self.motion
    }

    pub fn profile(&self) -> &MotionProfile {
        &self.profile
    }

    /// Current pose, if on screen
    pub fn pose(&self) -> Option<Pose> {
        self.is_visible().then(|| Pose {
            x: self.motion.position.x,
            y: self.motion.position.y,
            rotation_deg: self.motion.heading.to_degrees(),
        })
    }

    /// Advance the steering simulation; hidden fish stay frozen
    pub fn tick(&mut self, dt: f32) -> Option<(Pose, StepOutcome)> {
        if !self.is_visible() {
            return None;
        }
        let outcome = steering::step(
            &mut self.motion,
            &self.profile,
            &self.config.bounds,
            dt,
            &mut self.rng,
        );
        self.pose().map(|pose| (pose, outcome))
    }

    /// Handle a click on this fish.
    ///
    /// Hides the fish, reports the raw event to `on_score` exactly once and
    /// returns the ticket for its respawn. Clicks on a hidden fish do nothing.
    pub fn on_click<E, F>(&mut self, event: &E, session: SessionId, on_score: F) -> Option<RespawnTicket>
    where
        F: FnOnce(&E),
    {
        if !self.is_visible() {
            return None;
        }
        self.visibility = Visibility::Hidden;
        on_score(event);

        Some(RespawnTicket {
            agent: self.id,
            session,
            delay_ms: self.config.respawn_delay_ms,
        })
    }

    /// Bring the fish back with a new color, position and target.
    ///
    /// Returns false (and changes nothing) if the ticket belongs to another
    /// fish or to a session that has since been reset.
    pub fn respawn(&mut self, ticket: RespawnTicket, current: SessionId) -> bool {
        if ticket.agent != self.id || ticket.session != current {
            log::debug!(
                "Dropping stale respawn for fish {} (session {:?}, current {:?})",
                ticket.agent,
                ticket.session,
                current
            );
            return false;
        }
        if self.is_visible() {
            return false;
        }

        self.color_index = self.rng.random_range(0..self.config.palette.len().max(1));
        self.motion.respawn(&self.config.bounds, &mut self.rng);
        self.visibility = Visibility::Visible;
        true
    }
}
