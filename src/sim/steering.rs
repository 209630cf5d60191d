//! Seek-with-bounded-turn steering
//!
//! Each fish chases a random target point, turning at most `max_turn_rate`
//! radians per tick, with a little heading noise so paths never look scripted.
//! Positions are viewport percentages; the fish bounces off the viewport edges.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::{FishConfig, SpawnBounds, Spread};
use crate::consts::*;
use crate::shortest_angle;

/// Movement personality, rolled once per fish
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionProfile {
    /// Percent of viewport per baseline tick
    pub speed: f32,
    /// Radians per tick
    pub max_turn_rate: f32,
    /// Radians per tick
    pub jitter_strength: f32,
    /// Percent of viewport
    pub reach_threshold: f32,
}

impl MotionProfile {
    /// Roll a profile from the configured ranges.
    /// `viewport_width` is in CSS pixels; narrow viewports swim faster.
    pub fn roll<R: Rng + ?Sized>(config: &FishConfig, viewport_width: f32, rng: &mut R) -> Self {
        let speed_multiplier = if viewport_width < config.mobile_breakpoint {
            config.mobile_speed_multiplier
        } else {
            1.0
        };

        Self {
            speed: sample(config.speed, rng) * speed_multiplier,
            max_turn_rate: sample(config.turn_rate, rng),
            jitter_strength: sample(config.jitter, rng),
            reach_threshold: sample(config.reach_threshold, rng),
        }
    }
}

fn sample<R: Rng + ?Sized>(spread: Spread, rng: &mut R) -> f32 {
    // A variance too small to move `base` leaves an empty range
    if spread.base < spread.max() {
        rng.random_range(spread.base..spread.max())
    } else {
        spread.base
    }
}

/// Uniform random point inside the spawn bounds (axes independent)
pub fn random_point<R: Rng + ?Sized>(bounds: &SpawnBounds, rng: &mut R) -> Vec2 {
    Vec2::new(
        rng.random_range(bounds.min..bounds.max),
        rng.random_range(bounds.min..bounds.max),
    )
}

/// Per-fish kinematic state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MotionState {
    /// Viewport percent, always inside `ARENA_MIN..=ARENA_MAX` after a step
    pub position: Vec2,
    /// Radians, accumulated without wrapping
    pub heading: f32,
    pub target: Vec2,
}

impl MotionState {
    pub fn spawn<R: Rng + ?Sized>(bounds: &SpawnBounds, rng: &mut R) -> Self {
        Self {
            position: random_point(bounds, rng),
            heading: rng.random_range(0.0..std::f32::consts::TAU),
            target: random_point(bounds, rng),
        }
    }

    /// Fresh position and target; heading carries over
    pub fn respawn<R: Rng + ?Sized>(&mut self, bounds: &SpawnBounds, rng: &mut R) {
        self.position = random_point(bounds, rng);
        self.target = random_point(bounds, rng);
    }
}

/// Which walls a step bounced off
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounce {
    pub x: bool,
    pub y: bool,
}

impl Bounce {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// What happened during one step
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepOutcome {
    /// Heading noise added this step
    pub jitter: f32,
    /// A new target was picked
    pub retargeted: bool,
    pub bounce: Bounce,
}

/// Advance one fish by `dt` seconds
pub fn step<R: Rng + ?Sized>(
    state: &mut MotionState,
    profile: &MotionProfile,
    bounds: &SpawnBounds,
    dt: f32,
    rng: &mut R,
) -> StepOutcome {
    let mut outcome = StepOutcome::default();

    let to_target = state.target - state.position;
    if to_target.length() < profile.reach_threshold {
        state.target = random_point(bounds, rng);
        outcome.retargeted = true;
    }

    // Steer toward the target seen at the start of the step
    let desired = to_target.y.atan2(to_target.x);
    state.heading += turn_toward(state.heading, desired, profile.max_turn_rate);

    outcome.jitter = if profile.jitter_strength > 0.0 {
        rng.random_range(-profile.jitter_strength..=profile.jitter_strength)
    } else {
        0.0
    };
    state.heading += outcome.jitter;

    let distance = profile.speed * dt * BASELINE_TICK_RATE;
    state.position += Vec2::new(state.heading.cos(), state.heading.sin()) * distance;

    outcome.bounce = reflect_at_walls(state);
    outcome
}

/// Heading change toward `desired`, capped at `max_turn` radians
#[inline]
pub fn turn_toward(heading: f32, desired: f32, max_turn: f32) -> f32 {
    let delta = shortest_angle(heading, desired);
    delta.signum() * delta.abs().min(max_turn)
}

/// Clamp any axis that left the arena and mirror the heading off that wall
fn reflect_at_walls(state: &mut MotionState) -> Bounce {
    let mut bounce = Bounce::default();
    let outside = |v: f32| !(ARENA_MIN..=ARENA_MAX).contains(&v);

    if outside(state.position.x) {
        state.position.x = state.position.x.clamp(ARENA_MIN, ARENA_MAX);
        state.heading = std::f32::consts::PI - state.heading;
        bounce.x = true;
    }
    if outside(state.position.y) {
        state.position.y = state.position.y.clamp(ARENA_MIN, ARENA_MAX);
        state.heading = -state.heading;
        bounce.y = true;
    }

    bounce
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{FRAC_PI_2, PI};

    const DT: f32 = 1.0 / 60.0;

    fn calm_profile() -> MotionProfile {
        MotionProfile {
            speed: 0.2,
            max_turn_rate: 0.01,
            jitter_strength: 0.0,
            reach_threshold: 3.0,
        }
    }

    #[test]
    fn test_profile_rolls_inside_configured_ranges() {
        let config = FishConfig::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let p = MotionProfile::roll(&config, 1280.0, &mut rng);
            assert!(p.speed >= config.speed.base && p.speed < config.speed.max());
            assert!(p.max_turn_rate >= config.turn_rate.base && p.max_turn_rate < config.turn_rate.max());
            assert!(p.jitter_strength >= config.jitter.base && p.jitter_strength < config.jitter.max());
            assert!(p.reach_threshold >= 3.0 && p.reach_threshold < 6.0);
        }
    }

    #[test]
    fn test_degenerate_spread_samples_base() {
        let config = FishConfig {
            speed: Spread::new(0.12, 1e-10),
            turn_rate: Spread::new(0.01, 0.0),
            jitter: Spread::new(0.005, -1.0),
            ..FishConfig::default()
        };
        let p = MotionProfile::roll(&config, 1280.0, &mut Pcg32::seed_from_u64(5));
        assert_eq!(p.speed, 0.12);
        assert_eq!(p.max_turn_rate, 0.01);
        assert_eq!(p.jitter_strength, 0.005);
    }

    #[test]
    fn test_mobile_viewport_swims_faster() {
        let config = FishConfig::default();
        let desktop = MotionProfile::roll(&config, 1280.0, &mut Pcg32::seed_from_u64(3));
        let mobile = MotionProfile::roll(&config, 400.0, &mut Pcg32::seed_from_u64(3));
        assert!((mobile.speed - desktop.speed * 1.5).abs() < 1e-6);
        assert_eq!(mobile.max_turn_rate, desktop.max_turn_rate);
    }

    #[test]
    fn test_spawn_inside_bounds() {
        let bounds = SpawnBounds::default();
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..100 {
            let s = MotionState::spawn(&bounds, &mut rng);
            for v in [s.position.x, s.position.y, s.target.x, s.target.y] {
                assert!((10.0..90.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_turn_is_capped() {
        // Target straight behind: the full delta is π but only 0.01 is allowed
        let mut state = MotionState {
            position: Vec2::new(50.0, 50.0),
            heading: 0.0,
            target: Vec2::new(20.0, 50.0),
        };
        let mut rng = Pcg32::seed_from_u64(1);
        step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!((state.heading.abs() - 0.01).abs() < 1e-6);
    }

    #[test]
    fn test_small_turns_snap_to_target_direction() {
        let mut state = MotionState {
            position: Vec2::new(50.0, 50.0),
            heading: 0.0,
            target: Vec2::new(80.0, 50.1),
        };
        let desired = 0.1_f32.atan2(30.0);
        let mut rng = Pcg32::seed_from_u64(1);
        step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!((state.heading - desired).abs() < 1e-6);
    }

    #[test]
    fn test_turns_the_short_way() {
        assert!(turn_toward(0.0, 3.0 * PI / 2.0, 1.0) < 0.0);
        assert!((turn_toward(0.0, 3.0 * PI / 2.0, 10.0) + FRAC_PI_2).abs() < 1e-5);
        // Accumulated heading several turns around still steers locally
        assert!((turn_toward(6.0 * PI, 6.0 * PI + 0.3, 1.0) - 0.3).abs() < 1e-4);
    }

    #[test]
    fn test_retargets_when_close() {
        let mut state = MotionState {
            position: Vec2::new(50.0, 50.0),
            heading: 0.0,
            target: Vec2::new(51.0, 50.0),
        };
        let mut rng = Pcg32::seed_from_u64(5);
        let outcome = step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!(outcome.retargeted);
        assert_ne!(state.target, Vec2::new(51.0, 50.0));

        let mut far = MotionState {
            position: Vec2::new(50.0, 50.0),
            heading: 0.0,
            target: Vec2::new(70.0, 50.0),
        };
        let outcome = step(&mut far, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!(!outcome.retargeted);
        assert_eq!(far.target, Vec2::new(70.0, 50.0));
    }

    #[test]
    fn test_motion_is_frame_rate_independent() {
        let profile = MotionProfile {
            max_turn_rate: 0.0,
            ..calm_profile()
        };
        let start = MotionState {
            position: Vec2::new(30.0, 50.0),
            heading: 0.0,
            target: Vec2::new(80.0, 50.0),
        };
        let bounds = SpawnBounds::default();
        let mut rng = Pcg32::seed_from_u64(2);

        let mut one = start.clone();
        step(&mut one, &profile, &bounds, 1.0 / 60.0, &mut rng);

        let mut two = start;
        step(&mut two, &profile, &bounds, 1.0 / 120.0, &mut rng);
        step(&mut two, &profile, &bounds, 1.0 / 120.0, &mut rng);

        assert!((one.position - two.position).length() < 1e-4);
        assert!((one.position.x - 30.2).abs() < 1e-4);
    }

    #[test]
    fn test_right_wall_reflects_horizontally() {
        let mut state = MotionState {
            position: Vec2::new(99.95, 50.0),
            heading: 0.0,
            target: Vec2::new(120.0, 50.0),
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let outcome = step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!(outcome.bounce.x && !outcome.bounce.y);
        assert_eq!(state.position.x, 100.0);
        // Heading now points back into the arena
        assert!(state.heading.cos() < 0.0);
        assert!((state.heading - PI).abs() < 1e-6);
    }

    #[test]
    fn test_floor_reflects_vertically() {
        let mut state = MotionState {
            position: Vec2::new(50.0, 0.05),
            heading: -FRAC_PI_2,
            target: Vec2::new(50.0, -20.0),
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let outcome = step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!(outcome.bounce.y && !outcome.bounce.x);
        assert_eq!(state.position.y, 0.0);
        assert!(state.heading.sin() > 0.0);
    }

    #[test]
    fn test_corner_reflects_both_axes() {
        let mut state = MotionState {
            position: Vec2::new(99.99, 99.99),
            heading: PI / 4.0,
            target: Vec2::new(150.0, 150.0),
        };
        let mut rng = Pcg32::seed_from_u64(4);
        let outcome = step(&mut state, &calm_profile(), &SpawnBounds::default(), DT, &mut rng);
        assert!(outcome.bounce.x && outcome.bounce.y);
        assert_eq!(state.position, Vec2::new(100.0, 100.0));
        assert!(state.heading.cos() < 0.0);
        assert!(state.heading.sin() < 0.0);
    }

    #[test]
    fn test_respawn_keeps_heading() {
        let bounds = SpawnBounds::default();
        let mut rng = Pcg32::seed_from_u64(21);
        let mut state = MotionState::spawn(&bounds, &mut rng);
        state.heading = 42.0;
        state.position = Vec2::new(0.0, 100.0);
        state.respawn(&bounds, &mut rng);
        assert_eq!(state.heading, 42.0);
        assert!((10.0..90.0).contains(&state.position.x));
        assert!((10.0..90.0).contains(&state.position.y));
    }
}
