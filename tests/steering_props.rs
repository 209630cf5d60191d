//! Property-based tests for fish steering
//!
//! Invariants that must hold for every fish, whatever it rolled.

use proptest::prelude::*;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use splash::config::{FishConfig, SpawnBounds};
use splash::consts::{ARENA_MAX, ARENA_MIN, MAX_FRAME_DT};
use splash::sim::{Agent, MotionProfile, MotionState, step};

fn coord() -> impl Strategy<Value = f32> {
    ARENA_MIN..=ARENA_MAX
}

fn motion_state() -> impl Strategy<Value = MotionState> {
    (coord(), coord(), -10.0f32..10.0, coord(), coord()).prop_map(|(x, y, heading, tx, ty)| {
        MotionState {
            position: glam::Vec2::new(x, y),
            heading,
            target: glam::Vec2::new(tx, ty),
        }
    })
}

// Covers the mobile speed boost as well
fn motion_profile() -> impl Strategy<Value = MotionProfile> {
    (0.12f32..0.30, 0.005f32..0.02, 0.0f32..0.01, 3.0f32..6.0).prop_map(
        |(speed, max_turn_rate, jitter_strength, reach_threshold)| MotionProfile {
            speed,
            max_turn_rate,
            jitter_strength,
            reach_threshold,
        },
    )
}

fn frame_dt() -> impl Strategy<Value = f32> {
    0.0f32..=MAX_FRAME_DT
}

proptest! {
    // Property: a step never leaves the viewport
    #[test]
    fn test_step_stays_in_arena(
        mut state in motion_state(),
        profile in motion_profile(),
        dt in frame_dt(),
        seed in any::<u64>(),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        step(&mut state, &profile, &SpawnBounds::default(), dt, &mut rng);

        prop_assert!((ARENA_MIN..=ARENA_MAX).contains(&state.position.x), "x = {}", state.position.x);
        prop_assert!((ARENA_MIN..=ARENA_MAX).contains(&state.position.y), "y = {}", state.position.y);
    }

    // Property: without a bounce, heading changes by at most one turn plus the noise
    #[test]
    fn test_turn_rate_is_bounded(
        mut state in motion_state(),
        profile in motion_profile(),
        dt in frame_dt(),
        seed in any::<u64>(),
    ) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let before = state.heading;
        let outcome = step(&mut state, &profile, &SpawnBounds::default(), dt, &mut rng);

        prop_assume!(!outcome.bounce.any());
        let steer = state.heading - before - outcome.jitter;
        prop_assert!(
            steer.abs() <= profile.max_turn_rate + 1e-4,
            "turned {} with max {}", steer, profile.max_turn_rate
        );
        prop_assert!(outcome.jitter.abs() <= profile.jitter_strength + 1e-6);
    }

    // Property: new targets always land inside the spawn bounds
    #[test]
    fn test_retarget_within_spawn_bounds(
        mut state in motion_state(),
        profile in motion_profile(),
        seed in any::<u64>(),
    ) {
        let bounds = SpawnBounds::default();
        state.target = state.position;
        let mut rng = Pcg32::seed_from_u64(seed);
        let outcome = step(&mut state, &profile, &bounds, 1.0 / 60.0, &mut rng);

        prop_assert!(outcome.retargeted);
        prop_assert!((bounds.min..bounds.max).contains(&state.target.x));
        prop_assert!((bounds.min..bounds.max).contains(&state.target.y));
    }

    // Property: a long swim keeps every fish on screen
    #[test]
    fn test_long_swim_stays_in_arena(seed in any::<u64>(), width in 320.0f32..2560.0) {
        let mut fish = Agent::spawn(0, &FishConfig::default(), width, seed);
        for _ in 0..500 {
            let (pose, _) = fish.tick(1.0 / 60.0).expect("visible fish ticks");
            prop_assert!((ARENA_MIN..=ARENA_MAX).contains(&pose.x));
            prop_assert!((ARENA_MIN..=ARENA_MAX).contains(&pose.y));
        }
    }
}
