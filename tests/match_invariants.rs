//! Randomized checks that whole matches keep their invariants

use glam::{Vec2, Vec3};
use proptest::prelude::*;

use stardust::consts::SIM_DT;
use stardust::sim::{GameState, SurfaceState, TickInput, geodesic_step, tick};

fn input_strategy() -> impl Strategy<Value = TickInput> {
    (
        -1.0f32..1.0,
        -1.0f32..1.0,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(x, y, thrust, turn_left, turn_right, fire)| TickInput {
            axis: Vec2::new(x, y),
            thrust,
            turn_left,
            turn_right,
            fire,
            ..Default::default()
        })
}

fn assert_on_surface(position: Vec3, velocity: Vec3, forward: Vec3, radius: f32) {
    let normal = position.normalize();
    assert!((position.length() - radius).abs() < 1e-4);
    assert!(velocity.dot(normal).abs() < 1e-3);
    assert!(forward.dot(normal).abs() < 1e-3);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn geodesic_step_stays_on_sphere(
        px in -1.0f32..1.0, py in -1.0f32..1.0, pz in -1.0f32..1.0,
        vx in -20.0f32..20.0, vy in -20.0f32..20.0, vz in -20.0f32..20.0,
        dt in 0.0f32..0.1,
    ) {
        let radius = 13.9;
        let start = Vec3::new(px, py, pz);
        prop_assume!(start.length_squared() > 1e-3);

        let mut s = SurfaceState::new(start, Vec3::new(vz, vx, vy), radius);
        s.velocity = Vec3::new(vx, vy, vz);
        s.confine_velocity();
        for _ in 0..50 {
            geodesic_step(&mut s, radius, dt);
            s.reorthonormalize();
            assert_on_surface(s.position, s.velocity, s.forward, radius);
        }

        let b = s.basis();
        prop_assert!((b.to_mat3().determinant() - 1.0).abs() < 1e-3);
    }

    #[test]
    fn match_invariants_hold(
        seed in any::<u64>(),
        inputs in prop::collection::vec(input_strategy(), 1..20),
    ) {
        let mut state = GameState::new(seed);
        let radius = state.tuning.surface_radius;
        let mut last_score = 0;

        // Each sampled input is held for a quarter second
        for input in &inputs {
            for _ in 0..30 {
                let healths: Vec<(u32, i32)> =
                    state.enemies.iter().map(|e| (e.id, e.health)).collect();
                let fired = state.projectiles.fired();

                tick(&mut state, input, SIM_DT);

                prop_assert!(state.score >= last_score);
                last_score = state.score;
                prop_assert!(state.lives <= 5);
                prop_assert!(state.enemies.iter().all(|e| e.health > 0));
                for e in &state.enemies {
                    if let Some((_, before)) = healths.iter().find(|(id, _)| *id == e.id) {
                        prop_assert!(e.health <= *before);
                    }
                }
                prop_assert!(state.projectiles.fired() >= fired);
                prop_assert_eq!(
                    state.projectiles.active().len() as u64,
                    state.projectiles.fired() - state.projectiles.expired()
                );

                let p = &state.player.body;
                assert_on_surface(p.position, p.velocity, p.forward, radius);
                for e in &state.enemies {
                    assert_on_surface(e.body.position, e.body.velocity, e.body.forward, radius);
                }
            }
        }
    }

    #[test]
    fn zero_dt_changes_nothing(seed in any::<u64>(), input in input_strategy()) {
        let mut state = GameState::new(seed);
        let player = state.player.body;
        let enemies: Vec<(SurfaceState, i32)> =
            state.enemies.iter().map(|e| (e.body, e.health)).collect();

        tick(&mut state, &input, 0.0);

        prop_assert_eq!(state.player.body, player);
        for (e, (body, health)) in state.enemies.iter().zip(&enemies) {
            prop_assert_eq!(e.body, *body);
            prop_assert_eq!(e.health, *health);
        }
    }
}
