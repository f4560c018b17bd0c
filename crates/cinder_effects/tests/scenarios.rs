//! End-to-end behaviour of the engine: capacity limits, expiry timing,
//! ramp expiry, point files, and pool bookkeeping under random workloads.

use std::collections::HashSet;
use std::io::Cursor;

use cinder_core::{Particle, ParticleKind, ParticlePool, ScriptedSource, Vec3};
use cinder_effects::{
    simulation, EffectTrigger, Emission, EngineConfig, ParticleEngine, PhysicsConfig,
};
use proptest::prelude::*;

fn engine_with_capacity(capacity: usize) -> ParticleEngine {
    let mut config = EngineConfig::default();
    config.pool.capacity = capacity;
    ParticleEngine::new(config)
}

fn assert_partitioned(pool: &ParticlePool) {
    let active: HashSet<usize> = pool.active().map(|(handle, _)| handle.index()).collect();
    let free: HashSet<usize> = pool.free_handles().map(|handle| handle.index()).collect();
    assert_eq!(active.len(), pool.active_count());
    assert_eq!(active.len() + free.len(), pool.capacity());
    assert!(active.is_disjoint(&free));
}

// ============================================================================
// Capacity
// ============================================================================

#[test]
fn explosion_fills_small_pool_round_robin() {
    let mut engine = engine_with_capacity(512);
    let emission = engine.explosion(Vec3::ZERO);

    assert_eq!(emission, Emission { emitted: 512, truncated: true });
    assert_eq!(engine.pool().active_count(), 512);
    assert_eq!(engine.pool().free_count(), 0);

    // Newest first: the last emission index is 511.
    let kinds: Vec<ParticleKind> = engine.pool().active().map(|(_, p)| p.kind).collect();
    for (offset, kind) in kinds.iter().enumerate() {
        let index = 511 - offset;
        let expected = match index % 3 {
            0 => ParticleKind::Explode,
            1 => ParticleKind::Explode2,
            _ => ParticleKind::Explode3,
        };
        assert_eq!(*kind, expected, "emission index {index}");
    }
}

#[test]
fn every_generator_stops_on_full_pool() {
    let mut engine = engine_with_capacity(512);
    engine.color_explosion(Vec3::ZERO, 0, 8);
    assert_eq!(engine.pool().free_count(), 0);

    let origin = Vec3::new(5.0, 5.0, 5.0);
    let trigger = EffectTrigger::decode(origin, [0, 0, 16], 40, 0);
    let attempts = [
        engine.explosion(origin),
        engine.color_explosion(origin, 1, 2),
        engine.blob_explosion(origin),
        engine.lava_splash(origin),
        engine.teleport_splash(origin),
        engine.dark_field(origin),
        engine.trail(origin, Vec3::ZERO, 1),
        engine.entity_halo(origin),
        engine.point_effect(&trigger),
    ];
    for emission in attempts {
        assert_eq!(emission, Emission { emitted: 0, truncated: true });
    }
    assert_eq!(engine.pool().active_count(), 512);
    assert_eq!(engine.stats().truncated_effects, attempts.len());
}

// ============================================================================
// Blood
// ============================================================================

#[test]
fn blood_trigger_sprays_backwards() {
    let mut engine = ParticleEngine::new(EngineConfig::default());
    let trigger = EffectTrigger::decode(Vec3::ZERO, [0, 32, 0], 255, 73);
    let emission = engine.point_effect(&trigger);

    assert!((100..=200).contains(&emission.emitted), "emitted {}", emission.emitted);
    for (_, particle) in engine.pool().active() {
        assert_eq!(particle.kind, ParticleKind::Blood);
        assert!(particle.velocity.dot(trigger.direction) < 0.0);
    }
}

// ============================================================================
// Point files
// ============================================================================

#[test]
fn point_file_stops_at_garbage() {
    let mut engine = ParticleEngine::new(EngineConfig::default());
    let report = engine
        .trace_points(Cursor::new("1.0 2.0 3.0\n4.0 5.0 6.0\nGARBAGE\n"))
        .unwrap();

    assert_eq!(report.points_read, 2);
    assert_eq!(report.emission.emitted, 2);

    let mut positions: Vec<Vec3> = engine.pool().active().map(|(_, p)| p.position).collect();
    positions.reverse();
    assert_eq!(positions, vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0)]);
    for (_, particle) in engine.pool().active() {
        assert_eq!(particle.kind, ParticleKind::Static);
        assert_eq!(particle.death_time, Particle::NEVER_EXPIRES);
    }

    // Points survive arbitrarily many frames.
    for frame in 1..=100 {
        engine.advance(f64::from(frame) * 10.0);
    }
    assert_eq!(engine.pool().active_count(), 2);
}

#[test]
fn point_file_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("start.pts");
    std::fs::write(&path, "0 0 0\n8 8 8\n16 16 16\n").unwrap();

    let mut engine = ParticleEngine::new(EngineConfig::default());
    let report = engine.load_point_file(&path).unwrap();
    assert_eq!(report.points_read, 3);
    assert_eq!(engine.stats().spawned_this_frame, 3);
}

// ============================================================================
// Expiry
// ============================================================================

#[test]
fn expiry_is_exact() {
    let mut pool = ParticlePool::new(512);
    let handle = pool
        .emit(Particle::born(0.0, 1.0, ParticleKind::Static, Vec3::ZERO))
        .unwrap();
    let physics = PhysicsConfig::default();
    let mut rng = ScriptedSource::constant(0);

    for now in [0.25, 0.5, 0.75, 0.999] {
        simulation::step(&mut pool, &mut rng, &physics, now, 0.25);
        assert_eq!(pool.active_count(), 1, "still alive at {now}");
    }

    let report = simulation::step(&mut pool, &mut rng, &physics, 1.0, 0.001);
    assert_eq!(report.expired, 1);
    assert_eq!(pool.active_count(), 0);
    assert_eq!(pool.free_handles().next(), Some(handle));
}

#[test]
fn explode_ramp_forces_expiry_before_deadline() {
    let mut pool = ParticlePool::new(512);
    pool.emit(Particle::born(0.0, 1000.0, ParticleKind::Explode, Vec3::ZERO))
        .unwrap();
    let physics = PhysicsConfig::default();
    let mut rng = ScriptedSource::constant(0);

    // Explode ramps at 10 per second: 8 is reached after 0.8 s.
    let mut marked_at = None;
    for frame in 1..=20 {
        let now = f64::from(frame) * 0.05;
        let report = simulation::step(&mut pool, &mut rng, &physics, now, 0.05);
        if report.ramp_expired == 1 {
            let (_, particle) = pool.active().next().unwrap();
            assert!(particle.ramp >= 8.0);
            assert_eq!(particle.death_time, Particle::EXPIRED);
            marked_at = Some(frame);
            break;
        }
    }
    let marked_at = marked_at.unwrap();
    assert!((15..=17).contains(&marked_at), "marked at frame {marked_at}");

    simulation::step(&mut pool, &mut rng, &physics, 2.0, 0.05);
    assert_eq!(pool.active_count(), 0);
}

// ============================================================================
// Reset
// ============================================================================

#[test]
fn clear_is_idempotent() {
    let mut engine = ParticleEngine::new(EngineConfig::default());
    engine.explosion(Vec3::ZERO);
    engine.advance(0.5);
    engine.advance(4.0);

    engine.clear();
    let once: Vec<usize> = engine.pool().free_handles().map(|h| h.index()).collect();
    engine.clear();
    let twice: Vec<usize> = engine.pool().free_handles().map(|h| h.index()).collect();

    assert_eq!(once, twice);
    assert_eq!(once, (0..2048).collect::<Vec<_>>());
    assert_eq!(engine.pool().active_count(), 0);
    assert_eq!(engine.pool().capacity(), 2048);
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn same_seed_same_particles() {
    let run = || {
        let mut engine = ParticleEngine::new(EngineConfig::default());
        engine.blob_explosion(Vec3::ZERO);
        engine.trail(Vec3::ZERO, Vec3::new(0.0, 30.0, 0.0), 0);
        engine.advance(0.1);
        engine.draw_list().map(|d| (d.position, d.color)).collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

// ============================================================================
// Random workloads
// ============================================================================

#[derive(Clone, Debug)]
enum Action {
    Explosion,
    Blob,
    Teleport,
    Trail(u8, f32),
    Halo,
    Advance(f32),
    Clear,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::Explosion),
        Just(Action::Blob),
        Just(Action::Teleport),
        (0u8..8, 0.0f32..200.0).prop_map(|(code, length)| Action::Trail(code, length)),
        Just(Action::Halo),
        (0.0f32..2.0).prop_map(Action::Advance),
        Just(Action::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn pool_stays_partitioned(actions in prop::collection::vec(action(), 1..40)) {
        let mut engine = engine_with_capacity(1024);
        for action in actions {
            match action {
                Action::Explosion => { engine.explosion(Vec3::ZERO); }
                Action::Blob => { engine.blob_explosion(Vec3::ZERO); }
                Action::Teleport => { engine.teleport_splash(Vec3::ZERO); }
                Action::Trail(code, length) => {
                    engine.trail(Vec3::ZERO, Vec3::new(length, 0.0, 0.0), code);
                }
                Action::Halo => { engine.entity_halo(Vec3::ZERO); }
                Action::Advance(dt) => { engine.advance_by(dt); }
                Action::Clear => engine.clear(),
            }
            assert_partitioned(engine.pool());
            prop_assert!(engine.stats().alive <= 1024);
        }
    }
}
