//! # Simulation Step
//!
//! Advances every live particle by one frame:
//!
//! 1. Sweep everything whose deadline has been reached, so no expired
//!    record is ever integrated again.
//! 2. Integrate position.
//! 3. Apply the rule for the particle's kind.
//! 4. Grow the render size.
//!
//! Kinds that run out of ramp request expiry by moving their deadline into
//! the past; the slot is reclaimed by the next step's sweep.

use cinder_core::{Particle, ParticleKind, ParticlePool, RandomSource};

use crate::config::PhysicsConfig;
use crate::palette::{explode3_color, explosion2_color, explosion_color, fire_color};

/// Per-frame constants shared by every rule.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameConstants {
    /// Frame length in seconds.
    pub dt: f32,
    /// Vertical velocity change from gravity this frame.
    pub gravity: f32,
    /// Extra gravity factor for `Grav` particles.
    pub grav_amplification: f32,
    /// Proportional velocity change for the accelerating kinds.
    pub velocity_scale: f32,
}

impl FrameConstants {
    /// Derives the frame constants for a frame of `dt` seconds.
    #[must_use]
    pub fn new(physics: &PhysicsConfig, dt: f32) -> Self {
        Self {
            dt,
            gravity: dt * physics.gravity * physics.gravity_scale,
            grav_amplification: physics.grav_amplification,
            velocity_scale: 4.0 * dt,
        }
    }
}

/// What one step did to the pool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Slots reclaimed by the sweep.
    pub expired: usize,
    /// Particles whose ramp ran out this step; swept on the next one.
    pub ramp_expired: usize,
    /// Particles integrated.
    pub simulated: usize,
}

/// Runs one simulation step at clock value `now`, `dt` seconds after the last.
pub fn step(
    pool: &mut ParticlePool,
    rng: &mut dyn RandomSource,
    physics: &PhysicsConfig,
    now: f64,
    dt: f32,
) -> StepReport {
    let frame = FrameConstants::new(physics, dt);
    let mut report = StepReport {
        expired: pool.sweep_expired(now),
        ..StepReport::default()
    };

    pool.for_each_active_mut(|particle| {
        particle.position += particle.velocity * dt;
        if apply_rule(particle, &mut *rng, &frame) {
            report.ramp_expired += 1;
        }
        particle.size = (particle.size + particle.growth_rate * dt).max(Particle::MIN_SIZE);
        report.simulated += 1;
    });

    report
}

/// Advances `ramp` and reports whether it reached `limit`.
#[inline]
fn advance_ramp(particle: &mut Particle, rate: f32, limit: f32) -> bool {
    particle.ramp += rate;
    particle.ramp >= limit
}

/// Applies the kind's rule. Returns true if the particle requested expiry.
pub fn apply_rule(particle: &mut Particle, rng: &mut dyn RandomSource, frame: &FrameConstants) -> bool {
    let FrameConstants {
        dt,
        gravity,
        grav_amplification,
        velocity_scale,
    } = *frame;

    let expired = match particle.kind {
        ParticleKind::Static => false,
        ParticleKind::Fire => {
            let done = advance_ramp(particle, dt * 5.0, 6.0);
            if !done {
                particle.color = fire_color(particle.ramp);
            }
            particle.velocity.z += gravity;
            done
        }
        ParticleKind::Explode => {
            let done = advance_ramp(particle, dt * 10.0, 8.0);
            if !done {
                particle.color = explosion_color(particle.ramp);
            }
            particle.velocity += particle.velocity * velocity_scale;
            particle.velocity.z -= gravity;
            done
        }
        ParticleKind::Explode2 => {
            let done = advance_ramp(particle, dt * 15.0, 8.0);
            if !done {
                particle.color = explosion2_color(particle.ramp);
            }
            particle.velocity = particle.velocity - particle.velocity * dt;
            particle.velocity.z -= gravity;
            done
        }
        ParticleKind::Explode3 => {
            let done = advance_ramp(particle, dt * 12.5, 6.0);
            if !done {
                particle.color = explode3_color(particle.ramp);
            }
            particle.velocity.x *= 1.1;
            particle.velocity.y *= 1.1;
            particle.velocity.z -= gravity * 0.5;
            done
        }
        ParticleKind::Smoke => {
            let done = advance_ramp(particle, dt * 5.0, 10.0);
            particle.velocity *= 0.8;
            particle.velocity.z += 10.0 - gravity * 0.2;
            done
        }
        ParticleKind::Blob => {
            particle.velocity += particle.velocity * velocity_scale;
            particle.velocity.z -= gravity;
            false
        }
        ParticleKind::Blob2 => {
            particle.velocity.x -= particle.velocity.x * velocity_scale;
            particle.velocity.y -= particle.velocity.y * velocity_scale;
            particle.velocity.z -= gravity;
            false
        }
        ParticleKind::FireTrail | ParticleKind::SmokeTrail | ParticleKind::Blood => {
            if particle.kind == ParticleKind::FireTrail {
                particle.color = fire_color(particle.ramp);
            }
            let done = advance_ramp(particle, dt * 5.0, 5.0);
            particle.velocity.x *= turbulence(rng);
            particle.velocity.y *= turbulence(rng);
            particle.velocity.z *= turbulence(rng);
            done
        }
        ParticleKind::Grav => {
            particle.velocity.z -= gravity * grav_amplification;
            false
        }
        ParticleKind::SlowGrav => {
            particle.velocity.z -= gravity;
            false
        }
    };

    if expired {
        particle.request_expiry();
    }
    expired
}

/// A damping factor in `[0.8, 1.2]`.
#[inline]
fn turbulence(rng: &mut dyn RandomSource) -> f32 {
    0.8 + rng.below(401) as f32 / 1000.0
}
