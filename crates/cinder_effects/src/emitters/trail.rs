//! # Trails
//!
//! Particles laid at a fixed spacing along a segment, each flying off in a
//! narrow cone around the segment direction. The trail kind arrives as a
//! small integer code; the high bit is a modifier game code sets and is
//! ignored here.

use cinder_core::{Particle, ParticleKind, RandomSource, Vec3};

use super::{cone, scaled, stretched_cone, Emission, Emitter};
use crate::palette::fire_color;

/// Trail step used when the configured one is not positive.
const FALLBACK_STEP: f32 = 0.5;

/// Trail variants by code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TrailKind {
    /// Fire trail pointing back along the path.
    Rocket = 0,
    /// Billowing smoke.
    Smoke = 1,
    /// Falling blood drops.
    Blood = 2,
    /// Alternating yellow tracer.
    Tracer = 3,
    /// Sparse blood drops.
    SlightBlood = 4,
    /// Alternating orange tracer.
    Tracer2 = 5,
    /// Purple sparkle.
    Voor = 6,
}

impl TrailKind {
    /// Decodes a trail code; the high bit is stripped first.
    ///
    /// Returns `None` for codes with no trail.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        let code = if code >= 128 { code - 128 } else { code };
        match code {
            0 => Some(Self::Rocket),
            1 => Some(Self::Smoke),
            2 => Some(Self::Blood),
            3 => Some(Self::Tracer),
            4 => Some(Self::SlightBlood),
            5 => Some(Self::Tracer2),
            6 => Some(Self::Voor),
            _ => None,
        }
    }

    /// How long after emission the particle's deadline falls, before any
    /// kind-specific override.
    const fn base_lifetime(self) -> f64 {
        match self {
            Self::Rocket => 2.5,
            _ => 2.0,
        }
    }
}

/// Frame of reference for one trail segment.
#[derive(Clone, Copy, Debug)]
struct TrailFrame {
    direction: Vec3,
    right: Vec3,
    up: Vec3,
    /// Reversed frame for trails that fly back along the path.
    back: Vec3,
    back_right: Vec3,
    back_up: Vec3,
}

impl TrailFrame {
    fn new(direction: Vec3) -> Self {
        let right = direction.perpendicular();
        let up = direction.cross(right);
        let back = -direction;
        let back_right = back.perpendicular();
        let back_up = back.cross(back_right).normalize_or_zero();
        Self {
            direction,
            right,
            up,
            back,
            back_right,
            back_up,
        }
    }
}

/// Stamps one trail particle at `cursor`.
fn trail_particle(
    rng: &mut dyn RandomSource,
    kind: TrailKind,
    frame: &TrailFrame,
    cursor: Vec3,
    now: f64,
    tracer_count: &mut u32,
) -> Particle {
    let mut particle = Particle::born(now, now + kind.base_lifetime(), ParticleKind::Static, cursor);
    particle.growth_rate = 5.0 + scaled(rng, 501, 0.01);
    particle.size = 0.5 + scaled(rng, 101, 0.01);

    let jitter = |rng: &mut dyn RandomSource, dir: Vec3, span: i32, half: i32| {
        cursor + Vec3::from_fn(|axis| dir.axis(axis) * rng.centered(span, half) as f32)
    };

    match kind {
        TrailKind::Rocket => {
            particle.ramp = rng.masked(3) as f32 * 0.5;
            particle.color = fire_color(particle.ramp);
            particle.kind = ParticleKind::FireTrail;
            particle.size = 0.5 + scaled(rng, 101, 0.01);
            let dir = stretched_cone(rng, frame.back, frame.back_right, frame.back_up, 0.3, 3.5);
            particle.position = jitter(rng, dir, 6, 3);
            particle.velocity = dir * 25.0;
        }
        TrailKind::Smoke => {
            particle.death_time = now + 4.0 + f64::from(rng.below(7));
            let ramp = rng.masked(3) + 2;
            particle.ramp = ramp as f32;
            // Phase 4 is drawn black rather than as its fire entry.
            particle.color = if ramp == 4 { 0 } else { fire_color(particle.ramp) };
            particle.kind = ParticleKind::SmokeTrail;
            particle.size = 0.5 + scaled(rng, 101, 0.01);
            let dir = stretched_cone(rng, frame.direction, frame.right, frame.up, 0.5, 1.5);
            particle.position = jitter(rng, dir, 8, 4);
            particle.velocity = Vec3::new(dir.x * 60.0, dir.y * 60.0, dir.z * 60.0 * 1.5);
        }
        TrailKind::Blood | TrailKind::SlightBlood => {
            particle.color = 67 + rng.masked(3) as u8;
            particle.kind = ParticleKind::Grav;
            let dir = cone(rng, frame.direction, frame.right, frame.up, 0.1);
            particle.position = jitter(rng, dir, 6, 3);
        }
        TrailKind::Tracer | TrailKind::Tracer2 => {
            particle.death_time = now + 0.5;
            let base = if kind == TrailKind::Tracer { 52 } else { 230 };
            // Bit 2 of the counter flips every four particles: 0 or 8.
            particle.color = base + ((*tracer_count & 4) << 1) as u8;
            *tracer_count = tracer_count.wrapping_add(1);
            let dir = cone(rng, frame.direction, frame.right, frame.up, 0.1);
            particle.velocity = dir * 30.0;
        }
        TrailKind::Voor => {
            particle.death_time = now + 0.5;
            particle.color = 9 * 16 + 8 + rng.masked(3) as u8;
            let dir = cone(rng, frame.direction, frame.right, frame.up, 0.1);
            particle.position = cursor + Vec3::from_fn(|axis| dir.axis(axis) * (rng.masked(15) - 8) as f32);
            particle.velocity = dir * 10.0;
        }
    }
    particle
}

impl Emitter<'_> {
    /// Lays a trail from `start` to `end`.
    ///
    /// `tracer_count` alternates tracer colours and persists between calls.
    /// Unknown codes are logged and emit nothing.
    pub fn trail(&mut self, start: Vec3, end: Vec3, code: u8, tracer_count: &mut u32) -> Emission {
        let Some(kind) = TrailKind::from_code(code) else {
            tracing::warn!(code, "unknown trail type, ignoring");
            return Emission::default();
        };

        let now = self.now;
        let step = if self.config.trail_step > 0.0 {
            self.config.trail_step
        } else {
            FALLBACK_STEP
        };
        let (direction, mut remaining) = (end - start).normalize_with_length();
        let frame = TrailFrame::new(direction);
        let mut cursor = start;

        let mut emission = Emission::default();
        while remaining > 0.0 {
            remaining -= step;
            let spawned = self.spawn(&mut emission, |rng| {
                trail_particle(rng, kind, &frame, cursor, now, &mut *tracer_count)
            });
            if !spawned {
                break;
            }
            if kind == TrailKind::SlightBlood {
                remaining -= 3.0;
            }
            cursor += direction * step;
        }
        emission
    }
}
