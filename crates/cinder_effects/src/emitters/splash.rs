//! Lattice effects: lava splash, teleport flash, and the dark field.
//!
//! Each walks a fixed 3D grid around the origin and emits one `SlowGrav`
//! particle per cell, flying outward along the cell's grid direction.

use std::iter::StepBy;
use std::ops::Range;

use cinder_core::{Particle, ParticleKind, RandomSource, Vec3};

use super::{deadline, Emission, Emitter};

/// Every `(i, j, k)` cell of a lattice, `i` outermost.
fn lattice(
    i: StepBy<Range<i32>>,
    j: StepBy<Range<i32>>,
    k: StepBy<Range<i32>>,
) -> impl Iterator<Item = (i32, i32, i32)> {
    i.flat_map(move |i| {
        let k = k.clone();
        j.clone().flat_map(move |j| k.clone().map(move |k| (i, j, k)))
    })
}

/// A lattice particle: jittered cell position, speed along the cell direction.
fn cell_particle(
    rng: &mut dyn RandomSource,
    now: f64,
    origin: Vec3,
    cell: (i32, i32, i32),
    death_time: f64,
    color: u8,
) -> Particle {
    let (i, j, k) = cell;
    let direction = Vec3::new((j * 8) as f32, (i * 8) as f32, (k * 8) as f32);
    let position = origin
        + Vec3::from_fn(|axis| {
            let base = match axis {
                0 => i,
                1 => j,
                _ => k,
            };
            (base + rng.masked(3)) as f32
        });
    let speed = 50.0 + rng.masked(63) as f32;
    Particle {
        velocity: direction.normalize_or_zero() * speed,
        color,
        ..Particle::born(now, death_time, ParticleKind::SlowGrav, position)
    }
}

impl Emitter<'_> {
    /// A fountain of lava: a 32x32 ground grid launched mostly upward.
    pub fn lava_splash(&mut self, origin: Vec3) -> Emission {
        let now = self.now;
        let cells = lattice((-16..16).step_by(1), (-16..16).step_by(1), (0..1).step_by(1));

        let mut emission = Emission::default();
        for (i, j, _) in cells {
            let spawned = self.spawn(&mut emission, |rng| {
                let death_time = deadline(now, 2.0 + rng.masked(31) as f32 * 0.02);
                let color = 224 + rng.masked(7) as u8;
                let direction = Vec3::new(
                    (j * 8 + rng.masked(7)) as f32,
                    (i * 8 + rng.masked(7)) as f32,
                    256.0,
                );
                let position =
                    origin + Vec3::new(direction.x, direction.y, rng.masked(63) as f32);
                let speed = 50.0 + rng.masked(63) as f32;
                Particle {
                    velocity: direction.normalize_or_zero() * speed,
                    color,
                    ..Particle::born(now, death_time, ParticleKind::SlowGrav, position)
                }
            });
            if !spawned {
                break;
            }
        }
        emission
    }

    /// The teleport flash: a sphere-ish cloud of grey sparks.
    pub fn teleport_splash(&mut self, origin: Vec3) -> Emission {
        let now = self.now;
        let cells = lattice((-16..16).step_by(4), (-16..16).step_by(4), (-24..32).step_by(4));

        let mut emission = Emission::default();
        for cell in cells {
            let spawned = self.spawn(&mut emission, |rng| {
                let death_time = deadline(now, 0.2 + rng.masked(7) as f32 * 0.02);
                let color = 7 + rng.masked(7) as u8;
                cell_particle(rng, now, origin, cell, death_time, color)
            });
            if !spawned {
                break;
            }
        }
        emission
    }

    /// A coarse, dark purple lattice burst.
    pub fn dark_field(&mut self, origin: Vec3) -> Emission {
        let now = self.now;
        let cells = lattice((-16..16).step_by(8), (-16..16).step_by(8), (0..32).step_by(8));

        let mut emission = Emission::default();
        for cell in cells {
            let spawned = self.spawn(&mut emission, |rng| {
                let death_time = deadline(now, 0.2 + rng.masked(7) as f32 * 0.02);
                let color = 150 + rng.below(6) as u8;
                cell_particle(rng, now, origin, cell, death_time, color)
            });
            if !spawned {
                break;
            }
        }
        emission
    }
}
