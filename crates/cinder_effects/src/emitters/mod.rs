//! # Emission Generators
//!
//! One generator per effect family. Each pulls slots from the pool, stamps
//! every field of the new particle, and stops the moment the pool reports
//! exhaustion. A truncated effect is a normal outcome, reported through
//! [`Emission`], never an error.
//!
//! Generators are methods on [`Emitter`], a short-lived borrow of the pool,
//! the random source, the clock value, and the emission tuning:
//!
//! ```rust,ignore
//! let mut emitter = Emitter::new(&mut pool, &mut rng, now, &config.emission);
//! let emission = emitter.explosion(origin);
//! assert!(emission.emitted <= config.emission.explosion_count);
//! ```

mod burst;
mod explosion;
mod halo;
mod point_file;
mod splash;
mod trail;

pub use burst::{EffectTrigger, LARGE_BURST_COUNT, LARGE_BURST_SENTINEL};
pub use halo::HaloTable;
pub use point_file::{point_file_path, PointFileReport};
pub use trail::TrailKind;

use cinder_core::{Particle, ParticlePool, RandomSource, Vec3};

use crate::config::EmissionConfig;

/// Outcome of one generator call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Emission {
    /// Particles stamped into the pool.
    pub emitted: usize,
    /// True when the pool ran dry before the effect finished.
    pub truncated: bool,
}

/// Borrowed state every generator needs.
pub struct Emitter<'a> {
    pool: &'a mut ParticlePool,
    rng: &'a mut dyn RandomSource,
    now: f64,
    config: &'a EmissionConfig,
}

impl<'a> Emitter<'a> {
    /// Creates an emitter stamping particles born at `now`.
    pub fn new(
        pool: &'a mut ParticlePool,
        rng: &'a mut dyn RandomSource,
        now: f64,
        config: &'a EmissionConfig,
    ) -> Self {
        Self {
            pool,
            rng,
            now,
            config,
        }
    }

    /// Allocates one slot and stamps it with `build`'s particle.
    ///
    /// Draws no random numbers when the pool is exhausted. Returns false,
    /// and marks `emission` truncated, in that case.
    fn spawn(
        &mut self,
        emission: &mut Emission,
        build: impl FnOnce(&mut dyn RandomSource) -> Particle,
    ) -> bool {
        let Some(handle) = self.pool.allocate_one() else {
            emission.truncated = true;
            tracing::trace!(emitted = emission.emitted, "pool exhausted, truncating effect");
            return false;
        };
        self.pool[handle] = build(&mut *self.rng);
        emission.emitted += 1;
        true
    }
}

/// Clock value `seconds` after `now`.
#[inline]
fn deadline(now: f64, seconds: f32) -> f64 {
    now + f64::from(seconds)
}

/// `below(n) * scale`.
#[inline]
fn scaled(rng: &mut dyn RandomSource, n: i32, scale: f32) -> f32 {
    rng.below(n) as f32 * scale
}

/// Per-axis position/velocity pair, drawn axis by axis.
#[inline]
fn scatter(mut f: impl FnMut(usize) -> (f32, f32)) -> (Vec3, Vec3) {
    let (px, vx) = f(0);
    let (py, vy) = f(1);
    let (pz, vz) = f(2);
    (Vec3::new(px, py, pz), Vec3::new(vx, vy, vz))
}

/// A uniformly jittered cube around `origin` with velocities in a second cube.
fn cube_burst(
    rng: &mut dyn RandomSource,
    origin: Vec3,
    offset: (i32, i32),
    speed: (i32, i32),
) -> (Vec3, Vec3) {
    scatter(|axis| {
        let position = origin.axis(axis) + rng.centered(offset.0, offset.1) as f32;
        let velocity = rng.centered(speed.0, speed.1) as f32;
        (position, velocity)
    })
}

/// One cone jitter term in `[-0.1, 0.1] * spread`.
#[inline]
fn cone_jitter(rng: &mut dyn RandomSource, spread: f32) -> f32 {
    rng.centered(201, 100) as f32 / 1000.0 * spread
}

/// A unit direction jittered around `axis` in the `right`/`up` plane.
fn cone(rng: &mut dyn RandomSource, axis: Vec3, right: Vec3, up: Vec3, spread: f32) -> Vec3 {
    Vec3::from_fn(|i| {
        axis.axis(i) + right.axis(i) * cone_jitter(rng, spread) + up.axis(i) * cone_jitter(rng, spread)
    })
    .normalize_or_zero()
}

/// Like [`cone`], but the vertical component gets its own, wider jitter.
fn stretched_cone(
    rng: &mut dyn RandomSource,
    axis: Vec3,
    right: Vec3,
    up: Vec3,
    spread: f32,
    vertical_stretch: f32,
) -> Vec3 {
    let x = axis.x + right.x * cone_jitter(rng, spread) + up.x * cone_jitter(rng, spread);
    let y = axis.y + right.y * cone_jitter(rng, spread) + up.y * cone_jitter(rng, spread);
    let tall = spread * vertical_stretch;
    let z = axis.z + cone_jitter(rng, tall) + up.z * cone_jitter(rng, tall);
    Vec3::new(x, y, z).normalize_or_zero()
}

#[cfg(test)]
pub(crate) mod test_support {
    use cinder_core::{ChaChaSource, ParticlePool};

    use crate::config::EmissionConfig;

    /// Pool, seeded source, and default tuning for generator tests.
    pub(crate) fn rig(capacity: usize) -> (ParticlePool, ChaChaSource, EmissionConfig) {
        (
            ParticlePool::new(capacity),
            ChaChaSource::from_seed(17),
            EmissionConfig::default(),
        )
    }
}
