//! The entity halo: one short-lived spark per table direction, orbiting an
//! entity at a fixed distance.

use cinder_core::{Particle, ParticleKind, RandomSource, Vec3};

use super::{Emission, Emitter};
use crate::config::HaloConfig;
use crate::normals::vertex_normals;

/// Halo spark colour.
const HALO_COLOR: u8 = 0x6f;

/// Halo sparks live for a single frame at typical rates.
const HALO_LIFETIME: f64 = 0.01;

/// Directions plus per-direction angular velocities.
///
/// The velocities are drawn once when the table is built, so every halo
/// the engine emits shares the same motion.
#[derive(Clone, Debug)]
pub struct HaloTable {
    normals: Box<[Vec3]>,
    angular_velocities: Box<[(f32, f32)]>,
}

impl HaloTable {
    /// Builds the table, drawing a yaw and a pitch rate in `[0, 2.55]` for
    /// every direction.
    pub fn sample(rng: &mut dyn RandomSource) -> Self {
        let normals = vertex_normals();
        let angular_velocities = normals
            .iter()
            .map(|_| {
                let yaw = rng.masked(255) as f32 * 0.01;
                let pitch = rng.masked(255) as f32 * 0.01;
                (yaw, pitch)
            })
            .collect();
        Self {
            normals,
            angular_velocities,
        }
    }

    /// Number of sparks in one halo.
    #[must_use]
    pub fn len(&self) -> usize {
        self.normals.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }
}

impl Emitter<'_> {
    /// Emits one spark per table direction around `origin`.
    pub fn entity_halo(&mut self, table: &HaloTable, halo: &HaloConfig, origin: Vec3) -> Emission {
        let now = self.now;

        let mut emission = Emission::default();
        for (normal, &(yaw_rate, pitch_rate)) in table.normals.iter().zip(table.angular_velocities.iter()) {
            let (sy, cy) = (now * f64::from(yaw_rate)).sin_cos();
            let (sp, cp) = (now * f64::from(pitch_rate)).sin_cos();
            let forward = Vec3::new((cp * cy) as f32, (cp * sy) as f32, -sp as f32);
            let position = origin + *normal * halo.distance + forward * halo.beam_length;

            let spawned = self.spawn(&mut emission, |_| Particle {
                color: HALO_COLOR,
                ..Particle::born(now, now + HALO_LIFETIME, ParticleKind::Explode, position)
            });
            if !spawned {
                break;
            }
        }
        emission
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::rig;
    use super::*;
    use crate::normals::VERTEX_NORMAL_COUNT;
    use cinder_core::ScriptedSource;

    #[test]
    fn test_full_halo() {
        let (mut pool, mut rng, config) = rig(512);
        let table = HaloTable::sample(&mut rng);
        assert_eq!(table.len(), VERTEX_NORMAL_COUNT);

        let halo = HaloConfig::default();
        let emission = Emitter::new(&mut pool, &mut rng, 3.0, &config).entity_halo(&table, &halo, Vec3::ZERO);
        assert_eq!(emission.emitted, VERTEX_NORMAL_COUNT);

        for (_, particle) in pool.active() {
            assert_eq!(particle.kind, ParticleKind::Explode);
            assert_eq!(particle.color, HALO_COLOR);
            assert_eq!(particle.ramp, 0.0);
            assert_eq!(particle.velocity, Vec3::ZERO);
            let reach = particle.position.length();
            assert!((48.0 - 1e-3..=80.0 + 1e-3).contains(&reach));
        }
    }

    #[test]
    fn test_halo_at_time_zero_points_along_x() {
        let (mut pool, mut rng, config) = rig(512);
        let table = HaloTable::sample(&mut ScriptedSource::constant(100));
        let halo = HaloConfig::default();
        Emitter::new(&mut pool, &mut rng, 0.0, &config).entity_halo(&table, &halo, Vec3::ZERO);

        let offsets: Vec<Vec3> = pool.active().map(|(_, p)| p.position).collect();
        let mut expected: Vec<Vec3> = table.normals.iter().map(|n| *n * 64.0 + Vec3::X * 16.0).collect();
        expected.reverse();
        for (got, want) in offsets.iter().zip(expected.iter()) {
            assert!(got.distance(*want) < 1e-4);
        }
    }

    #[test]
    fn test_halo_draws_no_randomness() {
        let (mut pool, _, config) = rig(512);
        let table = HaloTable::sample(&mut ScriptedSource::constant(1));
        let mut rng = ScriptedSource::constant(0);
        Emitter::new(&mut pool, &mut rng, 1.0, &config).entity_halo(&table, &HaloConfig::default(), Vec3::ZERO);
        assert_eq!(rng.draws(), 0);
    }
}
