//! Explosion bursts.

use cinder_core::{Particle, ParticleKind, Vec3};

use super::{cube_burst, deadline, scaled, Emission, Emitter};
use crate::palette::EXPLOSION_RAMP;

impl Emitter<'_> {
    /// A full explosion: equal thirds of `Explode`, `Explode2`, and
    /// `Explode3` particles, assigned round-robin.
    pub fn explosion(&mut self, origin: Vec3) -> Emission {
        let now = self.now;
        let count = self.config.explosion_count;

        let mut emission = Emission::default();
        for i in 0..count {
            let spawned = self.spawn(&mut emission, |rng| {
                let death_time = deadline(now, 3.0 + rng.below(5) as f32);
                let color = EXPLOSION_RAMP[rng.below(5) as usize];
                let size = 1.0 + scaled(rng, 100, 0.01);
                let ramp = rng.below(5) as f32;
                let growth_rate = 1.0 + scaled(rng, 401, 0.01);

                let (kind, offset, speed) = match i % 3 {
                    0 => (ParticleKind::Explode, (64, 32), (1024, 512)),
                    1 => (ParticleKind::Explode2, (48, 24), (768, 384)),
                    _ => (ParticleKind::Explode3, (32, 16), (512, 256)),
                };
                let (position, velocity) = cube_burst(rng, origin, offset, speed);

                Particle {
                    position,
                    velocity,
                    color,
                    ramp,
                    kind,
                    birth_time: now,
                    death_time,
                    size,
                    growth_rate,
                }
            });
            if !spawned {
                break;
            }
        }
        emission
    }

    /// A short blob burst cycling through `color_length` palette entries
    /// starting at `color_start`. A zero length is treated as one.
    pub fn color_explosion(&mut self, origin: Vec3, color_start: u8, color_length: u8) -> Emission {
        let now = self.now;
        let count = self.config.color_explosion_count;
        let length = usize::from(color_length.max(1));

        let mut emission = Emission::default();
        for i in 0..count {
            // `i % length` is below 256.
            let color = color_start.wrapping_add((i % length) as u8);
            let spawned = self.spawn(&mut emission, |rng| {
                let (position, velocity) = cube_burst(rng, origin, (32, 16), (512, 256));
                Particle {
                    velocity,
                    color,
                    ..Particle::born(now, now + 0.3, ParticleKind::Blob, position)
                }
            });
            if !spawned {
                break;
            }
        }
        emission
    }

    /// A two-tone blob burst: odd particles are `Blob`, even ones `Blob2`.
    pub fn blob_explosion(&mut self, origin: Vec3) -> Emission {
        let now = self.now;
        let count = self.config.blob_count;

        let mut emission = Emission::default();
        for i in 0..count {
            let spawned = self.spawn(&mut emission, |rng| {
                let death_time = deadline(now, 1.0 + rng.masked(8) as f32 * 0.05);
                let (kind, color) = if i % 2 == 1 {
                    (ParticleKind::Blob, 66 + rng.below(6) as u8)
                } else {
                    (ParticleKind::Blob2, 150 + rng.below(6) as u8)
                };
                let (position, velocity) = cube_burst(rng, origin, (32, 16), (512, 256));
                Particle {
                    velocity,
                    color,
                    ..Particle::born(now, death_time, kind, position)
                }
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

    #[test]
    fn test_explosion_round_robin() {
        let (mut pool, mut rng, config) = rig(3000);
        let emission = Emitter::new(&mut pool, &mut rng, 0.0, &config).explosion(Vec3::ZERO);
        assert_eq!(emission, Emission { emitted: 2048, truncated: false });

        let count = |kind| pool.active().filter(|(_, p)| p.kind == kind).count();
        assert_eq!(count(ParticleKind::Explode), 683);
        assert_eq!(count(ParticleKind::Explode2), 683);
        assert_eq!(count(ParticleKind::Explode3), 682);
    }

    #[test]
    fn test_explosion_fields() {
        let (mut pool, mut rng, config) = rig(600);
        Emitter::new(&mut pool, &mut rng, 10.0, &config).explosion(Vec3::new(0.0, 0.0, 100.0));
        for (_, particle) in pool.active() {
            assert!(EXPLOSION_RAMP[..5].contains(&particle.color));
            assert!((13.0..=17.0).contains(&particle.death_time));
            assert!((0.0..5.0).contains(&particle.ramp));
            assert!((1.0..2.0).contains(&particle.size));
            let reach = match particle.kind {
                ParticleKind::Explode => 32.0,
                ParticleKind::Explode2 => 24.0,
                _ => 16.0,
            };
            assert!((particle.position.z - 100.0).abs() <= reach);
        }
    }

    #[test]
    fn test_color_explosion_cycles_range() {
        let (mut pool, mut rng, config) = rig(512);
        Emitter::new(&mut pool, &mut rng, 0.0, &config).color_explosion(Vec3::ZERO, 200, 4);

        let mut colors: Vec<u8> = pool.active().map(|(_, p)| p.color).collect();
        assert_eq!(colors.len(), 512);
        colors.sort_unstable();
        colors.dedup();
        assert_eq!(colors, vec![200, 201, 202, 203]);
        assert!(pool.active().all(|(_, p)| p.kind == ParticleKind::Blob && p.death_time == 0.3));
    }

    #[test]
    fn test_color_explosion_zero_length() {
        let (mut pool, mut rng, config) = rig(512);
        let emission = Emitter::new(&mut pool, &mut rng, 0.0, &config).color_explosion(Vec3::ZERO, 9, 0);
        assert_eq!(emission.emitted, 512);
        assert!(pool.active().all(|(_, p)| p.color == 9));
    }

    #[test]
    fn test_blob_explosion_kinds_and_colors() {
        let (mut pool, mut rng, config) = rig(2048);
        Emitter::new(&mut pool, &mut rng, 0.0, &config).blob_explosion(Vec3::ZERO);

        for (_, particle) in pool.active() {
            match particle.kind {
                ParticleKind::Blob => assert!((66..72).contains(&particle.color)),
                ParticleKind::Blob2 => assert!((150..156).contains(&particle.color)),
                other => panic!("unexpected kind {other:?}"),
            }
            assert!(particle.death_time >= 1.0 && particle.death_time < 1.5);
        }
        assert_eq!(pool.active_count(), 1024);
    }
}
