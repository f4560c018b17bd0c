//! Point effects: smoke puffs, blood sprays, and large explosive bursts.

use cinder_core::{Particle, ParticleKind, Vec3};

use super::{cube_burst, deadline, scaled, scatter, Emission, Emitter};

/// Count byte that requests a large burst.
pub const LARGE_BURST_SENTINEL: u8 = 255;

/// Particle count a [`LARGE_BURST_SENTINEL`] byte decodes to.
pub const LARGE_BURST_COUNT: usize = 1024;

/// A point effect request as it arrives from game code.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectTrigger {
    /// Where the effect starts.
    pub origin: Vec3,
    /// Travel direction of whatever caused the effect.
    pub direction: Vec3,
    /// Requested particle count.
    pub count: usize,
    /// Base palette index.
    pub color: u8,
}

impl EffectTrigger {
    /// Creates a trigger from already decoded values.
    #[must_use]
    pub const fn new(origin: Vec3, direction: Vec3, count: usize, color: u8) -> Self {
        Self {
            origin,
            direction,
            count,
            color,
        }
    }

    /// Decodes the compact form: sixteenths of a unit per direction byte and
    /// a count byte where [`LARGE_BURST_SENTINEL`] means [`LARGE_BURST_COUNT`].
    #[must_use]
    pub fn decode(origin: Vec3, direction: [i8; 3], count: u8, color: u8) -> Self {
        let direction = Vec3::from_fn(|axis| f32::from(direction[axis]) / 16.0);
        let count = if count == LARGE_BURST_SENTINEL {
            LARGE_BURST_COUNT
        } else {
            usize::from(count)
        };
        Self::new(origin, direction, count, color)
    }
}

impl Emitter<'_> {
    /// Runs a point effect.
    ///
    /// The trigger colour selects the variant: the configured blood colour
    /// sprays backwards along `direction` with a count drawn from the blood
    /// range; any other colour emits smoke, or an explosive burst when the
    /// count exceeds the large-burst threshold.
    pub fn point_effect(&mut self, trigger: &EffectTrigger) -> Emission {
        let now = self.now;
        let config = self.config;
        let blood = trigger.color == config.blood_color;

        let count = if blood {
            let spread = config.blood_count_max.saturating_sub(config.blood_count_min) + 1;
            config.blood_count_min + self.rng.below(i32::try_from(spread).unwrap_or(i32::MAX)) as usize
        } else {
            trigger.count.min(config.point_effect_max)
        };
        let large = !blood && count > config.large_burst_threshold;
        let backwards = (-trigger.direction).normalize_or_zero();

        let mut emission = Emission::default();
        for i in 0..count {
            let spawned = self.spawn(&mut emission, |rng| {
                let ramp = (rng.masked(3) + 2) as f32;
                let growth_rate = 1.0 + scaled(rng, 401, 0.01);
                let size = 0.5 + scaled(rng, 101, 0.01);

                let (death_time, color, kind, position, velocity) = if blood {
                    let death_time = deadline(now, 3.0 + scaled(rng, 201, 0.01));
                    let (position, velocity) = scatter(|axis| {
                        let position = trigger.origin.axis(axis) + (rng.masked(15) - 8) as f32;
                        let velocity =
                            backwards.axis(axis) * 120.0 + rng.centered(400, 200) as f32 * 0.3;
                        (position, velocity)
                    });
                    (death_time, trigger.color, ParticleKind::Blood, position, velocity)
                } else {
                    let death_time = deadline(now, 0.2 + scaled(rng, 50, 0.01));
                    let color = (trigger.color & !7) + rng.masked(7) as u8;
                    if large {
                        let kind = if i % 2 == 0 {
                            ParticleKind::Explode
                        } else {
                            ParticleKind::Explode2
                        };
                        let (position, velocity) =
                            cube_burst(rng, trigger.origin, (64, 32), (1024, 512));
                        (death_time, color, kind, position, velocity)
                    } else {
                        let (position, mut velocity) = scatter(|axis| {
                            let position = trigger.origin.axis(axis) + (rng.masked(7) - 4) as f32;
                            let velocity =
                                trigger.direction.axis(axis) * 20.0 + rng.centered(100, 50) as f32;
                            (position, velocity)
                        });
                        velocity.z += 25.0;
                        velocity *= 0.9;
                        (death_time, color, ParticleKind::Smoke, position, velocity)
                    }
                };

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
}

#[cfg(test)]
mod tests {
    use super::super::test_support::rig;
    use super::*;

    fn trigger(count: usize, color: u8) -> EffectTrigger {
        EffectTrigger::new(Vec3::new(10.0, 20.0, 30.0), Vec3::X, count, color)
    }

    #[test]
    fn test_decode() {
        let trigger = EffectTrigger::decode(Vec3::ZERO, [16, -32, 8], 255, 73);
        assert_eq!(trigger.direction, Vec3::new(1.0, -2.0, 0.5));
        assert_eq!(trigger.count, LARGE_BURST_COUNT);

        let small = EffectTrigger::decode(Vec3::ZERO, [0, 0, 0], 20, 0);
        assert_eq!(small.count, 20);
    }

    #[test]
    fn test_smoke_effect() {
        let (mut pool, mut rng, config) = rig(2048);
        let emission = Emitter::new(&mut pool, &mut rng, 1.0, &config).point_effect(&trigger(20, 0x45));

        assert_eq!(emission, Emission { emitted: 20, truncated: false });
        for (_, particle) in pool.active() {
            assert_eq!(particle.kind, ParticleKind::Smoke);
            assert_eq!(particle.color & !7, 0x40);
            assert!(particle.death_time >= 1.2 && particle.death_time < 1.7);
            assert!((2.0..=5.0).contains(&particle.ramp));
            assert!(particle.position.distance(Vec3::new(10.0, 20.0, 30.0)) < 8.0);
        }
    }

    #[test]
    fn test_large_burst_alternates_explode_kinds() {
        let (mut pool, mut rng, config) = rig(2048);
        Emitter::new(&mut pool, &mut rng, 0.0, &config).point_effect(&trigger(300, 0));

        let explode = pool.active().filter(|(_, p)| p.kind == ParticleKind::Explode).count();
        let explode2 = pool.active().filter(|(_, p)| p.kind == ParticleKind::Explode2).count();
        assert_eq!(explode, 150);
        assert_eq!(explode2, 150);
    }

    #[test]
    fn test_count_is_capped() {
        let (mut pool, mut rng, config) = rig(4096);
        let emission = Emitter::new(&mut pool, &mut rng, 0.0, &config).point_effect(&trigger(5000, 0));
        assert_eq!(emission.emitted, config.point_effect_max);
    }

    #[test]
    fn test_blood_spray() {
        let (mut pool, mut rng, config) = rig(2048);
        let blood = EffectTrigger::decode(Vec3::ZERO, [16, 0, 0], 255, 73);
        let emission = Emitter::new(&mut pool, &mut rng, 2.0, &config).point_effect(&blood);

        assert!((100..=200).contains(&emission.emitted));
        for (_, particle) in pool.active() {
            assert_eq!(particle.kind, ParticleKind::Blood);
            assert_eq!(particle.color, 73);
            assert!(particle.velocity.x < 0.0);
            assert!(particle.death_time >= 5.0 && particle.death_time <= 7.0);
        }
    }

    #[test]
    fn test_truncates_on_small_pool() {
        let (mut pool, mut rng, config) = rig(8);
        let emission = Emitter::new(&mut pool, &mut rng, 0.0, &config).point_effect(&trigger(50, 0));
        assert_eq!(emission, Emission { emitted: 8, truncated: true });
    }
}
