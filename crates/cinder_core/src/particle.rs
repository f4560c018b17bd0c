//! # Particle Record
//!
//! The data unit stored in every pool slot. List membership is not part of
//! the record: the pool keeps the links in its own index arrays, so a record
//! is pure payload that emitters stamp and the simulation step mutates.

use crate::math::Vec3;
use crate::memory::Expiring;

/// Closed set of per-step behaviours.
///
/// The kind is stamped at emission and never changes afterwards.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ParticleKind {
    /// No per-step change.
    #[default]
    Static = 0,
    /// Fire ramp, rises.
    Fire = 1,
    /// First explosion ramp, accelerates outward, falls.
    Explode = 2,
    /// Second explosion ramp, damps toward zero, falls.
    Explode2 = 3,
    /// Short cycling ramp, horizontal boost, half gravity.
    Explode3 = 4,
    /// Long-lived damped smoke that rises.
    Smoke = 5,
    /// Accelerates outward, falls.
    Blob = 6,
    /// Horizontal damping, falls.
    Blob2 = 7,
    /// Fire-coloured trail puff.
    FireTrail = 8,
    /// Smoke trail puff with turbulent damping.
    SmokeTrail = 9,
    /// Blood spray with turbulent damping.
    Blood = 10,
    /// Gravity only, optionally amplified.
    Grav = 11,
    /// Gravity only.
    SlowGrav = 12,
}

impl ParticleKind {
    /// Every kind, in discriminant order.
    pub const ALL: [Self; 13] = [
        Self::Static,
        Self::Fire,
        Self::Explode,
        Self::Explode2,
        Self::Explode3,
        Self::Smoke,
        Self::Blob,
        Self::Blob2,
        Self::FireTrail,
        Self::SmokeTrail,
        Self::Blood,
        Self::Grav,
        Self::SlowGrav,
    ];

    /// Whether the simulation step can end this kind's life through its ramp.
    ///
    /// The remaining kinds only die when their emission-time deadline passes.
    #[must_use]
    pub const fn has_ramp_expiry(self) -> bool {
        matches!(
            self,
            Self::Fire
                | Self::Explode
                | Self::Explode2
                | Self::Explode3
                | Self::Smoke
                | Self::FireTrail
                | Self::SmokeTrail
                | Self::Blood
        )
    }
}

/// A single simulated particle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Particle {
    /// World-space position.
    pub position: Vec3,
    /// World units per second.
    pub velocity: Vec3,
    /// Palette index, resolved to a colour by the renderer.
    pub color: u8,
    /// Animation phase for ramp-driven kinds.
    pub ramp: f32,
    /// Behaviour selector.
    pub kind: ParticleKind,
    /// Clock value at emission.
    pub birth_time: f64,
    /// Clock value at which the sweep reclaims the slot.
    pub death_time: f64,
    /// Render-side scale.
    pub size: f32,
    /// Render-side scale change per second.
    pub growth_rate: f32,
}

impl Particle {
    /// Deadline that has always passed; set to request reclamation on the next sweep.
    pub const EXPIRED: f64 = f64::NEG_INFINITY;

    /// Deadline that is never reached.
    pub const NEVER_EXPIRES: f64 = f64::INFINITY;

    /// Smallest size the render side will ever see.
    pub const MIN_SIZE: f32 = 1.0;

    /// A particle born at `now` that dies at `death_time`, at rest at `position`.
    ///
    /// Size 1 and no growth; emitters override what their effect needs.
    #[must_use]
    pub fn born(now: f64, death_time: f64, kind: ParticleKind, position: Vec3) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            color: 0,
            ramp: 0.0,
            kind,
            birth_time: now,
            death_time,
            size: Self::MIN_SIZE,
            growth_rate: 0.0,
        }
    }

    /// Marks the particle for reclamation on the next sweep.
    #[inline]
    pub fn request_expiry(&mut self) {
        self.death_time = Self::EXPIRED;
    }

    /// Seconds since emission.
    #[inline]
    #[must_use]
    pub fn age(&self, now: f64) -> f64 {
        now - self.birth_time
    }

    /// Total scheduled lifetime in seconds.
    #[inline]
    #[must_use]
    pub fn lifetime(&self) -> f64 {
        self.death_time - self.birth_time
    }
}

impl Expiring for Particle {
    #[inline]
    fn is_expired(&self, now: f64) -> bool {
        self.death_time <= now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiry_threshold_is_inclusive() {
        let particle = Particle::born(0.0, 2.0, ParticleKind::Static, Vec3::ZERO);
        assert!(!particle.is_expired(1.999));
        assert!(particle.is_expired(2.0));
    }

    #[test]
    fn test_request_expiry() {
        let mut particle = Particle::born(5.0, 10.0, ParticleKind::Fire, Vec3::ZERO);
        particle.request_expiry();
        assert!(particle.is_expired(0.0));
    }

    #[test]
    fn test_request_expiry_before_clock_zero() {
        let mut particle = Particle::born(-10.0, -5.0, ParticleKind::Explode, Vec3::ZERO);
        particle.request_expiry();
        assert!(particle.is_expired(-9.8));
        assert!(particle.is_expired(f64::MIN));
    }

    #[test]
    fn test_never_expires() {
        let particle = Particle::born(0.0, Particle::NEVER_EXPIRES, ParticleKind::Static, Vec3::ZERO);
        assert!(!particle.is_expired(1.0e9));
    }

    #[test]
    fn test_ramp_expiry_kinds() {
        let deadline_only: Vec<_> = ParticleKind::ALL
            .iter()
            .filter(|kind| !kind.has_ramp_expiry())
            .copied()
            .collect();
        assert_eq!(
            deadline_only,
            vec![
                ParticleKind::Static,
                ParticleKind::Blob,
                ParticleKind::Blob2,
                ParticleKind::Grav,
                ParticleKind::SlowGrav,
            ]
        );
    }
}
