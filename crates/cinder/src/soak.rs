//! Scripted effect schedule for the soak loop.
//!
//! A fixed rotation of effects keyed on the frame number, loosely modelled on
//! a busy firefight: a rocket in flight every frame, periodic explosions and
//! blood, the odd teleport, and a glowing entity.

use cinder_core::Vec3;
use cinder_effects::{EffectTrigger, ParticleEngine};

/// Trail code for a rocket's fire trail.
const ROCKET_TRAIL: u8 = 0;

/// Trail code for a tracer, with the high modifier bit set.
const TRACER_TRAIL: u8 = 128 + 3;

/// Frames a rocket flies before it detonates.
const ROCKET_FLIGHT: u32 = 30;

/// Rocket speed in units per frame.
const ROCKET_STEP: f32 = 16.0;

/// Triggers the effects scheduled for `frame`.
pub fn schedule(engine: &mut ParticleEngine, frame: u32) {
    let flight = frame % ROCKET_FLIGHT;
    let launch = Vec3::new(0.0, 0.0, 32.0);
    let heading = Vec3::new(1.0, 0.25, 0.0).normalize_or_zero();
    let from = launch + heading * (flight as f32 * ROCKET_STEP);
    let to = from + heading * ROCKET_STEP;

    if flight + 1 == ROCKET_FLIGHT {
        engine.explosion(to);
    } else {
        engine.trail(from, to, ROCKET_TRAIL);
    }

    if frame % 3 == 0 {
        engine.trail(Vec3::new(-64.0, 0.0, 48.0), Vec3::new(64.0, 0.0, 48.0), TRACER_TRAIL);
    }

    if frame % 20 == 5 {
        let blood = EffectTrigger::decode(Vec3::new(128.0, 32.0, 24.0), [-16, 0, 0], 20, 73);
        engine.point_effect(&blood);
    }

    if frame % 50 == 10 {
        engine.point_effect(&EffectTrigger::decode(Vec3::new(-32.0, -32.0, 0.0), [0, 0, 16], 12, 0x30));
    }

    if frame % 120 == 60 {
        engine.teleport_splash(Vec3::new(-128.0, 64.0, 0.0));
        engine.dark_field(Vec3::new(-128.0, -64.0, 0.0));
    }

    if frame % 240 == 200 {
        engine.lava_splash(Vec3::new(0.0, 256.0, -64.0));
        engine.blob_explosion(Vec3::new(0.0, -256.0, 0.0));
        engine.color_explosion(Vec3::new(256.0, 0.0, 0.0), 192, 8);
    }

    if frame % 2 == 0 {
        engine.entity_halo(Vec3::new(200.0, 200.0, 40.0));
    }
}
