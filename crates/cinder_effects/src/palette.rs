//! Palette ramps for the fire and explosion families.
//!
//! A ramp maps the integer part of a particle's ramp phase to a palette
//! index. Indices past the end of a table read its last entry.

/// First explosion ramp, bright to dark orange.
pub const EXPLOSION_RAMP: [u8; 8] = [0x6f, 0x6d, 0x6b, 0x69, 0x67, 0x65, 0x63, 0x61];

/// Second explosion ramp, a slower fade.
pub const EXPLOSION2_RAMP: [u8; 8] = [0x6f, 0x6e, 0x6d, 0x6c, 0x6b, 0x6a, 0x68, 0x66];

/// Fire ramp; the tail fades into the greys.
pub const FIRE_RAMP: [u8; 8] = [0x6d, 0x6b, 6, 5, 4, 3, 0, 0];

/// Entries of [`FIRE_RAMP`] that `Explode3` particles cycle through.
pub const EXPLODE3_CYCLE: usize = 5;

#[inline]
fn lookup(table: &[u8; 8], phase: f32) -> u8 {
    // `as` saturates: negative phases land on entry 0.
    let index = (phase as usize).min(table.len() - 1);
    table[index]
}

/// Fire colour for a ramp phase.
#[inline]
#[must_use]
pub fn fire_color(phase: f32) -> u8 {
    lookup(&FIRE_RAMP, phase)
}

/// First explosion colour for a ramp phase.
#[inline]
#[must_use]
pub fn explosion_color(phase: f32) -> u8 {
    lookup(&EXPLOSION_RAMP, phase)
}

/// Second explosion colour for a ramp phase.
#[inline]
#[must_use]
pub fn explosion2_color(phase: f32) -> u8 {
    lookup(&EXPLOSION2_RAMP, phase)
}

/// `Explode3` colour: cycles the first five fire entries.
#[inline]
#[must_use]
pub fn explode3_color(phase: f32) -> u8 {
    FIRE_RAMP[(phase as usize) % EXPLODE3_CYCLE]
}
