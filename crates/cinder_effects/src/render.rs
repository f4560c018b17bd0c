//! # Render View
//!
//! Read-only projection of the active list for a renderer. Nothing here
//! mutates the pool; the adapter is expected to run once per frame, after
//! the simulation step.

use bytemuck::{Pod, Zeroable};
use cinder_core::{Particle, ParticlePool, Vec3};

/// Alpha at birth; fades linearly to zero at 70% of the lifetime.
const FADE_START: f32 = 0.7;

/// What the renderer needs to draw one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawParticle {
    /// World-space position.
    pub position: Vec3,
    /// Palette index.
    pub color: u8,
    /// Opacity in `[0, 1]`.
    pub alpha: f32,
    /// Billboard scale.
    pub size: f32,
}

impl DrawParticle {
    /// Projects a particle at clock value `now`.
    #[must_use]
    pub fn from_particle(particle: &Particle, now: f64) -> Self {
        Self {
            position: particle.position,
            color: particle.color,
            alpha: fade_alpha(particle, now),
            size: particle.size,
        }
    }
}

/// `clamp(0.7 - age / lifetime, 0, 1)`.
///
/// Particles with no positive lifetime draw fully transparent. Particles
/// that never expire have an infinite lifetime and stay at the starting
/// alpha.
#[must_use]
pub fn fade_alpha(particle: &Particle, now: f64) -> f32 {
    let lifetime = particle.lifetime();
    if lifetime.is_nan() || lifetime <= 0.0 {
        return 0.0;
    }
    let elapsed = (particle.age(now) / lifetime) as f32;
    (FADE_START - elapsed).clamp(0.0, 1.0)
}

/// Every active particle, newest first.
pub fn draw_list(pool: &ParticlePool, now: f64) -> impl Iterator<Item = DrawParticle> + '_ {
    pool.active().map(move |(_, particle)| DrawParticle::from_particle(particle, now))
}

/// 256-entry RGB palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Box<[[u8; 3]; 256]>,
}

impl Palette {
    /// Size of a raw palette lump: 256 packed RGB triples.
    pub const LUMP_SIZE: usize = 256 * 3;

    /// Wraps an explicit table.
    #[must_use]
    pub fn new(entries: [[u8; 3]; 256]) -> Self {
        Self {
            entries: Box::new(entries),
        }
    }

    /// Reads a raw palette lump. Returns `None` unless `bytes` is exactly
    /// [`Self::LUMP_SIZE`] long.
    #[must_use]
    pub fn from_lump(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::LUMP_SIZE {
            return None;
        }
        let mut entries = [[0u8; 3]; 256];
        for (entry, rgb) in entries.iter_mut().zip(bytes.chunks_exact(3)) {
            entry.copy_from_slice(rgb);
        }
        Some(Self::new(entries))
    }

    /// A ramp from black to white, for headless runs and tests.
    #[must_use]
    pub fn grayscale() -> Self {
        let mut entries = [[0u8; 3]; 256];
        for (index, entry) in (0u8..=255).zip(entries.iter_mut()) {
            *entry = [index; 3];
        }
        Self::new(entries)
    }

    /// RGBA in `[0, 1]` for a palette index and alpha.
    #[must_use]
    pub fn rgba(&self, index: u8, alpha: f32) -> [f32; 4] {
        let [r, g, b] = self.entries[usize::from(index)];
        [
            f32::from(r) / 255.0,
            f32::from(g) / 255.0,
            f32::from(b) / 255.0,
            alpha,
        ]
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

/// One particle as uploaded to a GPU vertex buffer.
///
/// Size: 32 bytes
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct ParticleVertex {
    /// World-space position.
    pub position: [f32; 3],
    /// Billboard scale.
    pub size: f32,
    /// Resolved colour with fade alpha.
    pub color: [f32; 4],
}

impl ParticleVertex {
    /// Size of a vertex in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Resolves a draw record through `palette`.
    #[must_use]
    pub fn resolve(draw: &DrawParticle, palette: &Palette) -> Self {
        Self {
            position: draw.position.to_array(),
            size: draw.size,
            color: palette.rgba(draw.color, draw.alpha),
        }
    }
}

/// Reusable vertex buffer filled once per frame.
#[derive(Clone, Debug, Default)]
pub struct VertexBuffer {
    vertices: Vec<ParticleVertex>,
}

impl VertexBuffer {
    /// Creates a buffer with room for `capacity` vertices.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(capacity),
        }
    }

    /// Replaces the contents with the active list at `now`.
    pub fn fill(&mut self, pool: &ParticlePool, palette: &Palette, now: f64) -> &[ParticleVertex] {
        self.vertices.clear();
        self.vertices
            .extend(draw_list(pool, now).map(|draw| ParticleVertex::resolve(&draw, palette)));
        &self.vertices
    }

    /// The vertices from the last fill.
    #[must_use]
    pub fn vertices(&self) -> &[ParticleVertex] {
        &self.vertices
    }

    /// The vertices from the last fill, as bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}
