//! # CINDER Effects
//!
//! Everything above the pool:
//! - Emission generators for every effect family
//! - The per-frame simulation step
//! - A read-only render view of the active list
//! - The [`ParticleEngine`] facade tying them to one clock and one pool
//!
//! ## Frame Order
//!
//! 1. Game code triggers effects (`explosion`, `trail`, `point_effect`, ...)
//! 2. [`ParticleEngine::advance`] sweeps expired particles and steps the rest
//! 3. The renderer reads [`ParticleEngine::draw_list`]
//!
//! Pool exhaustion truncates effects silently; see [`Emission`].

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]

pub mod config;
pub mod emitters;
pub mod engine;
pub mod error;
pub mod normals;
pub mod palette;
pub mod render;
pub mod shared;
pub mod simulation;

pub use config::{EmissionConfig, EngineConfig, HaloConfig, PhysicsConfig, PoolConfig, RandomConfig};
pub use emitters::{
    point_file_path, EffectTrigger, Emission, Emitter, HaloTable, PointFileReport, TrailKind,
};
pub use engine::{ParticleEngine, ParticleStats};
pub use error::{EffectsError, EffectsResult};
pub use render::{DrawParticle, Palette, ParticleVertex, VertexBuffer};
pub use shared::SharedParticleEngine;
pub use simulation::{FrameConstants, StepReport};
