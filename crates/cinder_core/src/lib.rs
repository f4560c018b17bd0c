//! # CINDER Core
//!
//! Leaf types for the particle engine:
//! - A fixed pool of reusable particle records
//! - Free/active lists linked by slot index, never by pointer
//! - A closed particle-kind discriminant
//! - An injectable random source so every effect can be replayed
//!
//! ## Architecture Rules
//!
//! 1. **No heap allocations per frame** - The pool is sized once at startup
//! 2. **Only the pool relinks** - Everything else reads and writes payload fields
//! 3. **Exhaustion is an outcome** - `allocate_one` returns `None`, callers stop
//!
//! ## Example
//!
//! ```rust,ignore
//! use cinder_core::{Particle, ParticleKind, ParticlePool, Vec3};
//!
//! let mut pool = ParticlePool::initialize(2048);
//! pool.emit(Particle::born(0.0, 1.0, ParticleKind::Static, Vec3::ZERO));
//! pool.sweep_expired(1.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod math;
pub mod memory;
pub mod particle;
pub mod random;

pub use math::Vec3;
pub use memory::{
    clamp_capacity, Expiring, PoolAllocator, PoolHandle, ABSOLUTE_MIN_CAPACITY, DEFAULT_CAPACITY,
};
pub use particle::{Particle, ParticleKind};
pub use random::{ChaChaSource, RandomSource, ScriptedSource, RAND_MAX};

/// The pool the engine runs on.
pub type ParticlePool = PoolAllocator<Particle>;
