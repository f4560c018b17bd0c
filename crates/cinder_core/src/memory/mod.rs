//! # Memory Management
//!
//! The fixed-capacity particle pool.
//!
//! ## Design Philosophy
//!
//! All memory is allocated once at startup. During gameplay:
//! - No heap allocations
//! - Exhaustion truncates effects instead of growing the pool
//! - Predictable, flat per-frame cost

mod pool;

pub use pool::{
    clamp_capacity, ActiveIter, Expiring, PoolAllocator, PoolHandle, ABSOLUTE_MIN_CAPACITY,
    DEFAULT_CAPACITY,
};
