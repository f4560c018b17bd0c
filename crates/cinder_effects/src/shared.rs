//! Lock-guarded engine handle for callers that emit from one thread and
//! advance or draw from another.
//!
//! The pool's free and active lists are not safe for concurrent mutation,
//! so every access, reads included, goes through one mutex.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::config::EngineConfig;
use crate::engine::{ParticleEngine, ParticleStats};

/// Cloneable, thread-safe handle to one [`ParticleEngine`].
#[derive(Clone, Debug)]
pub struct SharedParticleEngine {
    inner: Arc<Mutex<ParticleEngine>>,
}

impl SharedParticleEngine {
    /// Wraps an engine.
    #[must_use]
    pub fn new(engine: ParticleEngine) -> Self {
        Self {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    /// Builds and wraps an engine from `config`.
    #[must_use]
    pub fn from_config(config: EngineConfig) -> Self {
        Self::new(ParticleEngine::new(config))
    }

    /// Locks the engine for a sequence of calls.
    pub fn lock(&self) -> MutexGuard<'_, ParticleEngine> {
        self.inner.lock()
    }

    /// Runs `f` with the engine locked.
    pub fn with<R>(&self, f: impl FnOnce(&mut ParticleEngine) -> R) -> R {
        f(&mut self.inner.lock())
    }

    /// Advances the engine clock to `now`.
    pub fn advance(&self, now: f64) -> ParticleStats {
        self.inner.lock().advance(now)
    }

    /// Snapshot of the live counters.
    #[must_use]
    pub fn stats(&self) -> ParticleStats {
        self.inner.lock().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_core::Vec3;
    use std::thread;

    #[test]
    fn test_emit_from_many_threads() {
        let shared = SharedParticleEngine::from_config(EngineConfig::default());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    shared.with(|engine| engine.dark_field(Vec3::new(i as f32 * 100.0, 0.0, 0.0)))
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().emitted, 64);
        }

        let stats = shared.stats();
        assert_eq!(stats.alive, 256);
        assert_eq!(stats.spawned_this_frame, 256);

        let pool_partitioned = shared.with(|engine| {
            engine.pool().active_count() + engine.pool().free_count() == engine.pool().capacity()
        });
        assert!(pool_partitioned);
    }

    #[test]
    fn test_advance_through_handle() {
        let shared = SharedParticleEngine::from_config(EngineConfig::default());
        shared.lock().teleport_splash(Vec3::ZERO);
        // Teleport sparks live at most 0.34 s.
        let frame = shared.advance(0.5);
        assert_eq!(frame.expired_this_frame, 896);
    }
}
