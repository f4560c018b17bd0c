//! # Particle Engine
//!
//! Owns everything a running particle system needs: the pool, the random
//! source, the tuning, the clock, the halo table, and the tracer counter.
//! Game code calls the generator methods while handling a frame's events,
//! then [`ParticleEngine::advance`] once, then reads the draw list.
//!
//! ```rust,ignore
//! let mut engine = ParticleEngine::new(EngineConfig::default());
//! engine.explosion(Vec3::new(0.0, 0.0, 64.0));
//! let frame = engine.advance(0.016);
//! for draw in engine.draw_list() {
//!     renderer.point(draw.position, draw.color, draw.alpha, draw.size);
//! }
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use cinder_core::{ChaChaSource, ParticlePool, RandomSource, Vec3};

use crate::config::EngineConfig;
use crate::emitters::{EffectTrigger, Emission, Emitter, HaloTable, PointFileReport};
use crate::error::{EffectsError, EffectsResult};
use crate::render::{draw_list, DrawParticle, Palette, ParticleVertex, VertexBuffer};
use crate::simulation::{self, StepReport};

/// Pool counters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ParticleStats {
    /// Slots in the pool.
    pub capacity: usize,
    /// Particles on the active list.
    pub alive: usize,
    /// Particles emitted since the previous frame.
    pub spawned_this_frame: usize,
    /// Slots reclaimed by this frame's sweep.
    pub expired_this_frame: usize,
    /// Effects cut short by pool exhaustion since the previous frame.
    pub truncated_effects: usize,
}

/// The particle system facade.
pub struct ParticleEngine {
    pool: ParticlePool,
    rng: Box<dyn RandomSource + Send>,
    config: EngineConfig,
    clock: f64,
    halo: HaloTable,
    tracer_count: u32,
    stats: ParticleStats,
    vertices: VertexBuffer,
}

impl std::fmt::Debug for ParticleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParticleEngine")
            .field("clock", &self.clock)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl ParticleEngine {
    /// Creates an engine with a ChaCha source seeded from `config.random.seed`.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        let rng = ChaChaSource::from_seed(config.random.seed);
        Self::with_source(config, rng)
    }

    /// Creates an engine drawing from `rng`.
    ///
    /// The halo's angular velocities are drawn here, before anything else.
    #[must_use]
    pub fn with_source(config: EngineConfig, rng: impl RandomSource + Send + 'static) -> Self {
        let mut rng: Box<dyn RandomSource + Send> = Box::new(rng);
        let capacity = config.pool_capacity();
        let pool = ParticlePool::new(capacity);
        let halo = HaloTable::sample(&mut *rng);

        tracing::info!(capacity, seed = config.random.seed, "particle engine initialized");

        Self {
            pool,
            rng,
            config,
            clock: 0.0,
            halo,
            tracer_count: 0,
            stats: ParticleStats {
                capacity,
                ..ParticleStats::default()
            },
            vertices: VertexBuffer::with_capacity(capacity),
        }
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Returns every particle to the free list, as between levels.
    ///
    /// Capacity, clock, and the halo table are kept.
    pub fn clear(&mut self) {
        self.pool.reset();
        self.stats = ParticleStats {
            capacity: self.pool.capacity(),
            ..ParticleStats::default()
        };
        tracing::info!(capacity = self.pool.capacity(), "particles cleared");
    }

    /// Advances the clock to `now` and runs one simulation step.
    ///
    /// Returns the counters for the frame that just ended and starts a new
    /// one. A clock that moves backwards gives a zero-length step.
    pub fn advance(&mut self, now: f64) -> ParticleStats {
        let dt = (now - self.clock).max(0.0) as f32;
        self.clock = now;

        let report: StepReport =
            simulation::step(&mut self.pool, &mut *self.rng, &self.config.physics, now, dt);

        let frame = ParticleStats {
            alive: self.pool.active_count(),
            expired_this_frame: report.expired,
            ..self.stats
        };
        tracing::trace!(
            alive = frame.alive,
            spawned = frame.spawned_this_frame,
            expired = frame.expired_this_frame,
            "frame advanced"
        );

        self.stats = ParticleStats {
            capacity: frame.capacity,
            alive: frame.alive,
            expired_this_frame: frame.expired_this_frame,
            ..ParticleStats::default()
        };
        frame
    }

    /// Advances the clock by `dt` seconds.
    pub fn advance_by(&mut self, dt: f32) -> ParticleStats {
        self.advance(self.clock + f64::from(dt))
    }

    // ========================================================================
    // Effects
    // ========================================================================

    fn record(&mut self, emission: Emission) -> Emission {
        self.stats.spawned_this_frame += emission.emitted;
        self.stats.alive = self.pool.active_count();
        if emission.truncated {
            self.stats.truncated_effects += 1;
        }
        emission
    }

    fn emitter(&mut self) -> Emitter<'_> {
        Emitter::new(&mut self.pool, &mut *self.rng, self.clock, &self.config.emission)
    }

    /// Runs a point effect.
    pub fn point_effect(&mut self, trigger: &EffectTrigger) -> Emission {
        let emission = self.emitter().point_effect(trigger);
        self.record(emission)
    }

    /// Emits a full explosion at `origin`.
    pub fn explosion(&mut self, origin: Vec3) -> Emission {
        let emission = self.emitter().explosion(origin);
        self.record(emission)
    }

    /// Emits a blob burst cycling a palette range.
    pub fn color_explosion(&mut self, origin: Vec3, color_start: u8, color_length: u8) -> Emission {
        let emission = self.emitter().color_explosion(origin, color_start, color_length);
        self.record(emission)
    }

    /// Emits a two-tone blob burst.
    pub fn blob_explosion(&mut self, origin: Vec3) -> Emission {
        let emission = self.emitter().blob_explosion(origin);
        self.record(emission)
    }

    /// Emits a lava splash.
    pub fn lava_splash(&mut self, origin: Vec3) -> Emission {
        let emission = self.emitter().lava_splash(origin);
        self.record(emission)
    }

    /// Emits a teleport flash.
    pub fn teleport_splash(&mut self, origin: Vec3) -> Emission {
        let emission = self.emitter().teleport_splash(origin);
        self.record(emission)
    }

    /// Emits a dark field burst.
    pub fn dark_field(&mut self, origin: Vec3) -> Emission {
        let emission = self.emitter().dark_field(origin);
        self.record(emission)
    }

    /// Lays a trail of type `code` from `start` to `end`.
    pub fn trail(&mut self, start: Vec3, end: Vec3, code: u8) -> Emission {
        let emission =
            Emitter::new(&mut self.pool, &mut *self.rng, self.clock, &self.config.emission).trail(
                start,
                end,
                code,
                &mut self.tracer_count,
            );
        self.record(emission)
    }

    /// Emits the halo around an entity at `origin`.
    pub fn entity_halo(&mut self, origin: Vec3) -> Emission {
        let emission =
            Emitter::new(&mut self.pool, &mut *self.rng, self.clock, &self.config.emission)
                .entity_halo(&self.halo, &self.config.halo, origin);
        self.record(emission)
    }

    /// Traces points read from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::Io`] if reading fails.
    pub fn trace_points(&mut self, reader: impl BufRead) -> EffectsResult<PointFileReport> {
        let report = self.emitter().trace_points(reader)?;
        self.record(report.emission);
        Ok(report)
    }

    /// Traces the points in the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`EffectsError::PointFileNotFound`] if the file does not
    /// exist; nothing is emitted in that case. Returns [`EffectsError::Io`]
    /// if it cannot be read.
    pub fn load_point_file(&mut self, path: impl AsRef<Path>) -> EffectsResult<PointFileReport> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "couldn't open point file");
            return Err(EffectsError::PointFileNotFound(path.to_path_buf()));
        }
        tracing::info!(path = %path.display(), "reading point file");
        let file = File::open(path)?;
        self.trace_points(BufReader::new(file))
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Current clock value.
    #[must_use]
    pub fn now(&self) -> f64 {
        self.clock
    }

    /// Live counters for the frame in progress.
    #[must_use]
    pub fn stats(&self) -> ParticleStats {
        ParticleStats {
            alive: self.pool.active_count(),
            ..self.stats
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Read-only view of the pool.
    #[must_use]
    pub fn pool(&self) -> &ParticlePool {
        &self.pool
    }

    /// Current tracer counter.
    #[must_use]
    pub fn tracer_count(&self) -> u32 {
        self.tracer_count
    }

    /// Every active particle as the renderer sees it, newest first.
    pub fn draw_list(&self) -> impl Iterator<Item = DrawParticle> + '_ {
        draw_list(&self.pool, self.clock)
    }

    /// Refills the engine's vertex buffer and returns it.
    pub fn fill_vertices(&mut self, palette: &Palette) -> &[ParticleVertex] {
        self.vertices.fill(&self.pool, palette, self.clock)
    }

    /// The last filled vertex buffer, as bytes for upload.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        self.vertices.vertex_bytes()
    }
}
