//! Point-file tracing: visualises a list of world points (typically a leak
//! path written by the map compiler) as permanent static particles.
//!
//! The file holds one `x y z` triple per line. Reading stops at the first
//! line whose first three fields are not all numbers, or at end of input.
//! Blank lines are skipped; fields past the third are ignored.

use std::io::BufRead;
use std::path::PathBuf;

use cinder_core::{Particle, ParticleKind, Vec3};

use super::{Emission, Emitter};
use crate::error::EffectsResult;

/// Result of a point-file load.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PointFileReport {
    /// Triples parsed, including one that found the pool full.
    pub points_read: usize,
    /// Particles stamped into the pool.
    pub emission: Emission,
}

/// Conventional location of a map's point file: `maps/<map>.pts`.
#[must_use]
pub fn point_file_path(map: &str) -> PathBuf {
    PathBuf::from("maps").join(format!("{map}.pts"))
}

/// Parses the leading `x y z` of a line.
fn parse_point(line: &str) -> Option<Vec3> {
    let mut fields = line.split_whitespace().map(str::parse::<f32>);
    let x = fields.next()?.ok()?;
    let y = fields.next()?.ok()?;
    let z = fields.next()?.ok()?;
    Some(Vec3::new(x, y, z))
}

/// Palette index of the `n`th point (1-based): a descending 4-bit cycle.
#[inline]
fn point_color(n: usize) -> u8 {
    // Masked to 4 bits.
    ((n as u32).wrapping_neg() & 15) as u8
}

impl Emitter<'_> {
    /// Stamps one static, never-expiring particle per point read from `reader`.
    ///
    /// Pool exhaustion stops the load early with a warning; it is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EffectsError::Io`] if reading fails.
    pub fn trace_points(&mut self, reader: impl BufRead) -> EffectsResult<PointFileReport> {
        let now = self.now;
        let mut report = PointFileReport::default();

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let Some(position) = parse_point(&line) else {
                break;
            };
            report.points_read += 1;

            let color = point_color(report.points_read);
            let spawned = self.spawn(&mut report.emission, |_| Particle {
                color,
                ..Particle::born(now, Particle::NEVER_EXPIRES, ParticleKind::Static, position)
            });
            if !spawned {
                tracing::warn!("Not enough free particles");
                break;
            }
        }

        tracing::debug!(points = report.points_read, "points read");
        Ok(report)
    }
}
