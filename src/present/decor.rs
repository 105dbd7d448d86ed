use crate::{
    foundation::{
        core::{Bounds, Millis},
        rng::Rng64,
    },
    present::port::PresentationPort,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleKind {
    Petal,
    Dot,
}

/// One long-lived ambient element drifting up the page.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ParticleSpec {
    pub kind: ParticleKind,
    /// Horizontal position, percent of viewport width.
    pub left_pct: f64,
    pub delay_s: f64,
    pub duration_s: f64,
    /// Dots only; petals are sized by the stylesheet.
    pub size_px: Option<f64>,
}

/// One short-lived sparkle of the completion burst.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct SparkleSpec {
    /// Offset inside the paragraph region.
    pub x: f64,
    pub y: f64,
    pub delay: Millis,
}

pub fn plan_particles(count: usize, rng: &mut Rng64) -> Vec<ParticleSpec> {
    (0..count)
        .map(|_| {
            let kind = if rng.coin() {
                ParticleKind::Petal
            } else {
                ParticleKind::Dot
            };
            let left_pct = rng.range_f64(0.0, 100.0);
            let delay_s = rng.range_f64(0.0, 22.0);
            let duration_s = rng.range_f64(20.0, 32.0);
            let size_px = match kind {
                ParticleKind::Petal => None,
                ParticleKind::Dot => Some(rng.range_f64(3.0, 7.0)),
            };
            ParticleSpec {
                kind,
                left_pct,
                delay_s,
                duration_s,
                size_px,
            }
        })
        .collect()
}

pub fn plan_sparkles(
    count: usize,
    bounds: Bounds,
    stagger: Millis,
    rng: &mut Rng64,
) -> Vec<SparkleSpec> {
    (0..count)
        .map(|i| SparkleSpec {
            x: rng.next_f64_01() * bounds.width,
            y: rng.next_f64_01() * bounds.height,
            delay: Millis(stagger.0.saturating_mul(i as u64)),
        })
        .collect()
}

/// Tracks how many ambient particles are on screen.
///
/// Resync is replace-all: when the desired count changes, every particle is removed and a
/// fresh set is spawned.
#[derive(Clone, Copy, Debug, Default)]
pub struct ParticleField {
    spawned: usize,
}

impl ParticleField {
    pub fn spawned(&self) -> usize {
        self.spawned
    }

    /// Returns whether anything was respawned.
    pub fn sync<P: PresentationPort>(
        &mut self,
        desired: usize,
        rng: &mut Rng64,
        port: &mut P,
    ) -> bool {
        if desired == self.spawned {
            return false;
        }
        if self.spawned > 0 {
            port.clear_particles();
        }
        let specs = plan_particles(desired, rng);
        if !specs.is_empty() {
            port.spawn_particles(&specs);
        }
        tracing::debug!(from = self.spawned, to = desired, "particles resynced");
        self.spawned = desired;
        true
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/decor.rs"]
mod tests;
