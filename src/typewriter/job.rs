use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Millis, TextSink},
        rng::Rng64,
    },
    present::port::TextSurface,
};

/// Characters followed by an extra pause.
pub const PUNCTUATION: [char; 3] = ['.', ',', '—'];

/// Delays committed when a job starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeTiming {
    pub base_delay: Millis,
    pub punctuation_pause: Millis,
    /// Uniform jitter half-width applied to every character.
    pub jitter_ms: u32,
}

impl TypeTiming {
    fn delay_after(self, ch: char, rng: &mut Rng64) -> Millis {
        let mut delay = self.base_delay.offset(rng.jitter(self.jitter_ms));
        if PUNCTUATION.contains(&ch) {
            delay = delay.after(self.punctuation_pause);
        }
        delay
    }
}

/// One character-by-character reveal of `source` into a sink.
#[derive(Clone, Debug)]
pub struct TypewriterJob<C> {
    source: Vec<char>,
    char_index: usize,
    timing: TypeTiming,
    on_complete: C,
    epoch: u64,
}

impl<C> TypewriterJob<C> {
    pub fn revealed(&self) -> usize {
        self.char_index
    }

    pub fn len(&self) -> usize {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeStep<C> {
    /// The tick belongs to a finished or superseded job.
    Stale,
    /// One more character is visible; tick again after `next_delay`.
    Revealed { ch: char, next_delay: Millis },
    /// Everything is visible; the job is gone.
    Finished { on_complete: C },
}

/// Owns at most one live job per sink.
///
/// Every start hands out a fresh epoch. Ticks carry the epoch they were scheduled for, so a
/// continuation left over from a replaced job can never write into the sink again.
#[derive(Debug)]
pub struct Typewriter<C> {
    jobs: BTreeMap<TextSink, TypewriterJob<C>>,
    next_epoch: u64,
}

impl<C> Default for Typewriter<C> {
    fn default() -> Self {
        Self {
            jobs: BTreeMap::new(),
            next_epoch: 1,
        }
    }
}

impl<C: Copy> Typewriter<C> {
    /// Clear `sink` and install a job for `text`, superseding any job already on that sink.
    ///
    /// Nothing is revealed synchronously; the caller schedules the first tick on the next
    /// animation frame with the returned epoch.
    pub fn start<T: TextSurface>(
        &mut self,
        surface: &mut T,
        sink: TextSink,
        text: &str,
        timing: TypeTiming,
        on_complete: C,
    ) -> u64 {
        let epoch = self.next_epoch;
        self.next_epoch = self.next_epoch.wrapping_add(1);

        if let Some(old) = self.jobs.get(&sink) {
            tracing::debug!(
                ?sink,
                old_epoch = old.epoch,
                new_epoch = epoch,
                "typewriter job superseded"
            );
        }

        surface.clear_text(sink);
        self.jobs.insert(
            sink,
            TypewriterJob {
                source: text.chars().collect(),
                char_index: 0,
                timing,
                on_complete,
                epoch,
            },
        );
        epoch
    }

    pub fn tick<T: TextSurface>(
        &mut self,
        surface: &mut T,
        sink: TextSink,
        epoch: u64,
        rng: &mut Rng64,
    ) -> TypeStep<C> {
        let Some(job) = self.jobs.get_mut(&sink) else {
            return TypeStep::Stale;
        };
        if job.epoch != epoch {
            return TypeStep::Stale;
        }

        if let Some(&ch) = job.source.get(job.char_index) {
            surface.append_char(sink, ch);
            job.char_index += 1;
            let next_delay = job.timing.delay_after(ch, rng);
            return TypeStep::Revealed { ch, next_delay };
        }

        let on_complete = job.on_complete;
        self.jobs.remove(&sink);
        TypeStep::Finished { on_complete }
    }

    pub fn job(&self, sink: TextSink) -> Option<&TypewriterJob<C>> {
        self.jobs.get(&sink)
    }

    pub fn is_active(&self, sink: TextSink) -> bool {
        self.jobs.contains_key(&sink)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typewriter/job.rs"]
mod tests;
