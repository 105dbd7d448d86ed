use std::{cmp::Reverse, collections::BinaryHeap};

use crate::foundation::core::{Millis, TextSink};

/// Deferred work the sequencer asked to be woken for.
///
/// Wakes are fire-and-forget: nothing cancels them. The sequencer re-validates its state when
/// one arrives, so a wake that outlived its purpose is dropped there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "wake", rename_all = "snake_case")]
pub enum Wake {
    IntroElapsed,
    TypeTick { sink: TextSink, epoch: u64 },
    RevealContinue,
    RevealHint,
    SwapRegion,
    StartParagraph,
    SpawnSparkles,
    RemoveSparkles { batch: u64 },
    RevealFooter,
    ResizeSettled { generation: u64 },
}

/// Timer and animation-frame source injected into the sequencer.
pub trait Scheduler {
    /// Current time on this scheduler's clock.
    fn now(&self) -> Millis;

    /// Deliver `wake` once `delay` has elapsed.
    fn schedule_after(&mut self, delay: Millis, wake: Wake);

    /// Deliver `wake` on the next animation frame boundary (never synchronously).
    fn schedule_frame(&mut self, wake: Wake);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending {
    due: Millis,
    seq: u64,
    wake: Wake,
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Deterministic in-memory scheduler driven by explicit time advancement.
///
/// Determinism rule: wakes due at the same instant are delivered in the order they were
/// scheduled.
#[derive(Debug)]
pub struct VirtualScheduler {
    now: Millis,
    frame_interval: Millis,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Pending>>,
}

impl VirtualScheduler {
    pub fn new(frame_interval: Millis) -> Self {
        Self {
            now: Millis::ZERO,
            frame_interval: Millis(frame_interval.0.max(1)),
            next_seq: 0,
            queue: BinaryHeap::new(),
        }
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn is_idle(&self) -> bool {
        self.queue.is_empty()
    }

    /// Due time of the earliest pending wake.
    pub fn peek_due(&self) -> Option<Millis> {
        self.queue.peek().map(|Reverse(p)| p.due)
    }

    /// Pop the earliest wake if it is due at or before `until`, moving the clock to its due time.
    pub fn pop_due(&mut self, until: Millis) -> Option<(Millis, Wake)> {
        let due = self.peek_due()?;
        if due > until {
            return None;
        }
        let Reverse(p) = self.queue.pop()?;
        self.now = self.now.max(p.due);
        Some((p.due, p.wake))
    }

    /// Move the clock forward without delivering anything. Never moves backwards.
    pub fn advance_to(&mut self, t: Millis) {
        self.now = self.now.max(t);
    }

    fn push(&mut self, due: Millis, wake: Wake) {
        let seq = self.next_seq;
        self.next_seq = self.next_seq.wrapping_add(1);
        self.queue.push(Reverse(Pending { due, seq, wake }));
    }
}

impl Scheduler for VirtualScheduler {
    fn now(&self) -> Millis {
        self.now
    }

    fn schedule_after(&mut self, delay: Millis, wake: Wake) {
        let due = self.now.after(delay);
        self.push(due, wake);
    }

    fn schedule_frame(&mut self, wake: Wake) {
        let fi = self.frame_interval.0;
        let due = Millis((self.now.0 / fi + 1) * fi);
        self.push(due, wake);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/clock.rs"]
mod tests;
