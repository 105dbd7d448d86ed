//! Scripted, clock-free runs of a [`Sequencer`].
//!
//! A simulation pairs the sequencer with a [`RecordingPort`] and a [`VirtualScheduler`], replays
//! a script of timed user actions, and keeps a time-stamped trace of every state change and
//! port request. The CLI and the scenario tests are both built on it.

use std::collections::VecDeque;

use crate::{
    config::model::SequenceConfig,
    foundation::{
        core::{Millis, ViewportWidth},
        error::{SerenadeError, SerenadeResult},
    },
    input::event::InputEvent,
    present::port::{PortCall, RecordingPort},
    schedule::clock::{Scheduler, VirtualScheduler},
    timeline::{sequencer::Sequencer, state::TimelineState},
};

/// A user or environment action injected at a point in time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Input { event: InputEvent },
    /// Change the viewport width, then deliver a resize.
    SetViewport { width: ViewportWidth },
    /// Call the advance entry point directly.
    Advance,
    ToggleMusic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScriptStep {
    pub at: Millis,
    pub action: ScriptAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct StateChange {
    pub at: Millis,
    pub state: TimelineState,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEntry {
    State { at: Millis, state: TimelineState },
    Action { at: Millis, action: ScriptAction },
    Call { at: Millis, call: PortCall },
}

pub struct Simulation {
    sequencer: Sequencer<RecordingPort, VirtualScheduler>,
    script: VecDeque<ScriptStep>,
    auto_advance: Option<Millis>,
    changes: Vec<StateChange>,
    trace: Vec<TraceEntry>,
    calls_seen: usize,
}

impl Simulation {
    pub fn new(config: SequenceConfig, port: RecordingPort, seed: u64) -> SerenadeResult<Self> {
        let scheduler = VirtualScheduler::new(config.timings.frame_interval_ms);
        let sequencer = Sequencer::new(config, port, scheduler, seed)?;
        let initial = StateChange {
            at: Millis::ZERO,
            state: sequencer.state(),
        };
        Ok(Self {
            sequencer,
            script: VecDeque::new(),
            auto_advance: None,
            changes: vec![initial],
            trace: vec![TraceEntry::State {
                at: initial.at,
                state: initial.state,
            }],
            calls_seen: 0,
        })
    }

    /// Tap the screen `delay` after the gate opens.
    pub fn with_auto_advance(mut self, delay: Millis) -> Self {
        self.auto_advance = Some(delay);
        self
    }

    pub fn with_script(mut self, steps: impl IntoIterator<Item = ScriptStep>) -> Self {
        for step in steps {
            self.push(step.at, step.action);
        }
        self
    }

    /// Queue an action. Steps at equal times run in the order they were queued.
    pub fn push(&mut self, at: Millis, action: ScriptAction) {
        let idx = self.script.partition_point(|s| s.at <= at);
        self.script.insert(idx, ScriptStep { at, action });
    }

    pub fn start(&mut self) {
        self.sequencer.start();
        self.observe();
    }

    pub fn now(&self) -> Millis {
        self.sequencer.scheduler().now()
    }

    pub fn sequencer(&self) -> &Sequencer<RecordingPort, VirtualScheduler> {
        &self.sequencer
    }

    pub fn sequencer_mut(&mut self) -> &mut Sequencer<RecordingPort, VirtualScheduler> {
        &mut self.sequencer
    }

    pub fn port(&self) -> &RecordingPort {
        self.sequencer.port()
    }

    pub fn state(&self) -> TimelineState {
        self.sequencer.state()
    }

    pub fn state_changes(&self) -> &[StateChange] {
        &self.changes
    }

    pub fn entered_at(&self, state: TimelineState) -> Option<Millis> {
        self.changes.iter().find(|c| c.state == state).map(|c| c.at)
    }

    pub fn trace(&self) -> &[TraceEntry] {
        &self.trace
    }

    /// Port calls made at exactly `at`.
    pub fn calls_at(&self, at: Millis) -> impl Iterator<Item = &PortCall> {
        self.trace.iter().filter_map(move |e| match e {
            TraceEntry::Call { at: t, call } if *t == at => Some(call),
            _ => None,
        })
    }

    /// Process everything due up to and including `until`, then park the clock there.
    pub fn run_until(&mut self, until: Millis) {
        while self.step(until) {}
        self.sequencer.scheduler_mut().advance_to(until);
    }

    /// Run until nothing is left to do, failing if the timeline has not completed by `limit`.
    /// Returns the time the timeline completed.
    #[tracing::instrument(skip(self))]
    pub fn run_to_completion(&mut self, limit: Millis) -> SerenadeResult<Millis> {
        while self.step(limit) {}
        self.entered_at(TimelineState::Complete).ok_or_else(|| {
            SerenadeError::simulation(format!(
                "timeline stopped in '{}' at {} (limit {limit})",
                self.state(),
                self.now()
            ))
        })
    }

    fn step(&mut self, until: Millis) -> bool {
        let next_wake = self
            .sequencer
            .scheduler()
            .peek_due()
            .filter(|t| *t <= until);
        let next_step = self.script.front().map(|s| s.at).filter(|t| *t <= until);

        let run_script = match (next_wake, next_step) {
            (None, None) => return false,
            (Some(w), Some(s)) => s < w,
            (None, Some(_)) => true,
            (Some(_), None) => false,
        };

        if run_script {
            let Some(step) = self.script.pop_front() else {
                return false;
            };
            self.sequencer.scheduler_mut().advance_to(step.at);
            self.trace.push(TraceEntry::Action {
                at: self.now(),
                action: step.action,
            });
            self.perform(step.action);
        } else {
            let Some((_, wake)) = self.sequencer.scheduler_mut().pop_due(until) else {
                return false;
            };
            self.sequencer.on_wake(wake);
        }
        self.observe();
        true
    }

    fn perform(&mut self, action: ScriptAction) {
        match action {
            ScriptAction::Input { event } => {
                self.sequencer.handle_input(event);
            }
            ScriptAction::SetViewport { width } => {
                self.sequencer.port_mut().viewport = width;
                self.sequencer.handle_input(InputEvent::Resize);
            }
            ScriptAction::Advance => {
                self.sequencer.request_advance();
            }
            ScriptAction::ToggleMusic => {
                self.sequencer.toggle_music();
            }
        }
    }

    fn observe(&mut self) {
        let at = self.now();
        let state = self.sequencer.state();
        let last = self.changes.last().map(|c| c.state);
        if last != Some(state) {
            self.changes.push(StateChange { at, state });
            self.trace.push(TraceEntry::State { at, state });
            if state == TimelineState::AwaitingAdvance
                && let Some(delay) = self.auto_advance
            {
                self.push(at.after(delay), ScriptAction::Advance);
            }
        }

        // `calls_seen` counts every call ever recorded; the log may have been drained since.
        let port = self.sequencer.port();
        let recorded = port.calls_recorded();
        let calls = port.calls();
        let first_new = calls
            .len()
            .saturating_sub(recorded.saturating_sub(self.calls_seen));
        for call in &calls[first_new..] {
            self.trace.push(TraceEntry::Call {
                at,
                call: call.clone(),
            });
        }
        self.calls_seen = recorded;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/simulation.rs"]
mod tests;
