//! Serenade drives a short, timed greeting presentation.
//!
//! The presentation is a fixed sequence: a heart intro, a typewriter-revealed title, a gate that
//! waits for a tap, click, or key, a fade into a typewriter-revealed paragraph, and a burst of
//! completion effects. Around it run a few independent concerns: ambient particles that follow
//! the viewport size, a background-music toggle, and haptic feedback.
//!
//! # Architecture
//!
//! 1. **Transition**: [`transition`] is a pure `(TimelineState, TimelineEvent) -> TimelineState`
//!    function. States only move forward.
//! 2. **Drive**: [`Sequencer`] runs entry actions for each new state and turns every delay into a
//!    [`Wake`] handed to an injected [`Scheduler`]. Late wakes re-check the state and drop out.
//! 3. **Present**: every side effect goes through [`PresentationPort`]. Failures of optional
//!    capabilities (vibration, autoplay, layout queries) are logged and skipped.
//!
//! Timing and counts come from a [`DeviceProfile`] picked by viewport width on every decision,
//! so rotating the device mid-sequence affects whatever has not started yet.
//!
//! [`Simulation`] runs the whole thing on a virtual clock with a recording port, which is how the
//! tests and the `serenade` binary exercise it.
#![forbid(unsafe_code)]

mod audio;
mod config;
mod device;
mod foundation;
mod input;
mod present;
mod schedule;
mod sim;
mod timeline;
mod typewriter;

pub use audio::toggle::MusicToggle;
pub use config::model::{DEFAULT_PARAGRAPH, DEFAULT_TITLE, SequenceConfig, StageTimings};
pub use device::profile::{
    COMPACT_THRESHOLD, DeviceClass, DevicePresets, DeviceProfile, resolve_device_profile,
};
pub use foundation::core::{Bounds, HapticPattern, Millis, TextSink, ViewportWidth};
pub use foundation::error::{PortError, SerenadeError, SerenadeResult};
pub use foundation::rng::Rng64;
pub use input::event::{HitTarget, InputEvent, InputOutcome, KeyCode};
pub use present::decor::{
    ParticleField, ParticleKind, ParticleSpec, SparkleSpec, plan_particles, plan_sparkles,
};
pub use present::port::{PortCall, PresentationPort, RecordingPort, TextSurface};
pub use schedule::clock::{Scheduler, VirtualScheduler, Wake};
pub use sim::simulation::{ScriptAction, ScriptStep, Simulation, StateChange, TraceEntry};
pub use timeline::latch::AdvanceLatch;
pub use timeline::sequencer::Sequencer;
pub use timeline::state::{TimelineEvent, TimelineState, transition};
pub use typewriter::job::{PUNCTUATION, TypeStep, TypeTiming, Typewriter, TypewriterJob};
