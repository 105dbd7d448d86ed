//! Narrow interface between the sequencer and whatever draws the page.
//!
//! The sequencer never touches a rendering API directly. A browser host implements
//! [`PresentationPort`] over the DOM; tests and the CLI use [`RecordingPort`].

use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::{Bounds, HapticPattern, TextSink, ViewportWidth},
        error::PortError,
    },
    present::decor::{ParticleSpec, SparkleSpec},
};

/// Character-level text output. Kept separate so the typewriter only sees this much.
pub trait TextSurface {
    fn clear_text(&mut self, sink: TextSink);
    fn append_char(&mut self, sink: TextSink, ch: char);
}

/// Every side effect the sequencer can request.
///
/// Fallible methods are best-effort capabilities: callers log the error and move on.
pub trait PresentationPort: TextSurface {
    /// Current layout viewport width. Queried on every device-dependent decision.
    fn viewport_width(&self) -> ViewportWidth;

    fn mark_typing_done(&mut self, sink: TextSink);
    fn reveal_continue_affordance(&mut self);
    fn set_hint_visible(&mut self, visible: bool);
    fn fade_out_intro(&mut self);
    /// Hide the intro region, show the message region, scroll to top.
    fn swap_region(&mut self);
    fn mark_glow_complete(&mut self);
    fn reveal_footer(&mut self);

    fn spawn_particles(&mut self, particles: &[ParticleSpec]);
    fn clear_particles(&mut self);

    /// Size of the paragraph region, used to place sparkles.
    fn paragraph_bounds(&self) -> Result<Bounds, PortError>;
    fn spawn_sparkles(&mut self, batch: u64, sparkles: &[SparkleSpec]);
    fn remove_sparkles(&mut self, batch: u64);

    fn set_audio_volume(&mut self, volume: f64);
    /// Start or stop playback. Starting may be refused by the environment.
    fn set_audio_playing(&mut self, playing: bool) -> Result<(), PortError>;
    fn set_music_indicator(&mut self, on: bool);

    fn vibrate(&mut self, pattern: HapticPattern) -> Result<(), PortError>;
}

/// One recorded request, in the order it was made.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum PortCall {
    ClearText { sink: TextSink },
    AppendChar { sink: TextSink, ch: char },
    MarkTypingDone { sink: TextSink },
    RevealContinue,
    SetHintVisible { visible: bool },
    FadeOutIntro,
    SwapRegion,
    MarkGlowComplete,
    RevealFooter,
    SpawnParticles { count: usize },
    ClearParticles,
    SpawnSparkles { batch: u64, count: usize },
    RemoveSparkles { batch: u64 },
    SetAudioVolume { volume: f64 },
    SetAudioPlaying { playing: bool },
    SetMusicIndicator { on: bool },
    Vibrate { pattern: HapticPattern },
}

/// In-memory port that records every call and simulates capability failures.
#[derive(Clone, Debug)]
pub struct RecordingPort {
    pub viewport: ViewportWidth,
    pub vibration_supported: bool,
    pub autoplay_allowed: bool,
    /// `None` makes [`PresentationPort::paragraph_bounds`] fail.
    pub bounds: Option<Bounds>,
    calls: Vec<PortCall>,
    taken: usize,
    texts: BTreeMap<TextSink, String>,
    particles: usize,
    sparkles: BTreeMap<u64, usize>,
    audio_playing: bool,
}

impl RecordingPort {
    pub fn new(viewport: ViewportWidth) -> Self {
        Self {
            viewport,
            vibration_supported: true,
            autoplay_allowed: true,
            bounds: Some(Bounds::new(640.0, 320.0)),
            calls: Vec::new(),
            taken: 0,
            texts: BTreeMap::new(),
            particles: 0,
            sparkles: BTreeMap::new(),
            audio_playing: false,
        }
    }

    pub fn without_vibration(mut self) -> Self {
        self.vibration_supported = false;
        self
    }

    pub fn deny_autoplay(mut self) -> Self {
        self.autoplay_allowed = false;
        self
    }

    pub fn without_layout(mut self) -> Self {
        self.bounds = None;
        self
    }

    pub fn calls(&self) -> &[PortCall] {
        &self.calls
    }

    pub fn take_calls(&mut self) -> Vec<PortCall> {
        self.taken += self.calls.len();
        std::mem::take(&mut self.calls)
    }

    /// Calls recorded since construction, including ones already taken.
    pub fn calls_recorded(&self) -> usize {
        self.taken + self.calls.len()
    }

    pub fn count(&self, pred: impl Fn(&PortCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    pub fn text(&self, sink: TextSink) -> &str {
        self.texts.get(&sink).map(String::as_str).unwrap_or("")
    }

    /// Playback state as the device sees it (not the user's intent).
    pub fn audio_playing(&self) -> bool {
        self.audio_playing
    }

    pub fn live_particles(&self) -> usize {
        self.particles
    }

    pub fn live_sparkles(&self) -> usize {
        self.sparkles.values().sum()
    }
}

impl TextSurface for RecordingPort {
    fn clear_text(&mut self, sink: TextSink) {
        self.texts.insert(sink, String::new());
        self.calls.push(PortCall::ClearText { sink });
    }

    fn append_char(&mut self, sink: TextSink, ch: char) {
        self.texts.entry(sink).or_default().push(ch);
        self.calls.push(PortCall::AppendChar { sink, ch });
    }
}

impl PresentationPort for RecordingPort {
    fn viewport_width(&self) -> ViewportWidth {
        self.viewport
    }

    fn mark_typing_done(&mut self, sink: TextSink) {
        self.calls.push(PortCall::MarkTypingDone { sink });
    }

    fn reveal_continue_affordance(&mut self) {
        self.calls.push(PortCall::RevealContinue);
    }

    fn set_hint_visible(&mut self, visible: bool) {
        self.calls.push(PortCall::SetHintVisible { visible });
    }

    fn fade_out_intro(&mut self) {
        self.calls.push(PortCall::FadeOutIntro);
    }

    fn swap_region(&mut self) {
        self.calls.push(PortCall::SwapRegion);
    }

    fn mark_glow_complete(&mut self) {
        self.calls.push(PortCall::MarkGlowComplete);
    }

    fn reveal_footer(&mut self) {
        self.calls.push(PortCall::RevealFooter);
    }

    fn spawn_particles(&mut self, particles: &[ParticleSpec]) {
        self.particles += particles.len();
        self.calls.push(PortCall::SpawnParticles {
            count: particles.len(),
        });
    }

    fn clear_particles(&mut self) {
        self.particles = 0;
        self.calls.push(PortCall::ClearParticles);
    }

    fn paragraph_bounds(&self) -> Result<Bounds, PortError> {
        self.bounds
            .ok_or_else(|| PortError::Layout("paragraph region not laid out".to_string()))
    }

    fn spawn_sparkles(&mut self, batch: u64, sparkles: &[SparkleSpec]) {
        self.sparkles.insert(batch, sparkles.len());
        self.calls.push(PortCall::SpawnSparkles {
            batch,
            count: sparkles.len(),
        });
    }

    fn remove_sparkles(&mut self, batch: u64) {
        self.sparkles.remove(&batch);
        self.calls.push(PortCall::RemoveSparkles { batch });
    }

    fn set_audio_volume(&mut self, volume: f64) {
        self.calls.push(PortCall::SetAudioVolume { volume });
    }

    fn set_audio_playing(&mut self, playing: bool) -> Result<(), PortError> {
        self.calls.push(PortCall::SetAudioPlaying { playing });
        if playing && !self.autoplay_allowed {
            return Err(PortError::Rejected(
                "playback requires a user gesture".to_string(),
            ));
        }
        self.audio_playing = playing;
        Ok(())
    }

    fn set_music_indicator(&mut self, on: bool) {
        self.calls.push(PortCall::SetMusicIndicator { on });
    }

    fn vibrate(&mut self, pattern: HapticPattern) -> Result<(), PortError> {
        if !self.vibration_supported {
            return Err(PortError::Unsupported("vibrate"));
        }
        self.calls.push(PortCall::Vibrate { pattern });
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/present/port.rs"]
mod tests;
