use crate::{
    foundation::{core::HapticPattern, error::best_effort},
    present::port::PresentationPort,
};

/// Background music intent.
///
/// The flag records what the user asked for, not what the device is doing: a refused play
/// request still flips it. Visibility changes reconcile the two without touching the flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MusicToggle {
    playing: bool,
}

impl MusicToggle {
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Flip intent, ask the device to follow, and return the new intent.
    pub fn toggle<P: PresentationPort>(&mut self, port: &mut P) -> bool {
        let next = !self.playing;
        best_effort(port.set_audio_playing(next), "audio playback");
        port.set_music_indicator(next);
        self.playing = next;
        best_effort(port.vibrate(HapticPattern::Light), "haptic");
        tracing::debug!(playing = next, "music toggled");
        next
    }

    /// Pause while the page is hidden, resume when it comes back, if music is wanted.
    pub fn on_visibility_change<P: PresentationPort>(&mut self, hidden: bool, port: &mut P) {
        if !self.playing {
            return;
        }
        best_effort(port.set_audio_playing(!hidden), "audio playback");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/audio/toggle.rs"]
mod tests;
