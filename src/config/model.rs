use std::{fs::File, io::BufReader, path::Path};

use crate::{
    device::profile::{DeviceProfile, DevicePresets},
    foundation::{
        core::{Millis, ViewportWidth},
        error::{SerenadeError, SerenadeResult},
    },
};

pub const DEFAULT_TITLE: &str = "Happy Valentine's Day ❤️";

pub const DEFAULT_PARAGRAPH: &str = "Every moment with you feels like a beautiful dream I never want to wake up from. Your presence brings a quiet warmth to my days, and your love fills my heart in ways words cannot capture. You are my favorite hello and my hardest goodbye. In this world of fleeting moments, my love for you remains constant and true. Today and always, you are the calm in my chaos, the warmth in my silence, and the love of my life.";

/// Device-independent delays between the staged steps of the sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StageTimings {
    /// Title done → continue button visible.
    pub continue_reveal_ms: Millis,
    /// Continue button visible → tap hint visible (compact only).
    pub hint_reveal_ms: Millis,
    /// Advance → intro region swapped for the message region.
    pub fade_out_ms: Millis,
    /// Region swap → paragraph typewriter starts.
    pub paragraph_start_ms: Millis,
    /// Paragraph done → footer visible.
    pub footer_reveal_ms: Millis,
    /// Animation delay step between consecutive sparkles.
    pub sparkle_stagger_ms: Millis,
    /// Sparkle batch lifetime before removal.
    pub sparkle_lifetime_ms: Millis,
    /// Quiet period after the last resize before particles are resynced.
    pub resize_debounce_ms: Millis,
    /// Half-width of the uniform per-character jitter.
    pub jitter_ms: u32,
    /// Animation frame period of the host.
    pub frame_interval_ms: Millis,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            continue_reveal_ms: Millis(500),
            hint_reveal_ms: Millis(800),
            fade_out_ms: Millis(800),
            paragraph_start_ms: Millis(400),
            footer_reveal_ms: Millis(1000),
            sparkle_stagger_ms: Millis(100),
            sparkle_lifetime_ms: Millis(2200),
            resize_debounce_ms: Millis(300),
            jitter_ms: 7,
            frame_interval_ms: Millis(16),
        }
    }
}

/// Everything the sequencer needs besides its collaborators.
///
/// Every field has a default so a JSON file only has to name what it overrides:
///
/// ```
/// let cfg = serenade::SequenceConfig::from_json_str(r#"{ "title": "Hi" }"#).unwrap();
/// assert_eq!(cfg.title, "Hi");
/// assert_eq!(cfg.presets.compact_threshold.0, 600);
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequenceConfig {
    pub title: String,
    pub paragraph: String,
    pub presets: DevicePresets,
    pub timings: StageTimings,
    /// Background music volume in `[0, 1]`.
    pub music_volume: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            paragraph: DEFAULT_PARAGRAPH.to_string(),
            presets: DevicePresets::default(),
            timings: StageTimings::default(),
            music_volume: 0.2,
        }
    }
}

impl SequenceConfig {
    pub fn from_json_str(s: &str) -> SerenadeResult<Self> {
        let cfg: SequenceConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load_json(path: &Path) -> SerenadeResult<Self> {
        let f = File::open(path).map_err(|e| {
            SerenadeError::config(format!("open config '{}': {e}", path.display()))
        })?;
        let cfg: SequenceConfig = serde_json::from_reader(BufReader::new(f))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> SerenadeResult<()> {
        if self.title.is_empty() {
            return Err(SerenadeError::validation("title must be non-empty"));
        }
        if self.paragraph.is_empty() {
            return Err(SerenadeError::validation("paragraph must be non-empty"));
        }
        if !self.music_volume.is_finite() || !(0.0..=1.0).contains(&self.music_volume) {
            return Err(SerenadeError::validation(
                "music_volume must be finite and within [0, 1]",
            ));
        }
        if self.timings.frame_interval_ms.0 == 0 {
            return Err(SerenadeError::validation(
                "timings.frame_interval_ms must be > 0",
            ));
        }
        for (name, profile) in [
            ("compact", &self.presets.compact),
            ("wide", &self.presets.wide),
        ] {
            if u64::from(self.timings.jitter_ms) >= profile.paragraph_typing_speed_ms.0 {
                return Err(SerenadeError::validation(format!(
                    "timings.jitter_ms must be below {name}.paragraph_typing_speed_ms"
                )));
            }
            if u64::from(self.timings.jitter_ms) >= profile.typing_speed_ms.0 {
                return Err(SerenadeError::validation(format!(
                    "timings.jitter_ms must be below {name}.typing_speed_ms"
                )));
            }
        }
        self.presets.validate()
    }

    pub fn profile_for(&self, width: ViewportWidth) -> DeviceProfile {
        self.presets.resolve(width)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
