use crate::foundation::{
    core::{Millis, ViewportWidth},
    error::{SerenadeError, SerenadeResult},
};

/// Widths strictly below this are treated as phones.
pub const COMPACT_THRESHOLD: ViewportWidth = ViewportWidth(600);

/// Coarse screen-size bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Compact,
    Wide,
}

impl DeviceClass {
    pub fn classify(width: ViewportWidth, threshold: ViewportWidth) -> Self {
        if width < threshold {
            Self::Compact
        } else {
            Self::Wide
        }
    }
}

/// Timing and count preset for one device class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeviceProfile {
    /// Base per-character delay for the title.
    pub typing_speed_ms: Millis,
    /// Base per-character delay for the paragraph.
    pub paragraph_typing_speed_ms: Millis,
    /// Ambient particles kept on screen.
    pub particle_count: usize,
    /// Sparkles in the completion burst.
    pub sparkle_count: usize,
    /// Heart intro duration before the title starts typing.
    pub intro_ms: Millis,
    /// Extra pause after `.`, `,` and `—`.
    pub punctuation_pause_ms: Millis,
    /// Whether the "tap anywhere" hint is shown at the gate.
    pub tap_hint: bool,
}

impl DeviceProfile {
    pub const COMPACT: DeviceProfile = DeviceProfile {
        typing_speed_ms: Millis(55),
        paragraph_typing_speed_ms: Millis(32),
        particle_count: 6,
        sparkle_count: 10,
        intro_ms: Millis(2200),
        punctuation_pause_ms: Millis(80),
        tap_hint: true,
    };

    pub const WIDE: DeviceProfile = DeviceProfile {
        typing_speed_ms: Millis(65),
        paragraph_typing_speed_ms: Millis(38),
        particle_count: 12,
        sparkle_count: 15,
        intro_ms: Millis(2600),
        punctuation_pause_ms: Millis(100),
        tap_hint: false,
    };

    pub fn validate(&self, name: &str) -> SerenadeResult<()> {
        if self.typing_speed_ms.0 == 0 || self.paragraph_typing_speed_ms.0 == 0 {
            return Err(SerenadeError::validation(format!(
                "{name}: typing speeds must be > 0ms"
            )));
        }
        if self.intro_ms.0 == 0 {
            return Err(SerenadeError::validation(format!(
                "{name}: intro_ms must be > 0"
            )));
        }
        Ok(())
    }
}

/// Field-wise override of a built-in preset, as written in config JSON.
#[derive(Clone, Copy, Debug, Default, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileOverride {
    typing_speed_ms: Option<Millis>,
    paragraph_typing_speed_ms: Option<Millis>,
    particle_count: Option<usize>,
    sparkle_count: Option<usize>,
    intro_ms: Option<Millis>,
    punctuation_pause_ms: Option<Millis>,
    tap_hint: Option<bool>,
}

impl ProfileOverride {
    fn apply(self, base: DeviceProfile) -> DeviceProfile {
        DeviceProfile {
            typing_speed_ms: self.typing_speed_ms.unwrap_or(base.typing_speed_ms),
            paragraph_typing_speed_ms: self
                .paragraph_typing_speed_ms
                .unwrap_or(base.paragraph_typing_speed_ms),
            particle_count: self.particle_count.unwrap_or(base.particle_count),
            sparkle_count: self.sparkle_count.unwrap_or(base.sparkle_count),
            intro_ms: self.intro_ms.unwrap_or(base.intro_ms),
            punctuation_pause_ms: self.punctuation_pause_ms.unwrap_or(base.punctuation_pause_ms),
            tap_hint: self.tap_hint.unwrap_or(base.tap_hint),
        }
    }
}

fn compact_over_preset<'de, D>(de: D) -> Result<DeviceProfile, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let patch = <ProfileOverride as serde::Deserialize>::deserialize(de)?;
    Ok(patch.apply(DeviceProfile::COMPACT))
}

fn wide_over_preset<'de, D>(de: D) -> Result<DeviceProfile, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let patch = <ProfileOverride as serde::Deserialize>::deserialize(de)?;
    Ok(patch.apply(DeviceProfile::WIDE))
}

/// The two presets plus the width that separates them.
///
/// In JSON each profile may be partial; missing fields fall back to the matching built-in
/// preset, not to the other class.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DevicePresets {
    pub compact_threshold: ViewportWidth,
    #[serde(deserialize_with = "compact_over_preset")]
    pub compact: DeviceProfile,
    #[serde(deserialize_with = "wide_over_preset")]
    pub wide: DeviceProfile,
}

impl Default for DevicePresets {
    fn default() -> Self {
        Self {
            compact_threshold: COMPACT_THRESHOLD,
            compact: DeviceProfile::COMPACT,
            wide: DeviceProfile::WIDE,
        }
    }
}

impl DevicePresets {
    pub fn class(&self, width: ViewportWidth) -> DeviceClass {
        DeviceClass::classify(width, self.compact_threshold)
    }

    /// Pick the preset for `width`. Never cached: callers ask again at every decision so a
    /// rotation mid-sequence affects everything not yet committed.
    pub fn resolve(&self, width: ViewportWidth) -> DeviceProfile {
        match self.class(width) {
            DeviceClass::Compact => self.compact,
            DeviceClass::Wide => self.wide,
        }
    }

    pub fn validate(&self) -> SerenadeResult<()> {
        if self.compact_threshold.0 == 0 {
            return Err(SerenadeError::validation(
                "compact_threshold must be > 0",
            ));
        }
        self.compact.validate("compact")?;
        self.wide.validate("wide")
    }
}

/// Resolve the built-in preset for a viewport width.
pub fn resolve_device_profile(width: ViewportWidth) -> DeviceProfile {
    DevicePresets::default().resolve(width)
}

#[cfg(test)]
#[path = "../../tests/unit/device/profile.rs"]
mod tests;
