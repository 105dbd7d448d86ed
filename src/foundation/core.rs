use std::fmt;

/// Milliseconds on the presentation clock.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero duration / clock origin.
    pub const ZERO: Millis = Millis(0);

    /// Saturating addition of a delay.
    pub fn after(self, delay: Millis) -> Millis {
        Millis(self.0.saturating_add(delay.0))
    }

    /// Elapsed time since `earlier` (zero if `earlier` is in the future).
    pub fn since(self, earlier: Millis) -> Millis {
        Millis(self.0.saturating_sub(earlier.0))
    }

    /// Apply a signed offset, clamping at zero.
    pub fn offset(self, delta: i64) -> Millis {
        if delta >= 0 {
            Millis(self.0.saturating_add(delta as u64))
        } else {
            Millis(self.0.saturating_sub(delta.unsigned_abs()))
        }
    }
}

impl fmt::Display for Millis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Viewport width in CSS pixels.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct ViewportWidth(pub u32);

/// Text region a typewriter job writes into.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TextSink {
    /// The greeting headline on the intro region.
    Title,
    /// The long message on the message region.
    Paragraph,
}

/// Haptic pulse strength.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HapticPattern {
    /// Button feedback, completion.
    Light,
    /// Advancing past the gate.
    Medium,
    /// Unused by the sequence, available to hosts.
    Heavy,
}

impl HapticPattern {
    /// Vibration pulse lengths in milliseconds.
    pub fn pulses_ms(self) -> &'static [u32] {
        match self {
            Self::Light => &[10],
            Self::Medium => &[20],
            Self::Heavy => &[30],
        }
    }
}

/// Axis-aligned region size reported by a layout query.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Finite, strictly positive extent on both axes.
    pub fn is_usable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
