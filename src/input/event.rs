//! Host input, already reduced to what the sequencer cares about.

/// What a click landed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HitTarget {
    /// The explicit continue button.
    ContinueButton,
    /// The music on/off control.
    MusicToggle,
    /// Anywhere else inside the intro region.
    IntroRegion,
    /// Outside every region of interest.
    Elsewhere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCode {
    Space,
    Enter,
    KeyM,
    Other,
}

impl KeyCode {
    /// Map a DOM `KeyboardEvent.code` string.
    pub fn from_dom_code(code: &str) -> Self {
        match code {
            "Space" => Self::Space,
            "Enter" => Self::Enter,
            "KeyM" => Self::KeyM,
            _ => Self::Other,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "input", rename_all = "snake_case")]
pub enum InputEvent {
    Click { target: HitTarget },
    Key { code: KeyCode },
    /// The viewport changed size; the new width is read from the port.
    Resize,
    VisibilityChanged { hidden: bool },
}

/// Whether the host should suppress its default handling of the event (e.g. Space scrolling).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputOutcome {
    Handled,
    Ignored,
}

impl InputOutcome {
    pub fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/event.rs"]
mod tests;
