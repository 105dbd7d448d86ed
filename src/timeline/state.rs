use std::fmt;

/// Where the presentation is.
///
/// States only ever move forward, in declaration order.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TimelineState {
    Intro,
    TitleTyping,
    AwaitingAdvance,
    Transitioning,
    ParagraphTyping,
    Complete,
}

impl TimelineState {
    pub const ALL: [TimelineState; 6] = [
        Self::Intro,
        Self::TitleTyping,
        Self::AwaitingAdvance,
        Self::Transitioning,
        Self::ParagraphTyping,
        Self::Complete,
    ];

    pub fn is_terminal(self) -> bool {
        self == Self::Complete
    }
}

impl fmt::Display for TimelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::TitleTyping => "title_typing",
            Self::AwaitingAdvance => "awaiting_advance",
            Self::Transitioning => "transitioning",
            Self::ParagraphTyping => "paragraph_typing",
            Self::Complete => "complete",
        };
        f.write_str(s)
    }
}

/// Something that happened which may move the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimelineEvent {
    IntroElapsed,
    TitleTyped,
    AdvanceRequested,
    ParagraphStarted,
    ParagraphTyped,
}

/// Pure transition function.
///
/// An event that does not apply to `state` leaves it unchanged; the caller compares the result
/// with the input to learn whether anything happened.
pub fn transition(state: TimelineState, event: TimelineEvent) -> TimelineState {
    use TimelineEvent as E;
    use TimelineState as S;

    match (state, event) {
        (S::Intro, E::IntroElapsed) => S::TitleTyping,
        (S::TitleTyping, E::TitleTyped) => S::AwaitingAdvance,
        (S::AwaitingAdvance, E::AdvanceRequested) => S::Transitioning,
        (S::Transitioning, E::ParagraphStarted) => S::ParagraphTyping,
        (S::ParagraphTyping, E::ParagraphTyped) => S::Complete,
        (s, _) => s,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/state.rs"]
mod tests;
