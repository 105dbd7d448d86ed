use super::*;

const EVENTS: [TimelineEvent; 5] = [
    TimelineEvent::IntroElapsed,
    TimelineEvent::TitleTyped,
    TimelineEvent::AdvanceRequested,
    TimelineEvent::ParagraphStarted,
    TimelineEvent::ParagraphTyped,
];

#[test]
fn happy_path_walks_every_state_once() {
    let mut s = TimelineState::Intro;
    let mut seen = vec![s];
    for e in EVENTS {
        s = transition(s, e);
        seen.push(s);
    }
    assert_eq!(seen, TimelineState::ALL.to_vec());
    assert!(s.is_terminal());
}

#[test]
fn no_event_ever_moves_backwards() {
    for s in TimelineState::ALL {
        for e in EVENTS {
            assert!(transition(s, e) >= s, "{s} + {e:?}");
        }
    }
}

#[test]
fn each_state_has_exactly_one_exit() {
    for s in TimelineState::ALL {
        let exits = EVENTS.iter().filter(|&&e| transition(s, e) != s).count();
        let expected = usize::from(!s.is_terminal());
        assert_eq!(exits, expected, "{s}");
    }
}

#[test]
fn advance_outside_the_gate_is_a_no_op() {
    for s in TimelineState::ALL {
        if s == TimelineState::AwaitingAdvance {
            continue;
        }
        assert_eq!(transition(s, TimelineEvent::AdvanceRequested), s);
    }
}

#[test]
fn paragraph_cannot_start_before_the_title_finishes() {
    assert_eq!(
        transition(TimelineState::TitleTyping, TimelineEvent::ParagraphStarted),
        TimelineState::TitleTyping
    );
    assert_eq!(
        transition(TimelineState::Intro, TimelineEvent::ParagraphStarted),
        TimelineState::Intro
    );
}
