use super::*;
use crate::{
    foundation::core::{Bounds, ViewportWidth},
    present::port::{PortCall, RecordingPort},
    schedule::clock::VirtualScheduler,
};

type TestSequencer = Sequencer<RecordingPort, VirtualScheduler>;

fn sequencer_with(port: RecordingPort) -> TestSequencer {
    let mut s = Sequencer::new(
        SequenceConfig::default(),
        port,
        VirtualScheduler::new(Millis(16)),
        1,
    )
    .unwrap();
    s.start();
    s
}

fn sequencer(width: u32) -> TestSequencer {
    sequencer_with(RecordingPort::new(ViewportWidth(width)))
}

fn run_until(s: &mut TestSequencer, t: u64) {
    while let Some((_, wake)) = s.scheduler_mut().pop_due(Millis(t)) {
        s.on_wake(wake);
    }
    s.scheduler_mut().advance_to(Millis(t));
}

/// Run until `target` is entered and return the time it happened.
fn run_to_state(s: &mut TestSequencer, target: TimelineState) -> Millis {
    while s.state() != target {
        let (_, wake) = s
            .scheduler_mut()
            .pop_due(Millis(120_000))
            .expect("timeline stalled");
        s.on_wake(wake);
    }
    s.scheduler().now()
}

fn drain(s: &mut TestSequencer) {
    run_until(s, 120_000);
}

#[test]
fn compact_intro_lasts_2200ms() {
    let mut s = sequencer(375);
    run_until(&mut s, 2199);
    assert_eq!(s.state(), TimelineState::Intro);
    run_until(&mut s, 2200);
    assert_eq!(s.state(), TimelineState::TitleTyping);
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::ClearText { sink: TextSink::Title }),
        1
    );
    // First character waits for the next animation frame.
    assert_eq!(s.port().text(TextSink::Title), "");
}

#[test]
fn wide_intro_lasts_2600ms() {
    let mut s = sequencer(1024);
    assert_eq!(run_to_state(&mut s, TimelineState::TitleTyping), Millis(2600));
}

#[test]
fn start_spawns_particles_and_sets_volume_once() {
    let mut s = sequencer(375);
    s.start();
    assert_eq!(s.particles_spawned(), 6);
    assert_eq!(
        s.port().calls(),
        &[
            PortCall::SpawnParticles { count: 6 },
            PortCall::SetAudioVolume { volume: 0.2 },
        ]
    );
    assert_eq!(s.scheduler().pending(), 1);
}

#[test]
fn title_is_fully_typed_before_the_gate_opens() {
    let mut s = sequencer(375);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    assert_eq!(s.port().text(TextSink::Title), "Happy Valentine's Day ❤️");
    assert!(s.is_advance_armed());
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::MarkTypingDone { sink: TextSink::Title }),
        1
    );
}

#[test]
fn advance_is_ignored_until_the_gate_opens() {
    let mut s = sequencer(375);
    assert!(!s.request_advance());
    run_until(&mut s, 2400);
    assert_eq!(s.state(), TimelineState::TitleTyping);
    assert!(!s.request_advance());
    assert_eq!(s.state(), TimelineState::TitleTyping);

    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    assert!(s.request_advance());
    assert_eq!(s.state(), TimelineState::Transitioning);
}

#[test]
fn repeated_advance_runs_the_transition_once() {
    let mut s = sequencer(375);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);

    assert!(s.request_advance());
    for _ in 0..10 {
        assert!(!s.request_advance());
    }
    assert_eq!(
        s.handle_input(InputEvent::Key {
            code: KeyCode::Enter
        }),
        InputOutcome::Ignored
    );
    drain(&mut s);

    let port = s.port();
    assert_eq!(port.count(|c| *c == PortCall::FadeOutIntro), 1);
    assert_eq!(port.count(|c| *c == PortCall::SwapRegion), 1);
    assert_eq!(
        port.count(|c| *c == PortCall::ClearText {
            sink: TextSink::Paragraph
        }),
        1
    );
    assert_eq!(
        port.count(|c| *c
            == PortCall::Vibrate {
                pattern: HapticPattern::Medium
            }),
        1
    );
    assert_eq!(s.state(), TimelineState::Complete);
}

#[test]
fn transition_stages_are_800_then_400ms_apart() {
    let mut s = sequencer(1024);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    let t0 = s.scheduler().now();
    assert!(s.request_advance());

    run_until(&mut s, t0.0 + 799);
    assert_eq!(s.port().count(|c| *c == PortCall::SwapRegion), 0);
    run_until(&mut s, t0.0 + 800);
    assert_eq!(s.port().count(|c| *c == PortCall::SwapRegion), 1);
    assert_eq!(s.state(), TimelineState::Transitioning);
    run_until(&mut s, t0.0 + 1199);
    assert_eq!(s.state(), TimelineState::Transitioning);
    run_until(&mut s, t0.0 + 1200);
    assert_eq!(s.state(), TimelineState::ParagraphTyping);
}

#[test]
fn continue_reveal_is_dropped_once_the_gate_is_passed() {
    let mut s = sequencer(375);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    let outcome = s.handle_input(InputEvent::Key {
        code: KeyCode::Space,
    });
    assert_eq!(outcome, InputOutcome::Handled);
    drain(&mut s);
    assert_eq!(s.port().count(|c| *c == PortCall::RevealContinue), 0);
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::SetHintVisible { visible: true }),
        0
    );
}

#[test]
fn compact_gate_reveals_continue_then_hint() {
    let mut s = sequencer(375);
    let t0 = run_to_state(&mut s, TimelineState::AwaitingAdvance);
    run_until(&mut s, t0.0 + 499);
    assert_eq!(s.port().count(|c| *c == PortCall::RevealContinue), 0);
    run_until(&mut s, t0.0 + 500);
    assert_eq!(s.port().count(|c| *c == PortCall::RevealContinue), 1);
    run_until(&mut s, t0.0 + 1299);
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::SetHintVisible { visible: true }),
        0
    );
    run_until(&mut s, t0.0 + 1300);
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::SetHintVisible { visible: true }),
        1
    );
}

#[test]
fn rotation_before_the_continue_reveal_changes_the_hint_decision() {
    let mut s = sequencer(1024);
    let t0 = run_to_state(&mut s, TimelineState::AwaitingAdvance);
    s.port_mut().viewport = ViewportWidth(390);
    run_until(&mut s, t0.0 + 2_000);
    assert_eq!(
        s.port()
            .count(|c| *c == PortCall::SetHintVisible { visible: true }),
        1
    );
}

#[test]
fn region_click_is_gated_but_music_click_never_advances() {
    let mut s = sequencer(375);
    let region = InputEvent::Click {
        target: HitTarget::IntroRegion,
    };
    assert_eq!(s.handle_input(region), InputOutcome::Ignored);

    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    assert_eq!(
        s.handle_input(InputEvent::Click {
            target: HitTarget::MusicToggle,
        }),
        InputOutcome::Ignored
    );
    assert_eq!(s.state(), TimelineState::AwaitingAdvance);
    assert!(s.music_playing());

    assert_eq!(
        s.handle_input(InputEvent::Click {
            target: HitTarget::Elsewhere
        }),
        InputOutcome::Ignored
    );
    assert_eq!(s.handle_input(region), InputOutcome::Handled);
    assert_eq!(s.state(), TimelineState::Transitioning);
}

#[test]
fn completion_effects_are_staged() {
    let mut s = sequencer(1024);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    s.request_advance();
    let done = run_to_state(&mut s, TimelineState::Complete);

    assert_eq!(
        s.port().text(TextSink::Paragraph),
        crate::config::model::DEFAULT_PARAGRAPH
    );
    assert_eq!(s.port().count(|c| *c == PortCall::MarkGlowComplete), 1);

    run_until(&mut s, done.0 + 16);
    assert_eq!(s.port().live_sparkles(), 15);
    run_until(&mut s, done.0 + 999);
    assert_eq!(s.port().count(|c| *c == PortCall::RevealFooter), 0);
    run_until(&mut s, done.0 + 1000);
    assert_eq!(s.port().count(|c| *c == PortCall::RevealFooter), 1);
    drain(&mut s);
    assert_eq!(s.port().live_sparkles(), 0);
    assert!(s.scheduler().is_idle());
}

#[test]
fn missing_capabilities_do_not_stall_the_sequence() {
    let port = RecordingPort::new(ViewportWidth(375))
        .without_vibration()
        .without_layout()
        .deny_autoplay();
    let mut s = sequencer_with(port);
    s.toggle_music();
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    assert!(s.request_advance());
    drain(&mut s);

    assert_eq!(s.state(), TimelineState::Complete);
    assert_eq!(
        s.port()
            .count(|c| matches!(c, PortCall::SpawnSparkles { .. })),
        0
    );
    assert_eq!(s.port().count(|c| *c == PortCall::RevealFooter), 1);
    assert!(s.music_playing());
}

#[test]
fn zero_sized_paragraph_skips_the_sparkle_burst() {
    let mut port = RecordingPort::new(ViewportWidth(375));
    port.bounds = Some(Bounds::new(0.0, 0.0));
    let mut s = sequencer_with(port);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);
    assert!(s.request_advance());
    drain(&mut s);

    assert_eq!(s.state(), TimelineState::Complete);
    assert_eq!(
        s.port()
            .count(|c| matches!(c, PortCall::SpawnSparkles { .. })),
        0
    );
    assert_eq!(s.port().count(|c| *c == PortCall::MarkGlowComplete), 1);
}

#[test]
fn resize_bursts_are_debounced_and_resync_replaces_all() {
    let mut s = sequencer(1024);
    assert_eq!(s.particles_spawned(), 12);

    s.port_mut().viewport = ViewportWidth(800);
    s.handle_input(InputEvent::Resize);
    run_until(&mut s, 100);
    s.port_mut().viewport = ViewportWidth(390);
    s.handle_input(InputEvent::Resize);
    run_until(&mut s, 250);
    s.handle_input(InputEvent::Resize);

    run_until(&mut s, 549);
    assert_eq!(s.particles_spawned(), 12);
    run_until(&mut s, 550);
    assert_eq!(s.particles_spawned(), 6);
    assert_eq!(s.port().count(|c| *c == PortCall::ClearParticles), 1);
    assert_eq!(s.port().live_particles(), 6);
}

#[test]
fn resize_without_a_class_change_leaves_particles_alone() {
    let mut s = sequencer(1024);
    s.port_mut().viewport = ViewportWidth(1280);
    s.handle_input(InputEvent::Resize);
    run_until(&mut s, 400);
    assert_eq!(s.port().count(|c| *c == PortCall::ClearParticles), 0);
    assert_eq!(
        s.port()
            .count(|c| matches!(c, PortCall::SpawnParticles { .. })),
        1
    );
}

#[test]
fn paragraph_never_starts_before_the_title_completes() {
    let mut s = sequencer(375);
    let mut title_done_at = None;
    let mut paragraph_cleared_at = None;
    let mut seen = 0;
    while let Some((t, wake)) = s.scheduler_mut().pop_due(Millis(120_000)) {
        s.on_wake(wake);
        if s.state() == TimelineState::AwaitingAdvance && title_done_at.is_none() {
            title_done_at = Some(t);
            s.request_advance();
        }
        let calls = s.port().calls();
        for c in &calls[seen..] {
            if *c == (PortCall::ClearText {
                sink: TextSink::Paragraph,
            }) {
                paragraph_cleared_at = Some(t);
            }
        }
        seen = calls.len();
    }
    assert!(title_done_at.unwrap() < paragraph_cleared_at.unwrap());
}

#[test]
fn only_an_advancing_event_claims_the_default_action() {
    let mut s = sequencer(375);
    run_to_state(&mut s, TimelineState::AwaitingAdvance);

    let m = InputEvent::Key {
        code: KeyCode::KeyM,
    };
    assert_eq!(s.handle_input(m), InputOutcome::Ignored);
    assert!(s.music_playing());
    assert_eq!(s.handle_input(InputEvent::Resize), InputOutcome::Ignored);
    assert_eq!(
        s.handle_input(InputEvent::VisibilityChanged { hidden: true }),
        InputOutcome::Ignored
    );
    assert_eq!(s.state(), TimelineState::AwaitingAdvance);

    let enter = InputEvent::Key {
        code: KeyCode::Enter,
    };
    assert_eq!(s.handle_input(enter), InputOutcome::Handled);
    assert_eq!(s.handle_input(enter), InputOutcome::Ignored);
}
