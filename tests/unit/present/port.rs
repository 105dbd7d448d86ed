use super::*;

#[test]
fn text_sinks_accumulate_and_clear() {
    let mut port = RecordingPort::new(ViewportWidth(375));
    port.append_char(TextSink::Title, 'H');
    port.append_char(TextSink::Title, 'i');
    assert_eq!(port.text(TextSink::Title), "Hi");
    assert_eq!(port.text(TextSink::Paragraph), "");
    port.clear_text(TextSink::Title);
    assert_eq!(port.text(TextSink::Title), "");
}

#[test]
fn refused_playback_is_recorded_but_not_applied() {
    let mut port = RecordingPort::new(ViewportWidth(375)).deny_autoplay();
    assert!(matches!(
        port.set_audio_playing(true),
        Err(PortError::Rejected(_))
    ));
    assert!(!port.audio_playing());
    assert!(port.set_audio_playing(false).is_ok());
    assert_eq!(port.calls().len(), 2);
}

#[test]
fn capability_switches_fail_their_queries() {
    let mut port = RecordingPort::new(ViewportWidth(375))
        .without_vibration()
        .without_layout();
    assert_eq!(
        port.vibrate(HapticPattern::Light),
        Err(PortError::Unsupported("vibrate"))
    );
    assert!(matches!(port.paragraph_bounds(), Err(PortError::Layout(_))));
    assert!(port.calls().is_empty());
}

#[test]
fn sparkle_batches_are_tracked_until_removed() {
    let mut port = RecordingPort::new(ViewportWidth(1024));
    let spec = SparkleSpec {
        x: 1.0,
        y: 2.0,
        delay: crate::foundation::core::Millis(0),
    };
    port.spawn_sparkles(0, &[spec; 3]);
    port.spawn_sparkles(1, &[spec; 2]);
    assert_eq!(port.live_sparkles(), 5);
    port.remove_sparkles(0);
    assert_eq!(port.live_sparkles(), 2);
    assert_eq!(port.take_calls().len(), 3);
    assert!(port.calls().is_empty());
    assert_eq!(port.calls_recorded(), 3);
}
