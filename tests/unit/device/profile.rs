use super::*;

#[test]
fn boundary_is_exclusive_for_compact() {
    assert_eq!(
        resolve_device_profile(ViewportWidth(599)),
        DeviceProfile::COMPACT
    );
    assert_eq!(resolve_device_profile(ViewportWidth(600)), DeviceProfile::WIDE);
}

#[test]
fn every_width_maps_to_the_matching_preset() {
    for w in 0..2_000u32 {
        let expected = if w < 600 {
            DeviceProfile::COMPACT
        } else {
            DeviceProfile::WIDE
        };
        assert_eq!(resolve_device_profile(ViewportWidth(w)), expected, "w={w}");
    }
}

#[test]
fn presets_carry_the_page_constants() {
    let c = DeviceProfile::COMPACT;
    assert_eq!(c.typing_speed_ms, Millis(55));
    assert_eq!(c.paragraph_typing_speed_ms, Millis(32));
    assert_eq!((c.particle_count, c.sparkle_count), (6, 10));
    assert_eq!(c.intro_ms, Millis(2200));
    assert!(c.tap_hint);

    let w = DeviceProfile::WIDE;
    assert_eq!(w.typing_speed_ms, Millis(65));
    assert_eq!(w.paragraph_typing_speed_ms, Millis(38));
    assert_eq!((w.particle_count, w.sparkle_count), (12, 15));
    assert_eq!(w.intro_ms, Millis(2600));
    assert!(!w.tap_hint);
}

#[test]
fn custom_threshold_moves_the_boundary() {
    let presets = DevicePresets {
        compact_threshold: ViewportWidth(800),
        ..DevicePresets::default()
    };
    assert_eq!(presets.class(ViewportWidth(799)), DeviceClass::Compact);
    assert_eq!(presets.class(ViewportWidth(800)), DeviceClass::Wide);
}

#[test]
fn zero_speed_is_rejected() {
    let mut presets = DevicePresets::default();
    presets.wide.typing_speed_ms = Millis(0);
    let err = presets.validate().unwrap_err();
    assert!(err.to_string().contains("wide"));
}

#[test]
fn partial_profile_override_keeps_the_rest_of_its_preset() {
    let presets: DevicePresets =
        serde_json::from_str(r#"{ "compact": { "particle_count": 3 }, "wide": {} }"#).unwrap();
    assert_eq!(presets.compact.particle_count, 3);
    assert_eq!(presets.compact.typing_speed_ms, Millis(55));
    assert!(presets.compact.tap_hint);
    assert_eq!(presets.wide, DeviceProfile::WIDE);
    assert_eq!(presets.compact_threshold, COMPACT_THRESHOLD);
}

#[test]
fn unknown_profile_field_is_rejected() {
    let err = serde_json::from_str::<DevicePresets>(r#"{ "wide": { "typing_speed": 10 } }"#)
        .unwrap_err();
    assert!(err.to_string().contains("typing_speed"));
}
