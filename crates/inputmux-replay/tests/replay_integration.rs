//! Integration tests for profile + script replay.
//!
//! These drive whole scripts through `replay` and check the exact channel
//! event stream, including the shipped demo files under `demos/`.

use std::path::PathBuf;

use inputmux_replay::{load_profile, load_script, replay, ChannelEvent, Profile, ReplayError, Script};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn demo(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../demos").join(name)
}

fn digital(frame: usize, channel: usize, on: bool) -> ChannelEvent {
    ChannelEvent::Digital { frame, channel, on }
}

fn analog(frame: usize, channel: usize, value: f32, delta: f32) -> ChannelEvent {
    ChannelEvent::Analog {
        frame,
        channel,
        value,
        delta,
    }
}

fn text(frame: usize, device: usize, text: char) -> ChannelEvent {
    ChannelEvent::Text { frame, device, text }
}

fn run(profile: &str, script: &str) -> inputmux_replay::ReplayOutcome {
    let profile = Profile::from_toml_str(profile).expect("profile must parse");
    let script = Script::from_toml_str(script).expect("script must parse");
    replay(&profile, &script).expect("replay must succeed")
}

// ── Demo files ────────────────────────────────────────────────────────────────

#[test]
fn test_demo_files_replay_to_expected_events() {
    // Arrange
    let profile = load_profile(&demo("profile.toml")).unwrap();
    let script = load_script(&demo("script.toml")).unwrap();

    // Act
    let outcome = replay(&profile, &script).unwrap();

    // Assert
    assert_eq!(outcome.frames, 5);
    assert_eq!(
        outcome.events,
        vec![
            text(0, 0, 'd'),
            analog(0, 0, 1.0, 1.0),
            analog(0, 1, 4.0, 4.0),
            analog(1, 0, 1.5, 0.5),
            analog(1, 0, 0.5, -0.5),
            digital(2, 0, true),
            digital(3, 0, false),
            analog(4, 0, 0.0, -0.5),
        ]
    );
    assert_eq!(outcome.grab_history, vec![true, false]);
}

// ── Frame timing ──────────────────────────────────────────────────────────────

#[test]
fn test_key_repeat_follows_virtual_clock() {
    // Arrange: repeat after 0.35 s, then every 0.2 s; frames 100 ms apart
    let profile = r#"
        [input.key_repeat]
        enabled = true
        delay = 0.35
        interval = 0.2

        [[devices]]
        kind = "keyboard"

        [[digital]]
        channel = 0
        device = 0
        key = "W"
    "#;
    let mut script = String::from(
        "[[frames]]\nevents = [{ type = \"key\", device = 0, key = \"W\", text = \"w\", pressed = true }]\n",
    );
    for _ in 0..8 {
        script.push_str("[[frames]]\nadvance_ms = 100\n");
    }
    script.push_str("[[frames]]\nevents = [{ type = \"key\", device = 0, key = \"W\", pressed = false }]\n");

    // Act
    let outcome = run(profile, &script);

    // Assert: repeats produce text only; the channel stays on throughout
    assert_eq!(
        outcome.events,
        vec![
            text(0, 0, 'w'),
            digital(0, 0, true),
            text(4, 0, 'w'),
            text(6, 0, 'w'),
            text(8, 0, 'w'),
            digital(9, 0, false),
        ]
    );
}

#[test]
fn test_wheel_returns_to_zero_next_frame() {
    let profile = r#"
        [[devices]]
        kind = "mouse"

        [[analog]]
        channel = 2
        device = 0
        axis = 2
    "#;
    let script = r#"
        [[frames]]
        events = [
            { type = "mouse_wheel", device = 0, delta = 1.0 },
            { type = "mouse_wheel", device = 0, delta = 1.0 },
        ]
        [[frames]]
        [[frames]]
    "#;

    let outcome = run(profile, script);

    assert_eq!(
        outcome.events,
        vec![analog(0, 2, 1.0, 1.0), analog(0, 2, 2.0, 2.0), analog(1, 2, 0.0, -2.0)]
    );
}

// ── Routing ───────────────────────────────────────────────────────────────────

#[test]
fn test_multi_device_mode_keeps_keyboards_apart_until_disabled() {
    // Arrange: two keyboards, no promotion, channel bound to the first one
    let profile = r#"
        [input]
        multi_device_mode = true
        promote_keyboards_on_activity = false

        [[devices]]
        kind = "keyboard"
        [[devices]]
        kind = "keyboard"

        [[digital]]
        channel = 5
        device = 0
        key = "A"
    "#;
    let script = r#"
        [[frames]]
        events = [
            { type = "key", device = 1, key = "A", pressed = true },
            { type = "key", device = 1, key = "A", pressed = false },
        ]
        [[frames]]
        events = [
            { type = "multi_device_mode", enabled = false },
            { type = "key", device = 1, key = "A", pressed = true },
        ]
    "#;

    // Act
    let outcome = run(profile, script);

    // Assert: only the single-device press reaches the first keyboard's binding
    assert_eq!(outcome.events, vec![digital(1, 5, true)]);
}

#[test]
fn test_joystick_thresholds_gate_channels() {
    // Arrange: digital 3 fires below -0.5 on axis 1; analog 2 is axis 0 past 0.5, doubled
    let profile = r#"
        [[devices]]
        kind = "joystick"
        buttons = 4
        axes = 2

        [[digital]]
        channel = 3
        device = 0
        axis = 1
        threshold = -0.5

        [[analog]]
        channel = 2
        device = 0
        axis = 0
        scale = 2.0
        threshold = 0.5
    "#;
    let script = r#"
        [[frames]]
        events = [
            { type = "joystick_axis", device = 0, axis = 0, value = 0.25 },
            { type = "joystick_axis", device = 0, axis = 0, value = 0.75 },
            { type = "joystick_axis", device = 0, axis = 1, value = -0.25 },
            { type = "joystick_axis", device = 0, axis = 1, value = -0.75 },
        ]
    "#;

    // Act
    let outcome = run(profile, script);

    // Assert
    assert_eq!(outcome.events, vec![analog(0, 2, 1.5, 1.5), digital(0, 3, true)]);
}

// ── Focus, grab and rebinding ─────────────────────────────────────────────────

#[test]
fn test_focus_cycle_releases_buttons_and_toggles_grab() {
    // Arrange
    let profile = r#"
        [input]
        mouse_grab = true

        [[devices]]
        kind = "mouse"

        [[digital]]
        channel = 1
        device = 0
        mouse_button = "Left"
    "#;
    let script = r#"
        [[frames]]
        events = [{ type = "mouse_button", device = 0, button = "Left", pressed = true }]
        [[frames]]
        events = [{ type = "focus", has_focus = false }]
        [[frames]]
        events = [
            { type = "focus", has_focus = true },
            { type = "mouse_grab", enabled = false },
        ]
    "#;

    // Act
    let outcome = run(profile, script);

    // Assert
    assert_eq!(outcome.events, vec![digital(0, 1, true), digital(1, 1, false)]);
    assert_eq!(outcome.grab_history, vec![true, false, true, false]);
}

#[test]
fn test_clear_assignments_reports_neutral_then_ignores_input() {
    let profile = r#"
        [[devices]]
        kind = "keyboard"

        [[digital]]
        channel = 0
        device = 0
        key = "Space"
    "#;
    let script = r#"
        [[frames]]
        events = [
            { type = "key", device = 0, key = "Space", pressed = true },
            { type = "clear_channel_assignments" },
            { type = "key", device = 0, key = "Space", pressed = false },
            { type = "key", device = 0, key = "Space", pressed = true },
        ]
    "#;

    let outcome = run(profile, script);

    assert_eq!(outcome.events, vec![digital(0, 0, true), digital(0, 0, false)]);
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_binding_fails_replay() {
    let profile = Profile::from_toml_str("[[devices]]\nkind = \"keyboard\"\n[[analog]]\nchannel = 0\ndevice = 0\naxis = 1\n")
        .unwrap();

    let err = replay(&profile, &Script::default()).unwrap_err();

    assert!(matches!(err, ReplayError::Profile(_)));
    assert!(err.to_string().contains("keyboards have no axes"));
}
