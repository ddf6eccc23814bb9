//! Integration tests for dzikir-core.
//!
//! These drive the public API end to end: raw events through the decoder
//! into the registry, the counter's cycle behaviour, the recording round trip
//! and the persisted record.

use dzikir_core::{
    decode,
    input::messages::{WM_KEYDOWN, WM_LBUTTONDOWN, WM_SYSKEYDOWN, WM_XBUTTONDOWN},
    Action, BindingCode, BindingRegistry, BindingSlot, CounterEngine, CounterEvent, CounterState,
    DecodeError, DeviceClass, InputKind, MouseButton, RawInputEvent, Record, RecordingSession,
};

fn press(registry: &BindingRegistry, raw: RawInputEvent) -> Vec<Action> {
    match decode(&raw) {
        Ok(code) => registry
            .resolve(code, raw.device_class())
            .into_iter()
            .map(|t| t.action)
            .collect(),
        Err(_) => Vec::new(),
    }
}

// ── Counter cycles ────────────────────────────────────────────────────────────

#[test]
fn test_thirty_three_presses_reach_target_once_then_cycle() {
    // Arrange
    let mut engine = CounterEngine::default();
    engine.set_target(33);

    // Act
    let events: Vec<CounterEvent> = (0..33).map(|_| engine.increment().event).collect();

    // Assert
    assert_eq!(engine.current(), 33);
    let reached = events
        .iter()
        .filter(|e| matches!(e, CounterEvent::TargetReached { .. }))
        .count();
    assert_eq!(reached, 1);
    assert_eq!(
        events.last(),
        Some(&CounterEvent::TargetReached {
            current: 33,
            target: 33
        })
    );

    assert_eq!(engine.increment().event, CounterEvent::CycleReset { current: 1 });
    assert_eq!(engine.current(), 1);
}

#[test]
fn test_bounded_counter_cycles_through_one_to_target() {
    let target = 4u32;
    let mut engine = CounterEngine::new(CounterState { current: 0, target });

    let values: Vec<u64> = (0..12).map(|_| engine.increment().event.current()).collect();
    assert_eq!(values, vec![1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);

    let mut fresh = CounterEngine::new(CounterState { current: 0, target });
    let events: Vec<CounterEvent> = (0..12).map(|_| fresh.increment().event).collect();
    let resets = events
        .iter()
        .filter(|e| matches!(e, CounterEvent::CycleReset { .. }))
        .count();
    let reached = events
        .iter()
        .filter(|e| matches!(e, CounterEvent::TargetReached { .. }))
        .count();
    assert_eq!(reached, 3, "one TargetReached per run");
    assert_eq!(resets, 2, "one CycleReset at the start of every later run");
}

// ── Decoder ───────────────────────────────────────────────────────────────────

#[test]
fn test_extended_button_high_word_decides_identity() {
    assert_eq!(
        decode(&RawInputEvent::x_button_down(0x0001)),
        Ok(BindingCode::Mouse(MouseButton::XButton1))
    );
    assert_eq!(
        decode(&RawInputEvent::x_button_down(0x0002)),
        Ok(BindingCode::Mouse(MouseButton::XButton2))
    );
    assert_eq!(
        decode(&RawInputEvent::x_button_down(0x0003)),
        Err(DecodeError::Ambiguous { high_word: 0x0003 })
    );
}

#[test]
fn test_recorded_code_matches_production_resolution() {
    // The same decoded code recorded during a session must fire afterwards.
    let raws = [
        RawInputEvent::key_down(0x41),
        RawInputEvent::Keyboard {
            message: WM_SYSKEYDOWN,
            vk_code: 0x12,
        },
        RawInputEvent::mouse(WM_LBUTTONDOWN),
        RawInputEvent::Mouse {
            message: WM_XBUTTONDOWN,
            mouse_data: 0x0001_0000,
        },
    ];

    for raw in raws {
        // Arrange
        let mut registry = BindingRegistry::new();
        registry.set_enabled(BindingSlot::Custom, true);
        let mut session = RecordingSession::new();
        session.arm(&mut registry).unwrap();

        // Act
        let recorded = decode(&raw).unwrap();
        session.complete(&mut registry, recorded).unwrap();

        // Assert
        assert!(
            press(&registry, raw).contains(&Action::Increment),
            "{raw:?} should fire the custom binding"
        );
    }
}

// ── Recording ─────────────────────────────────────────────────────────────────

#[test]
fn test_recording_suspends_and_restores_exact_flags() {
    // Arrange
    let mut registry = BindingRegistry::new();
    registry.set_enabled(BindingSlot::LeftButton, true);
    let primary = RawInputEvent::mouse(WM_LBUTTONDOWN);
    let mut session = RecordingSession::new();

    // Act
    session.arm(&mut registry).unwrap();
    let while_armed = press(&registry, primary);
    session
        .complete(&mut registry, BindingCode::Keyboard(0x51))
        .unwrap();

    // Assert
    assert!(while_armed.is_empty());
    assert!(registry.get(BindingSlot::LeftButton).enabled);
    assert!(!registry.get(BindingSlot::XButton).enabled);
    assert!(!registry.get(BindingSlot::Custom).enabled);
    assert_eq!(press(&registry, primary), vec![Action::Increment]);
    assert_eq!(
        registry.required_devices().into_iter().collect::<Vec<_>>(),
        vec![DeviceClass::Mouse]
    );
}

#[test]
fn test_key_release_never_fires() {
    let mut registry = BindingRegistry::new();
    registry
        .set_binding(BindingSlot::Custom, BindingCode::Keyboard(0x20), "Space")
        .unwrap();
    registry.set_enabled(BindingSlot::Custom, true);

    let down = RawInputEvent::Keyboard {
        message: WM_KEYDOWN,
        vk_code: 0x20,
    };
    let up = RawInputEvent::Keyboard {
        message: WM_KEYDOWN + 1,
        vk_code: 0x20,
    };
    assert_eq!(press(&registry, down), vec![Action::Increment]);
    assert!(press(&registry, up).is_empty());
}

// ── Persisted record ──────────────────────────────────────────────────────────

#[test]
fn test_record_round_trips_custom_mouse_binding() {
    // Arrange
    let (code, kind) = BindingCode::Mouse(MouseButton::XButton1).to_wire();
    let record = Record {
        current_count: 99,
        custom_enabled: true,
        custom_input_code: code,
        custom_input_kind: kind,
        custom_input_name: "XButton 1".to_string(),
        selected_preset: "Istighfar (100)".to_string(),
        target_count: 100,
        ..Record::default()
    };

    // Act
    let line = record.to_line();
    let loaded = Record::parse(&line);

    // Assert
    assert_eq!(line, "99,False,False,True,524,2,XButton 1,Istighfar (100),True,100");
    assert_eq!(loaded, record);
    assert_eq!(loaded.to_line(), line);
    assert_eq!(
        BindingCode::from_wire(loaded.custom_input_code, loaded.custom_input_kind),
        BindingCode::Mouse(MouseButton::XButton1)
    );
}

#[test]
fn test_truncated_record_loads_defaults_beyond_index_two() {
    let loaded = Record::parse("15,True,False");

    assert_eq!(loaded.current_count, 15);
    assert!(loaded.x_button_enabled);
    assert!(!loaded.custom_enabled);
    assert_eq!(loaded.custom_input_kind, InputKind::None);
    assert_eq!(loaded.custom_input_name, "None");
    assert_eq!(loaded.selected_preset, "Free Count (∞)");
    assert!(loaded.sound_enabled);
    assert_eq!(loaded.target_count, 0);
}
