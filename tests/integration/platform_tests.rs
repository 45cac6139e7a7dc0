//! Integration tests for light registration and the host entity contract.

use ledfade::{
    ConfigError, Error, Light, LightConfig, LightMode, SupportedFeatures, TurnOnOptions,
    setup_from_json, setup_platform,
};

use crate::mock_hw::{ManualTimer, MockGpio, PwmCall};

// ── Registration ──────────────────────────────────────────────

#[test]
fn rejects_single_light_with_three_ports() {
    let mut gpio = MockGpio::new();
    let config = LightConfig::new("Porch", LightMode::Single, vec![1, 2, 3]);
    let r = setup_platform(&config, &mut gpio, ManualTimer::new());
    assert!(matches!(
        r,
        Err(Error::Config(ConfigError::PortCount {
            mode: LightMode::Single,
            expected: 1,
            actual: 3,
        }))
    ));
    assert!(gpio.log.calls().is_empty(), "no device may be created");
}

#[test]
fn rejects_rgb_light_with_one_port() {
    let mut gpio = MockGpio::new();
    let r = setup_from_json(r#"{"mode": "rgb", "ports": 7}"#, &mut gpio, ManualTimer::new());
    assert!(matches!(r, Err(Error::Config(ConfigError::PortCount { actual: 1, .. }))));
    assert!(gpio.log.calls().is_empty());
}

#[test]
fn malformed_json_is_a_parse_error() {
    let mut gpio = MockGpio::new();
    let r = setup_from_json(r#"{"mode": "single""#, &mut gpio, ManualTimer::new());
    assert!(matches!(r, Err(Error::Config(ConfigError::Parse(_)))));
}

#[test]
fn json_entry_registers_rgb_light() {
    let mut gpio = MockGpio::new();
    let light = setup_from_json(
        r#"{"name": "Shelf", "mode": "rgb", "ports": ["17", 27, 22]}"#,
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();

    assert_eq!(light.name(), "Shelf");
    let pins: Vec<u8> = gpio
        .log
        .calls()
        .into_iter()
        .filter_map(|c| match c {
            PwmCall::InitPwm { pin, .. } => Some(pin),
            _ => None,
        })
        .collect();
    assert_eq!(pins, vec![17, 27, 22]);
}

#[test]
fn unnamed_light_is_called_led() {
    let mut gpio = MockGpio::new();
    let light = setup_from_json(r#"{"mode": "single", "ports": [5]}"#, &mut gpio, ManualTimer::new())
        .unwrap();
    assert_eq!(light.name(), "LED");
}

// ── Entity contract ───────────────────────────────────────────

#[test]
fn feature_bits_follow_mode() {
    let mut gpio = MockGpio::new();
    let single = setup_platform(
        &LightConfig::new("a", LightMode::Single, vec![1]),
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();
    let rgb = setup_platform(
        &LightConfig::new("b", LightMode::Rgb, vec![2, 3, 4]),
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();

    assert_eq!(single.supported_features(), SupportedFeatures::BRIGHTNESS);
    assert_eq!(single.supported_features().bits(), 1);
    assert_eq!(rgb.supported_features().bits(), 17);
    assert!(rgb.supported_features().contains(SupportedFeatures::RGB_COLOR));
}

#[test]
fn entity_turn_on_and_off_round_trip() {
    let mut gpio = MockGpio::new();
    let light = setup_platform(
        &LightConfig::new("Lamp", LightMode::Rgb, vec![1, 2, 3]),
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();

    assert!(!light.is_on());
    assert_eq!(light.rgb_color(), Some([255, 255, 255]));

    light
        .turn_on(TurnOnOptions::default().with_brightness(200).with_rgb_color([255, 128, 0]))
        .unwrap();
    assert!(light.is_on());
    assert_eq!(light.brightness(), 200);
    assert_eq!(light.rgb_color(), Some([255, 128, 0]));

    light.turn_off().unwrap();
    assert!(!light.is_on());
    assert_eq!(light.brightness(), 0);
    assert_eq!(light.rgb_color(), Some([255, 128, 0]));
}

#[test]
fn entity_shutdown_refuses_commands() {
    let mut gpio = MockGpio::new();
    let light = setup_platform(
        &LightConfig::new("Lamp", LightMode::Single, vec![9]),
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();

    light.turn_on(TurnOnOptions::default()).unwrap();
    light.shutdown();
    assert!(light.controller().is_shut_down());
    assert!(!light.is_on());
    assert_eq!(light.turn_on(TurnOnOptions::default()), Err(Error::ShutDown));
}

#[test]
fn lights_are_usable_as_trait_objects() {
    let mut gpio = MockGpio::new();
    let light = setup_platform(
        &LightConfig::new("Dyn", LightMode::Single, vec![9]),
        &mut gpio,
        ManualTimer::new(),
    )
    .unwrap();
    let lights: Vec<&dyn Light> = vec![&light];
    for l in lights {
        l.turn_on(TurnOnOptions::default().with_brightness(10)).unwrap();
        assert_eq!(l.brightness(), 10);
        assert_eq!(l.rgb_color(), None);
    }
}
