//! Manager lifecycle tests — configuration, init fault isolation, teardown.
// Integration test file: expect/unwrap/panic are intentional test mechanisms.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//!
//! Run with: cargo test -p gpio-buttons --test manager_lifecycle

use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use gpio_buttons::mocks::{MockAdapter, MockHardwareError};
use gpio_buttons::{
    ButtonManager, ButtonsConfig, ConfigError, EventBus, EventFilter, EventKind, InitError, Level,
    ManagerEvent, PinId, PinSetting, PullMode,
};

fn config_with(pins: &[PinSetting]) -> ButtonsConfig {
    let mut config = ButtonsConfig::default();
    for &pin in pins {
        config.pins.push(pin).unwrap();
    }
    config
}

#[test]
fn duplicate_pin_rejected_before_init() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let config = config_with(&[PinSetting::Pin(4), PinSetting::Pin(4)]);
    assert_eq!(
        ButtonManager::new(&config, &adapter, &bus).err(),
        Some(ConfigError::DuplicatePin(PinId(4)))
    );
}

#[tokio::test]
async fn bootstrap_failure_fails_init_as_a_whole() {
    let adapter = MockAdapter::new().with_bootstrap_failure();
    let bus = EventBus::new();
    let config = config_with(&[PinSetting::Pin(4)]);
    let mut manager = ButtonManager::new(&config, &adapter, &bus).unwrap();
    assert_eq!(
        manager.init().await,
        Err(InitError::Hardware(MockHardwareError::Bootstrap))
    );
}

#[tokio::test]
async fn empty_pin_list_is_valid_and_does_nothing() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let mut manager = ButtonManager::new(&ButtonsConfig::default(), &adapter, &bus).unwrap();
    manager.init().await.unwrap();
    assert_eq!(manager.active_pins().count(), 0);
    // With no pins to drive, run completes immediately.
    manager.run().await;
    manager.destroy().await;
}

#[tokio::test]
async fn init_twice_is_an_error() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let mut manager = ButtonManager::new(&ButtonsConfig::default(), &adapter, &bus).unwrap();
    manager.init().await.unwrap();
    assert_eq!(manager.init().await, Err(InitError::AlreadyInitialized));
}

#[tokio::test]
async fn resolver_applies_default_and_per_pin_pulls() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let config = config_with(&[
        PinSetting::Pin(4),
        PinSetting::PinWithPull(5, PullMode::Down),
    ]);
    let mut manager = ButtonManager::new(&config, &adapter, &bus).unwrap();
    manager.init().await.unwrap();
    assert_eq!(
        adapter.configured(),
        vec![(PinId(4), PullMode::Up), (PinId(5), PullMode::Down)]
    );
}

/// Pins [1, 2, 3] with pin 2's hardware acquisition failing: init still
/// resolves, exactly one error event names pin 2, and pins 1 and 3 keep
/// working.
#[tokio::test]
async fn init_isolates_a_failing_pin() {
    let adapter = MockAdapter::new().with_failing_pin(2);
    let bus = EventBus::new();
    let mut errors = bus.subscribe_filtered(EventFilter::Error).unwrap();
    let config = config_with(&[PinSetting::Pin(1), PinSetting::Pin(2), PinSetting::Pin(3)]);
    let mut manager = ButtonManager::new(&config, &adapter, &bus).unwrap();

    manager.init().await.unwrap();

    let active: Vec<PinId> = manager.active_pins().collect();
    assert_eq!(active, vec![PinId(1), PinId(3)]);

    match errors.try_next().expect("exactly one error event") {
        ManagerEvent::Error(text) => assert!(text.contains("pin 2"), "unexpected text: {text}"),
        other => panic!("expected an error event, got {other:?}"),
    }
    assert!(errors.try_next().is_none());

    // The surviving pins still deliver events.
    let mut buttons = bus.subscribe_filtered(EventFilter::Buttons).unwrap();
    select(manager.run(), async {
        adapter.set_level(1, Level::Low);
        adapter.set_level(3, Level::Low);
        Timer::after(Duration::from_millis(80)).await;

        let mut changed: Vec<PinId> = Vec::new();
        while let Some(ManagerEvent::Button(event)) = buttons.try_next() {
            assert_eq!(event.kind, EventKind::Changed);
            changed.push(event.pin);
        }
        changed.sort_unstable();
        assert_eq!(changed, vec![PinId(1), PinId(3)]);
    })
    .await;

    manager.destroy().await;
}

#[tokio::test]
async fn destroy_twice_produces_no_additional_events() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let config = config_with(&[PinSetting::Pin(4)]);
    let mut manager = ButtonManager::new(&config, &adapter, &bus).unwrap();
    manager.init().await.unwrap();

    manager.destroy().await;

    // Subscribed after the first destroy: the second one must stay silent.
    let mut events = bus.subscribe().unwrap();
    manager.destroy().await;
    assert!(events.try_next().is_none());
    assert_eq!(manager.active_pins().count(), 0);
}

#[tokio::test]
async fn debug_milestones_are_published_during_init() {
    let adapter = MockAdapter::new();
    let bus = EventBus::new();
    let mut debugs = bus.subscribe_filtered(EventFilter::Debug).unwrap();
    let config = config_with(&[PinSetting::Pin(4)]);
    let mut manager = ButtonManager::new(&config, &adapter, &bus).unwrap();
    manager.init().await.unwrap();

    let mut milestones: Vec<String> = Vec::new();
    while let Some(ManagerEvent::Debug(text)) = debugs.try_next() {
        milestones.push(text.as_str().to_owned());
    }
    assert!(milestones.len() >= 3, "got {milestones:?}");
    assert!(milestones[0].contains("initialize"));
    assert!(milestones.iter().any(|m| m.contains("button pin 4 ready")));
}
