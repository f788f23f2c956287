//! Configuration and the resolver that normalizes it.
//!
//! User configuration stays flexible (bare pin ids, per-pin pull
//! overrides); the resolver flattens it once into uniform [`PinSpec`]s so
//! no downstream component ever re-inspects raw shapes.

use button_engine::Timing;
use embassy_time::Duration;

use crate::error::{ConfigError, TimingField};
use crate::hal::{PinId, PullMode};

/// Maximum number of button pins one manager can own.
pub const MAX_PINS: usize = 16;

/// One configured pin, before resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinSetting {
    /// Bare pin id; the configuration-level default pull applies.
    Pin(u8),
    /// Pin id with an explicit pull override.
    PinWithPull(u8, PullMode),
}

/// User-supplied configuration.
///
/// Missing pieces fall back to documented defaults: pull-up inputs and
/// 30 ms / 200 ms / 200 ms debounce / press / click timing. An empty pin
/// list is valid — the manager simply does nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonsConfig {
    /// Button pins to manage.
    pub pins: heapless::Vec<PinSetting, MAX_PINS>,
    /// Default pull mode for pins configured without one.
    pub pull_mode: PullMode,
    /// Debounce / press / click timing.
    pub timing: Timing,
}

impl Default for ButtonsConfig {
    fn default() -> Self {
        Self {
            pins: heapless::Vec::new(),
            pull_mode: PullMode::Up,
            timing: Timing::default(),
        }
    }
}

/// Fully-resolved per-pin specification. Immutable after resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinSpec {
    /// Pin identity, unique across the configured set.
    pub id: PinId,
    /// Electrical bias for this pin.
    pub pull: PullMode,
}

/// Resolver output: uniform pin specs plus validated timing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResolvedConfig {
    pub pins: heapless::Vec<PinSpec, MAX_PINS>,
    pub timing: Timing,
}

/// Merge defaults, normalize pin shapes and validate.
pub(crate) fn resolve(config: &ButtonsConfig) -> Result<ResolvedConfig, ConfigError> {
    validate_timing(&config.timing)?;

    let mut pins: heapless::Vec<PinSpec, MAX_PINS> = heapless::Vec::new();
    for setting in &config.pins {
        let spec = match *setting {
            PinSetting::Pin(id) => PinSpec {
                id: PinId(id),
                pull: config.pull_mode,
            },
            PinSetting::PinWithPull(id, pull) => PinSpec { id: PinId(id), pull },
        };
        if pins.iter().any(|existing| existing.id == spec.id) {
            return Err(ConfigError::DuplicatePin(spec.id));
        }
        // Same capacity as the input vec, so this cannot overflow.
        let _ = pins.push(spec);
    }

    Ok(ResolvedConfig {
        pins,
        timing: config.timing,
    })
}

fn validate_timing(timing: &Timing) -> Result<(), ConfigError> {
    let zero = Duration::from_ticks(0);
    if timing.debounce == zero {
        return Err(ConfigError::ZeroDuration(TimingField::Debounce));
    }
    if timing.pressed == zero {
        return Err(ConfigError::ZeroDuration(TimingField::Pressed));
    }
    if timing.clicked == zero {
        return Err(ConfigError::ZeroDuration(TimingField::Clicked));
    }
    Ok(())
}
