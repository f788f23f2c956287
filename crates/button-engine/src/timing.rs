//! Timing parameters for the debounce/press/click engine.

use embassy_time::Duration;

/// Default minimum stable-level duration to accept a transition.
pub const DEFAULT_DEBOUNCE_MS: u64 = 30;

/// Default hold duration after which a press is declared.
pub const DEFAULT_PRESSED_MS: u64 = 200;

/// Default window after release during which the interaction still counts
/// as a click.
pub const DEFAULT_CLICKED_MS: u64 = 200;

/// Timing parameters for one button.
///
/// All three durations must be non-zero; configuration layers validate this
/// before constructing an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Minimum duration a new level must hold before it is confirmed.
    pub debounce: Duration,
    /// Hold duration after which `Pressed` is declared.
    pub pressed: Duration,
    /// Window after `Released` during which `Clicked` is still recognized.
    pub clicked: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            pressed: Duration::from_millis(DEFAULT_PRESSED_MS),
            clicked: Duration::from_millis(DEFAULT_CLICKED_MS),
        }
    }
}
