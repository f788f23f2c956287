//! Per-pin glue: one hardware input feeding one state machine.

use button_engine::{ButtonEngine, Timing};
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};

use crate::config::PinSpec;
use crate::events::{message, ButtonEvent, EventBus, ManagerEvent};
use crate::hal::{ButtonInput, Level, PinId, PullMode};

/// Map an electrical level to "active" terms for the pin's bias: pull-up
/// inputs are active-low, everything else is active-high.
fn is_active(level: Level, pull: PullMode) -> bool {
    match pull {
        PullMode::Up => level == Level::Low,
        PullMode::Down | PullMode::None => level == Level::High,
    }
}

/// Bridges one hardware input to one [`ButtonEngine`] and forwards the
/// engine's events to the manager's bus.
///
/// Cleanup is `Drop`: releasing the input handle unsubscribes from the
/// hardware and discards all pending windows.
pub(crate) struct PinController<I: ButtonInput> {
    pin: PinId,
    pull: PullMode,
    input: I,
    engine: ButtonEngine,
}

impl<I: ButtonInput> PinController<I> {
    /// Pre-read the current level and seed the state machine from it, so
    /// the startup condition is never reported as a transition.
    pub(crate) fn new(spec: &PinSpec, mut input: I, timing: Timing) -> Result<Self, I::Error> {
        let level = input.level()?;
        let engine = ButtonEngine::new(timing, is_active(level, spec.pull), Instant::now());
        Ok(Self {
            pin: spec.id,
            pull: spec.pull,
            input,
            engine,
        })
    }

    pub(crate) fn pin(&self) -> PinId {
        self.pin
    }

    /// Drive loop: sleep on the hardware and on the engine's next window
    /// boundary, whichever comes first, and publish whatever the engine
    /// emits. Returns only if the hardware listener fails; the failure is
    /// reported on the bus and the pin leaves the working set.
    pub(crate) async fn run(&mut self, bus: &EventBus) {
        loop {
            let step = match self.engine.next_deadline() {
                Some(deadline) => {
                    match select(self.input.wait_for_change(), Timer::at(deadline)).await {
                        Either::First(changed) => changed.map(Some),
                        Either::Second(()) => Ok(None),
                    }
                }
                None => self.input.wait_for_change().await.map(Some),
            };

            let now = Instant::now();
            let events = match step {
                Ok(Some(level)) => self.engine.on_sample(is_active(level, self.pull), now),
                Ok(None) => self.engine.on_deadline(now),
                Err(err) => {
                    bus.publish(ManagerEvent::Error(message(format_args!(
                        "listener failed on button pin {}: {}",
                        self.pin, err
                    ))));
                    return;
                }
            };

            for event in events {
                #[cfg(feature = "defmt")]
                defmt::debug!("button pin {}: {}", self.pin, event.kind);
                bus.publish(ManagerEvent::Button(ButtonEvent {
                    pin: self.pin,
                    kind: event.kind,
                    at: event.at,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::is_active;
    use crate::hal::{Level, PullMode};

    #[test]
    fn test_pull_up_is_active_low() {
        assert!(is_active(Level::Low, PullMode::Up));
        assert!(!is_active(Level::High, PullMode::Up));
    }

    #[test]
    fn test_pull_down_and_floating_are_active_high() {
        assert!(is_active(Level::High, PullMode::Down));
        assert!(!is_active(Level::Low, PullMode::Down));
        assert!(is_active(Level::High, PullMode::None));
    }
}
