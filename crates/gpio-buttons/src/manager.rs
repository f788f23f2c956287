//! Top-level orchestration: configuration resolution, supervised pin
//! setup, concurrent event driving and teardown.

use button_engine::Timing;
use embassy_futures::join::join_array;

use crate::config::{resolve, ButtonsConfig, PinSpec, ResolvedConfig, MAX_PINS};
use crate::controller::PinController;
use crate::error::{ConfigError, InitError};
use crate::events::{message, EventBus, ManagerEvent, Message};
use crate::hal::{ButtonInput, HardwareAdapter, PinId};

/// Manager lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Created,
    Ready,
    Destroyed,
}

/// Owns one [`PinController`] per successfully-initialized pin and
/// republishes their events, tagged with pin identity, on the shared bus.
///
/// Lifecycle: [`new`](Self::new) (resolves configuration, touches no
/// hardware) → [`init`](Self::init) (bootstraps the adapter, sets up pins)
/// → [`run`](Self::run) (drives all pins until the future is dropped) →
/// [`destroy`](Self::destroy) (releases everything; idempotent).
///
/// `run` borrows the manager exclusively, so no event can be published
/// concurrently with — or after — `destroy`.
pub struct ButtonManager<'a, A: HardwareAdapter> {
    adapter: &'a A,
    bus: &'a EventBus,
    config: ResolvedConfig,
    controllers: heapless::Vec<PinController<A::Input>, MAX_PINS>,
    phase: Phase,
}

impl<'a, A: HardwareAdapter> ButtonManager<'a, A> {
    /// Resolve `config` against the documented defaults.
    ///
    /// Fails synchronously on duplicate pin ids or zero durations; does not
    /// touch hardware.
    pub fn new(
        config: &ButtonsConfig,
        adapter: &'a A,
        bus: &'a EventBus,
    ) -> Result<Self, ConfigError> {
        let config = resolve(config)?;
        Ok(Self {
            adapter,
            bus,
            config,
            controllers: heapless::Vec::new(),
            phase: Phase::Created,
        })
    }

    /// Bootstrap the hardware adapter, then set up every configured pin.
    ///
    /// Pin setup is a supervised fan-out: one future per pin, joined, each
    /// failure captured independently. A failing pin is reported as an
    /// error event naming the pin and is simply absent from the working
    /// set; it never fails `init`. Only an adapter bootstrap failure is
    /// fatal.
    pub async fn init(&mut self) -> Result<(), InitError<A::Error>> {
        if self.phase != Phase::Created {
            return Err(InitError::AlreadyInitialized);
        }

        self.debug(format_args!("initialize gpio buttons"));
        self.adapter.bootstrap().await.map_err(InitError::Hardware)?;
        self.debug(format_args!(
            "adapter ready, setting up {} button pin(s)",
            self.config.pins.len()
        ));

        let timing = self.config.timing;
        let adapter = self.adapter;
        let mut specs = self.config.pins.iter();
        // `from_fn` fills slots in index order, so slot i gets the i-th
        // spec and `join_array` hands results back in declaration order.
        let results = join_array(core::array::from_fn::<_, MAX_PINS, _>(|_| {
            setup_slot(adapter, specs.next(), timing)
        }))
        .await;

        for result in results.into_iter().flatten() {
            match result {
                Ok(controller) => {
                    self.debug(format_args!("button pin {} ready", controller.pin()));
                    // Same capacity as the spec list, cannot overflow.
                    let _ = self.controllers.push(controller);
                }
                Err(why) => self.bus.publish(ManagerEvent::Error(why)),
            }
        }

        self.debug(format_args!("listening for button level changes"));
        self.phase = Phase::Ready;
        Ok(())
    }

    /// Drive every pin controller concurrently, publishing their events.
    ///
    /// Completes only when every pin has failed at runtime (immediately if
    /// none initialized); otherwise runs until the future is dropped.
    /// Dropping it cancels all pending debounce/press/click windows — the
    /// usual shape is `select(manager.run(), shutdown_signal)` followed by
    /// [`destroy`](Self::destroy).
    pub async fn run(&mut self) {
        let bus = self.bus;
        let mut controllers = self.controllers.iter_mut();
        join_array(core::array::from_fn::<_, MAX_PINS, _>(|_| {
            drive_slot(controllers.next(), bus)
        }))
        .await;
    }

    /// Release every controller and its hardware subscription.
    ///
    /// Controller cleanup is `Drop` and therefore infallible: one pin's
    /// teardown can never block another's. Idempotent — a second call does
    /// nothing and publishes nothing.
    pub async fn destroy(&mut self) {
        if self.phase == Phase::Destroyed {
            return;
        }
        self.phase = Phase::Destroyed;
        self.debug(format_args!("destroy requested, cleaning up buttons"));
        self.controllers.clear();
        self.debug(format_args!("gpio buttons destroyed"));
    }

    /// Pin ids that initialized successfully, in declaration order.
    ///
    /// Compare against the configured set to audit pins lost to setup
    /// failures (which were reported as error events).
    pub fn active_pins(&self) -> impl Iterator<Item = PinId> + '_ {
        self.controllers.iter().map(PinController::pin)
    }

    fn debug(&self, args: core::fmt::Arguments<'_>) {
        self.bus.publish(ManagerEvent::Debug(message(args)));
    }
}

/// Set up the pin in `spec`, if any: configure the input, pre-read its
/// level and build the controller. Failures come back as ready-to-publish
/// messages naming the pin.
async fn setup_slot<A: HardwareAdapter>(
    adapter: &A,
    spec: Option<&PinSpec>,
    timing: Timing,
) -> Option<Result<PinController<A::Input>, Message>> {
    let spec = spec?;
    let result = match adapter.configure_pin(spec.id, spec.pull).await {
        Ok(input) => PinController::new(spec, input, timing).map_err(|err| {
            message(format_args!(
                "failed preread on button pin {}: {}",
                spec.id, err
            ))
        }),
        Err(err) => Err(message(format_args!(
            "failed to set up button pin {}: {}",
            spec.id, err
        ))),
    };
    Some(result)
}

/// Drive the controller in this slot, if any. Empty slots complete
/// immediately so `join_array` only waits on real pins.
async fn drive_slot<I: ButtonInput>(controller: Option<&mut PinController<I>>, bus: &EventBus) {
    if let Some(controller) = controller {
        controller.run(bus).await;
    }
}
