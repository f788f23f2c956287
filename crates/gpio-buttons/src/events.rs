//! Event types and the shared publish/subscribe bus.
//!
//! The manager owns no emitter behavior of its own; everything it reports —
//! orchestration milestones, per-pin failures and semantic button events —
//! goes through one [`EventBus`]. Subscribers pick the view they want with
//! an [`EventFilter`]; dropping the returned [`EventStream`] unsubscribes.

use core::fmt::{self, Write as _};

use button_engine::EventKind;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::pubsub::{PubSubBehavior, PubSubChannel, Subscriber, WaitResult};
use embassy_time::Instant;

use crate::error::SubscribeError;
use crate::hal::PinId;

/// Depth of the bus queue. A subscriber that falls further behind than
/// this loses the oldest messages rather than blocking publishers.
pub const BUS_DEPTH: usize = 16;

/// Maximum number of concurrent subscriptions.
pub const MAX_SUBSCRIBERS: usize = 4;

/// Bounded length of debug/error message text. Longer messages truncate.
pub const MESSAGE_LEN: usize = 96;

/// Bounded message text carried by debug and error events.
pub type Message = heapless::String<MESSAGE_LEN>;

/// A semantic button event tagged with the originating pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent {
    /// The pin the event belongs to.
    pub pin: PinId,
    /// What happened.
    pub kind: EventKind,
    /// When it happened (window boundary, see `button-engine`).
    pub at: Instant,
}

/// Everything the manager publishes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManagerEvent {
    /// Orchestration milestone.
    Debug(Message),
    /// Per-pin setup or listener failure; the text names the pin.
    Error(Message),
    /// Semantic button event.
    Button(ButtonEvent),
}

/// Which slice of the bus a subscription sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFilter {
    /// Every message.
    All,
    /// All semantic button events (the `button_event` view).
    Buttons,
    /// Button events of one kind (`button_changed`, `button_press`,
    /// `button_release`, `button_clicked`).
    Kind(EventKind),
    /// Orchestration milestones only.
    Debug,
    /// Per-pin failures only.
    Error,
}

impl EventFilter {
    fn matches(self, event: &ManagerEvent) -> bool {
        match (self, event) {
            (Self::All, _) => true,
            (Self::Buttons, ManagerEvent::Button(_)) => true,
            (Self::Kind(kind), ManagerEvent::Button(button)) => button.kind == kind,
            (Self::Debug, ManagerEvent::Debug(_)) => true,
            (Self::Error, ManagerEvent::Error(_)) => true,
            _ => false,
        }
    }
}

// CriticalSectionRawMutex: published from thread-mode drive loops, readable
// from any context on single-core targets; the queue operations are a few
// dozen instructions inside the critical section.
type Channel = PubSubChannel<CriticalSectionRawMutex, ManagerEvent, BUS_DEPTH, MAX_SUBSCRIBERS, 1>;

/// The shared event bus.
///
/// Owned outside the manager so subscriptions can outlive `run()` borrows:
///
/// ```ignore
/// let bus = EventBus::new();
/// let mut events = bus.subscribe()?;
/// let mut manager = ButtonManager::new(&config, &adapter, &bus)?;
/// ```
pub struct EventBus {
    channel: Channel,
}

impl EventBus {
    /// Create an empty bus.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            channel: Channel::new(),
        }
    }

    /// Subscribe to every message.
    pub fn subscribe(&self) -> Result<EventStream<'_>, SubscribeError> {
        self.subscribe_filtered(EventFilter::All)
    }

    /// Subscribe to one view of the bus.
    pub fn subscribe_filtered(&self, filter: EventFilter) -> Result<EventStream<'_>, SubscribeError> {
        let subscriber = self.channel.subscriber().map_err(|_| SubscribeError)?;
        Ok(EventStream {
            subscriber,
            filter,
            missed: 0,
        })
    }

    /// Publish without blocking; the oldest queued message is evicted for
    /// subscribers that have fallen `BUS_DEPTH` behind.
    pub(crate) fn publish(&self, event: ManagerEvent) {
        self.channel.publish_immediate(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// A live subscription. Dropping it releases the subscriber slot.
pub struct EventStream<'a> {
    subscriber: Subscriber<'a, CriticalSectionRawMutex, ManagerEvent, BUS_DEPTH, MAX_SUBSCRIBERS, 1>,
    filter: EventFilter,
    missed: u64,
}

impl EventStream<'_> {
    /// Wait for the next message matching this subscription's filter.
    pub async fn next(&mut self) -> ManagerEvent {
        loop {
            match self.subscriber.next_message().await {
                WaitResult::Lagged(count) => self.missed = self.missed.saturating_add(count),
                WaitResult::Message(event) if self.filter.matches(&event) => return event,
                WaitResult::Message(_) => {}
            }
        }
    }

    /// Drain the next matching message without waiting.
    pub fn try_next(&mut self) -> Option<ManagerEvent> {
        loop {
            match self.subscriber.try_next_message()? {
                WaitResult::Lagged(count) => self.missed = self.missed.saturating_add(count),
                WaitResult::Message(event) if self.filter.matches(&event) => return Some(event),
                WaitResult::Message(_) => {}
            }
        }
    }

    /// Messages this subscription lost to queue overflow.
    #[must_use]
    pub fn missed(&self) -> u64 {
        self.missed
    }
}

/// Format a bounded message; text past [`MESSAGE_LEN`] truncates.
pub(crate) fn message(args: fmt::Arguments<'_>) -> Message {
    let mut text = Message::new();
    let _ = text.write_fmt(args);
    text
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::{EventBus, EventStream, MAX_SUBSCRIBERS};
    use crate::error::SubscribeError;

    #[test]
    fn test_subscriber_slots_are_bounded() {
        let bus = EventBus::new();
        let _held: [EventStream<'_>; MAX_SUBSCRIBERS] =
            core::array::from_fn(|_| bus.subscribe().unwrap());
        assert_eq!(bus.subscribe().err(), Some(SubscribeError));
    }

    #[test]
    fn test_dropping_a_stream_releases_its_slot() {
        let bus = EventBus::new();
        let held: [EventStream<'_>; MAX_SUBSCRIBERS] =
            core::array::from_fn(|_| bus.subscribe().unwrap());
        drop(held);
        assert!(bus.subscribe().is_ok());
    }
}
