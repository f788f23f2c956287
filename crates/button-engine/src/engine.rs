//! The debounce / press / click state machine.
//!
//! The engine is a pure function of a chronological stream of timestamped
//! level samples: it never reads a clock and never suspends. Callers feed it
//! samples via [`ButtonEngine::on_sample`], ask for the earliest pending
//! window boundary via [`ButtonEngine::next_deadline`], and wake it with
//! [`ButtonEngine::on_deadline`] once that instant has passed.

use embassy_time::Instant;

use crate::timing::Timing;

/// Semantic button event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventKind {
    /// Debounced level flip.
    Changed,
    /// Confirmed active level held past the press threshold.
    Pressed,
    /// Return to inactive after a `Pressed`.
    Released,
    /// Press-release interaction completed within the click window.
    Clicked,
}

/// A single semantic event and the instant it logically occurred at.
///
/// Timestamps are window boundaries, not processing times: a `Changed`
/// confirmed by a late wake-up still carries the instant its debounce
/// window closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Event {
    /// What happened.
    pub kind: EventKind,
    /// When it happened.
    pub at: Instant,
}

/// Events produced by a single engine step.
///
/// A late wake-up can close several windows at once (a click expiry, then a
/// debounce confirm, then a press threshold), so one step may yield more
/// than one event. Four is the worst cascade.
pub type Events = heapless::Vec<Event, 4>;

/// A level that differs from the confirmed one and has not yet survived
/// its debounce window.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    active: bool,
    since: Instant,
}

/// An in-progress press interaction.
#[derive(Debug, Clone, Copy)]
struct Press {
    deadline: Instant,
    fired: bool,
}

/// Debounce/press/click state machine for one button.
///
/// Works in "active" (electrically pressed) terms; mapping a raw pin level
/// to active/inactive is the caller's job, since it depends on the pin's
/// pull mode.
pub struct ButtonEngine {
    timing: Timing,
    /// Confirmed state, in "active" terms.
    active: bool,
    debounce: Option<Candidate>,
    press: Option<Press>,
    click_deadline: Option<Instant>,
}

impl ButtonEngine {
    /// Create an engine seeded from a pre-read of the pin.
    ///
    /// The pre-read is a starting condition, not a transition: no `Changed`
    /// fires for it. A pin that is already active at setup time arms the
    /// press tracker directly, so a button held across startup still
    /// produces `Pressed` once the hold threshold passes.
    pub fn new(timing: Timing, preread_active: bool, now: Instant) -> Self {
        let press = preread_active.then(|| Press {
            deadline: now + timing.pressed,
            fired: false,
        });
        Self {
            timing,
            active: preread_active,
            debounce: None,
            press,
            click_deadline: None,
        }
    }

    /// Confirmed state, in "active" terms.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Earliest pending window boundary, if any.
    ///
    /// Callers should invoke [`on_deadline`](Self::on_deadline) once this
    /// instant has passed.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let mut next: Option<Instant> = None;
        let mut consider = |d: Instant| match next {
            Some(n) if n <= d => {}
            _ => next = Some(d),
        };
        if let Some(c) = &self.debounce {
            consider(c.since + self.timing.debounce);
        }
        if let Some(p) = &self.press {
            if !p.fired && !self.press_blocked() {
                consider(p.deadline);
            }
        }
        if let Some(d) = self.click_deadline {
            consider(d);
        }
        next
    }

    /// Feed one raw level sample observed at `now`.
    pub fn on_sample(&mut self, active: bool, now: Instant) -> Events {
        let mut events = Events::new();
        self.advance(now, &mut events);
        match &self.debounce {
            // Same direction as the pending candidate: the window keeps
            // measuring from the first candidate sample.
            Some(c) if c.active == active => {}
            // Reverted to the confirmed level: classic bounce, reject the
            // candidate.
            Some(_) => self.debounce = None,
            None if active != self.active => {
                self.debounce = Some(Candidate { active, since: now });
            }
            // Redundant sample at the confirmed level.
            None => {}
        }
        // A rejected release candidate can unblock an already-elapsed press
        // threshold; settle it in the same step.
        self.advance(now, &mut events);
        events
    }

    /// Wake the engine because a previously reported deadline has passed.
    pub fn on_deadline(&mut self, now: Instant) -> Events {
        let mut events = Events::new();
        self.advance(now, &mut events);
        events
    }

    /// Close every window whose boundary is at or before `now`, in
    /// chronological order.
    fn advance(&mut self, now: Instant, events: &mut Events) {
        while let Some(deadline) = self.next_deadline() {
            if deadline > now {
                break;
            }
            self.fire(deadline, events);
        }
    }

    /// Fire the single window that closes at `deadline`.
    ///
    /// Coincident boundaries resolve click window first, then press
    /// threshold, then debounce confirm: the press threshold is inclusive,
    /// so a hold of exactly `pressed` still counts even when the release
    /// confirms at the same instant.
    fn fire(&mut self, deadline: Instant, events: &mut Events) {
        if self.click_deadline == Some(deadline) {
            self.click_deadline = None;
            push(events, EventKind::Clicked, deadline);
            return;
        }
        if !self.press_blocked() {
            if let Some(p) = &mut self.press {
                if !p.fired && p.deadline == deadline {
                    p.fired = true;
                    push(events, EventKind::Pressed, deadline);
                    return;
                }
            }
        }
        if let Some(c) = self.debounce.take() {
            self.confirm(c.active, deadline, events);
        }
    }

    /// The press threshold cannot be decided while a release candidate that
    /// appeared before the threshold is still debouncing: if the candidate
    /// survives, the button was let go in time and no `Pressed` fires; if
    /// it turns out to be bounce, `Pressed` fires (late) at the threshold
    /// instant.
    fn press_blocked(&self) -> bool {
        match (&self.press, &self.debounce) {
            (Some(p), Some(c)) if !p.fired => c.since < p.deadline,
            _ => false,
        }
    }

    /// A candidate survived its debounce window: commit the new confirmed
    /// level at instant `at` and emit the follow-on events.
    fn confirm(&mut self, active: bool, at: Instant, events: &mut Events) {
        self.active = active;
        push(events, EventKind::Changed, at);
        if active {
            // A new press interaction begins; any trailing click window
            // belongs to the previous interaction and is cancelled.
            self.click_deadline = None;
            self.press = Some(Press {
                deadline: at + self.timing.pressed,
                fired: false,
            });
        } else {
            // Presses that never crossed the hold threshold are noise:
            // no Released, no click window.
            if self.press.take().is_some_and(|p| p.fired) {
                push(events, EventKind::Released, at);
                self.click_deadline = Some(at + self.timing.clicked);
            }
        }
    }
}

/// Capacity 4 covers the worst cascade (see [`Events`]); a push can only
/// fail if that analysis is wrong, and dropping is safer than panicking.
fn push(events: &mut Events, kind: EventKind, at: Instant) {
    let _ = events.push(Event { kind, at });
}
