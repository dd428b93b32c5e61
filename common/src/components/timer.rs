// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use super::scheduler::{Kind, Time};

/// A facility scheduling one-shot callbacks against the virtual clock.
/// Callbacks are identified by their event kind; the owner of the service
/// dispatches the event to the device once the deadline passes.
pub trait TimerService<E: Kind> {
    /// Current virtual clock time.
    fn now(&self) -> Time;
    /// Schedule the event at the given absolute deadline.
    fn schedule_at(&mut self, kind: E, deadline: Time);
    /// Remove any pending instance of the event.
    fn cancel(&mut self, kind: E);
}

/// A timer owned by a device that fires at most once per arming.
/// Arming again replaces the previous deadline; there is never more than
/// one pending fire.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct OneShotTimer<E: Kind> {
    /// The event this timer fires on the owning board's scheduler.
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    event: E,
    /// Deadline, if armed.
    deadline: Option<Time>,
}

impl<E: Kind> OneShotTimer<E> {
    /// Create a timer firing the given event. It is not armed.
    pub fn new(event: E) -> Self {
        Self {
            event,
            deadline: None,
        }
    }

    /// Arm the timer to fire at the given deadline, replacing any
    /// pending fire.
    pub fn arm(&mut self, timers: &mut (impl TimerService<E> + ?Sized), deadline: Time) {
        timers.cancel(self.event);
        timers.schedule_at(self.event, deadline);
        self.deadline = Some(deadline);
    }

    /// Cancel the pending fire, if any.
    pub fn cancel(&mut self, timers: &mut (impl TimerService<E> + ?Sized)) {
        if self.deadline.take().is_some() {
            timers.cancel(self.event);
        }
    }

    /// Consume the pending state if the deadline has been reached.
    /// Returns false for stale or early expiries.
    pub fn expire(&mut self, now: Time) -> bool {
        match self.deadline {
            Some(deadline) if deadline <= now => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Release the timer, making sure nothing stays scheduled for it.
    pub fn release(mut self, timers: &mut (impl TimerService<E> + ?Sized)) {
        self.cancel(timers);
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn deadline(&self) -> Option<Time> {
        self.deadline
    }
}
