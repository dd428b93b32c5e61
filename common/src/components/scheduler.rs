// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use arrayvec::ArrayVec;

use super::timer::TimerService;

/// Virtual clock time, in nanoseconds.
pub type Time = u64;
/// Signed virtual clock delta, in nanoseconds.
pub type TimeS = i64;

/// Maximum amount of events that can be pending at once.
pub const MAX_EVENTS: usize = 16;

/// A scheduler used by the board to drive its devices' timers.
/// It is generic over the possible events and keeps them in a list
/// sorted by deadline, next event last.
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Scheduler<E: Kind> {
    /// Current time of the scheduler.
    time: Time,
    /// Time of the next event.
    next: Time,
    /// Events currently awaiting execution.
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    events: ArrayVec<ScheduledEvent<E>, MAX_EVENTS>,
}

impl<E: Kind> Scheduler<E> {
    /// Schedule an event of the given kind after the given amount
    /// of nanoseconds have elapsed from now.
    /// Number can be negative; the event is then due immediately.
    #[inline]
    pub fn schedule(&mut self, kind: E, after: TimeS) {
        self.schedule_at(kind, self.time.saturating_add_signed(after));
    }

    /// Schedule an event of the given kind at an absolute time.
    pub fn schedule_at(&mut self, kind: E, time: Time) {
        let event = ScheduledEvent {
            kind,
            execute_at: time,
        };
        self.events.push(event);

        // Ensure the event list is still sorted
        // (Swap the new element further back until it is in the right spot)
        for idx in (1..self.events.len()).rev() {
            let other = self.events[idx - 1];
            if time > other.execute_at {
                self.events[idx] = other;
            } else {
                self.events[idx] = event;
                self.update_next();
                return;
            }
        }
        // The loop exited without finding a bigger element, this new one is the biggest
        self.events[0] = event;
        self.update_next();
    }

    /// Advance the timer by the given amount of nanoseconds.
    /// The clock stops at `Time::MAX`.
    #[inline]
    pub fn advance(&mut self, by: Time) {
        self.time = self.time.saturating_add(by);
    }

    /// Get the next event that is due, if any, removing it.
    #[inline]
    pub fn get_next_pending(&mut self) -> Option<Event<E>> {
        if self.has_events() {
            let event = self.events.pop()?;
            self.update_next();
            Some(Event {
                kind: event.kind,
                late_by: (self.time - event.execute_at) as TimeS,
            })
        } else {
            None
        }
    }

    /// Are any events due?
    #[inline]
    pub fn has_events(&self) -> bool {
        self.next <= self.time
    }

    /// Return the next event immediately, and set the current time to
    /// the event's execution time if it lies in the future.
    /// Returns `None` when nothing is scheduled.
    pub fn pop(&mut self) -> Option<Event<E>> {
        let event = self.events.pop()?;
        let late_by = self.time.saturating_sub(event.execute_at) as TimeS;
        self.time = self.time.max(event.execute_at);
        self.update_next();
        Some(Event {
            kind: event.kind,
            late_by,
        })
    }

    /// Cancel all events of a given type.
    /// Cancelling an event that is not scheduled does nothing.
    pub fn cancel(&mut self, evt: E) {
        self.events.retain(|e| e.kind != evt);
        self.update_next();
    }

    /// Is an event of the given type scheduled?
    pub fn is_scheduled(&self, evt: E) -> bool {
        self.events.iter().any(|e| e.kind == evt)
    }

    /// Earliest time an event of the given type is scheduled at.
    pub fn deadline_of(&self, evt: E) -> Option<Time> {
        self.events
            .iter()
            .rev()
            .find(|e| e.kind == evt)
            .map(|e| e.execute_at)
    }

    /// Amount of pending events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    #[inline]
    pub fn now(&self) -> Time {
        self.time
    }

    fn update_next(&mut self) {
        self.next = self.events.last().map_or(Time::MAX, |e| e.execute_at);
    }
}

impl<E: Kind> Default for Scheduler<E> {
    fn default() -> Self {
        Self {
            time: 0,
            next: Time::MAX,
            events: ArrayVec::new(),
        }
    }
}

impl<E: Kind> TimerService<E> for Scheduler<E> {
    fn now(&self) -> Time {
        self.time
    }

    fn schedule_at(&mut self, kind: E, deadline: Time) {
        Scheduler::schedule_at(self, kind, deadline)
    }

    fn cancel(&mut self, kind: E) {
        Scheduler::cancel(self, kind)
    }
}

/// An event awaiting execution
#[derive(Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
struct ScheduledEvent<E: Kind> {
    /// Kind of event to execute
    #[cfg_attr(feature = "serde", serde(bound = ""))]
    kind: E,
    /// Time of the scheduler to execute it at
    execute_at: Time,
}

/// Trait for event kinds.
#[cfg(feature = "serde")]
pub trait Kind:
    for<'de> serde::Deserialize<'de> + serde::Serialize + PartialEq + Copy + Clone
{
}
#[cfg(not(feature = "serde"))]
pub trait Kind: PartialEq + Copy + Clone {}

/// Event that is ready to be handled.
#[derive(Copy, Clone, Debug)]
pub struct Event<E: Kind> {
    /// The kind of event to handle
    pub kind: E,
    /// By how many nanoseconds the event was delayed by. For example:
    /// - Event was scheduled to be executed at 1000
    /// - Scheduler ran until 1010 before the event got handled
    /// - `late_by` will be 1010 - 1000 = 10.
    pub late_by: TimeS,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    #[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
    enum TestEvent {
        A,
        B,
        C,
    }

    impl Kind for TestEvent {}

    #[test]
    fn test_events_come_out_in_order() {
        let mut sched = Scheduler::default();
        sched.schedule(TestEvent::B, 20);
        sched.schedule(TestEvent::A, 10);
        sched.schedule(TestEvent::C, 30);

        assert_eq!(sched.pop().map(|e| e.kind), Some(TestEvent::A));
        assert_eq!(sched.now(), 10);
        assert_eq!(sched.pop().map(|e| e.kind), Some(TestEvent::B));
        assert_eq!(sched.pop().map(|e| e.kind), Some(TestEvent::C));
        assert_eq!(sched.now(), 30);
        assert!(sched.pop().is_none());
    }

    #[test]
    fn test_pending_only_when_due() {
        let mut sched = Scheduler::default();
        sched.schedule(TestEvent::A, 100);
        assert!(sched.get_next_pending().is_none());

        sched.advance(150);
        let evt = sched.get_next_pending().unwrap();
        assert_eq!(evt.kind, TestEvent::A);
        assert_eq!(evt.late_by, 50);
        assert!(!sched.has_events());
    }

    #[test]
    fn test_cancel_missing_is_noop() {
        let mut sched: Scheduler<TestEvent> = Scheduler::default();
        sched.cancel(TestEvent::A);
        assert!(sched.is_empty());

        sched.schedule(TestEvent::B, 5);
        sched.cancel(TestEvent::A);
        assert_eq!(sched.len(), 1);
    }

    #[test]
    fn test_cancel_removes_every_instance() {
        let mut sched = Scheduler::default();
        sched.schedule(TestEvent::A, 10);
        sched.schedule(TestEvent::B, 15);
        sched.schedule(TestEvent::A, 20);
        sched.cancel(TestEvent::A);

        assert!(!sched.is_scheduled(TestEvent::A));
        assert_eq!(sched.deadline_of(TestEvent::B), Some(15));
        sched.advance(100);
        assert_eq!(sched.get_next_pending().map(|e| e.kind), Some(TestEvent::B));
        assert!(sched.get_next_pending().is_none());
    }

    #[test]
    fn test_pop_never_goes_backwards() {
        let mut sched = Scheduler::default();
        sched.schedule(TestEvent::A, 10);
        sched.advance(40);
        let evt = sched.pop().unwrap();
        assert_eq!(sched.now(), 40);
        assert_eq!(evt.late_by, 30);
    }

    #[test]
    fn test_clock_saturates() {
        let mut sched = Scheduler::default();
        sched.advance(Time::MAX - 5);
        sched.schedule(TestEvent::A, 100);
        assert_eq!(sched.deadline_of(TestEvent::A), Some(Time::MAX));
        sched.advance(100);
        assert_eq!(sched.now(), Time::MAX);
        assert_eq!(sched.get_next_pending().map(|e| e.kind), Some(TestEvent::A));
    }

    #[test]
    fn test_deadline_of_earliest() {
        let mut sched = Scheduler::default();
        sched.schedule_at(TestEvent::C, 500);
        sched.schedule_at(TestEvent::C, 200);
        assert_eq!(sched.deadline_of(TestEvent::C), Some(200));
        assert_eq!(sched.deadline_of(TestEvent::A), None);
    }
}
