//! Deterministic scheduled events
//!
//! Every timed transition in the arcade (snake ticks, card flip-back,
//! countdowns, target expiry) is a `Timers` entry instead of a free-running
//! callback. Engines own their queue, poll it while advancing their clock and
//! cancel entries on reset, so a stale event can never reach a fresh game.

/// Handle to a scheduled event, valid until it fires (one-shot) or is cancelled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

#[derive(Debug, Clone)]
struct Entry<E> {
    id: TimerId,
    due_ms: u64,
    /// Repeat period for interval timers
    period_ms: Option<u64>,
    event: E,
}

/// A queue of one-shot and repeating events keyed to a millisecond clock
#[derive(Debug, Clone)]
pub struct Timers<E> {
    now_ms: u64,
    next_id: u64,
    entries: Vec<Entry<E>>,
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 1,
            entries: Vec::new(),
        }
    }

    /// Current clock value
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Fire `event` once, `delay_ms` from now
    pub fn after(&mut self, delay_ms: u64, event: E) -> TimerId {
        self.push(delay_ms, None, event)
    }

    /// Fire `event` every `period_ms`, first firing one period from now
    pub fn every(&mut self, period_ms: u64, event: E) -> TimerId {
        // A zero period would never let the clock move forward
        let period_ms = period_ms.max(1);
        self.push(period_ms, Some(period_ms), event)
    }

    fn push(&mut self, delay_ms: u64, period_ms: Option<u64>, event: E) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            due_ms: self.now_ms + delay_ms,
            period_ms,
            event,
        });
        id
    }

    /// Cancel a pending event. Returns false if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.entries.clear();
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Move the clock to `until` without firing anything. Call after draining
    /// `poll` so the next schedule is relative to the new time.
    pub fn advance_to(&mut self, until: u64) {
        self.now_ms = self.now_ms.max(until);
    }
}

impl<E: Clone> Timers<E> {
    /// Pop the earliest event due at or before `until`, moving the clock to
    /// its due time. Ties fire in scheduling order.
    ///
    /// Returning one event at a time lets the caller cancel other entries
    /// between firings.
    pub fn poll(&mut self, until: u64) -> Option<E> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_ms <= until)
            .min_by_key(|(_, e)| (e.due_ms, e.id))
            .map(|(i, _)| i)?;

        let due_ms = self.entries[idx].due_ms;
        self.now_ms = self.now_ms.max(due_ms);

        match self.entries[idx].period_ms {
            Some(period) => {
                let entry = &mut self.entries[idx];
                entry.due_ms += period;
                Some(entry.event.clone())
            }
            None => Some(self.entries.remove(idx).event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(timers: &mut Timers<&'static str>, dt: u64) -> Vec<&'static str> {
        let until = timers.now_ms() + dt;
        let mut fired = Vec::new();
        while let Some(e) = timers.poll(until) {
            fired.push(e);
        }
        timers.advance_to(until);
        fired
    }

    #[test]
    fn test_one_shot_fires_once() {
        let mut timers = Timers::new();
        timers.after(100, "flip");
        assert!(drain(&mut timers, 99).is_empty());
        assert_eq!(drain(&mut timers, 1), vec!["flip"]);
        assert!(drain(&mut timers, 1000).is_empty());
        assert!(timers.is_empty());
    }

    #[test]
    fn test_interval_repeats_within_one_advance() {
        let mut timers = Timers::new();
        timers.every(150, "step");
        assert_eq!(drain(&mut timers, 450), vec!["step", "step", "step"]);
        assert_eq!(timers.now_ms(), 450);
        assert_eq!(drain(&mut timers, 149), Vec::<&str>::new());
        assert_eq!(drain(&mut timers, 1), vec!["step"]);
    }

    #[test]
    fn test_ordering_by_due_then_schedule_order() {
        let mut timers = Timers::new();
        timers.every(1000, "countdown");
        timers.every(1000, "spawn");
        timers.after(800, "expire");
        assert_eq!(drain(&mut timers, 1000), vec!["expire", "countdown", "spawn"]);
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let id = timers.after(100, "flip");
        assert_eq!(timers.len(), 1);
        assert!(timers.cancel(id));
        assert!(!timers.cancel(id));
        assert!(drain(&mut timers, 500).is_empty());
    }

    #[test]
    fn test_cancel_between_polls() {
        let mut timers = Timers::new();
        timers.every(100, "a");
        let b = timers.every(100, "b");
        // "a" fires first; cancelling "b" before the next poll suppresses it
        assert_eq!(timers.poll(100), Some("a"));
        timers.cancel(b);
        assert_eq!(timers.poll(100), None);
    }

    #[test]
    fn test_schedule_is_relative_to_clock() {
        let mut timers = Timers::new();
        drain(&mut timers, 5000);
        timers.after(10, "late");
        assert!(drain(&mut timers, 9).is_empty());
        assert_eq!(drain(&mut timers, 1), vec!["late"]);
    }
}
