//! Delayed transitions tied to the current screen
//!
//! Every timer belongs to the screen that was showing when it was scheduled.
//! Leaving the screen drops its timers, so a callback can never touch a screen
//! that is no longer visible. Time is supplied by the caller (milliseconds,
//! monotonic), which keeps the scheduler deterministic under test.

/// Handle for cancelling a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<A> {
    id: TimerId,
    due_ms: f64,
    action: A,
}

#[derive(Debug)]
pub struct Scheduler<A> {
    now_ms: f64,
    next_id: u64,
    pending: Vec<Pending<A>>,
}

impl<A> Default for Scheduler<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> Scheduler<A> {
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 1,
            pending: Vec::new(),
        }
    }

    /// Latest time passed to `advance`
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Run `action` once `delay_ms` has elapsed, unless the screen changes first
    pub fn schedule(&mut self, delay_ms: u32, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due_ms: self.now_ms + delay_ms as f64,
            action,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Drop every pending timer. Returns how many were cancelled.
    pub fn leave_screen(&mut self) -> usize {
        let dropped = self.pending.len();
        if dropped > 0 {
            log::debug!("Cancelled {} pending transitions", dropped);
        }
        self.pending.clear();
        dropped
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock to `now_ms` and return the actions that came due, in
    /// due order (ties in scheduling order). Time never runs backwards.
    pub fn advance(&mut self, now_ms: f64) -> Vec<A> {
        self.now_ms = self.now_ms.max(now_ms);
        let now = self.now_ms;

        let (mut due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|p| p.due_ms <= now);
        self.pending = waiting;

        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.id.0.cmp(&b.id.0)));
        due.into_iter().map(|p| p.action).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_in_due_order() {
        let mut sched = Scheduler::new();
        sched.schedule(300, "late");
        sched.schedule(100, "early");
        sched.schedule(100, "early-second");

        assert!(sched.advance(50.0).is_empty());
        assert_eq!(sched.advance(150.0), ["early", "early-second"]);
        assert_eq!(sched.advance(1000.0), ["late"]);
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_delay_counts_from_current_clock() {
        let mut sched = Scheduler::new();
        sched.advance(5000.0);
        sched.schedule(1000, 1);
        assert!(sched.advance(5999.0).is_empty());
        assert_eq!(sched.advance(6000.0), [1]);
    }

    #[test]
    fn test_cancel() {
        let mut sched = Scheduler::new();
        let id = sched.schedule(10, "x");
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));
        assert!(sched.advance(100.0).is_empty());
    }

    #[test]
    fn test_leaving_screen_drops_stale_timers() {
        let mut sched = Scheduler::new();
        sched.schedule(1000, "old screen");
        assert_eq!(sched.leave_screen(), 1);
        sched.schedule(1000, "new screen");
        assert_eq!(sched.advance(2000.0), ["new screen"]);
    }

    #[test]
    fn test_clock_never_rewinds() {
        let mut sched = Scheduler::<&str>::new();
        sched.advance(500.0);
        sched.advance(100.0);
        assert_eq!(sched.now_ms(), 500.0);
    }
}
