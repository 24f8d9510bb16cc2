// a resettable one-shot action that becomes due a fixed delay after it was started
// time is whatever millisecond clock the host ticks the game with, so tests can drive it by hand
#[derive(Clone, Debug, PartialEq)]
pub struct Deferred<T> {
    pending: Option<(f64, T)>,
}

impl<T> Deferred<T> {
    pub fn new() -> Self { Deferred { pending: None } }

    // schedule `action` for `now + delay`, cancelling anything already pending
    pub fn start(&mut self, now: f64, delay: f64, action: T) { self.pending = Some((now + delay, action)); }

    // cancel the pending action, returning it
    pub fn stop(&mut self) -> Option<T> { self.pending.take().map(|(_, action)| action) }

    pub fn due_at(&self) -> Option<f64> { self.pending.as_ref().map(|(due, _)| *due) }

    // take the pending action if it is due at `now`
    pub fn poll(&mut self, now: f64) -> Option<T> {
        if self.due_at().map_or(false, |due| now >= due) {
            self.stop()
        } else {
            None
        }
    }
}

impl<T> Default for Deferred<T> {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_due() {
        let mut timer = Deferred::new();
        timer.start(100.0, 80.0, "go");
        assert_eq!(timer.due_at(), Some(180.0));
        assert_eq!(timer.poll(179.9), None);
        assert_eq!(timer.poll(180.0), Some("go"));
        assert_eq!(timer.poll(500.0), None);
        assert_eq!(timer.due_at(), None);
    }

    #[test]
    fn restarting_replaces_pending_action() {
        let mut timer = Deferred::new();
        timer.start(0.0, 80.0, 1);
        timer.start(50.0, 80.0, 2);
        assert_eq!(timer.poll(100.0), None);
        assert_eq!(timer.poll(130.0), Some(2));
    }

    #[test]
    fn stop_cancels() {
        let mut timer = Deferred::new();
        timer.start(0.0, 10.0, ());
        assert_eq!(timer.stop(), Some(()));
        assert_eq!(timer.poll(1_000.0), None);
    }
}
