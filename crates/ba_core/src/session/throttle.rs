/// Lets an action run at most once per interval
#[derive(Debug, Clone)]
pub struct Throttle {
    interval_ms: u64,
    next_allowed_ms: Option<u64>,
}

impl Throttle {
    pub fn new(interval_ms: u64) -> Self {
        Self { interval_ms, next_allowed_ms: None }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// True when the action may run at `now_ms`; arms the next window if so.
    pub fn ready(&mut self, now_ms: u64) -> bool {
        if self.next_allowed_ms.is_some_and(|next| now_ms < next) {
            return false;
        }
        self.next_allowed_ms = Some(now_ms.saturating_add(self.interval_ms));
        true
    }

    /// Next call to [`Self::ready`] succeeds.
    pub fn reset(&mut self) {
        self.next_allowed_ms = None;
    }
}
