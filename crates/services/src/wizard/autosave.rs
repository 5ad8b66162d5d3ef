use std::time::Duration;

/// Quiet period after the last edit before the draft is written.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(800);

/// Handle for one scheduled autosave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTicket(u64);

/// Generation counter behind the autosave debounce.
///
/// Every edit takes a new ticket; when its timer fires, only the ticket that
/// is still the latest may save.
#[derive(Debug, Clone)]
pub struct AutosaveDebounce {
    generation: u64,
    delay: Duration,
}

impl Default for AutosaveDebounce {
    fn default() -> Self {
        Self::new(AUTOSAVE_DEBOUNCE)
    }
}

impl AutosaveDebounce {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            generation: 0,
            delay,
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Supersede any pending save and hand out the new ticket.
    pub fn schedule(&mut self) -> AutosaveTicket {
        self.generation = self.generation.wrapping_add(1);
        AutosaveTicket(self.generation)
    }

    /// Drop whatever is pending, e.g. after an immediate save.
    pub fn cancel(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    #[must_use]
    pub fn is_current(&self, ticket: AutosaveTicket) -> bool {
        ticket.0 == self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_latest_ticket_fires() {
        let mut debounce = AutosaveDebounce::default();
        let first = debounce.schedule();
        let second = debounce.schedule();
        assert!(!debounce.is_current(first));
        assert!(debounce.is_current(second));
        assert_eq!(debounce.delay(), Duration::from_millis(800));
    }

    #[test]
    fn cancel_invalidates_pending() {
        let mut debounce = AutosaveDebounce::new(Duration::from_millis(10));
        let ticket = debounce.schedule();
        debounce.cancel();
        assert!(!debounce.is_current(ticket));
    }
}
