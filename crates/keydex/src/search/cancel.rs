// Cooperative cancellation: shared flag and deadline checks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// A cancellation flag that can be shared with other threads.
///
/// Cloning yields a handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every search holding this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// How many expansions pass between two deadline checks.
const DEADLINE_CHECK_INTERVAL: u32 = 32;

/// Per-query view of the cancellation sources, polled between expansions.
pub(crate) struct Interrupt<'a> {
    token: Option<&'a CancelToken>,
    deadline: Option<Instant>,
    polls: u32,
    #[cfg(test)]
    budget: Option<u32>,
}

impl<'a> Interrupt<'a> {
    pub(crate) fn new(token: Option<&'a CancelToken>, deadline: Option<Instant>) -> Self {
        Self {
            token,
            deadline,
            polls: 0,
            #[cfg(test)]
            budget: None,
        }
    }

    /// Never fires.
    #[cfg(test)]
    pub(crate) fn none() -> Self {
        Self::new(None, None)
    }

    /// Fires on the `n`-th poll and every poll after it.
    #[cfg(test)]
    pub(crate) fn after(n: u32) -> Self {
        Self {
            budget: Some(n),
            ..Self::none()
        }
    }

    #[cfg(test)]
    fn budget_spent(&self) -> bool {
        self.budget.is_some_and(|n| self.polls >= n)
    }

    #[cfg(not(test))]
    fn budget_spent(&self) -> bool {
        false
    }

    /// Returns `true` once the search should stop.
    ///
    /// The token is checked on every call; the clock only every
    /// `DEADLINE_CHECK_INTERVAL` calls, starting with the first.
    pub(crate) fn should_stop(&mut self) -> bool {
        if self.token.is_some_and(CancelToken::is_cancelled) {
            return true;
        }
        let poll = self.polls;
        self.polls = self.polls.wrapping_add(1);
        if self.budget_spent() {
            return true;
        }
        match self.deadline {
            Some(deadline) if poll % DEADLINE_CHECK_INTERVAL == 0 => Instant::now() >= deadline,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn token_is_shared_between_clones() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn interrupt_without_sources_never_fires() {
        let mut interrupt = Interrupt::none();
        for _ in 0..100 {
            assert!(!interrupt.should_stop());
        }
    }

    #[test]
    fn interrupt_sees_token() {
        let token = CancelToken::new();
        let mut interrupt = Interrupt::new(Some(&token), None);
        assert!(!interrupt.should_stop());
        token.cancel();
        assert!(interrupt.should_stop());
    }

    #[test]
    fn poll_budget_fires_on_nth_poll() {
        let mut interrupt = Interrupt::after(3);
        assert!(!interrupt.should_stop());
        assert!(!interrupt.should_stop());
        assert!(interrupt.should_stop());
        assert!(interrupt.should_stop());
    }

    #[test]
    fn past_deadline_fires_on_first_poll() {
        let deadline = Instant::now() - Duration::from_millis(1);
        let mut interrupt = Interrupt::new(None, Some(deadline));
        assert!(interrupt.should_stop());
    }

    #[test]
    fn future_deadline_does_not_fire() {
        let deadline = Instant::now() + Duration::from_secs(3600);
        let mut interrupt = Interrupt::new(None, Some(deadline));
        for _ in 0..100 {
            assert!(!interrupt.should_stop());
        }
    }
}
