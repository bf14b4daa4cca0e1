/// Lifecycle of a per-question countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockState {
    #[default]
    Idle,
    Running,
    Expired,
    Stopped,
}

/// How close a running countdown is to expiry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Urgency {
    Calm,
    Warning,
    Danger,
}

impl Urgency {
    #[must_use]
    pub fn for_remaining(remaining: u32) -> Self {
        match remaining {
            0..=5 => Urgency::Danger,
            6..=10 => Urgency::Warning,
            _ => Urgency::Calm,
        }
    }
}

/// One elapsed second.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTick {
    pub remaining: u32,
    /// Set on the tick that reaches zero, and only that one.
    pub expired: bool,
}

/// Per-question countdown, advanced one whole second per `tick`.
///
/// The clock holds no timer of its own; whatever drives the session (an async
/// interval, a thread, a test loop) calls `tick` once per second. Only one
/// countdown exists per clock, so `start` replaces any running one, and once
/// `stop` returns no tick or expiry can follow.
#[derive(Debug, Clone, Default)]
pub struct SessionClock {
    state: ClockState,
    remaining: u32,
}

impl SessionClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> ClockState {
        self.state
    }

    /// Seconds left while running.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        (self.state == ClockState::Running).then_some(self.remaining)
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == ClockState::Running
    }

    /// Begin a countdown of `duration_secs`, discarding any running one.
    ///
    /// A zero duration still runs and expires on the next tick, so the
    /// expiry is reported exactly once like any other countdown.
    pub fn start(&mut self, duration_secs: u32) {
        if self.is_running() {
            tracing::trace!(remaining = self.remaining, "countdown replaced");
        }
        self.remaining = duration_secs;
        self.state = ClockState::Running;
    }

    /// Cancel a running countdown. No-op in any other state.
    pub fn stop(&mut self) {
        if self.is_running() {
            self.state = ClockState::Stopped;
        }
    }

    /// Return to `Idle`, forgetting any countdown.
    pub fn clear(&mut self) {
        self.state = ClockState::Idle;
        self.remaining = 0;
    }

    /// Advance one second. Returns `None` unless the countdown is running.
    pub fn tick(&mut self) -> Option<ClockTick> {
        if !self.is_running() {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        let expired = self.remaining == 0;
        if expired {
            self.state = ClockState::Expired;
        }

        Some(ClockTick {
            remaining: self.remaining,
            expired,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_down_to_zero_then_expires_once() {
        let mut clock = SessionClock::new();
        clock.start(3);

        let ticks: Vec<_> = std::iter::from_fn(|| clock.tick()).collect();
        assert_eq!(
            ticks,
            vec![
                ClockTick { remaining: 2, expired: false },
                ClockTick { remaining: 1, expired: false },
                ClockTick { remaining: 0, expired: true },
            ]
        );
        assert_eq!(clock.state(), ClockState::Expired);
        assert!(clock.tick().is_none());
    }

    #[test]
    fn zero_duration_expires_on_first_tick() {
        let mut clock = SessionClock::new();
        clock.start(0);
        assert_eq!(clock.remaining(), Some(0));

        assert_eq!(
            clock.tick(),
            Some(ClockTick { remaining: 0, expired: true })
        );
        assert_eq!(clock.state(), ClockState::Expired);
        assert!(clock.tick().is_none());
    }

    #[test]
    fn stop_suppresses_further_ticks_and_expiry() {
        let mut clock = SessionClock::new();
        clock.start(10);
        for _ in 0..4 {
            assert!(clock.tick().is_some());
        }
        clock.stop();

        assert_eq!(clock.state(), ClockState::Stopped);
        assert!((0..20).all(|_| clock.tick().is_none()));
        assert_eq!(clock.remaining(), None);
    }

    #[test]
    fn restart_replaces_running_countdown() {
        let mut clock = SessionClock::new();
        clock.start(2);
        clock.tick();
        clock.start(5);
        assert_eq!(clock.remaining(), Some(5));
        assert_eq!(clock.tick().map(|t| t.remaining), Some(4));
    }

    #[test]
    fn stop_outside_running_keeps_state() {
        let mut clock = SessionClock::new();
        clock.stop();
        assert_eq!(clock.state(), ClockState::Idle);

        clock.start(1);
        clock.tick();
        clock.stop();
        assert_eq!(clock.state(), ClockState::Expired);

        clock.clear();
        assert_eq!(clock.state(), ClockState::Idle);
    }

    #[test]
    fn urgency_thresholds() {
        assert_eq!(Urgency::for_remaining(30), Urgency::Calm);
        assert_eq!(Urgency::for_remaining(10), Urgency::Warning);
        assert_eq!(Urgency::for_remaining(5), Urgency::Danger);
        assert_eq!(Urgency::for_remaining(0), Urgency::Danger);
    }
}
