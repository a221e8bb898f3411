//! Channel state machine
//!
//! Transport-free bookkeeping for the WebSocket channel:
//!
//! ```text
//! Disconnected ──connect──► Connecting ──open──► Open
//!      ▲                        │                 │
//!      └──── close (retry) ─────┴─────────────────┘
//!                               │
//!                 close (budget spent) ──► Terminated
//! ```
//!
//! Reconnects use a fixed delay. An `open` resets the attempt counter.

use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    Disconnected,
    Connecting,
    Open,
    /// Reconnect budget exhausted; no further automatic attempts.
    Terminated,
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelState::Disconnected => "disconnected",
            ChannelState::Connecting => "connecting",
            ChannelState::Open => "open",
            ChannelState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub delay: Duration,
    pub max_attempts: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            delay: Duration::from_millis(2000),
            max_attempts: 5,
        }
    }
}

/// What the driver should do after a close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// Wait `delay`, then connect again. `attempt` counts from 1.
    Reconnect { delay: Duration, attempt: u32 },
    GiveUp,
}

#[derive(Debug, Clone)]
pub struct ChannelMachine {
    state: ChannelState,
    policy: ReconnectPolicy,
    attempts: u32,
}

impl ChannelMachine {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            state: ChannelState::Disconnected,
            policy,
            attempts: 0,
        }
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }

    pub fn policy(&self) -> ReconnectPolicy {
        self.policy
    }

    /// Reconnects scheduled since the last successful open.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Start a connection attempt. False once terminated.
    pub fn connect(&mut self) -> bool {
        match self.state {
            ChannelState::Terminated => false,
            _ => {
                self.state = ChannelState::Connecting;
                true
            }
        }
    }

    /// The socket opened; the driver sends the bootstrap action next.
    pub fn on_open(&mut self) {
        if self.state != ChannelState::Terminated {
            self.state = ChannelState::Open;
            self.attempts = 0;
        }
    }

    /// The socket closed, cleanly or not, or the connect attempt failed.
    pub fn on_close(&mut self) -> CloseOutcome {
        if self.state == ChannelState::Terminated {
            return CloseOutcome::GiveUp;
        }
        if self.attempts < self.policy.max_attempts {
            self.attempts += 1;
            self.state = ChannelState::Disconnected;
            CloseOutcome::Reconnect {
                delay: self.policy.delay,
                attempt: self.attempts,
            }
        } else {
            self.state = ChannelState::Terminated;
            CloseOutcome::GiveUp
        }
    }

    /// Stop for good, e.g. on user shutdown.
    pub fn terminate(&mut self) {
        self.state = ChannelState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ChannelMachine {
        ChannelMachine::new(ReconnectPolicy::default())
    }

    #[test]
    fn test_open_then_close_schedules_reconnect() {
        let mut machine = machine();
        assert!(machine.connect());
        assert_eq!(machine.state(), ChannelState::Connecting);
        machine.on_open();
        assert_eq!(machine.state(), ChannelState::Open);
        assert_eq!(
            machine.on_close(),
            CloseOutcome::Reconnect {
                delay: Duration::from_millis(2000),
                attempt: 1
            }
        );
        assert_eq!(machine.state(), ChannelState::Disconnected);
    }

    #[test]
    fn test_budget_is_bounded() {
        let mut machine = machine();
        for attempt in 1..=5 {
            assert!(machine.connect());
            assert_eq!(
                machine.on_close(),
                CloseOutcome::Reconnect {
                    delay: Duration::from_millis(2000),
                    attempt
                }
            );
        }
        assert!(machine.connect());
        assert_eq!(machine.on_close(), CloseOutcome::GiveUp);
        assert_eq!(machine.state(), ChannelState::Terminated);
        assert!(!machine.connect());
    }

    #[test]
    fn test_open_resets_budget() {
        let mut machine = machine();
        for _ in 0..4 {
            machine.connect();
            machine.on_close();
        }
        machine.connect();
        machine.on_open();
        assert_eq!(machine.attempts(), 0);
        assert!(matches!(
            machine.on_close(),
            CloseOutcome::Reconnect { attempt: 1, .. }
        ));
    }

    #[test]
    fn test_terminate_is_final() {
        let mut machine = machine();
        machine.terminate();
        machine.on_open();
        assert_eq!(machine.state(), ChannelState::Terminated);
        assert_eq!(machine.on_close(), CloseOutcome::GiveUp);
    }
}
