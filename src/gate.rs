//! Registration on/off gate with a scheduled auto-close.
//!
//! The gate is an explicit state machine driven by an injected clock, so the
//! scheduled transition can be tested without real timers. A due scheduled
//! close is applied lazily whenever the state is read.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum GateState {
    Open,
    CloseScheduled { at: DateTime<Utc> },
    Closed,
}

#[derive(Debug)]
pub struct RegistrationGate<C: Clock> {
    state: GateState,
    clock: C,
}

impl<C: Clock> RegistrationGate<C> {
    pub fn new(clock: C) -> Self {
        Self::from_state(GateState::Open, clock)
    }

    /// Restores a persisted state; a scheduled close that passed while the
    /// process was down resolves to `Closed` on the first read.
    pub fn from_state(state: GateState, clock: C) -> Self {
        RegistrationGate { state, clock }
    }

    pub fn open(&mut self) {
        self.state = GateState::Open;
    }

    pub fn close(&mut self) {
        self.state = GateState::Closed;
    }

    /// Schedules an automatic close; a time already in the past closes
    /// immediately.
    pub fn schedule_close(&mut self, at: DateTime<Utc>) {
        if at <= self.clock.now() {
            self.state = GateState::Closed;
        } else {
            self.state = GateState::CloseScheduled { at };
        }
    }

    /// Current state with any due scheduled close applied.
    pub fn state(&mut self) -> GateState {
        if let GateState::CloseScheduled { at } = self.state {
            if self.clock.now() >= at {
                self.state = GateState::Closed;
            }
        }
        self.state
    }

    pub fn is_open(&mut self) -> bool {
        !matches!(self.state(), GateState::Closed)
    }
}
