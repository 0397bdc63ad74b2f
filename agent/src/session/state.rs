//! `SessionState`: internal only, never serialized onto the wire. Exclusively
//! owned and mutated by the `Session`; external observers may only load it.

use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Dialing,
    Live,
    Reconnecting,
    Stopped,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Dialing => "dialing",
            SessionState::Live => "live",
            SessionState::Reconnecting => "reconnecting",
            SessionState::Stopped => "stopped",
        }
    }

    fn to_tag(self) -> u8 {
        match self {
            SessionState::Idle => 0,
            SessionState::Dialing => 1,
            SessionState::Live => 2,
            SessionState::Reconnecting => 3,
            SessionState::Stopped => 4,
        }
    }

    fn from_tag(tag: u8) -> Self {
        match tag {
            0 => SessionState::Idle,
            1 => SessionState::Dialing,
            2 => SessionState::Live,
            3 => SessionState::Reconnecting,
            _ => SessionState::Stopped,
        }
    }
}

/// An atomic cell for `SessionState` so the shutdown arbiter can observe the
/// current state without taking a lock the `Session` might be holding.
pub struct SessionStateCell(AtomicU8);

impl SessionStateCell {
    pub fn new(initial: SessionState) -> Self {
        SessionStateCell(AtomicU8::new(initial.to_tag()))
    }

    pub fn load(&self) -> SessionState {
        SessionState::from_tag(self.0.load(Ordering::Acquire))
    }

    pub fn store(&self, state: SessionState) {
        self.0.store(state.to_tag(), Ordering::Release);
    }
}
