//! Session state machine.
//!
//! `connection.rs` documents the five SMPP session states in prose; this
//! module makes the transitions between them machine-checked so a dispatcher
//! can reject out-of-sequence PDUs without re-deriving the diagram by hand.
//!
//! ```text
//! CLOSED --onConnect--> OPEN --onBind(t)--> BOUND_TX/BOUND_RX/BOUND_TRX
//!    ^                                              |
//!    +------------------- onUnbind -----------------+
//!    ^                                              |
//!    +-------------------- onClose (any state) -----+
//! ```

use crate::client::types::BindType;
use crate::datatypes::CommandStatus;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Mutex;
use thiserror::Error;

/// The state an SMPP session is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No TCP connection exists.
    Closed,
    /// TCP connection established, no bind completed yet.
    Open,
    /// Bound as transmitter.
    BoundTx,
    /// Bound as receiver.
    BoundRx,
    /// Bound as transceiver.
    BoundTrx,
}

impl SessionState {
    /// The state reached by successfully binding with `bind_type`.
    pub fn from_bind_type(bind_type: BindType) -> SessionState {
        match bind_type {
            BindType::Transmitter => SessionState::BoundTx,
            BindType::Receiver => SessionState::BoundRx,
            BindType::Transceiver => SessionState::BoundTrx,
        }
    }

    /// Whether a session in this state is allowed to send submit_sm and
    /// related outbound-traffic PDUs.
    pub fn can_transmit(&self) -> bool {
        matches!(self, SessionState::BoundTx | SessionState::BoundTrx)
    }

    /// Whether a session in this state is allowed to receive deliver_sm and
    /// alert_notification.
    pub fn can_receive(&self) -> bool {
        matches!(self, SessionState::BoundRx | SessionState::BoundTrx)
    }

    fn to_u8(self) -> u8 {
        match self {
            SessionState::Closed => 0,
            SessionState::Open => 1,
            SessionState::BoundTx => 2,
            SessionState::BoundRx => 3,
            SessionState::BoundTrx => 4,
        }
    }

    fn from_u8(value: u8) -> SessionState {
        match value {
            0 => SessionState::Closed,
            1 => SessionState::Open,
            2 => SessionState::BoundTx,
            3 => SessionState::BoundRx,
            4 => SessionState::BoundTrx,
            _ => unreachable!("StateMachine only ever stores the five SessionState encodings"),
        }
    }
}

/// Error raised by an out-of-sequence state transition or capability check.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("invalid transition from {from:?}: {attempted}")]
    InvalidTransition {
        from: SessionState,
        attempted: &'static str,
    },

    #[error("session is not bound as transmitter (current state: {0:?})")]
    NotTransmitter(SessionState),

    #[error("session is not bound as receiver (current state: {0:?})")]
    NotReceiver(SessionState),
}

impl StateError {
    /// The command_status a dispatcher should reply with for this error.
    pub fn command_status(&self) -> CommandStatus {
        CommandStatus::IncorrectBindStatus
    }
}

/// Guards transitions between [`SessionState`] values.
///
/// Reads of the current state are lock-free; transitions take a mutex so
/// that two callers racing to bind or unbind the same session can't both
/// succeed.
#[derive(Debug)]
pub struct StateMachine {
    state: AtomicU8,
    transition_lock: Mutex<()>,
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StateMachine {
    /// A state machine starting in `Closed`.
    pub fn new() -> StateMachine {
        StateMachine {
            state: AtomicU8::new(SessionState::Closed.to_u8()),
            transition_lock: Mutex::new(()),
        }
    }

    /// The current state. Does not take the transition lock.
    pub fn state(&self) -> SessionState {
        SessionState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// `Closed -> Open`, on TCP connection establishment.
    pub fn on_connect(&self) -> Result<(), StateError> {
        let _guard = self.transition_lock.lock().unwrap();
        let current = self.state();
        if current != SessionState::Closed {
            return Err(StateError::InvalidTransition {
                from: current,
                attempted: "connect",
            });
        }
        self.state.store(SessionState::Open.to_u8(), Ordering::Release);
        Ok(())
    }

    /// `Open -> BOUND_*`, on a successful bind.
    pub fn on_bind(&self, bind_type: BindType) -> Result<(), StateError> {
        let _guard = self.transition_lock.lock().unwrap();
        let current = self.state();
        if current != SessionState::Open {
            return Err(StateError::InvalidTransition {
                from: current,
                attempted: "bind",
            });
        }
        self.state
            .store(SessionState::from_bind_type(bind_type).to_u8(), Ordering::Release);
        Ok(())
    }

    /// `BOUND_* -> Closed`, on a completed unbind exchange.
    pub fn on_unbind(&self) -> Result<(), StateError> {
        let _guard = self.transition_lock.lock().unwrap();
        let current = self.state();
        if !matches!(
            current,
            SessionState::BoundTx | SessionState::BoundRx | SessionState::BoundTrx
        ) {
            return Err(StateError::InvalidTransition {
                from: current,
                attempted: "unbind",
            });
        }
        self.state.store(SessionState::Closed.to_u8(), Ordering::Release);
        Ok(())
    }

    /// Any state -> Closed. Always succeeds; closing an already-closed
    /// session is a no-op.
    pub fn on_close(&self) {
        let _guard = self.transition_lock.lock().unwrap();
        self.state.store(SessionState::Closed.to_u8(), Ordering::Release);
    }

    /// Fails unless the session is currently allowed to transmit.
    pub fn validate_can_transmit(&self) -> Result<(), StateError> {
        let current = self.state();
        if current.can_transmit() {
            Ok(())
        } else {
            Err(StateError::NotTransmitter(current))
        }
    }

    /// Fails unless the session is currently allowed to receive.
    pub fn validate_can_receive(&self) -> Result<(), StateError> {
        let current = self.state();
        if current.can_receive() {
            Ok(())
        } else {
            Err(StateError::NotReceiver(current))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_machine_starts_closed() {
        let sm = StateMachine::new();
        assert_eq!(sm.state(), SessionState::Closed);
    }

    #[test]
    fn full_lifecycle_transceiver() {
        let sm = StateMachine::new();
        sm.on_connect().unwrap();
        assert_eq!(sm.state(), SessionState::Open);
        sm.on_bind(BindType::Transceiver).unwrap();
        assert_eq!(sm.state(), SessionState::BoundTrx);
        assert!(sm.validate_can_transmit().is_ok());
        assert!(sm.validate_can_receive().is_ok());
        sm.on_unbind().unwrap();
        assert_eq!(sm.state(), SessionState::Closed);
    }

    #[test]
    fn bind_before_connect_fails() {
        let sm = StateMachine::new();
        let err = sm.on_bind(BindType::Transmitter).unwrap_err();
        assert_eq!(
            err,
            StateError::InvalidTransition {
                from: SessionState::Closed,
                attempted: "bind"
            }
        );
    }

    #[test]
    fn submit_before_bind_is_rejected() {
        let sm = StateMachine::new();
        sm.on_connect().unwrap();
        let err = sm.validate_can_transmit().unwrap_err();
        assert_eq!(err.command_status(), CommandStatus::IncorrectBindStatus);
    }

    #[test]
    fn receiver_cannot_transmit() {
        let sm = StateMachine::new();
        sm.on_connect().unwrap();
        sm.on_bind(BindType::Receiver).unwrap();
        assert!(sm.validate_can_transmit().is_err());
        assert!(sm.validate_can_receive().is_ok());
    }

    #[test]
    fn close_from_any_state_always_succeeds() {
        for start in [
            SessionState::Closed,
            SessionState::Open,
            SessionState::BoundTx,
            SessionState::BoundRx,
            SessionState::BoundTrx,
        ] {
            let sm = StateMachine::new();
            sm.state.store(start.to_u8(), Ordering::Release);
            sm.on_close();
            assert_eq!(sm.state(), SessionState::Closed);
        }
    }

    #[test]
    fn unbind_without_bind_fails() {
        let sm = StateMachine::new();
        sm.on_connect().unwrap();
        assert!(sm.on_unbind().is_err());
    }
}
