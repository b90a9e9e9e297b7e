//! Host-driven lifecycle state machine.
//!
//! ```text
//! Uninitialized ──init──► Inactive ──activate──► ActiveIdle ──start_processing──► Processing
//!                            ▲                       │  ▲                             │
//!                            └──────deactivate───────┘  └───────stop_processing───────┘
//! ```
//!
//! The state lives in an `AtomicU8` and every transition is a single
//! compare-and-swap, so the main thread (activate/deactivate) and the audio
//! thread (start/stop processing) can both drive it without locks. An
//! illegal transition leaves the state untouched and returns
//! [`LifecycleError`]; the shells report it and carry on.

use std::sync::atomic::{AtomicU8, Ordering};

use crate::error::LifecycleError;

/// Where a plugin instance is in its host-driven lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LifecycleState {
    /// Constructed, not yet initialized.
    Uninitialized = 0,
    /// Initialized; sample rate unknown or stale.
    Inactive = 1,
    /// Sample rate fixed, engine reset and seeded, no blocks running.
    ActiveIdle = 2,
    /// Blocks are being rendered.
    Processing = 3,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => LifecycleState::Inactive,
            2 => LifecycleState::ActiveIdle,
            3 => LifecycleState::Processing,
            _ => LifecycleState::Uninitialized,
        }
    }

    /// Whether the instance is activated (idle or processing).
    pub fn is_active(self) -> bool {
        matches!(self, LifecycleState::ActiveIdle | LifecycleState::Processing)
    }
}

/// Lock-free lifecycle cell for one plugin instance.
#[derive(Debug)]
pub struct Lifecycle {
    state: AtomicU8,
}

impl Lifecycle {
    /// A fresh, uninitialized instance.
    pub fn new() -> Self {
        Self {
            state: AtomicU8::new(LifecycleState::Uninitialized as u8),
        }
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn transition(&self, from: LifecycleState, to: LifecycleState) -> Result<(), LifecycleError> {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| ())
            .map_err(|actual| LifecycleError::IllegalTransition {
                from: LifecycleState::from_u8(actual),
                to,
            })
    }

    /// `Uninitialized → Inactive`.
    pub fn init(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Uninitialized, LifecycleState::Inactive)
    }

    /// `Inactive → ActiveIdle`.
    pub fn activate(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Inactive, LifecycleState::ActiveIdle)
    }

    /// `ActiveIdle → Inactive`.
    pub fn deactivate(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::ActiveIdle, LifecycleState::Inactive)
    }

    /// `ActiveIdle → Processing`.
    pub fn start_processing(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::ActiveIdle, LifecycleState::Processing)
    }

    /// `Processing → ActiveIdle`.
    pub fn stop_processing(&self) -> Result<(), LifecycleError> {
        self.transition(LifecycleState::Processing, LifecycleState::ActiveIdle)
    }

    /// Check that a reset is legal (only while active).
    pub fn check_reset(&self) -> Result<(), LifecycleError> {
        let state = self.state();
        if state.is_active() {
            Ok(())
        } else {
            Err(LifecycleError::ResetWhileInactive(state))
        }
    }

    /// Check that the instance may be destroyed (not active).
    pub fn check_destroy(&self) -> Result<(), LifecycleError> {
        let state = self.state();
        if state.is_active() {
            Err(LifecycleError::DestroyWhileActive(state))
        } else {
            Ok(())
        }
    }

    /// Whether blocks may be rendered right now.
    pub fn is_processing(&self) -> bool {
        self.state() == LifecycleState::Processing
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}
