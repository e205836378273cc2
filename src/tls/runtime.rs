//! Process-wide TLS runtime state
//!
//! The underlying library needs its algorithm and error-string tables loaded
//! once per process before the first handshake. [`TlsRuntime`] tracks that
//! as an explicit state machine; the mutex guards the state transition only
//! and is never held across a handshake.

use log::debug;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lifecycle of the TLS runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuntimeState {
    /// No initialization attempted yet
    Uninitialized,
    /// An initializer is running (or panicked while running)
    Initializing,
    /// Library tables loaded, handshakes may proceed
    Ready,
}

/// Run-once initialization guard
pub struct TlsRuntime {
    state: Mutex<RuntimeState>,
}

static GLOBAL: TlsRuntime = TlsRuntime::new();

impl TlsRuntime {
    pub const fn new() -> Self {
        TlsRuntime {
            state: Mutex::new(RuntimeState::Uninitialized),
        }
    }

    /// The runtime shared by every connector in the process
    pub fn global() -> &'static TlsRuntime {
        &GLOBAL
    }

    /// Current state
    pub fn state(&self) -> RuntimeState {
        *self.lock()
    }

    /// Run `init` unless the runtime is already ready
    ///
    /// Concurrent callers block on the lock while the first one runs `init`,
    /// then observe `Ready` and return without calling their own initializer.
    /// An initializer that panicked leaves the state at `Initializing`, so
    /// the next caller tries again.
    pub fn ensure_ready<F: FnOnce()>(&self, init: F) {
        let mut state = self.lock();
        if *state == RuntimeState::Ready {
            return;
        }

        *state = RuntimeState::Initializing;
        debug!("initializing TLS library");
        init();
        *state = RuntimeState::Ready;
    }

    fn lock(&self) -> MutexGuard<'_, RuntimeState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for TlsRuntime {
    fn default() -> Self {
        Self::new()
    }
}
