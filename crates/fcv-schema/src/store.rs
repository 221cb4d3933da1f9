//! # Schema Store
//!
//! Loads the reference schema at most once per store and hands out the same
//! `Arc<Schema>` to every caller afterwards.
//!
//! ## State Machine
//!
//! ```text
//! Unconfigured ──load──▶ Configuring ──ok──▶ Ready
//!       ▲                     │
//!       └────────err──────────┘
//! ```
//!
//! The loader runs outside the lock. Callers arriving while another caller is
//! `Configuring` block on a condition variable and then observe the result,
//! so the schema is never parsed twice and never read half-built. A failed
//! load returns the store to `Unconfigured`; the next call retries.
//!
//! Once `Ready`, further `load` calls are an idempotent no-op: the cached
//! schema is returned even if a different source is requested.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex};

use crate::error::SchemaStoreError;
use crate::schema::{Schema, SchemaSource};

#[derive(Debug)]
enum State {
    Unconfigured,
    Configuring,
    Ready(Arc<Schema>),
}

/// Observable state of a [`SchemaStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    /// No schema loaded yet, and no load in progress.
    Unconfigured,
    /// A caller is currently loading the schema.
    Configuring,
    /// A schema is cached and shared read-only.
    Ready,
}

/// Exactly-once holder for the compiled reference schema.
#[derive(Debug)]
pub struct SchemaStore {
    state: Mutex<State>,
    transition: Condvar,
}

impl Default for SchemaStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemaStore {
    /// Create an unconfigured store.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::Unconfigured),
            transition: Condvar::new(),
        }
    }

    /// Current state of the store.
    pub fn status(&self) -> StoreStatus {
        match &*self.state.lock() {
            State::Unconfigured => StoreStatus::Unconfigured,
            State::Configuring => StoreStatus::Configuring,
            State::Ready(_) => StoreStatus::Ready,
        }
    }

    /// The cached schema, if the store is ready.
    pub fn get(&self) -> Option<Arc<Schema>> {
        match &*self.state.lock() {
            State::Ready(schema) => Some(Arc::clone(schema)),
            _ => None,
        }
    }

    /// Load the schema from `source`, or return the cached one.
    ///
    /// # Errors
    ///
    /// Returns the [`SchemaStoreError`] from [`Schema::load`] if this call
    /// performed the load and it failed.
    pub fn load(&self, source: SchemaSource) -> Result<Arc<Schema>, SchemaStoreError> {
        let schema = self.get_or_load_with(|| Schema::load(&source))?;
        if schema.source() != &source {
            tracing::debug!(
                requested = %source,
                active = %schema.source(),
                "schema store already configured; ignoring requested source"
            );
        }
        Ok(schema)
    }

    /// Return the cached schema, or run `loader` exactly once to produce it.
    ///
    /// Concurrent callers never run `loader` twice: while one caller is
    /// loading, the others wait for it to finish. If `loader` fails or
    /// panics, the store goes back to `Unconfigured` and waiters retry.
    pub fn get_or_load_with<F>(&self, loader: F) -> Result<Arc<Schema>, SchemaStoreError>
    where
        F: FnOnce() -> Result<Schema, SchemaStoreError>,
    {
        let mut state = self.state.lock();
        loop {
            if let State::Ready(schema) = &*state {
                return Ok(Arc::clone(schema));
            }
            if matches!(*state, State::Configuring) {
                self.transition.wait(&mut state);
                continue;
            }
            break;
        }
        *state = State::Configuring;
        drop(state);

        let mut guard = ConfiguringGuard {
            store: self,
            finished: false,
        };
        let result = loader();
        guard.finished = true;

        let mut state = self.state.lock();
        let outcome = match result {
            Ok(schema) => {
                tracing::info!(source = %schema.source(), "reference schema loaded");
                let schema = Arc::new(schema);
                *state = State::Ready(Arc::clone(&schema));
                Ok(schema)
            }
            Err(e) => {
                tracing::error!(error = %e, "reference schema failed to load");
                *state = State::Unconfigured;
                Err(e)
            }
        };
        drop(state);
        self.transition.notify_all();
        outcome
    }
}

/// Resets a store stuck in `Configuring` if the loader unwinds.
struct ConfiguringGuard<'a> {
    store: &'a SchemaStore,
    finished: bool,
}

impl Drop for ConfiguringGuard<'_> {
    fn drop(&mut self) {
        if !self.finished {
            *self.store.state.lock() = State::Unconfigured;
            self.store.transition.notify_all();
        }
    }
}
