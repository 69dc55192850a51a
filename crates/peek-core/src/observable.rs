#![forbid(unsafe_code)]

//! Observable value container with read, write and change hooks.
//!
//! # Design
//!
//! [`ObservableValue<T, O>`] owns exactly one value of type `T` and exactly one
//! observer `O: ChangeObserver<T>`. When no observer is supplied the container
//! holds a [`NopObserver`], so reads and writes never branch on "is there an
//! observer".
//!
//! | Operation      | Hook fired                                        |
//! |----------------|---------------------------------------------------|
//! | `get`, `with`  | `on_get(current)`, exactly once, before returning |
//! | `set(v)`, `v != current` | `on_change(old, v)` after `v` is stored  |
//! | `set(v)`, `v == current` | depends on [`EqualWritePolicy`]          |
//!
//! Equality is `PartialEq`. For `Vec`, `HashMap`, `Box`, `Rc`, tuples and
//! derived structs this compares contents, so two separately allocated values
//! with equal contents are equal.
//!
//! # Invariants
//!
//! 1. The container always holds a value; there is no empty state.
//! 2. `version` starts at 0 and increments by exactly 1 per committed change.
//! 3. Reads never mutate the value or the version.
//! 4. `on_change` fires exactly once per unequal write, after the mutation.
//!
//! # Failure Modes
//!
//! - **Non-reflexive equality**: a value for which `v != v` (such as
//!   `f64::NAN`) never compares equal, so every write of it is a change.
//! - **Panicking hook**: the panic unwinds out of `get`/`set`. A write has
//!   already committed the new value before `on_change` runs.
//! - **Panicking `update` closure**: whatever the closure changed before
//!   panicking stays in the container, but the version is not bumped and no
//!   hook fires.

use std::fmt;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::config::{EqualWritePolicy, ObservableConfig};
use crate::observer::{ChangeObserver, NopObserver};

/// A single value paired with the observer notified about its reads and
/// writes.
///
/// Not synchronized. Wrap the whole container in a lock to share it across
/// threads.
pub struct ObservableValue<T, O = NopObserver> {
    value: T,
    version: u64,
    observer: O,
    config: ObservableConfig,
}

impl<T> ObservableValue<T> {
    /// Create a container with no observer.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_observer(value, NopObserver)
    }
}

impl<T, O: ChangeObserver<T>> ObservableValue<T, O> {
    /// Create a container that reports to `observer`.
    #[must_use]
    pub fn with_observer(value: T, observer: O) -> Self {
        Self::with_config(value, observer, ObservableConfig::default())
    }

    /// Create a container with an explicit configuration.
    #[must_use]
    pub fn with_config(value: T, observer: O, config: ObservableConfig) -> Self {
        Self {
            value,
            version: 0,
            observer,
            config,
        }
    }

    /// Get a clone of the current value.
    ///
    /// Fires `on_get` with the current value first.
    #[must_use]
    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.observer.on_get(&self.value);
        self.value.clone()
    }

    /// Read the current value by reference.
    ///
    /// Counts as a read: `on_get` fires once before `f` runs.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        self.observer.on_get(&self.value);
        f(&self.value)
    }

    /// Write a new value.
    ///
    /// If `value` differs from the stored value, it is stored, the version is
    /// bumped, and `on_change(old, new)` fires. Otherwise the configured
    /// [`EqualWritePolicy`] applies and the version is left alone.
    pub fn set(&mut self, value: T)
    where
        T: PartialEq,
    {
        if self.value == value {
            self.apply_equal_write(value);
            return;
        }
        let old = std::mem::replace(&mut self.value, value);
        self.version += 1;
        #[cfg(feature = "tracing")]
        trace!(version = self.version, "observable value changed");
        self.observer.on_change(&old, &self.value);
    }

    /// Modify the value in place.
    ///
    /// The value is compared against a snapshot taken before `f` runs; a
    /// difference is handled exactly like an unequal [`set`](Self::set). When
    /// nothing changed, [`EqualWritePolicy::Notify`] fires `on_set` with the
    /// current value and [`EqualWritePolicy::Replace`] fires nothing.
    pub fn update(&mut self, f: impl FnOnce(&mut T))
    where
        T: Clone + PartialEq,
    {
        let old = self.value.clone();
        f(&mut self.value);
        if self.value == old {
            if self.config.equal_write == EqualWritePolicy::Notify {
                self.observer.on_set(&self.value);
            }
            return;
        }
        self.version += 1;
        #[cfg(feature = "tracing")]
        trace!(version = self.version, "observable value updated");
        self.observer.on_change(&old, &self.value);
    }

    fn apply_equal_write(&mut self, value: T) {
        match self.config.equal_write {
            EqualWritePolicy::Notify => {
                #[cfg(feature = "tracing")]
                trace!(version = self.version, "equal write, notifying");
                self.observer.on_set(&value);
            }
            EqualWritePolicy::Replace => {
                #[cfg(feature = "tracing")]
                trace!(version = self.version, "equal write, replacing silently");
                self.value = value;
            }
        }
    }

    /// Number of committed changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The observer this container reports to.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The configuration chosen at construction.
    #[must_use]
    pub fn config(&self) -> &ObservableConfig {
        &self.config
    }

    /// Consume the container and return the stored value. Fires no hook.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> From<T> for ObservableValue<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T: Default> Default for ObservableValue<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug, O> fmt::Debug for ObservableValue<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObservableValue")
            .field("value", &self.value)
            .field("version", &self.version)
            .field("equal_write", &self.config.equal_write)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
