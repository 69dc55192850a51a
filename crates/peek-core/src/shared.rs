#![forbid(unsafe_code)]

//! Shared-handle variant of the observable container.
//!
//! # Design
//!
//! [`SharedObservable<T, O>`] keeps the value in reference-counted storage
//! (`Rc` + `RefCell`). Cloning the handle does not clone the value: every
//! clone reads and writes the same value, version and observer.
//!
//! Hooks of `get`, `with`, `set` and `update` run with no `RefCell` borrow
//! held, on clones of the values involved. A hook may therefore read or write the same
//! container through another handle; a read from inside `on_change` observes
//! the value that was just committed.
//!
//! # Failure Modes
//!
//! - **Write during `with` or `update`**: the closure passed to
//!   [`with`](SharedObservable::with) runs under a shared borrow and the one
//!   passed to [`update`](SharedObservable::update) under an exclusive borrow.
//!   Writing to the container from inside either closure panics (RefCell
//!   borrow rules). Hooks are never called under a borrow.
//! - **Panicking `update` closure**: whatever `f` changed before panicking
//!   stays in the container, but the version is not bumped and no hook
//!   fires.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "tracing")]
use tracing::trace;

use crate::config::{EqualWritePolicy, ObservableConfig};
use crate::observer::{ChangeObserver, NopObserver};

struct SharedInner<T, O> {
    value: RefCell<T>,
    version: Cell<u64>,
    observer: O,
    config: ObservableConfig,
}

/// Cloneable, single-threaded handle to one observed value.
pub struct SharedObservable<T, O = NopObserver> {
    inner: Rc<SharedInner<T, O>>,
}

// Manual Clone: shares the same Rc.
impl<T, O> Clone for SharedObservable<T, O> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq> SharedObservable<T> {
    /// Create a shared container with no observer.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::with_observer(value, NopObserver)
    }
}

impl<T: Clone + PartialEq, O: ChangeObserver<T>> SharedObservable<T, O> {
    /// Create a shared container that reports to `observer`.
    #[must_use]
    pub fn with_observer(value: T, observer: O) -> Self {
        Self::with_config(value, observer, ObservableConfig::default())
    }

    /// Create a shared container with an explicit configuration.
    #[must_use]
    pub fn with_config(value: T, observer: O, config: ObservableConfig) -> Self {
        Self {
            inner: Rc::new(SharedInner {
                value: RefCell::new(value),
                version: Cell::new(0),
                observer,
                config,
            }),
        }
    }

    /// Get a clone of the current value, firing `on_get` with it first.
    #[must_use]
    pub fn get(&self) -> T {
        let value = self.inner.value.borrow().clone();
        self.inner.observer.on_get(&value);
        value
    }

    /// Read the current value by reference. Fires `on_get` once, on a
    /// clone, before `f` borrows the stored value.
    ///
    /// If the `on_get` hook writes to this container, `f` sees the written
    /// value.
    ///
    /// # Panics
    ///
    /// Panics if `f` writes to this container.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let snapshot = self.inner.value.borrow().clone();
        self.inner.observer.on_get(&snapshot);
        f(&self.inner.value.borrow())
    }

    /// Write a new value. Same contract as
    /// [`ObservableValue::set`](crate::ObservableValue::set).
    pub fn set(&self, value: T) {
        let old = {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                match self.inner.config.equal_write {
                    EqualWritePolicy::Notify => {
                        drop(current);
                        self.inner.observer.on_set(&value);
                    }
                    EqualWritePolicy::Replace => *current = value,
                }
                return;
            }
            std::mem::replace(&mut *current, value)
        };
        self.bump_version();
        let new = self.inner.value.borrow().clone();
        self.inner.observer.on_change(&old, &new);
    }

    /// Modify the value in place. Same contract as
    /// [`ObservableValue::update`](crate::ObservableValue::update).
    ///
    /// # Panics
    ///
    /// Panics if `f` reads or writes this container.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let (old, new) = {
            let mut current = self.inner.value.borrow_mut();
            let old = current.clone();
            f(&mut current);
            (old, current.clone())
        };
        if new == old {
            if self.inner.config.equal_write == EqualWritePolicy::Notify {
                self.inner.observer.on_set(&new);
            }
            return;
        }
        self.bump_version();
        self.inner.observer.on_change(&old, &new);
    }

    fn bump_version(&self) {
        let version = self.inner.version.get() + 1;
        self.inner.version.set(version);
        #[cfg(feature = "tracing")]
        trace!(version, "shared observable value changed");
    }

    /// Number of committed changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// The observer shared by all handles.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.inner.observer
    }

    /// The configuration chosen at construction.
    #[must_use]
    pub fn config(&self) -> &ObservableConfig {
        &self.inner.config
    }

    /// Number of live handles to this container.
    #[must_use]
    pub fn handle_count(&self) -> usize {
        Rc::strong_count(&self.inner)
    }
}

impl<T: fmt::Debug, O> fmt::Debug for SharedObservable<T, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("SharedObservable");
        match self.inner.value.try_borrow() {
            Ok(value) => s.field("value", &*value),
            Err(_) => s.field("value", &format_args!("<borrowed>")),
        };
        s.field("version", &self.inner.version.get())
            .field("handles", &Rc::strong_count(&self.inner))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{FnObserver, ObserverEvent, RecordingObserver};

    #[test]
    fn clone_shares_state() {
        let a = SharedObservable::new(0);
        let b = a.clone();
        assert_eq!(a.handle_count(), 2);

        a.set(42);
        assert_eq!(b.get(), 42);
        assert_eq!(b.version(), 1);

        b.set(99);
        assert_eq!(a.get(), 99);
        assert_eq!(a.version(), 2);
    }

    #[test]
    fn clone_shares_observer() {
        let rec = Rc::new(RecordingObserver::new());
        let a = SharedObservable::with_observer(1, Rc::clone(&rec));
        let b = a.clone();
        b.set(2);
        let _ = a.get();
        assert_eq!(
            rec.events(),
            vec![ObserverEvent::Change(1, 2), ObserverEvent::Get(2)]
        );
    }

    #[test]
    fn reentrant_read_in_change_hook_sees_new_value() {
        let slot: Rc<RefCell<Option<SharedObservable<i32, FnObserver<i32>>>>> =
            Rc::new(RefCell::new(None));
        let seen = Rc::new(Cell::new(0));

        let slot_hook = Rc::clone(&slot);
        let seen_hook = Rc::clone(&seen);
        let observer = FnObserver::new().when_changed(move |_old: &i32, _new: &i32| {
            if let Some(handle) = slot_hook.borrow().as_ref() {
                seen_hook.set(handle.get());
            }
        });

        let obs = SharedObservable::with_observer(11, observer);
        *slot.borrow_mut() = Some(obs.clone());
        obs.set(3);
        assert_eq!(seen.get(), 3);

        // Break the Rc cycle.
        slot.borrow_mut().take();
    }

    #[test]
    fn equal_write_policies() {
        let rec = Rc::new(RecordingObserver::new());
        let notify = SharedObservable::with_observer(vec![1, 2, 3], Rc::clone(&rec));
        notify.set(vec![1, 2, 3]);
        assert_eq!(rec.take(), vec![ObserverEvent::Set(vec![1, 2, 3])]);
        assert_eq!(notify.version(), 0);

        let replace = SharedObservable::with_config(
            vec![1, 2, 3],
            Rc::clone(&rec),
            ObservableConfig::new(EqualWritePolicy::Replace),
        );
        replace.set(vec![1, 2, 3]);
        assert!(rec.is_empty());
        assert_eq!(replace.get(), vec![1, 2, 3]);
    }

    #[test]
    fn write_from_get_hook_during_with() {
        let slot: Rc<RefCell<Option<SharedObservable<i32, FnObserver<i32>>>>> =
            Rc::new(RefCell::new(None));
        let slot_hook = Rc::clone(&slot);
        let observer = FnObserver::new().when_get(move |v: &i32| {
            if *v == 1
                && let Some(handle) = slot_hook.borrow().as_ref()
            {
                handle.set(2);
            }
        });

        let obs = SharedObservable::with_observer(1, observer);
        *slot.borrow_mut() = Some(obs.clone());
        let seen = obs.with(|v| *v);
        assert_eq!(seen, 2);
        assert_eq!(obs.version(), 1);

        slot.borrow_mut().take();
    }

    #[test]
    fn panicking_update_keeps_partial_change_without_notifying() {
        let rec = Rc::new(RecordingObserver::new());
        let obs = SharedObservable::with_observer(vec![1, 2, 3], Rc::clone(&rec));
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            obs.update(|v| {
                v.push(4);
                panic!("halfway");
            });
        }));
        assert!(result.is_err());
        assert_eq!(obs.version(), 0);
        assert_eq!(rec.change_count(), 0);
        assert_eq!(obs.get(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn update_notifies_change() {
        let rec = Rc::new(RecordingObserver::new());
        let obs = SharedObservable::with_observer(String::from("a"), Rc::clone(&rec));
        obs.update(|s| s.push('b'));
        assert_eq!(
            rec.take(),
            vec![ObserverEvent::Change("a".to_string(), "ab".to_string())]
        );
        assert_eq!(obs.version(), 1);
    }

    #[test]
    fn debug_format_while_borrowed() {
        let obs = SharedObservable::new(7);
        assert!(format!("{obs:?}").contains('7'));

        let mut during_update = String::new();
        obs.update(|_| during_update = format!("{obs:?}"));
        assert!(during_update.contains("<borrowed>"));

        let during_read = obs.with(|_| format!("{obs:?}"));
        assert!(during_read.contains('7'));
    }
}
