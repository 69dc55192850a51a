#![forbid(unsafe_code)]

//! Observer hooks invoked by an observable container.
//!
//! A [`ChangeObserver`] receives three kinds of notification:
//!
//! | Hook          | Fired by                                   |
//! |---------------|--------------------------------------------|
//! | `on_get`      | every read, with the current value         |
//! | `on_set`      | a write whose value equals the stored one  |
//! | `on_change`   | a write that changed the value, `(old, new)` |
//!
//! Every hook has an empty default body, so an observer only implements the
//! hooks it cares about. [`NopObserver`] implements none of them and is the
//! observer installed when the caller supplies none.
//!
//! Hooks take `&self`. Observers that accumulate state use interior
//! mutability, as [`RecordingObserver`] does.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Capability set invoked synchronously by an observable container.
///
/// Hooks run to completion on the calling thread before the triggering
/// operation returns. A panic inside a hook propagates to the caller of the
/// read or write that fired it.
pub trait ChangeObserver<T: ?Sized> {
    /// A write supplied a value equal to the stored one.
    fn on_set(&self, value: &T) {
        let _ = value;
    }

    /// The value is being read.
    fn on_get(&self, value: &T) {
        let _ = value;
    }

    /// The stored value was replaced by an unequal one.
    ///
    /// Called after the new value is committed.
    fn on_change(&self, old: &T, new: &T) {
        let _ = (old, new);
    }
}

impl<T: ?Sized, O: ChangeObserver<T> + ?Sized> ChangeObserver<T> for &O {
    fn on_set(&self, value: &T) {
        (**self).on_set(value);
    }

    fn on_get(&self, value: &T) {
        (**self).on_get(value);
    }

    fn on_change(&self, old: &T, new: &T) {
        (**self).on_change(old, new);
    }
}

impl<T: ?Sized, O: ChangeObserver<T> + ?Sized> ChangeObserver<T> for Rc<O> {
    fn on_set(&self, value: &T) {
        (**self).on_set(value);
    }

    fn on_get(&self, value: &T) {
        (**self).on_get(value);
    }

    fn on_change(&self, old: &T, new: &T) {
        (**self).on_change(old, new);
    }
}

impl<T: ?Sized, O: ChangeObserver<T> + ?Sized> ChangeObserver<T> for Box<O> {
    fn on_set(&self, value: &T) {
        (**self).on_set(value);
    }

    fn on_get(&self, value: &T) {
        (**self).on_get(value);
    }

    fn on_change(&self, old: &T, new: &T) {
        (**self).on_change(old, new);
    }
}

// ---------------------------------------------------------------------------
// NopObserver
// ---------------------------------------------------------------------------

/// Observer whose hooks do nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NopObserver;

impl<T: ?Sized> ChangeObserver<T> for NopObserver {}

// ---------------------------------------------------------------------------
// FnObserver
// ---------------------------------------------------------------------------

type ValueHook<T> = Box<dyn Fn(&T)>;
type ChangeHook<T> = Box<dyn Fn(&T, &T)>;

/// Observer assembled from closures.
///
/// Any subset of hooks may be supplied; the rest are no-ops.
///
/// ```
/// use peek_core::{FnObserver, ObservableValue};
///
/// let observer = FnObserver::new().when_changed(|old: &i32, new: &i32| {
///     println!("{old} -> {new}");
/// });
/// let mut value = ObservableValue::with_observer(1, observer);
/// value.set(2);
/// ```
pub struct FnObserver<T: ?Sized> {
    set: Option<ValueHook<T>>,
    get: Option<ValueHook<T>>,
    change: Option<ChangeHook<T>>,
}

impl<T: ?Sized> FnObserver<T> {
    /// Create an observer with no hooks installed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            set: None,
            get: None,
            change: None,
        }
    }

    /// Install the equal-write hook.
    #[must_use]
    pub fn when_set(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.set = Some(Box::new(f));
        self
    }

    /// Install the read hook.
    #[must_use]
    pub fn when_get(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.get = Some(Box::new(f));
        self
    }

    /// Install the change hook.
    #[must_use]
    pub fn when_changed(mut self, f: impl Fn(&T, &T) + 'static) -> Self {
        self.change = Some(Box::new(f));
        self
    }
}

impl<T: ?Sized> Default for FnObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ?Sized> fmt::Debug for FnObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver")
            .field("set", &self.set.is_some())
            .field("get", &self.get.is_some())
            .field("change", &self.change.is_some())
            .finish()
    }
}

impl<T: ?Sized> ChangeObserver<T> for FnObserver<T> {
    fn on_set(&self, value: &T) {
        if let Some(f) = &self.set {
            f(value);
        }
    }

    fn on_get(&self, value: &T) {
        if let Some(f) = &self.get {
            f(value);
        }
    }

    fn on_change(&self, old: &T, new: &T) {
        if let Some(f) = &self.change {
            f(old, new);
        }
    }
}

// ---------------------------------------------------------------------------
// RecordingObserver
// ---------------------------------------------------------------------------

/// One hook invocation captured by [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq)]
pub enum ObserverEvent<T> {
    /// `on_set(value)`.
    Set(T),
    /// `on_get(value)`.
    Get(T),
    /// `on_change(old, new)`.
    Change(T, T),
}

/// Observer that clones every notified value into an in-memory log.
///
/// Share it through an `Rc` to inspect the log while a container owns it.
#[derive(Debug)]
pub struct RecordingObserver<T> {
    events: RefCell<Vec<ObserverEvent<T>>>,
}

impl<T: Clone> RecordingObserver<T> {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Snapshot of all events recorded so far, in call order.
    #[must_use]
    pub fn events(&self) -> Vec<ObserverEvent<T>> {
        self.events.borrow().clone()
    }

    /// Drain the log.
    pub fn take(&self) -> Vec<ObserverEvent<T>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Total number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Number of `on_set` calls.
    #[must_use]
    pub fn set_count(&self) -> usize {
        self.count(|e| matches!(e, ObserverEvent::Set(_)))
    }

    /// Number of `on_get` calls.
    #[must_use]
    pub fn get_count(&self) -> usize {
        self.count(|e| matches!(e, ObserverEvent::Get(_)))
    }

    /// Number of `on_change` calls.
    #[must_use]
    pub fn change_count(&self) -> usize {
        self.count(|e| matches!(e, ObserverEvent::Change(..)))
    }

    fn count(&self, pred: impl Fn(&ObserverEvent<T>) -> bool) -> usize {
        self.events.borrow().iter().filter(|e| pred(e)).count()
    }

    fn push(&self, event: ObserverEvent<T>) {
        self.events.borrow_mut().push(event);
    }
}

impl<T: Clone> Default for RecordingObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> ChangeObserver<T> for RecordingObserver<T> {
    fn on_set(&self, value: &T) {
        self.push(ObserverEvent::Set(value.clone()));
    }

    fn on_get(&self, value: &T) {
        self.push(ObserverEvent::Get(value.clone()));
    }

    fn on_change(&self, old: &T, new: &T) {
        self.push(ObserverEvent::Change(old.clone(), new.clone()));
    }
}

// ---------------------------------------------------------------------------
// TracingObserver
// ---------------------------------------------------------------------------

/// Observer that emits one `tracing` event per hook.
///
/// Reads and equal writes are logged at `TRACE`, changes at `DEBUG`. The
/// `name` field identifies the container in the output.
#[cfg(feature = "tracing")]
#[derive(Debug, Clone)]
pub struct TracingObserver {
    name: std::borrow::Cow<'static, str>,
}

#[cfg(feature = "tracing")]
impl TracingObserver {
    /// Create a tracing observer labelled `name`.
    #[must_use]
    pub fn new(name: impl Into<std::borrow::Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }

    /// Label attached to every emitted event.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(feature = "tracing")]
impl<T: fmt::Debug + ?Sized> ChangeObserver<T> for TracingObserver {
    fn on_set(&self, value: &T) {
        tracing::trace!(observable = %self.name, ?value, "on_set");
    }

    fn on_get(&self, value: &T) {
        tracing::trace!(observable = %self.name, ?value, "on_get");
    }

    fn on_change(&self, old: &T, new: &T) {
        tracing::debug!(observable = %self.name, ?old, ?new, "on_change");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
