#![forbid(unsafe_code)]

//! Observable single-value containers.
//!
//! A container holds one value and one observer. Reads report the current
//! value to the observer, writes report either a change `(old, new)` or an
//! equal write, depending on deep (`PartialEq`) comparison with the stored
//! value.
//!
//! - [`ObservableValue`]: owned container, mutated through `&mut self`.
//! - [`SharedObservable`]: `Rc` handle variant whose hooks may re-enter the
//!   container.
//! - [`ChangeObserver`]: the hook set. [`NopObserver`] is installed when the
//!   caller supplies none.
//!
//! ```
//! use std::rc::Rc;
//! use peek_core::{ObservableValue, ObserverEvent, RecordingObserver};
//!
//! let rec = Rc::new(RecordingObserver::new());
//! let mut value = ObservableValue::with_observer(11, Rc::clone(&rec));
//! assert_eq!(value.get(), 11);
//! value.set(3);
//! assert_eq!(
//!     rec.events(),
//!     vec![ObserverEvent::Get(11), ObserverEvent::Change(11, 3)]
//! );
//! ```
//!
//! Nothing here is synchronized; share a container across threads only
//! behind an external lock.

pub mod config;
pub mod observable;
pub mod observer;
pub mod shared;

pub use config::{EqualWritePolicy, ObservableConfig, ParsePolicyError};
pub use observable::ObservableValue;
#[cfg(feature = "tracing")]
pub use observer::TracingObserver;
pub use observer::{ChangeObserver, FnObserver, NopObserver, ObserverEvent, RecordingObserver};
pub use shared::SharedObservable;
