//! # signalkit
//!
//! Cold signals and terminal-state subscribers for event-driven applications.
//!
//! The core of the crate is [`Subscriber`], a sink that receives any number of
//! values followed by at most one terminal event (an error or a completion), and
//! that owns the disposal handle of the producer feeding it. Termination is
//! atomic: racing terminal events from different threads deliver exactly one
//! callback, and the disposal handle is disposed exactly once, whether the
//! producer finishes first or the consumer cancels first.
//!
//! [`Signal`] is the producer side: a lazily started generator that pushes
//! events into a subscriber and returns a [`Disposable`] releasing whatever it
//! set up (threads, timers, Tokio tasks, upstream subscriptions).
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use signalkit::{Signal, Subscriber};
//!
//! let collected = Arc::new(Mutex::new(Vec::new()));
//! let collected_c = Arc::clone(&collected);
//!
//! let subscription = Signal::<i32>::single(21)
//!     .map(|v| v * 2)
//!     .start(Subscriber::on_next(move |v| collected_c.lock().unwrap().push(v)));
//!
//! assert_eq!(*collected.lock().unwrap(), vec![42]);
//! assert!(subscription.is_terminated());
//! ```
//!
//! [`Disposable`]: disposable::Disposable

pub mod disposable;
mod errors;
mod observer;
mod signal;
pub mod subscription;

pub use errors::*;
pub use observer::Observer;
pub use signal::Signal;
pub use subscription::{Subscriber, SubscriberDisposable};
