//! The `signal` module provides [`Signal`], a cold producer of values that drives
//! [`Subscriber`]s.
//!
//! A signal does nothing until it is started. Every call to [`Signal::start`] runs
//! the signal's generator against a fresh subscriber, attaches the disposal
//! handle the generator returns, and hands back a [`SubscriberDisposable`] that
//! cancels the subscription.
use std::{fmt, sync::Arc};

use tracing::debug;

use crate::{
    disposable::{ActionDisposable, Disposable},
    errors::SignalError,
    observer::Observer,
    subscription::{Subscriber, SubscriberDisposable},
};


type Generator<T, E> = dyn Fn(Arc<Subscriber<T, E>>) -> Box<dyn Disposable> + Send + Sync;

/// A cold, lazily started producer of values, terminated by at most one error or
/// completion.
///
/// Cloning a `Signal` is shallow: clones share the generator.
///
/// # Example: a signal emitting from an OS thread
///
/// ```no_run
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// use signalkit::disposable::ActionDisposable;
/// use signalkit::{Observer, Signal, Subscriber};
///
/// let ticks: Signal<u32> = Signal::new(|subscriber| {
///     let stopped = Arc::new(AtomicBool::new(false));
///     let stopped_c = Arc::clone(&stopped);
///
///     std::thread::spawn(move || {
///         for i in 0.. {
///             if stopped_c.load(Ordering::SeqCst) {
///                 break;
///             }
///             subscriber.put_next(i);
///             std::thread::sleep(Duration::from_millis(10));
///         }
///     });
///
///     ActionDisposable::from_fn(move || stopped.store(true, Ordering::SeqCst))
/// });
///
/// let subscription = ticks.start(Subscriber::on_next(|v| println!("tick {}", v)));
/// std::thread::sleep(Duration::from_millis(100));
/// // Stops the producer thread.
/// subscription.dispose();
/// ```
pub struct Signal<T, E = SignalError> {
    generator: Arc<Generator<T, E>>,
}

impl<T, E> Clone for Signal<T, E> {
    fn clone(&self) -> Self {
        Signal {
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<T, E> fmt::Debug for Signal<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("value", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

impl<T: 'static, E: 'static> Signal<T, E> {
    /// Creates a signal from a generator.
    ///
    /// The generator runs once per [`Signal::start`]. It receives the subscriber
    /// to push events into and returns the handle that releases whatever it set
    /// up.
    pub fn new<F, D>(generator: F) -> Self
    where
        F: Fn(Arc<Subscriber<T, E>>) -> D + Send + Sync + 'static,
        D: Disposable + 'static,
    {
        Signal {
            generator: Arc::new(move |subscriber: Arc<Subscriber<T, E>>| -> Box<dyn Disposable> {
                Box::new(generator(subscriber))
            }),
        }
    }

    /// Starts the signal, delivering its events to `subscriber`.
    ///
    /// The generator's disposal handle is attached to the subscriber, so it is
    /// released when the signal terminates, when the returned handle is disposed,
    /// or immediately if the generator already terminated the subscriber.
    pub fn start(&self, subscriber: Subscriber<T, E>) -> SubscriberDisposable<T, E> {
        debug!(value = std::any::type_name::<T>(), "starting signal");
        let subscriber = Arc::new(subscriber);
        let disposable = (self.generator)(Arc::clone(&subscriber));
        subscriber.assign_disposable(disposable);
        SubscriberDisposable::new(subscriber)
    }

    /// A signal that emits `value` and completes.
    pub fn single(value: T) -> Self
    where
        T: Clone + Send + Sync,
    {
        Signal::new(move |subscriber| {
            subscriber.put_next(value.clone());
            subscriber.put_completion();
            ActionDisposable::empty()
        })
    }

    /// A signal that fails with `error` without emitting.
    pub fn fail(error: E) -> Self
    where
        E: Clone + Send + Sync,
    {
        Signal::new(move |subscriber| {
            subscriber.put_error(error.clone());
            ActionDisposable::empty()
        })
    }

    /// A signal that completes without emitting.
    #[must_use]
    pub fn complete() -> Self {
        Signal::new(|subscriber| {
            subscriber.put_completion();
            ActionDisposable::empty()
        })
    }

    /// A signal that never emits and never terminates.
    #[must_use]
    pub fn never() -> Self {
        Signal::new(|_| ActionDisposable::empty())
    }

    /// Transforms each value with `f`.
    pub fn map<U, F>(self, f: F) -> Signal<U, E>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Signal::new(move |downstream: Arc<Subscriber<U, E>>| {
            let f = Arc::clone(&f);
            let next_d = Arc::clone(&downstream);
            let error_d = Arc::clone(&downstream);
            self.start(Subscriber::new(
                move |v| next_d.put_next(f(v)),
                move |e| error_d.put_error(e),
                move || downstream.put_completion(),
            ))
        })
    }

    /// Emits only the values for which `predicate` returns `true`.
    pub fn filter<P>(self, predicate: P) -> Signal<T, E>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let predicate = Arc::new(predicate);
        Signal::new(move |downstream: Arc<Subscriber<T, E>>| {
            let predicate = Arc::clone(&predicate);
            let next_d = Arc::clone(&downstream);
            let error_d = Arc::clone(&downstream);
            self.start(Subscriber::new(
                move |v| {
                    if predicate(&v) {
                        next_d.put_next(v);
                    }
                },
                move |e| error_d.put_error(e),
                move || downstream.put_completion(),
            ))
        })
    }

    /// Transforms the terminal error with `f`.
    pub fn map_error<E2, F>(self, f: F) -> Signal<T, E2>
    where
        E2: 'static,
        F: Fn(E) -> E2 + Send + Sync + 'static,
    {
        let f = Arc::new(f);
        Signal::new(move |downstream: Arc<Subscriber<T, E2>>| {
            let f = Arc::clone(&f);
            let next_d = Arc::clone(&downstream);
            let error_d = Arc::clone(&downstream);
            self.start(Subscriber::new(
                move |v| next_d.put_next(v),
                move |e| error_d.put_error(f(e)),
                move || downstream.put_completion(),
            ))
        })
    }
}
