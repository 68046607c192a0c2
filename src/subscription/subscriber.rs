use std::{any::type_name, fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::{trace, trace_span, warn, Span};

use crate::{disposable::Disposable, errors::SignalError, observer::Observer};

type NextFn<T> = Arc<dyn Fn(T) + Send + Sync>;
type ErrorFn<E> = Box<dyn FnOnce(E) + Send>;
type CompletedFn = Box<dyn FnOnce() + Send>;

struct State<T, E> {
    next: Option<NextFn<T>>,
    error: Option<ErrorFn<E>>,
    completed: Option<CompletedFn>,
    terminated: bool,
    disposable: Option<Box<dyn Disposable>>,
}

// Everything taken out of `State` by the transition to terminated. It is
// released after the lock is dropped.
struct Released<T, E> {
    next: Option<NextFn<T>>,
    error: Option<ErrorFn<E>>,
    completed: Option<CompletedFn>,
    disposable: Option<Box<dyn Disposable>>,
}

impl<T, E> State<T, E> {
    fn terminate(&mut self) -> Released<T, E> {
        self.terminated = true;
        Released {
            next: self.next.take(),
            error: self.error.take(),
            completed: self.completed.take(),
            disposable: self.disposable.take(),
        }
    }
}

/// Terminal-state sink for one subscription to a signal.
///
/// A `Subscriber` receives any number of values through [`Observer::put_next`],
/// followed by at most one terminal event ([`Observer::put_error`] or
/// [`Observer::put_completion`]). The first terminal event wins; everything after
/// it is dropped. Termination clears all callbacks and disposes the attached
/// disposal handle exactly once.
///
/// Callbacks and dispose calls always run outside the internal lock, so a
/// callback may call back into the same subscriber.
///
/// # Example
///
/// ```
/// use std::sync::{Arc, Mutex};
///
/// use signalkit::{Observer, Subscriber};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let seen_c = Arc::clone(&seen);
///
/// let subscriber: Subscriber<i32> = Subscriber::new(
///     move |v| seen_c.lock().unwrap().push(v),
///     |e| eprintln!("Error: {}", e),
///     || println!("Completed"),
/// );
///
/// subscriber.put_next(1);
/// subscriber.put_next(2);
/// subscriber.put_completion();
/// // Dropped, the subscriber is terminated.
/// subscriber.put_next(3);
///
/// assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
/// assert!(subscriber.is_terminated());
/// ```
pub struct Subscriber<T, E = SignalError> {
    state: Mutex<State<T, E>>,
    span: Span,
}

impl<T, E> Subscriber<T, E> {
    /// Creates a new `Subscriber` with handlers for values, the error and the
    /// completion.
    pub fn new(
        next_fn: impl Fn(T) + Send + Sync + 'static,
        error_fn: impl FnOnce(E) + Send + 'static,
        completed_fn: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self::with_slots(
            Some(Arc::new(next_fn)),
            Some(Box::new(error_fn)),
            Some(Box::new(completed_fn)),
        )
    }

    /// Creates a new `Subscriber` that only handles values.
    ///
    /// Error and completion handlers can be added with [`Subscriber::on_error`] and
    /// [`Subscriber::on_complete`] before the subscriber is started.
    pub fn on_next(next_fn: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self::with_slots(Some(Arc::new(next_fn)), None, None)
    }

    /// Creates a `Subscriber` that ignores every event.
    #[must_use]
    pub fn empty() -> Self {
        Self::with_slots(None, None, None)
    }

    fn with_slots(
        next: Option<NextFn<T>>,
        error: Option<ErrorFn<E>>,
        completed: Option<CompletedFn>,
    ) -> Self {
        let span = trace_span!("subscriber", value = type_name::<T>());
        trace!(parent: &span, "begin");
        Subscriber {
            state: Mutex::new(State {
                next,
                error,
                completed,
                terminated: false,
                disposable: None,
            }),
            span,
        }
    }

    /// Sets the error handler.
    pub fn on_error(&mut self, error_fn: impl FnOnce(E) + Send + 'static) {
        self.state.get_mut().error = Some(Box::new(error_fn));
    }

    /// Sets the completion handler.
    pub fn on_complete(&mut self, completed_fn: impl FnOnce() + Send + 'static) {
        self.state.get_mut().completed = Some(Box::new(completed_fn));
    }

    /// Returns `true` once a terminal event was delivered or the subscriber was
    /// cancelled.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.state.lock().terminated
    }

    /// Attaches the handle that releases the producer's resources.
    ///
    /// If the subscriber already terminated, `disposable` is disposed during this
    /// call instead of being stored. Attaching a second handle while active
    /// disposes the one it replaces.
    pub fn assign_disposable(&self, disposable: Box<dyn Disposable>) {
        trace!(parent: &self.span, "assign_disposable");
        let (released, terminated) = {
            let mut state = self.state.lock();
            if state.terminated {
                (Some(disposable), true)
            } else {
                (state.disposable.replace(disposable), false)
            }
        };

        if let Some(d) = released {
            if !terminated {
                warn!(parent: &self.span, "disposable replaced while subscriber is active");
            }
            d.dispose();
            if terminated {
                trace!(parent: &self.span, "end");
            }
        }
    }

    /// Terminates the subscriber without delivering a terminal event.
    ///
    /// Callbacks are cleared and never invoked again. The attached handle is not
    /// disposed; it is handed back to the caller, which owns cleanup on this path.
    /// Returns `None` when no handle is attached or the subscriber already
    /// terminated.
    #[must_use = "the returned handle is not disposed unless the caller disposes it"]
    pub fn mark_terminated_without_disposal(&self) -> Option<Box<dyn Disposable>> {
        trace!(parent: &self.span, "mark_terminated_without_disposal");
        let released = {
            let mut state = self.state.lock();
            if state.terminated {
                return None;
            }
            state.terminate()
        };

        let Released {
            next,
            error,
            completed,
            disposable,
        } = released;
        drop((next, error, completed));
        disposable
    }
}

impl<T, E> Observer for Subscriber<T, E> {
    type Value = T;
    type Error = E;

    fn put_next(&self, v: T) {
        trace!(parent: &self.span, "put_next");
        let action = {
            let state = self.state.lock();
            if state.terminated {
                None
            } else {
                state.next.clone()
            }
        };

        if let Some(next_fn) = action {
            next_fn(v);
        }
    }

    fn put_error(&self, e: E) {
        trace!(parent: &self.span, "put_error");
        let released = {
            let mut state = self.state.lock();
            if state.terminated {
                return;
            }
            state.terminate()
        };

        let Released {
            next,
            error,
            completed,
            disposable,
        } = released;
        drop((next, completed));

        if let Some(error_fn) = error {
            error_fn(e);
        }
        if let Some(d) = disposable {
            d.dispose();
            trace!(parent: &self.span, "end");
        }
    }

    fn put_completion(&self) {
        trace!(parent: &self.span, "put_completion");
        let released = {
            let mut state = self.state.lock();
            if state.terminated {
                return;
            }
            state.terminate()
        };

        let Released {
            next,
            error,
            completed,
            disposable,
        } = released;
        drop((next, error));

        if let Some(completed_fn) = completed {
            completed_fn();
        }
        if let Some(d) = disposable {
            d.dispose();
            trace!(parent: &self.span, "end");
        }
    }
}

impl<T, E> Drop for Subscriber<T, E> {
    fn drop(&mut self) {
        if let Some(d) = self.state.get_mut().disposable.take() {
            d.dispose();
            trace!(parent: &self.span, "end");
        }
    }
}

impl<T, E> fmt::Debug for Subscriber<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("Subscriber")
            .field("value", &type_name::<T>())
            .field("terminated", &state.terminated)
            .field("has_disposable", &state.disposable.is_some())
            .finish()
    }
}
