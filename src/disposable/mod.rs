//! Disposal handles: teardown tokens for timers, threads, tasks and upstream
//! subscriptions.
//!
//! A [`Disposable`] is consumed by [`Disposable::dispose`], so a handle can only
//! ever be disposed once. Shared containers ([`DisposableSet`],
//! [`MetaDisposable`]) hand each stored handle to exactly one `dispose` call and
//! dispose late arrivals immediately once they are themselves disposed.
use std::{fmt, future::Future, pin::Pin, sync::Arc};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tracing::trace;

use crate::errors::DisposableError;


/// A teardown token that releases the resources behind a subscription.
pub trait Disposable: Send {
    /// Releases the resources. Consumes the handle.
    fn dispose(self: Box<Self>);
}

/// Enumerates the kinds of teardown an [`ActionDisposable`] can run.
pub enum DisposeLogic {
    /// Nothing to release.
    Nil,

    /// Another handle that is disposed in turn.
    Wrapped(Box<dyn Disposable>),

    /// Teardown defined by a function.
    Logic(Box<dyn FnOnce() + Send>),

    /// Asynchronous teardown. The future is spawned on the Tokio runtime that was
    /// current when the `ActionDisposable` was created.
    Future(Pin<Box<dyn Future<Output = ()> + Send>>),
}

impl fmt::Debug for DisposeLogic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            DisposeLogic::Nil => "Nil",
            DisposeLogic::Wrapped(_) => "Wrapped",
            DisposeLogic::Logic(_) => "Logic",
            DisposeLogic::Future(_) => "Future",
        };
        f.write_str(kind)
    }
}

/// Runs a [`DisposeLogic`] exactly once when disposed.
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// use signalkit::disposable::ActionDisposable;
///
/// let stopped = Arc::new(AtomicBool::new(false));
/// let stopped_c = Arc::clone(&stopped);
///
/// let disposable = ActionDisposable::from_fn(move || stopped_c.store(true, Ordering::SeqCst));
/// disposable.dispose();
///
/// assert!(stopped.load(Ordering::SeqCst));
/// ```
#[derive(Debug)]
pub struct ActionDisposable {
    logic: DisposeLogic,
    runtime_handle: Option<Handle>,
}

impl ActionDisposable {
    /// Creates a disposable running `logic`.
    ///
    /// # Errors
    ///
    /// Returns [`DisposableError::NoRuntime`] if `logic` is a future and no Tokio
    /// runtime is current.
    pub fn new(logic: DisposeLogic) -> Result<Self, DisposableError> {
        let runtime_handle = match logic {
            DisposeLogic::Future(_) => Some(Handle::try_current()?),
            _ => None,
        };
        Ok(ActionDisposable {
            logic,
            runtime_handle,
        })
    }

    #[must_use]
    pub fn empty() -> Self {
        ActionDisposable {
            logic: DisposeLogic::Nil,
            runtime_handle: None,
        }
    }

    pub fn from_fn(f: impl FnOnce() + Send + 'static) -> Self {
        ActionDisposable {
            logic: DisposeLogic::Logic(Box::new(f)),
            runtime_handle: None,
        }
    }

    /// Creates a disposable whose teardown is an async block.
    ///
    /// # Errors
    ///
    /// Returns [`DisposableError::NoRuntime`] when called outside a Tokio runtime.
    pub fn from_future(
        future: impl Future<Output = ()> + Send + 'static,
    ) -> Result<Self, DisposableError> {
        Self::new(DisposeLogic::Future(Box::pin(future)))
    }

    /// Wraps another handle; disposing this one disposes `inner`.
    pub fn wrap(inner: impl Disposable + 'static) -> Self {
        ActionDisposable {
            logic: DisposeLogic::Wrapped(Box::new(inner)),
            runtime_handle: None,
        }
    }

    pub fn dispose(self) {
        match self.logic {
            DisposeLogic::Nil => (),
            DisposeLogic::Logic(fnc) => fnc(),
            DisposeLogic::Wrapped(inner) => inner.dispose(),
            DisposeLogic::Future(future) => {
                if let Some(handle) = self.runtime_handle {
                    handle.spawn(future);
                }
            }
        }
    }
}

impl Disposable for ActionDisposable {
    fn dispose(self: Box<Self>) {
        ActionDisposable::dispose(*self);
    }
}

/// A shared collection of handles disposed together.
///
/// Clones refer to the same collection.
#[derive(Clone)]
pub struct DisposableSet {
    // `None` once the set has been disposed.
    disposables: Arc<Mutex<Option<Vec<Box<dyn Disposable>>>>>,
}

impl DisposableSet {
    #[must_use]
    pub fn new() -> Self {
        DisposableSet {
            disposables: Arc::new(Mutex::new(Some(Vec::new()))),
        }
    }

    /// Stores `disposable`, or disposes it right away if the set is already
    /// disposed.
    pub fn add(&self, disposable: impl Disposable + 'static) {
        let disposable: Box<dyn Disposable> = Box::new(disposable);
        let rejected = {
            let mut guard = self.disposables.lock();
            match guard.as_mut() {
                Some(stored) => {
                    stored.push(disposable);
                    None
                }
                None => Some(disposable),
            }
        };
        if let Some(d) = rejected {
            trace!("disposable added to a disposed set");
            d.dispose();
        }
    }

    pub fn dispose(&self) {
        let stored = self.disposables.lock().take();
        for d in stored.into_iter().flatten() {
            d.dispose();
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.disposables.lock().as_ref().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposables.lock().is_none()
    }
}

impl Default for DisposableSet {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for DisposableSet {
    fn dispose(self: Box<Self>) {
        DisposableSet::dispose(&self);
    }
}

impl fmt::Debug for DisposableSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisposableSet")
            .field("len", &self.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

enum MetaSlot {
    Empty,
    Holding(Box<dyn Disposable>),
    Disposed,
}

/// A shared slot holding at most one handle.
///
/// Setting a new handle disposes the one it replaces. Clones refer to the same
/// slot.
#[derive(Clone)]
pub struct MetaDisposable {
    slot: Arc<Mutex<MetaSlot>>,
}

impl MetaDisposable {
    #[must_use]
    pub fn new() -> Self {
        MetaDisposable {
            slot: Arc::new(Mutex::new(MetaSlot::Empty)),
        }
    }

    /// Replaces the current handle with `disposable` and disposes the old one.
    /// After [`MetaDisposable::dispose`] the new handle is disposed instead of
    /// being stored.
    pub fn set(&self, disposable: impl Disposable + 'static) {
        let incoming: Box<dyn Disposable> = Box::new(disposable);
        let released = {
            let mut slot = self.slot.lock();
            match std::mem::replace(&mut *slot, MetaSlot::Empty) {
                MetaSlot::Disposed => {
                    *slot = MetaSlot::Disposed;
                    Some(incoming)
                }
                MetaSlot::Holding(previous) => {
                    *slot = MetaSlot::Holding(incoming);
                    Some(previous)
                }
                MetaSlot::Empty => {
                    *slot = MetaSlot::Holding(incoming);
                    None
                }
            }
        };
        if let Some(d) = released {
            d.dispose();
        }
    }

    pub fn dispose(&self) {
        let previous = std::mem::replace(&mut *self.slot.lock(), MetaSlot::Disposed);
        if let MetaSlot::Holding(d) = previous {
            d.dispose();
        }
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        matches!(*self.slot.lock(), MetaSlot::Disposed)
    }
}

impl Default for MetaDisposable {
    fn default() -> Self {
        Self::new()
    }
}

impl Disposable for MetaDisposable {
    fn dispose(self: Box<Self>) {
        MetaDisposable::dispose(&self);
    }
}
