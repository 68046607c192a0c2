use std::{fmt, sync::Arc};

use crate::disposable::Disposable;

use super::Subscriber;

/// Consumer-side handle of a started signal.
///
/// Disposing it cancels the subscription: no further callbacks are delivered and
/// the producer's disposal handle is disposed exactly once, unless the producer
/// already terminated and released it. Dropping the handle without disposing it
/// leaves the subscription running.
#[must_use = "dropping the handle does not cancel the subscription"]
pub struct SubscriberDisposable<T, E> {
    subscriber: Arc<Subscriber<T, E>>,
}

impl<T, E> SubscriberDisposable<T, E> {
    pub(crate) fn new(subscriber: Arc<Subscriber<T, E>>) -> Self {
        SubscriberDisposable { subscriber }
    }

    /// Cancels the subscription.
    pub fn dispose(self) {
        if let Some(d) = self.subscriber.mark_terminated_without_disposal() {
            d.dispose();
        }
    }

    /// Returns `true` once the producer terminated or the subscription was
    /// cancelled through another path.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.subscriber.is_terminated()
    }
}

impl<T, E> Disposable for SubscriberDisposable<T, E> {
    fn dispose(self: Box<Self>) {
        SubscriberDisposable::dispose(*self);
    }
}

impl<T, E> fmt::Debug for SubscriberDisposable<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberDisposable")
            .field("subscriber", &self.subscriber)
            .finish()
    }
}
