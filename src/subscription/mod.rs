//! Provides the subscriber side of a signal.
//!
//! [`Subscriber`] is the terminal-state sink holding the callbacks of one
//! subscription together with the producer's disposal handle, and
//! [`SubscriberDisposable`] is the handle returned to the consumer, whose
//! disposal cancels the subscription.
mod subscriber;
mod subscriber_disposable;

pub use subscriber::Subscriber;
pub use subscriber_disposable::SubscriberDisposable;
