use std::sync::Arc;

/// Receiving side of a signal: a stream of values followed by at most one
/// terminal event.
pub trait Observer {
    type Value;
    type Error;

    fn put_next(&self, _: Self::Value);
    fn put_error(&self, _: Self::Error);
    fn put_completion(&self);
}

impl<O: Observer + ?Sized> Observer for Arc<O> {
    type Value = O::Value;
    type Error = O::Error;

    fn put_next(&self, v: Self::Value) {
        (**self).put_next(v);
    }

    fn put_error(&self, e: Self::Error) {
        (**self).put_error(e);
    }

    fn put_completion(&self) {
        (**self).put_completion();
    }
}
