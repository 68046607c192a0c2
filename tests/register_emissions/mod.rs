use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use signalkit::{disposable::ActionDisposable, Subscriber};

use crate::custom_error::CustomError;

pub struct Emissions {
    pub nexts: Arc<Mutex<Vec<i32>>>,
    pub errors: Arc<Mutex<Vec<CustomError>>>,
    pub completes: Arc<AtomicUsize>,
}

impl Emissions {
    pub fn terminal_count(&self) -> usize {
        self.errors.lock().unwrap().len() + self.completes.load(Ordering::SeqCst)
    }
}

pub fn register_emissions_subscriber() -> (Subscriber<i32, CustomError>, Emissions) {
    let nexts = Arc::new(Mutex::new(Vec::with_capacity(5)));
    let nexts_c = Arc::clone(&nexts);

    let errors = Arc::new(Mutex::new(Vec::with_capacity(1)));
    let errors_c = Arc::clone(&errors);

    let completes = Arc::new(AtomicUsize::new(0));
    let completes_c = Arc::clone(&completes);

    let subscriber = Subscriber::new(
        move |n| {
            // Track put_next() calls.
            nexts_c.lock().unwrap().push(n);
        },
        move |e| {
            // Track put_error() calls.
            errors_c.lock().unwrap().push(e);
        },
        move || {
            // Track put_completion() calls.
            completes_c.fetch_add(1, Ordering::SeqCst);
        },
    );
    (
        subscriber,
        Emissions {
            nexts,
            errors,
            completes,
        },
    )
}

pub fn counting_disposable() -> (ActionDisposable, Arc<AtomicUsize>) {
    let disposed = Arc::new(AtomicUsize::new(0));
    let disposed_c = Arc::clone(&disposed);
    let d = ActionDisposable::from_fn(move || {
        disposed_c.fetch_add(1, Ordering::SeqCst);
    });
    (d, disposed)
}
