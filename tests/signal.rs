mod custom_error;
mod register_emissions;

use std::{
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        mpsc, Arc, Mutex,
    },
    thread,
    time::Duration,
};

use custom_error::CustomError;
use register_emissions::register_emissions_subscriber;
use signalkit::{
    disposable::{ActionDisposable, DisposableSet},
    Observer, Signal, Subscriber,
};

// Emits 0..=end from an OS thread, one value per millisecond, unless stopped.
fn generate_thread_signal(
    end: i32,
    last_emit: Arc<Mutex<Option<i32>>>,
) -> Signal<i32, CustomError> {
    Signal::new(move |subscriber: Arc<Subscriber<i32, CustomError>>| {
        let stopped = Arc::new(AtomicBool::new(false));
        let stopped_c = Arc::clone(&stopped);
        let last_emit = Arc::clone(&last_emit);

        thread::spawn(move || {
            for i in 0..=end {
                if stopped_c.load(Ordering::SeqCst) {
                    return;
                }
                *last_emit.lock().unwrap() = Some(i);
                subscriber.put_next(i);
                thread::sleep(Duration::from_millis(1));
            }
            subscriber.put_completion();
        });

        ActionDisposable::from_fn(move || stopped.store(true, Ordering::SeqCst))
    })
}

#[test]
fn thread_signal_runs_to_completion() {
    let last_emit = Arc::new(Mutex::new(None));
    let (tx, rx) = mpsc::channel();

    let (mut s, emissions) = register_emissions_subscriber();
    s.on_complete(move || {
        let _ = tx.send(());
    });

    let handle = generate_thread_signal(20, Arc::clone(&last_emit)).start(s);
    rx.recv_timeout(Duration::from_secs(5)).expect("signal completed");

    assert_eq!(*emissions.nexts.lock().unwrap(), (0..=20).collect::<Vec<_>>());
    assert_eq!(emissions.terminal_count(), 0, "completion handler was replaced");
    assert!(handle.is_terminated());
}

#[test]
fn thread_signal_stops_after_dispose() {
    let last_emit = Arc::new(Mutex::new(None));
    let (s, emissions) = register_emissions_subscriber();

    let handle = generate_thread_signal(10_000, Arc::clone(&last_emit)).start(s);
    thread::sleep(Duration::from_millis(20));
    handle.dispose();
    // Lets a value handler that was already running finish.
    thread::sleep(Duration::from_millis(5));

    let delivered = emissions.nexts.lock().unwrap().len();
    thread::sleep(Duration::from_millis(20));

    // Nothing is delivered after cancellation and the producer stops early.
    assert_eq!(emissions.nexts.lock().unwrap().len(), delivered);
    assert_eq!(emissions.terminal_count(), 0);
    let last = last_emit.lock().unwrap().expect("producer emitted");
    assert!(last < 10_000);
}

#[test]
fn disposable_set_cancels_several_subscriptions() {
    let set = DisposableSet::new();
    let cancelled = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        let cancelled_c = Arc::clone(&cancelled);
        let signal: Signal<i32> = Signal::new(move |_| {
            let cancelled_c = Arc::clone(&cancelled_c);
            ActionDisposable::from_fn(move || {
                cancelled_c.fetch_add(1, Ordering::SeqCst);
            })
        });
        set.add(signal.start(Subscriber::empty()));
    }
    assert_eq!(set.len(), 3);

    set.dispose();
    assert_eq!(cancelled.load(Ordering::SeqCst), 3);
}

#[tokio::test(flavor = "multi_thread")]
async fn future_disposal_runs_on_runtime() {
    let (tx, rx) = tokio::sync::oneshot::channel::<&'static str>();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let signal = Signal::new(move |subscriber: Arc<Subscriber<i32>>| {
        subscriber.put_next(1);
        let tx = Arc::clone(&tx);
        ActionDisposable::from_future(async move {
            if let Some(tx) = tx.lock().unwrap().take() {
                let _ = tx.send("released");
            }
        })
        .expect("started inside a runtime")
    });

    let handle = signal.start(Subscriber::on_next(|_| {}));
    handle.dispose();

    let released = tokio::time::timeout(Duration::from_secs(5), rx)
        .await
        .expect("disposal future ran in time")
        .expect("sender kept alive");
    assert_eq!(released, "released");
}
