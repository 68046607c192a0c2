/**
 * This `Signal` emits values from an OS thread until it is cancelled. Disposing the
 * returned handle stops delivery right away and runs the producer's disposal logic
 * exactly once, which in turn stops the thread.
 */
use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use signalkit::{disposable::ActionDisposable, Observer, Signal, Subscriber};
use tracing_subscriber::EnvFilter;

const UNSUBSCRIBE_SIGNAL: bool = true;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let signal: Signal<u32> = Signal::new(|subscriber: Arc<Subscriber<u32>>| {
        let done = Arc::new(AtomicBool::new(false));
        let done_c = Arc::clone(&done);

        std::thread::spawn(move || {
            for i in 0..=10_000 {
                // If an unsubscribe signal is received, exit the loop and stop emissions.
                if done_c.load(Ordering::SeqCst) == UNSUBSCRIBE_SIGNAL {
                    println!("Producer stopped at {}", i);
                    return;
                }
                subscriber.put_next(i);
                std::thread::sleep(Duration::from_millis(1));
            }
            subscriber.put_completion();
        });

        // Teardown sends the unsubscribe signal to the producer thread.
        ActionDisposable::from_fn(move || done.store(UNSUBSCRIBE_SIGNAL, Ordering::SeqCst))
    });

    let mut subscriber = Subscriber::on_next(|v| println!("Emitted {}", v));
    subscriber.on_complete(|| println!("Completed"));

    let subscription = signal.start(subscriber);

    std::thread::sleep(Duration::from_millis(50));
    subscription.dispose();

    // Give the producer thread a moment to notice.
    std::thread::sleep(Duration::from_millis(20));
}
