/**
 * This `Signal` emits values and completes synchronously inside `start`. The disposal
 * handle it returns is attached after the subscriber already completed, so it is
 * released immediately.
 *
 * Run with `RUST_LOG=signalkit=trace` to see the subscriber lifecycle events.
 */
use std::sync::Arc;

use signalkit::{disposable::ActionDisposable, Observer, Signal, Subscriber};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Create a custom signal that emits values from 1 to 10.
    let emit_10: Signal<i32> = Signal::new(|subscriber: Arc<Subscriber<i32>>| {
        for i in 1..=10 {
            // Emit the value to the subscriber.
            subscriber.put_next(i);
        }
        // Signal completion to the subscriber.
        subscriber.put_completion();

        ActionDisposable::from_fn(|| println!("Released producer resources"))
    });

    let subscriber = Subscriber::new(
        |v| println!("Emitted {}", v),
        |e| eprintln!("Error: {}", e),
        || println!("Completed"),
    );

    // Only even values, squared.
    let subscription = emit_10
        .filter(|v| v % 2 == 0)
        .map(|v| v * v)
        .start(subscriber);

    println!("Terminated: {}", subscription.is_terminated());
}
