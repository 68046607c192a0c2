mod custom_error;
mod register_emissions;

use std::sync::{atomic::AtomicUsize, atomic::Ordering, Arc};

use proptest::prelude::*;

use custom_error::CustomError;
use register_emissions::{counting_disposable, register_emissions_subscriber};
use signalkit::Observer;

#[derive(Debug, Clone)]
enum Op {
    Next(i32),
    Error(u32),
    Complete,
    Assign,
    Cancel,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<i32>().prop_map(Op::Next),
        1 => any::<u32>().prop_map(Op::Error),
        1 => Just(Op::Complete),
        2 => Just(Op::Assign),
        1 => Just(Op::Cancel),
    ]
}

proptest! {
    /// Values are delivered up to the first terminating operation, at most one
    /// terminal callback fires, and no handle is ever disposed twice.
    #[test]
    fn single_threaded_sequences(ops in prop::collection::vec(arb_op(), 0..40)) {
        let (s, emissions) = register_emissions_subscriber();
        let mut counters: Vec<Arc<AtomicUsize>> = Vec::new();
        let mut handed_back = 0;

        let mut expected_nexts = Vec::new();
        let mut expected_errors = Vec::new();
        let mut expected_completes = 0;
        let mut terminated = false;

        for op in ops {
            match op {
                Op::Next(v) => {
                    if !terminated {
                        expected_nexts.push(v);
                    }
                    s.put_next(v);
                }
                Op::Error(code) => {
                    if !terminated {
                        expected_errors.push(CustomError(code));
                        terminated = true;
                    }
                    s.put_error(CustomError(code));
                }
                Op::Complete => {
                    if !terminated {
                        expected_completes += 1;
                        terminated = true;
                    }
                    s.put_completion();
                }
                Op::Assign => {
                    let (d, disposed) = counting_disposable();
                    s.assign_disposable(Box::new(d));
                    if terminated {
                        prop_assert_eq!(disposed.load(Ordering::SeqCst), 1);
                    }
                    counters.push(disposed);
                }
                Op::Cancel => {
                    if let Some(handle) = s.mark_terminated_without_disposal() {
                        prop_assert!(!terminated);
                        handed_back += 1;
                        drop(handle);
                    }
                    terminated = true;
                }
            }
            prop_assert_eq!(s.is_terminated(), terminated);
        }
        drop(s);

        prop_assert_eq!(&*emissions.nexts.lock().unwrap(), &expected_nexts);
        prop_assert_eq!(&*emissions.errors.lock().unwrap(), &expected_errors);
        prop_assert_eq!(emissions.completes.load(Ordering::SeqCst), expected_completes);

        let total: usize = counters.iter().map(|c| c.load(Ordering::SeqCst)).sum();
        prop_assert!(counters.iter().all(|c| c.load(Ordering::SeqCst) <= 1));
        // Every handle is disposed once, except one handed back by cancellation.
        prop_assert_eq!(total + handed_back, counters.len());
    }
}
