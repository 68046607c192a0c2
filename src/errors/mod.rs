//! Error types produced by signals and disposables.
mod signal_errors;

pub use signal_errors::*;
