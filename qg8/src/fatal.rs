//! Terminate-on-error convenience for small tools.
//!
//! The library itself never exits the process; front ends that prefer a
//! fail-fast style can opt into it here.

use std::fmt::Display;

use log::error;

/// Unwrap a result or exit the process with status 1.
pub trait OrExit<T> {
    /// Return the value, or log `context` with the error, print it to stderr
    /// and exit.
    fn or_exit(self, context: &str) -> T;
}

impl<T, E: Display> OrExit<T> for std::result::Result<T, E> {
    fn or_exit(self, context: &str) -> T {
        match self {
            Ok(value) => value,
            Err(e) => {
                error!("{context}: {e}");
                eprintln!("error: {context}: {e}");
                std::process::exit(1)
            }
        }
    }
}
