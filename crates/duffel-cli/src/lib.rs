//! duffel CLI library
//!
//! Exposes the CLI entry point so the binary stays a one-liner and the
//! commands remain testable.

mod cli;

pub use cli::run;
