//! Process supervision: logging setup and signal handling.

mod observability;
mod signal;

pub use observability::{init_tracing, TracingConfig};
pub use signal::spawn_signal_handler;
