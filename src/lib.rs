//! magicwatch library
//!
//! Polls a directory and reports every line containing a magic string exactly
//! once, scanning only content appended since the previous poll.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod supervisor;
pub mod watcher;

pub use config::Config;
pub use error::{Error, Result, WatchError};
