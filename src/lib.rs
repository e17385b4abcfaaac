//! Register machine library.
//!
//! Provides a typed register-machine interpreter, its configuration, and logging.

pub mod config;
pub mod machine;
pub mod utils;
