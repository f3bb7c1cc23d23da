// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod config;
mod lenient;
pub mod logging;

pub use config::*;
pub use logging::*;
