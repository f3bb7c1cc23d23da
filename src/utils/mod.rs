pub mod logger;

#[cfg(test)]
pub(crate) mod captured_logs;

pub use logger::init_logging;
