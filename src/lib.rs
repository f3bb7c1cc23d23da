//! Library exports for the Docker Hub rate-limit exporter, shared between the binary and tests.

pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod registry;
pub mod routes;
pub mod startup;
pub mod state;
pub mod utils;
