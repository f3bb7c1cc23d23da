//! Outbound calls to the registry: bearer token acquisition and rate-limit lookup.

pub mod client;
pub mod endpoints;
pub mod header;

pub use client::RegistryClient;
pub use endpoints::Endpoints;
pub use header::parse_limit;
