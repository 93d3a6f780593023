//! service-core: Shared infrastructure for the Syrly Oyu services.
pub mod config;
pub mod error;
pub mod middleware;
pub mod observability;
