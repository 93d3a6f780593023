//! HTTP handlers for the ornament service.

pub mod content;
pub mod health;
pub mod metrics;
pub mod page;
pub mod recognize;
