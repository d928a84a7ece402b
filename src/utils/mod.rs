//! Utility functions and helpers.

pub mod http;
pub mod link;

pub use link::resolve_link;
