//! Blog content API access
//!
//! This module provides the fetch client for the storefront GraphQL content
//! API: parameterized query construction, HTTP transport with bearer
//! authentication, and decoding of the cursor-paginated posts connection.

pub mod client;
pub mod errors;
pub mod query;
pub mod types;

pub use client::*;
pub use errors::*;
pub use types::*;
