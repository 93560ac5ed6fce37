//! Remote Service Module
//!
//! The boundary to the coaching platform: request plumbing and the response
//! shapes the rest of the crate depends on.
//!
//! # Structure
//!
//! - [`client`]: blocking HTTP client with token handling
//! - [`types`]: serde shapes for the service's JSON envelopes

pub mod client;
pub mod types;

pub use client::ApiClient;
pub use types::{ExerciseSummary, TagEntry};
