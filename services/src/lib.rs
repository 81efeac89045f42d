//! Shared plumbing for the issue-pilot pipelines.
//!
//! Kept deliberately small: the retry executor that wraps every remote call,
//! and deterministic identifiers for vector-store points.

pub mod ids;
pub mod retry;

pub use ids::stable_uuid;
pub use retry::{RetryPolicy, with_retry, with_retry_if};
