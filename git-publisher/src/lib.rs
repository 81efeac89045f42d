//! Git patch publishing over the GitHub REST v3 API.
//!
//! The client wraps the handful of endpoints needed to turn a drafted patch
//! into a pull request; the publisher runs them as a strictly sequential
//! state machine with each remote step retry-wrapped independently.

pub mod client;
pub mod errors;
pub mod publisher;

pub use client::GitHubClient;
pub use errors::GitPublishError;
pub use publisher::{Patch, branch_name, publish};
