//! Platform API access

pub mod client;
pub mod deployments;
pub mod retry;
