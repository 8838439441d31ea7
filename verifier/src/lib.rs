//! Deployment Verifier Library
//!
//! Queries a deployment platform's API and reports whether a deployment
//! succeeded, failed, or is still in progress.

pub mod app;
pub mod errors;
pub mod http;
pub mod logs;
pub mod models;
pub mod utils;
pub mod verify;

pub use errors::{ErrorKind, VerifyError};
pub use models::deployment::{DeploymentCheckResult, FilterOptions, Outcome, Target};
pub use verify::check_deployment;
pub use verify::report::format_report;
