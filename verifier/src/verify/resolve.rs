//! Status resolution

use crate::models::deployment::Outcome;

/// Map an upstream lifecycle state and error count to an outcome.
///
/// States are matched case-sensitively against the platform vocabulary.
/// Any error in the logs means failure, whatever the platform says.
pub fn resolve(state: &str, error_count: usize) -> Outcome {
    match (state, error_count) {
        ("READY", 0) => Outcome::Success,
        ("READY", _) => Outcome::Failed,
        ("ERROR", _) => Outcome::Failed,
        (_, n) if n > 0 => Outcome::Failed,
        ("BUILDING", _) => Outcome::Building,
        ("QUEUED", _) => Outcome::Queued,
        _ => Outcome::Error,
    }
}
