pub mod analyze;
pub mod grade;
pub mod metrics;
pub mod scenario;
pub mod sensitivity;

/// Surface the engine's policy warnings in the log as well as the output.
pub(crate) fn log_warnings(warnings: &[String]) {
    for warning in warnings {
        tracing::warn!("{warning}");
    }
}
