//! Error types for the wizard core.

use thiserror::Error;

/// Errors raised by the wizard render-pass protocol.
///
/// Navigation itself never fails: every operation is a total function over
/// its integer domain, and out-of-range indices are the caller's business.
/// The only fatal condition is a protocol violation by the hosting render
/// layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    /// A step tried to register while no render pass was open. There is no
    /// wizard state to derive the step from, so there is no recovery.
    #[error("a wizard step must be registered inside an active render pass")]
    OutsideRenderPass,

    /// `finish_pass` was called without a matching `begin_pass`.
    #[error("finish_pass called without a matching begin_pass")]
    PassNotStarted,
}
