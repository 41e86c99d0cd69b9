use hubshot_control::LookupError;

use crate::climb::ClimbPhase;

/// Recoverable conditions raised while computing a tick.
///
/// None of these are fatal. The orchestrator logs them and falls back to manual control
/// for the affected output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AssistError {
    /// No candidate of the requested kind exists in the world.
    #[error("no target of the requested kind is visible")]
    NoTarget,

    /// The rotation controller was stepped with a zero tick duration.
    #[error("tick duration must be positive")]
    InvalidTick,

    /// A climb trigger was observed that the current phase cannot advance to.
    #[error("climb cannot advance from {from:?} to {to:?}")]
    ClimbPrecondition {
        /// The phase the sequencer was in.
        from: ClimbPhase,
        /// The phase the trigger pointed at.
        to: ClimbPhase,
    },
}

/// Errors produced while loading or validating an [`AssistConfig`](crate::AssistConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The hood calibration table is malformed.
    #[error("invalid hood calibration table: {0}")]
    HoodTable(#[from] LookupError),

    /// A field holds a value outside of its legal range.
    #[error("invalid `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}
