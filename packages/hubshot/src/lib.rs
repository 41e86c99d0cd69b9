//! Operator-assist automation for shooter robots.
//!
//! `hubshot` remaps a driver's gamepad each control-loop tick, replacing selected axes and
//! buttons with automated commands: hood angle from a calibrated distance table, rotation
//! toward the selected target, intake deployment, climb sequencing and forced shots ahead
//! of a held-cargo penalty.
//!
//! This crate re-exports the workspace's packages:
//!
//! - [`math`]: angles and vectors.
//! - [`control`]: PID loops and lookup tables.
//! - [`assist`]: the automation components and their [`Orchestrator`](assist::Orchestrator).

pub use hubshot_assist as assist;
pub use hubshot_control as control;
pub use hubshot_math as math;

/// Commonly used types.
pub mod prelude {
    pub use crate::{
        assist::{
            AssistConfig, AssistError, ConfigError, Orchestrator,
            cargo::CargoMode,
            climb::ClimbPhase,
            frame::{ControlFrame, GamepadState, IntakeSide, IntakeState, PerSide},
            world::{Alliance, MatchPhase, Pose, Target, TargetKind, WorldState},
        },
        control::loops::{AngularPid, Feedback, Pid},
        math::{Angle, IntoAngle, Vec2},
    };
}
