//! Operator-assist automation.
//!
//! This crate sits between a gamepad and a robot (or simulator) control interface. Each
//! control-loop tick, the [`Orchestrator`] reads the raw [`GamepadState`] and the
//! [`WorldState`], runs the automation components, and returns a [`ControlFrame`] in
//! which only the fields with an active override differ from the operator's input.
//!
//! The components, in the order they run:
//!
//! - [`targeting`]: nearest hub or own-alliance cargo, with the intake facing it.
//! - [`hood`]: hood angle from a calibrated distance table, plus an optional servo.
//! - Rotation: an [`AngularPid`](hubshot_control::loops::AngularPid) aimed at the target.
//! - [`cargo`]: the two/three/all-cargo intake mode machine.
//! - [`climb`]: the one-directional endgame climb sequencer.
//! - [`penalty`]: forced shots ahead of a held-cargo penalty.
//!
//! [`GamepadState`]: frame::GamepadState
//! [`WorldState`]: world::WorldState
//! [`ControlFrame`]: frame::ControlFrame

pub mod cargo;
pub mod climb;
pub mod config;
pub mod frame;
pub mod hood;
pub mod orchestrator;
pub mod penalty;
pub mod targeting;
pub mod world;

mod error;

pub use config::AssistConfig;
pub use error::{AssistError, ConfigError};
pub use orchestrator::Orchestrator;
pub use targeting::nearest;
