//! Control loops.

mod pid;

use std::time::Duration;

pub use pid::{AngularPid, Pid};

/// Feedback ("closed-loop") controller.
pub trait Feedback {
    /// Representation of the system's state.
    type State;

    /// Control signal produced by the loop.
    type Signal;

    /// Updates the feedback controller with a new measurement, producing a new control
    /// signal.
    fn update(
        &mut self,
        measurement: Self::State,
        setpoint: Self::State,
        dt: Duration,
    ) -> Self::Signal;
}
