//! Hood angle automation.

use std::time::Duration;

use hubshot_control::{
    LookupTable,
    loops::{Feedback, Pid},
};
use hubshot_math::{Angle, IntoAngle};

use crate::{
    config::{HoodConfig, PidGains},
    error::ConfigError,
};

/// Maps target distance to a hood angle using a calibrated lookup table.
///
/// Distances between calibration points are linearly interpolated; distances outside the
/// calibrated range clamp to the nearest endpoint's angle. The configured correction is
/// added after interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct HoodModel {
    table: LookupTable,
    correction: Angle,
}

impl HoodModel {
    /// Builds the model from its calibration.
    pub fn new(config: &HoodConfig) -> Result<Self, ConfigError> {
        let table = LookupTable::new(
            config
                .points
                .iter()
                .map(|point| (point.distance, point.angle.as_degrees()))
                .collect(),
        )?;

        if !config.correction.as_radians().is_finite() {
            return Err(ConfigError::Invalid {
                field: "hood.correction",
                reason: "must be finite",
            });
        }

        Ok(Self {
            table,
            correction: config.correction,
        })
    }

    /// Hood angle for a target `distance` meters away.
    #[must_use]
    pub fn angle_for(&self, distance: f64) -> Angle {
        self.table.sample(distance).deg() + self.correction
    }
}

/// Hood drive buttons produced by the [`HoodServo`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoodDrive {
    /// Raise the hood.
    pub aim_up: bool,
    /// Lower the hood.
    pub aim_down: bool,
    /// Drive speed for the precision scale.
    pub precision: f64,
}

/// Closes the loop between the commanded and measured hood angle.
///
/// Only used when the world reports the measured hood angle; otherwise the commanded
/// angle is handed to the robot as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HoodServo {
    pid: Pid,
}

impl HoodServo {
    /// Creates a servo with the given gains.
    #[must_use]
    pub const fn new(gains: &PidGains) -> Self {
        Self { pid: gains.build() }
    }

    /// Clears the servo's integral and derivative memory.
    pub const fn reset(&mut self) {
        self.pid.reset();
    }

    /// Computes the drive needed to move the hood from `measured` toward `target`.
    pub fn update(&mut self, target: Angle, measured: Angle, dt: Duration) -> HoodDrive {
        let output = self
            .pid
            .update(measured.as_degrees(), target.as_degrees(), dt);

        HoodDrive {
            aim_up: output > 0.0,
            aim_down: output < 0.0,
            precision: output.abs(),
        }
    }
}
