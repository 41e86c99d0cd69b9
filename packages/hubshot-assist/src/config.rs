//! Static tuning for the automation layer.
//!
//! An [`AssistConfig`] is built once at startup (usually from JSON) and passed by
//! reference into every component constructor. Nothing reads it as ambient state.

use std::time::Duration;

use hubshot_control::loops::Pid;
use hubshot_math::{Angle, IntoAngle, Vec2};
use serde::{Deserialize, Serialize};

use crate::{
    cargo::CargoMode,
    error::ConfigError,
    hood::HoodModel,
    world::{Alliance, Zone},
};

/// Hood angles, in degrees, calibrated from 1.3 m in 0.1 m steps.
const DEFAULT_HOOD_ANGLES: [f64; 35] = [
    165.0, 155.0, 147.0, 145.0, 140.0, //
    136.0, 127.0, 125.0, 120.0, 117.0, //
    110.0, 107.0, 102.0, 99.0, 94.0, //
    90.0, 86.0, 81.0, 77.0, 73.0, //
    69.0, 65.0, 60.0, 41.0, 40.0, //
    38.0, 35.0, 33.0, 31.0, 29.0, //
    27.0, 25.0, 22.5, 20.0, 0.0,
];
const DEFAULT_HOOD_START: f64 = 1.3;
const DEFAULT_HOOD_STEP: f64 = 0.1;

/// Gains and limits for a PID loop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain.
    pub ki: f64,
    /// Derivative gain.
    pub kd: f64,
    /// Saturation bound for the integral accumulator.
    #[serde(default)]
    pub integral_limit: Option<f64>,
    /// Symmetric bound applied to the controller output.
    pub output_limit: f64,
}

impl PidGains {
    /// Builds a fresh controller with these gains.
    #[must_use]
    pub const fn build(&self) -> Pid {
        Pid::new(self.kp, self.ki, self.kd, None)
            .with_integral_limit(self.integral_limit)
            .with_output_limit(Some(self.output_limit))
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if !(self.kp.is_finite() && self.ki.is_finite() && self.kd.is_finite()) {
            return Err(ConfigError::Invalid {
                field,
                reason: "gains must be finite",
            });
        }
        if !(self.output_limit.is_finite() && self.output_limit > 0.0) {
            return Err(ConfigError::Invalid {
                field,
                reason: "output limit must be positive",
            });
        }
        if self
            .integral_limit
            .is_some_and(|limit| !(limit.is_finite() && limit > 0.0))
        {
            return Err(ConfigError::Invalid {
                field,
                reason: "integral limit must be positive",
            });
        }

        Ok(())
    }
}

/// One hood calibration point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoodPoint {
    /// Distance to the target, in meters.
    pub distance: f64,
    /// Hood angle at that distance, in degrees.
    pub angle: Angle,
}

/// Hood lookup calibration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoodConfig {
    /// Calibration points ordered by increasing distance.
    pub points: Vec<HoodPoint>,
    /// Offset added to every interpolated angle.
    pub correction: Angle,
}

impl Default for HoodConfig {
    fn default() -> Self {
        let points = DEFAULT_HOOD_ANGLES
            .iter()
            .enumerate()
            .map(|(index, &angle)| HoodPoint {
                distance: (index as f64).mul_add(DEFAULT_HOOD_STEP, DEFAULT_HOOD_START),
                angle: angle.deg(),
            })
            .collect();

        Self {
            points,
            correction: Angle::ZERO,
        }
    }
}

/// Cargo candidate filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Cargo closer than this to the robot center is already held and is not sought.
    pub intake_radius: f64,
    /// Cargo higher than this above the floor is still in flight and is not sought.
    pub max_elevation: f64,
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            intake_radius: 0.4,
            max_elevation: 0.5,
        }
    }
}

/// Strafe assist while seeking cargo.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachConfig {
    /// Largest flank aim error at which the robot strafes toward the cargo.
    pub max_error: Angle,
    /// Cargo closer than this is left to the rotation controller alone.
    pub min_distance: f64,
    /// Manual strafe input above this magnitude disables the assist.
    pub manual_deadband: f64,
}

impl Default for ApproachConfig {
    fn default() -> Self {
        Self {
            max_error: 30.0.deg(),
            min_distance: 0.625,
            manual_deadband: 0.1,
        }
    }
}

/// Right-stick thresholds for the all-cargo gesture.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Pushing the right stick above this (more negative) value enters all-cargo mode.
    pub all_enter: f64,
    /// Pulling the right stick below this value leaves all-cargo mode.
    pub all_exit: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            all_enter: -0.9375,
            all_exit: 0.25,
        }
    }
}

/// Climb sequencing thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimbConfig {
    /// Climber height at which the robot is considered above the mid rung, in meters.
    pub mid_rung_height: f64,
    /// Red alliance hangar.
    pub red_hangar: Zone,
    /// Blue alliance hangar.
    pub blue_hangar: Zone,
}

impl ClimbConfig {
    /// Returns the hangar zone belonging to `alliance`.
    #[must_use]
    pub const fn hangar(&self, alliance: Alliance) -> Zone {
        match alliance {
            Alliance::Red => self.red_hangar,
            Alliance::Blue => self.blue_hangar,
        }
    }
}

impl Default for ClimbConfig {
    fn default() -> Self {
        Self {
            mid_rung_height: 0.75,
            red_hangar: Zone::new(Vec2::new(-4.2, -8.3), Vec2::new(-0.875, -4.5)),
            blue_hangar: Zone::new(Vec2::new(0.875, 4.5), Vec2::new(4.2, 8.3)),
        }
    }
}

/// Held-cargo penalty avoidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PenaltyConfig {
    /// How long before the penalty the shot is forced, in milliseconds.
    pub lead_time_ms: u64,
    /// Number of held cargo at which the penalty clock starts.
    pub held_limit: u32,
    /// How long cargo may be held at the limit before the penalty, in milliseconds.
    pub hold_time_ms: u64,
}

impl PenaltyConfig {
    /// Lead time as a [`Duration`].
    #[must_use]
    pub const fn lead_time(&self) -> Duration {
        Duration::from_millis(self.lead_time_ms)
    }

    /// Hold time as a [`Duration`].
    #[must_use]
    pub const fn hold_time(&self) -> Duration {
        Duration::from_millis(self.hold_time_ms)
    }
}

impl Default for PenaltyConfig {
    fn default() -> Self {
        Self {
            lead_time_ms: 250,
            held_limit: 3,
            hold_time_ms: 1625,
        }
    }
}

/// Complete automation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistConfig {
    /// Rotation controller gains, per degree of heading error.
    pub rotation: PidGains,
    /// Hood lookup calibration.
    pub hood: HoodConfig,
    /// Hood servo gains, per degree of hood error.
    pub hood_servo: PidGains,
    /// Cargo candidate filtering.
    pub targeting: TargetingConfig,
    /// Strafe assist.
    pub approach: ApproachConfig,
    /// All-cargo gesture thresholds.
    pub gestures: GestureConfig,
    /// Climb sequencing.
    pub climb: ClimbConfig,
    /// Penalty avoidance.
    pub penalty: PenaltyConfig,
    /// Intake mode selected at startup.
    pub initial_mode: CargoMode,
    /// Host control-loop frequency, in hertz.
    pub tick_rate_hz: f64,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            rotation: PidGains {
                kp: 0.022,
                ki: 0.0,
                kd: 0.002,
                integral_limit: Some(50.0),
                output_limit: 1.0,
            },
            hood: HoodConfig::default(),
            hood_servo: PidGains {
                kp: 0.1,
                ki: 0.001,
                kd: 0.0,
                integral_limit: None,
                output_limit: 4.0,
            },
            targeting: TargetingConfig::default(),
            approach: ApproachConfig::default(),
            gestures: GestureConfig::default(),
            climb: ClimbConfig::default(),
            penalty: PenaltyConfig::default(),
            initial_mode: CargoMode::Three,
            tick_rate_hz: 100.0,
        }
    }
}

impl AssistConfig {
    /// Parses and validates a configuration from JSON.
    ///
    /// Missing fields take their default values.
    ///
    /// # Examples
    ///
    /// ```
    /// use hubshot_assist::AssistConfig;
    ///
    /// let config = AssistConfig::from_json(r#"{ "penalty": { "lead_time_ms": 300 } }"#).unwrap();
    /// assert_eq!(config.penalty.lead_time_ms, 300);
    /// assert_eq!(config.penalty.held_limit, 3);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Nominal duration of one control-loop tick.
    ///
    /// Falls back to [`Duration::ZERO`] for a rate that [`AssistConfig::validate`] rejects.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Self::interval_for(self.tick_rate_hz).unwrap_or_default()
    }

    /// Tick period for `hz`, if it is a representable non-zero duration.
    fn interval_for(hz: f64) -> Option<Duration> {
        Duration::try_from_secs_f64(1.0 / hz)
            .ok()
            .filter(|interval| !interval.is_zero())
    }

    /// Checks every field for values the automation layer cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rotation.validate("rotation")?;
        self.hood_servo.validate("hood_servo")?;
        HoodModel::new(&self.hood)?;

        if !(self.targeting.intake_radius.is_finite() && self.targeting.intake_radius >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "targeting.intake_radius",
                reason: "must be a non-negative distance",
            });
        }
        if self.targeting.max_elevation.is_nan() {
            return Err(ConfigError::Invalid {
                field: "targeting.max_elevation",
                reason: "must be a number",
            });
        }

        if !(self.approach.max_error.as_radians().is_finite()
            && self.approach.max_error >= Angle::ZERO)
        {
            return Err(ConfigError::Invalid {
                field: "approach.max_error",
                reason: "must be a non-negative angle",
            });
        }
        if !(self.approach.min_distance.is_finite() && self.approach.min_distance >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "approach.min_distance",
                reason: "must be a non-negative distance",
            });
        }
        if !(0.0..=1.0).contains(&self.approach.manual_deadband) {
            return Err(ConfigError::Invalid {
                field: "approach.manual_deadband",
                reason: "must lie within [0, 1]",
            });
        }

        let GestureConfig { all_enter, all_exit } = self.gestures;
        if !((-1.0..=1.0).contains(&all_enter) && (-1.0..=1.0).contains(&all_exit)) {
            return Err(ConfigError::Invalid {
                field: "gestures",
                reason: "thresholds must lie within [-1, 1]",
            });
        }
        if all_enter >= all_exit {
            return Err(ConfigError::Invalid {
                field: "gestures",
                reason: "enter threshold must be below exit threshold",
            });
        }

        if !self.climb.mid_rung_height.is_finite() {
            return Err(ConfigError::Invalid {
                field: "climb.mid_rung_height",
                reason: "must be finite",
            });
        }
        if !(self.climb.red_hangar.is_valid() && self.climb.blue_hangar.is_valid()) {
            return Err(ConfigError::Invalid {
                field: "climb",
                reason: "hangar zones must have a positive area",
            });
        }

        if self.penalty.held_limit == 0 {
            return Err(ConfigError::Invalid {
                field: "penalty.held_limit",
                reason: "must be at least one cargo",
            });
        }

        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "must be positive",
            });
        }
        if Self::interval_for(self.tick_rate_hz).is_none() {
            return Err(ConfigError::Invalid {
                field: "tick_rate_hz",
                reason: "tick interval must be a representable non-zero duration",
            });
        }

        Ok(())
    }
}
