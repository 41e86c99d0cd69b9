//! Externally supplied world state.
//!
//! Everything in this module is produced by the simulation (or robot) layer once per tick
//! and is read-only to the automation layer.

use std::time::Duration;

use hubshot_math::{Angle, IntoAngle, Vec2};
use serde::{Deserialize, Serialize};

use crate::frame::{IntakeState, PerSide};

/// The alliance the robot plays for.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alliance {
    /// Red alliance.
    #[default]
    Red,
    /// Blue alliance.
    Blue,
}

/// Phase of the match clock.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPhase {
    /// Waiting for the match to start.
    #[default]
    Ready,
    /// Autonomous period.
    Auto,
    /// Driver-controlled period.
    Teleop,
    /// Final part of the driver-controlled period.
    Endgame,
    /// The match has ended.
    Finished,
}

impl MatchPhase {
    /// Returns `true` if climb automation is permitted in this phase.
    #[must_use]
    pub const fn is_endgame(self) -> bool {
        matches!(self, Self::Endgame | Self::Finished)
    }
}

/// Robot position and heading on the field.
///
/// The heading is the direction the robot's front (shooter) faces, counter-clockwise from
/// the positive `x` axis.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Position of the robot's center on the floor plane, in meters.
    pub position: Vec2<f64>,
    /// Heading of the robot's front.
    pub heading: Angle,
}

impl Pose {
    /// Creates a pose from a position and a heading.
    #[must_use]
    pub const fn new(position: Vec2<f64>, heading: Angle) -> Self {
        Self { position, heading }
    }

    /// Straight-line distance from the robot to `point`.
    #[must_use]
    pub fn distance_to(&self, point: Vec2<f64>) -> f64 {
        self.position.distance(point)
    }

    /// Signed angle from the robot's heading to `point`, wrapped to `(-180°, 180°]`.
    ///
    /// Positive bearings lie counter-clockwise of (to the left of) the heading.
    #[must_use]
    pub fn bearing_to(&self, point: Vec2<f64>) -> Angle {
        ((point - self.position).angle().rad() - self.heading).wrapped_half()
    }
}

/// What a [`Target`] is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// A cargo piece belonging to an alliance.
    Cargo(Alliance),
    /// The central scoring hub.
    Hub,
}

/// A candidate target on the field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Identifier assigned by the simulation. Only used for diagnostics.
    pub id: u32,
    /// Kind of target.
    pub kind: TargetKind,
    /// Position on the floor plane, in meters.
    pub position: Vec2<f64>,
    /// Height of the target above the floor, in meters.
    #[serde(default)]
    pub elevation: f64,
}

impl Target {
    /// Creates a target resting on the floor.
    #[must_use]
    pub const fn new(id: u32, kind: TargetKind, position: Vec2<f64>) -> Self {
        Self {
            id,
            kind,
            position,
            elevation: 0.0,
        }
    }

    /// Sets the height of this target above the floor.
    #[must_use]
    pub const fn with_elevation(mut self, elevation: f64) -> Self {
        self.elevation = elevation;
        self
    }
}

/// An axis-aligned rectangle on the floor plane.
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Minimum corner.
    pub min: Vec2<f64>,
    /// Maximum corner.
    pub max: Vec2<f64>,
}

impl Zone {
    /// Creates a zone from two corners.
    #[must_use]
    pub const fn new(min: Vec2<f64>, max: Vec2<f64>) -> Self {
        Self { min, max }
    }

    /// Returns `true` if `point` lies strictly inside the zone.
    #[must_use]
    pub fn contains(&self, point: Vec2<f64>) -> bool {
        point.x > self.min.x && point.x < self.max.x && point.y > self.min.y && point.y < self.max.y
    }

    /// Returns `true` if the zone is finite and has a positive area.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.is_finite()
            && self.max.is_finite()
            && self.min.x < self.max.x
            && self.min.y < self.max.y
    }
}

/// Everything the automation layer knows about the world for one tick.
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldState {
    /// Robot pose.
    pub pose: Pose,
    /// Live targets on the field.
    pub targets: Vec<Target>,
    /// Alliance the robot plays for.
    pub alliance: Alliance,
    /// Current match phase.
    pub phase: MatchPhase,
    /// Measured height of the climber above the floor, in meters.
    pub climb_height: f64,
    /// Whether the traversal mechanism reports completion.
    pub traversal_complete: bool,
    /// Estimated time until a held-cargo penalty is assessed, if one is pending.
    #[serde(with = "millis")]
    pub time_until_penalty: Option<Duration>,
    /// Number of cargo currently held by the robot.
    pub held_cargo: u32,
    /// Measured hood angle, if the simulation exposes it.
    pub hood_angle: Option<Angle>,
    /// Measured intake positions. `None` when a flap is between positions.
    pub intakes: PerSide<Option<IntakeState>>,
}

impl WorldState {
    /// Returns `true` if the match is in its endgame.
    #[must_use]
    pub const fn is_endgame(&self) -> bool {
        self.phase.is_endgame()
    }
}

/// Serializes an optional [`Duration`] as whole milliseconds.
pub mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes the duration as an optional integer number of milliseconds.
    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => serializer.serialize_some(&(duration.as_millis() as u64)),
            None => serializer.serialize_none(),
        }
    }

    /// Deserializes an optional integer number of milliseconds.
    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearing_is_relative_to_heading() {
        let pose = Pose::new(Vec2::new(0.0, 0.0), 90.0.deg());

        let ahead = pose.bearing_to(Vec2::new(0.0, 5.0));
        assert!(ahead.as_degrees().abs() < 1e-9);

        let left = pose.bearing_to(Vec2::new(-3.0, 0.0));
        assert!((left.as_degrees() - 90.0).abs() < 1e-9);

        let right = pose.bearing_to(Vec2::new(3.0, 0.0));
        assert!((right.as_degrees() + 90.0).abs() < 1e-9);
    }

    #[test]
    fn zone_containment() {
        let zone = Zone::new(Vec2::new(0.875, 4.5), Vec2::new(4.2, 8.3));
        assert!(zone.contains(Vec2::new(2.0, 6.0)));
        assert!(!zone.contains(Vec2::new(0.5, 6.0)));
        assert!(zone.is_valid());
        assert!(!Zone::default().is_valid());
    }

    #[test]
    fn endgame_phases() {
        assert!(MatchPhase::Endgame.is_endgame());
        assert!(MatchPhase::Finished.is_endgame());
        assert!(!MatchPhase::Teleop.is_endgame());
    }

    #[test]
    fn world_state_from_json() {
        let world: WorldState = serde_json::from_str(
            r#"{
                "pose": { "position": { "x": 1.0, "y": 2.0 }, "heading": 90.0 },
                "targets": [
                    { "id": 7, "kind": "hub", "position": { "x": 0.0, "y": 0.0 } },
                    { "id": 8, "kind": { "cargo": "blue" }, "position": { "x": 3.0, "y": 1.0 } }
                ],
                "alliance": "blue",
                "phase": "endgame",
                "time_until_penalty": 200
            }"#,
        )
        .unwrap();

        assert_eq!(world.targets.len(), 2);
        assert_eq!(world.targets[1].kind, TargetKind::Cargo(Alliance::Blue));
        assert_eq!(world.time_until_penalty, Some(Duration::from_millis(200)));
        assert!(world.is_endgame());
        assert_eq!(world.held_cargo, 0);
    }
}
