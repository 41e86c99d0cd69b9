//! Target selection and aiming geometry.

use hubshot_math::Angle;

use crate::{
    config::TargetingConfig,
    error::AssistError,
    frame::IntakeSide,
    world::{Pose, Target, TargetKind, WorldState},
};

/// A target resolved relative to the robot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sighting {
    /// The selected target.
    pub target: Target,
    /// Straight-line distance from the robot, in meters.
    pub distance: f64,
    /// Signed angle from the robot's heading to the target.
    pub bearing: Angle,
}

impl Sighting {
    /// The intake whose flank faces the target.
    ///
    /// Targets counter-clockwise of the heading, in `(0°, 180°]`, belong to the left intake.
    #[must_use]
    pub fn intake_side(&self) -> IntakeSide {
        if self.bearing > Angle::ZERO {
            IntakeSide::Left
        } else {
            IntakeSide::Right
        }
    }

    /// Heading error that turns the given intake's flank toward the target.
    #[must_use]
    pub fn flank_error(&self, side: IntakeSide) -> Angle {
        match side {
            IntakeSide::Left => self.bearing - Angle::QUARTER_TURN,
            IntakeSide::Right => self.bearing + Angle::QUARTER_TURN,
        }
        .wrapped_half()
    }
}

/// Returns the candidate nearest to `pose`.
///
/// Ties are broken in favor of the first candidate encountered.
///
/// # Examples
///
/// ```
/// use hubshot_assist::{nearest, world::{Pose, Target, TargetKind}};
/// use hubshot_math::{IntoAngle, Vec2};
///
/// let pose = Pose::new(Vec2::new(0.0, 0.0), 0.0.deg());
/// let targets = [
///     Target::new(1, TargetKind::Hub, Vec2::new(4.0, 0.0)),
///     Target::new(2, TargetKind::Hub, Vec2::new(0.0, 2.0)),
/// ];
///
/// let sighting = nearest(&pose, &targets).unwrap();
/// assert_eq!(sighting.target.id, 2);
/// assert!((sighting.bearing.as_degrees() - 90.0).abs() < 1e-9);
/// ```
pub fn nearest<'a>(
    pose: &Pose,
    candidates: impl IntoIterator<Item = &'a Target>,
) -> Result<Sighting, AssistError> {
    let mut best: Option<(&Target, f64)> = None;

    for target in candidates {
        let distance = pose.distance_to(target.position);

        if best.is_none_or(|(_, closest)| distance < closest) {
            best = Some((target, distance));
        }
    }

    let (target, distance) = best.ok_or(AssistError::NoTarget)?;

    Ok(Sighting {
        target: *target,
        distance,
        bearing: pose.bearing_to(target.position),
    })
}

/// Selects hub and cargo targets from the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Targeting {
    intake_radius: f64,
    max_elevation: f64,
}

impl Targeting {
    /// Creates a selector from its configuration.
    #[must_use]
    pub const fn new(config: &TargetingConfig) -> Self {
        Self {
            intake_radius: config.intake_radius,
            max_elevation: config.max_elevation,
        }
    }

    /// The nearest hub.
    pub fn hub(&self, world: &WorldState) -> Result<Sighting, AssistError> {
        nearest(
            &world.pose,
            world
                .targets
                .iter()
                .filter(|target| target.kind == TargetKind::Hub),
        )
    }

    /// The nearest cargo of the robot's own alliance that can still be collected.
    ///
    /// Cargo inside the intake radius is already held, and cargo above the elevation
    /// limit is still in flight; neither is a candidate.
    pub fn cargo(&self, world: &WorldState) -> Result<Sighting, AssistError> {
        let own = TargetKind::Cargo(world.alliance);

        nearest(
            &world.pose,
            world.targets.iter().filter(|target| {
                target.kind == own
                    && target.elevation <= self.max_elevation
                    && world.pose.distance_to(target.position) >= self.intake_radius
            }),
        )
    }
}
