//! Per-tick composition of the automation components.

use std::time::Duration;

use hubshot_control::loops::AngularPid;
use hubshot_math::Angle;
use log::{debug, info};

use crate::{
    cargo::{CargoMode, CargoModeMachine, DpadDirection, SeekState},
    climb::{ClimbPhase, ClimbSequencer},
    config::{ApproachConfig, AssistConfig, GestureConfig},
    error::{AssistError, ConfigError},
    frame::{ControlFrame, GamepadState, IntakeSide, PerSide},
    hood::{HoodModel, HoodServo},
    penalty::{PenaltyClock, PenaltyGuard},
    targeting::{Sighting, Targeting},
    world::WorldState,
};

/// Which automation a held bumper asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Engagement {
    Hub,
    Cargo,
}

impl Engagement {
    /// The right bumper takes priority when both are held.
    const fn from_input(input: &GamepadState) -> Option<Self> {
        if input.bumper_right {
            Some(Self::Hub)
        } else if input.bumper_left {
            Some(Self::Cargo)
        } else {
            None
        }
    }
}

/// Runs every automation component once per control-loop tick and merges their
/// overrides onto the operator's input.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use hubshot_assist::{
///     AssistConfig, Orchestrator,
///     frame::GamepadState,
///     world::WorldState,
/// };
///
/// let mut orchestrator = Orchestrator::new(&AssistConfig::default()).unwrap();
///
/// let input = GamepadState { left_y: -0.5, ..Default::default() };
/// let frame = orchestrator.tick(Duration::from_millis(10), &input, &WorldState::default());
///
/// // Nothing is engaged, so the drive axes pass straight through.
/// assert_eq!(frame.forward_reverse, -0.5);
/// assert!(!frame.shoot);
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator {
    targeting: Targeting,
    hood: HoodModel,
    hood_servo: HoodServo,
    rotation: AngularPid,
    approach: ApproachConfig,
    gestures: GestureConfig,
    cargo: CargoModeMachine,
    climb: ClimbSequencer,
    penalty_guard: PenaltyGuard,
    penalty_clock: PenaltyClock,
    previous: GamepadState,
    forcing_shot: bool,
}

impl Orchestrator {
    /// Validates `config` and builds every component from it.
    pub fn new(config: &AssistConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        Ok(Self {
            targeting: Targeting::new(&config.targeting),
            hood: HoodModel::new(&config.hood)?,
            hood_servo: HoodServo::new(&config.hood_servo),
            rotation: AngularPid::from_pid(config.rotation.build()),
            approach: config.approach,
            gestures: config.gestures,
            cargo: CargoModeMachine::new(config.initial_mode),
            climb: ClimbSequencer::new(&config.climb),
            penalty_guard: PenaltyGuard::new(config.penalty.lead_time()),
            penalty_clock: PenaltyClock::new(&config.penalty),
            previous: GamepadState::default(),
            forcing_shot: false,
        })
    }

    /// The active intake mode.
    #[must_use]
    pub const fn cargo_mode(&self) -> CargoMode {
        self.cargo.mode()
    }

    /// The current climb phase.
    #[must_use]
    pub const fn climb_phase(&self) -> ClimbPhase {
        self.climb.phase()
    }

    /// The rotation controller's state.
    #[must_use]
    pub const fn rotation(&self) -> &AngularPid {
        &self.rotation
    }

    /// Returns the climb sequencer to [`ClimbPhase::NotClimbing`], e.g. after a match
    /// restart.
    pub fn reinitialize_climb(&mut self) {
        self.climb.reinitialize();
    }

    /// Computes the control frame for one tick.
    ///
    /// `dt` is the time elapsed since the previous tick. Components run in a fixed order:
    /// targeting, hood, rotation, intake mode, climb, then penalty avoidance. A component
    /// without an active override leaves the corresponding input untouched.
    pub fn tick(&mut self, dt: Duration, input: &GamepadState, world: &WorldState) -> ControlFrame {
        let mut frame = ControlFrame::from(input);

        let engagement = Engagement::from_input(input);
        let sighting = engagement.and_then(|engagement| self.resolve(engagement, world));

        let seek = match (engagement, &sighting) {
            (Some(Engagement::Hub), _) => SeekState::TargetingHub,
            (Some(Engagement::Cargo), Some(sighting)) => {
                SeekState::SeekingCargo(sighting.intake_side())
            }
            _ => SeekState::Idle,
        };

        let aim_error = sighting.as_ref().map(|sighting| match seek {
            SeekState::SeekingCargo(side) => sighting.flank_error(side),
            _ => sighting.bearing,
        });

        self.aim_hood(&mut frame, sighting.as_ref(), world, dt);
        self.aim_rotation(&mut frame, aim_error, dt);

        if let (SeekState::SeekingCargo(side), Some(sighting), Some(error)) =
            (seek, &sighting, aim_error)
        {
            self.strafe_toward(&mut frame, input, side, sighting, error);
        }

        self.update_cargo_mode(input);
        frame.intakes = self.cargo.intake_command(seek);

        let signals = self.climb.observe(world);
        self.climb.update(&signals);
        self.climb.apply(&mut frame);

        Self::synthesize_toggles(&mut frame, input, world);

        self.avoid_penalty(&mut frame, world, dt);

        self.previous = *input;
        frame
    }

    fn resolve(&self, engagement: Engagement, world: &WorldState) -> Option<Sighting> {
        let result = match engagement {
            Engagement::Hub => self.targeting.hub(world),
            Engagement::Cargo => self.targeting.cargo(world),
        };

        result
            .inspect_err(|error| debug!("{engagement:?}: {error}; yielding to manual control"))
            .ok()
    }

    fn aim_hood(
        &mut self,
        frame: &mut ControlFrame,
        sighting: Option<&Sighting>,
        world: &WorldState,
        dt: Duration,
    ) {
        let Some(sighting) = sighting else {
            self.hood_servo.reset();
            return;
        };

        let target = self.hood.angle_for(sighting.distance);
        frame.hood_target = Some(target);

        if let Some(measured) = world.hood_angle {
            let drive = self.hood_servo.update(target, measured, dt);

            frame.aim_up = drive.aim_up;
            frame.aim_down = drive.aim_down;
            frame.precision_left = true;
            frame.precision_right = true;
            frame.precision = drive.precision;
        } else {
            self.hood_servo.reset();
        }
    }

    fn aim_rotation(&mut self, frame: &mut ControlFrame, aim_error: Option<Angle>, dt: Duration) {
        let Some(error) = aim_error else {
            self.rotation.reset();
            return;
        };

        if dt.is_zero() {
            debug!("{}; derivative and integral skipped", AssistError::InvalidTick);
        }

        frame.rotate = self.rotation.step(error, dt);
    }

    /// Strafes toward cargo that is roughly abeam and not yet close.
    fn strafe_toward(
        &self,
        frame: &mut ControlFrame,
        input: &GamepadState,
        side: IntakeSide,
        sighting: &Sighting,
        error: Angle,
    ) {
        if input.left_x.abs() > self.approach.manual_deadband
            || error.abs() > self.approach.max_error
            || sighting.distance < self.approach.min_distance
        {
            return;
        }

        frame.strafe = match side {
            IntakeSide::Left => -1.0,
            IntakeSide::Right => 1.0,
        };
    }

    fn update_cargo_mode(&mut self, input: &GamepadState) {
        let previous = self.previous;

        if input.dpad_up && !previous.dpad_up {
            self.cargo.cycle(DpadDirection::Up);
        }
        if input.dpad_down && !previous.dpad_down {
            self.cargo.cycle(DpadDirection::Down);
        }

        let GestureConfig { all_enter, all_exit } = self.gestures;

        if input.right_y < all_enter && previous.right_y >= all_enter {
            self.cargo.toggle_all();
        } else if input.right_y > all_exit && previous.right_y <= all_exit {
            self.cargo.untoggle_all();
        }
    }

    /// Inverts commanded intakes while their manual toggle is held, then turns commands
    /// into toggle presses where the measured position is known.
    fn synthesize_toggles(frame: &mut ControlFrame, input: &GamepadState, world: &WorldState) {
        let held = PerSide::new(input.x, input.b);

        frame.intakes = frame
            .intakes
            .map(|side, command| command.map(|state| if *held.get(side) { !state } else { state }));

        let toggles = frame.intakes.map(|side, command| {
            match (command, *world.intakes.get(side)) {
                (Some(command), Some(measured)) => command != measured,
                _ => match side {
                    IntakeSide::Left => frame.toggle_left_intake,
                    IntakeSide::Right => frame.toggle_right_intake,
                },
            }
        });

        frame.toggle_left_intake = toggles.left;
        frame.toggle_right_intake = toggles.right;
    }

    fn avoid_penalty(&mut self, frame: &mut ControlFrame, world: &WorldState, dt: Duration) {
        let estimate = self.penalty_clock.update(world.held_cargo, dt);
        let time_until_penalty = world.time_until_penalty.or(estimate);

        let forced = self
            .penalty_guard
            .should_shoot(time_until_penalty, self.cargo.mode());

        if forced {
            if !self.forcing_shot {
                info!(
                    "Forcing shot {:?} ahead of held-cargo penalty",
                    time_until_penalty.unwrap_or_default()
                );
            }
            frame.shoot = true;
        }

        self.forcing_shot = forced;
    }
}

#[cfg(test)]
mod tests {
    use hubshot_math::{IntoAngle, Vec2};

    use super::*;
    use crate::{
        frame::IntakeState,
        world::{Alliance, Pose, Target, TargetKind},
    };

    const DT: Duration = Duration::from_millis(10);

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(&AssistConfig::default()).unwrap()
    }

    fn hub_world() -> WorldState {
        WorldState {
            pose: Pose::new(Vec2::new(0.0, 0.0), 0.0.deg()),
            targets: vec![Target::new(1, TargetKind::Hub, Vec2::new(2.0, 2.0))],
            ..Default::default()
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let mut config = AssistConfig::default();
        config.tick_rate_hz = -1.0;
        assert!(Orchestrator::new(&config).is_err());
    }

    #[test]
    fn hub_aim_turns_toward_bearing() {
        let mut orchestrator = orchestrator();
        let input = GamepadState {
            bumper_right: true,
            right_x: -0.7,
            ..Default::default()
        };

        let frame = orchestrator.tick(DT, &input, &hub_world());
        assert!(frame.rotate > 0.0);
        assert!(frame.hood_target.is_some());
    }

    #[test]
    fn releasing_bumper_resets_rotation() {
        let mut orchestrator = orchestrator();
        let engaged = GamepadState {
            bumper_right: true,
            ..Default::default()
        };

        orchestrator.tick(DT, &engaged, &hub_world());
        assert!(orchestrator.rotation().pid().prev_error() != 0.0);

        let released = GamepadState {
            right_x: 0.3,
            ..Default::default()
        };
        let frame = orchestrator.tick(DT, &released, &hub_world());
        assert_eq!(frame.rotate, 0.3);
        assert_eq!(frame.hood_target, None);
        assert_eq!(orchestrator.rotation().pid().prev_error(), 0.0);
    }

    #[test]
    fn missing_target_yields_to_manual() {
        let mut orchestrator = orchestrator();
        let input = GamepadState {
            bumper_left: true,
            right_x: 0.25,
            left_x: 0.5,
            ..Default::default()
        };

        let frame = orchestrator.tick(DT, &input, &hub_world());
        assert_eq!(frame.rotate, 0.25);
        assert_eq!(frame.strafe, 0.5);
        assert_eq!(frame.hood_target, None);
    }

    #[test]
    fn zero_dt_still_produces_output() {
        let mut orchestrator = orchestrator();
        let input = GamepadState {
            bumper_right: true,
            ..Default::default()
        };

        let frame = orchestrator.tick(Duration::ZERO, &input, &hub_world());
        assert!(frame.rotate > 0.0);
        assert_eq!(orchestrator.rotation().integral(), 0.0);
    }

    #[test]
    fn hood_servo_drives_buttons() {
        let mut orchestrator = orchestrator();
        let input = GamepadState {
            bumper_right: true,
            ..Default::default()
        };
        let world = WorldState {
            hood_angle: Some(0.0.deg()),
            ..hub_world()
        };

        let frame = orchestrator.tick(DT, &input, &world);
        assert!(frame.aim_up && !frame.aim_down);
        assert!(frame.precision_left && frame.precision_right);
        assert!(frame.precision > 0.0);
    }

    #[test]
    fn approach_strafes_toward_abeam_cargo() {
        let mut orchestrator = orchestrator();
        let input = GamepadState {
            bumper_left: true,
            ..Default::default()
        };
        let world = WorldState {
            pose: Pose::new(Vec2::new(0.0, 0.0), 0.0.deg()),
            alliance: Alliance::Blue,
            targets: vec![Target::new(
                4,
                TargetKind::Cargo(Alliance::Blue),
                Vec2::new(0.2, -2.0),
            )],
            ..Default::default()
        };

        let frame = orchestrator.tick(DT, &input, &world);
        assert_eq!(frame.strafe, 1.0);
        assert_eq!(frame.intakes.right, Some(IntakeState::Deployed));
    }

    #[test]
    fn gesture_toggles_all_mode_once_per_crossing() {
        let mut orchestrator = orchestrator();
        let world = WorldState::default();
        let pushed = GamepadState {
            right_y: -1.0,
            ..Default::default()
        };
        let centered = GamepadState::default();
        let pulled = GamepadState {
            right_y: 0.5,
            ..Default::default()
        };

        orchestrator.tick(DT, &pushed, &world);
        assert_eq!(orchestrator.cargo_mode(), CargoMode::All);
        orchestrator.tick(DT, &pushed, &world);
        orchestrator.tick(DT, &centered, &world);
        assert_eq!(orchestrator.cargo_mode(), CargoMode::All);

        orchestrator.tick(DT, &pulled, &world);
        assert_eq!(orchestrator.cargo_mode(), CargoMode::Three);
    }

    #[test]
    fn toggles_follow_measured_intakes() {
        let mut orchestrator = orchestrator();
        let world = WorldState {
            intakes: PerSide::new(Some(IntakeState::Retracted), Some(IntakeState::Deployed)),
            ..Default::default()
        };

        let frame = orchestrator.tick(DT, &GamepadState::default(), &world);
        assert_eq!(frame.intakes, PerSide::splat(Some(IntakeState::Deployed)));
        assert!(frame.toggle_left_intake);
        assert!(!frame.toggle_right_intake);

        let holding_b = GamepadState {
            b: true,
            ..Default::default()
        };
        let frame = orchestrator.tick(DT, &holding_b, &world);
        assert_eq!(frame.intakes.right, Some(IntakeState::Retracted));
        assert!(frame.toggle_right_intake);
    }

    #[test]
    fn unknown_intake_position_keeps_manual_toggle() {
        let mut orchestrator = orchestrator();
        let world = WorldState {
            intakes: PerSide::new(None, Some(IntakeState::Retracted)),
            ..Default::default()
        };

        let frame = orchestrator.tick(DT, &GamepadState::default(), &world);
        assert_eq!(frame.intakes.left, Some(IntakeState::Deployed));
        assert!(!frame.toggle_left_intake);
        assert!(frame.toggle_right_intake);

        let pressing_x = GamepadState {
            x: true,
            ..Default::default()
        };
        let frame = orchestrator.tick(DT, &pressing_x, &world);
        assert!(frame.toggle_left_intake);
    }

    #[test]
    fn penalty_clock_forces_shot_without_world_estimate() {
        let mut orchestrator = orchestrator();
        let world = WorldState {
            held_cargo: 3,
            ..Default::default()
        };
        let dt = Duration::from_millis(500);

        for _ in 0..3 {
            assert!(!orchestrator.tick(dt, &GamepadState::default(), &world).shoot);
        }
        assert!(orchestrator.tick(dt, &GamepadState::default(), &world).shoot);
    }
}
