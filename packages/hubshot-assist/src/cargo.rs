//! Intake mode selection and intake deployment.

use core::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::frame::{IntakeSide, IntakeState, PerSide};

/// Operator-selected intake strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CargoMode {
    /// Collect two cargo: only the intake facing the sought cargo is lowered.
    Two,
    /// Collect three cargo: both intakes stay lowered.
    Three,
    /// Collect without limit: intakes behave as in [`CargoMode::Two`] and penalty
    /// avoidance is suppressed.
    All,
}

impl fmt::Display for CargoMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Two => "two-cargo",
            Self::Three => "three-cargo",
            Self::All => "all-cargo",
        })
    }
}

/// A d-pad press that selects between two- and three-cargo mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpadDirection {
    /// Selects three-cargo mode.
    Up,
    /// Selects two-cargo mode.
    Down,
}

/// What the bumpers are asking the automation to do this tick.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekState {
    /// No automation engaged.
    #[default]
    Idle,
    /// Driving toward cargo with the given intake.
    SeekingCargo(IntakeSide),
    /// Aiming at the hub.
    TargetingHub,
}

/// State machine tracking the intake mode and the intake positions it commands.
///
/// Two- and three-cargo mode are selected with the d-pad. All-cargo mode is only entered
/// with [`CargoModeMachine::toggle_all`]; leaving it (by gesture or by any d-pad press)
/// restores whichever of two/three-cargo was active when it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CargoModeMachine {
    mode: CargoMode,
    resume: CargoMode,
    last: PerSide<Option<IntakeState>>,
}

impl CargoModeMachine {
    /// Creates a machine starting in `initial`.
    ///
    /// Starting in all-cargo mode resumes three-cargo mode when it is left.
    #[must_use]
    pub const fn new(initial: CargoMode) -> Self {
        Self {
            mode: initial,
            resume: match initial {
                CargoMode::All => CargoMode::Three,
                mode => mode,
            },
            last: PerSide::new(None, None),
        }
    }

    /// The active mode.
    #[must_use]
    pub const fn mode(&self) -> CargoMode {
        self.mode
    }

    /// Handles a d-pad press.
    ///
    /// Outside of all-cargo mode, up selects three-cargo and down selects two-cargo. In
    /// all-cargo mode either direction returns to the mode held before entering it.
    pub fn cycle(&mut self, direction: DpadDirection) -> CargoMode {
        let next = match (self.mode, direction) {
            (CargoMode::All, _) => self.resume,
            (_, DpadDirection::Up) => CargoMode::Three,
            (_, DpadDirection::Down) => CargoMode::Two,
        };

        self.resume = next;
        self.set(next)
    }

    /// Enters all-cargo mode, remembering the current mode.
    pub fn toggle_all(&mut self) -> CargoMode {
        if self.mode != CargoMode::All {
            self.resume = self.mode;
        }
        self.set(CargoMode::All)
    }

    /// Leaves all-cargo mode, restoring the mode held before it was entered.
    pub fn untoggle_all(&mut self) -> CargoMode {
        if self.mode == CargoMode::All {
            self.set(self.resume)
        } else {
            self.mode
        }
    }

    fn set(&mut self, mode: CargoMode) -> CargoMode {
        if mode != self.mode {
            info!("Switching from {} to {} mode", self.mode, mode);
            self.mode = mode;
        }
        mode
    }

    /// Computes the intake positions for this tick.
    ///
    /// - Three-cargo mode keeps both intakes deployed.
    /// - Two-cargo mode deploys the intake facing the sought cargo and retracts the other.
    /// - All-cargo mode deploys the facing intake but never retracts one while seeking.
    /// - Targeting the hub retracts both intakes in two- and all-cargo mode.
    /// - When idle, the previous command is held.
    pub fn intake_command(&mut self, seek: SeekState) -> PerSide<Option<IntakeState>> {
        let command = match (self.mode, seek) {
            (CargoMode::Three, _) => PerSide::splat(Some(IntakeState::Deployed)),
            (_, SeekState::TargetingHub) => PerSide::splat(Some(IntakeState::Retracted)),
            (mode, SeekState::SeekingCargo(side)) => {
                let mut command = self.last;
                *command.get_mut(side) = Some(IntakeState::Deployed);

                if mode == CargoMode::Two {
                    *command.get_mut(side.opposite()) = Some(IntakeState::Retracted);
                }

                command
            }
            (_, SeekState::Idle) => self.last,
        };

        self.last = command;
        command
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEPLOYED: Option<IntakeState> = Some(IntakeState::Deployed);
    const RETRACTED: Option<IntakeState> = Some(IntakeState::Retracted);

    #[test]
    fn dpad_round_trip_from_three() {
        let mut machine = CargoModeMachine::new(CargoMode::Three);
        assert_eq!(machine.cycle(DpadDirection::Down), CargoMode::Two);
        assert_eq!(machine.cycle(DpadDirection::Up), CargoMode::Three);
    }

    #[test]
    fn dpad_never_reaches_all() {
        let mut machine = CargoModeMachine::new(CargoMode::Two);
        for direction in [DpadDirection::Up, DpadDirection::Up, DpadDirection::Down] {
            assert_ne!(machine.cycle(direction), CargoMode::All);
        }
    }

    #[test]
    fn dpad_in_all_restores_previous_mode() {
        for (before, direction) in [
            (CargoMode::Two, DpadDirection::Up),
            (CargoMode::Two, DpadDirection::Down),
            (CargoMode::Three, DpadDirection::Up),
            (CargoMode::Three, DpadDirection::Down),
        ] {
            let mut machine = CargoModeMachine::new(before);
            assert_eq!(machine.toggle_all(), CargoMode::All);
            assert_eq!(machine.cycle(direction), before);
        }
    }

    #[test]
    fn untoggle_restores_previous_mode() {
        let mut machine = CargoModeMachine::new(CargoMode::Three);
        machine.cycle(DpadDirection::Down);
        machine.toggle_all();
        machine.toggle_all();
        assert_eq!(machine.untoggle_all(), CargoMode::Two);
        assert_eq!(machine.untoggle_all(), CargoMode::Two);
    }

    #[test]
    fn starting_in_all_resumes_three() {
        let mut machine = CargoModeMachine::new(CargoMode::All);
        assert_eq!(machine.untoggle_all(), CargoMode::Three);
    }

    #[test]
    fn three_keeps_both_deployed() {
        let mut machine = CargoModeMachine::new(CargoMode::Three);
        for seek in [
            SeekState::Idle,
            SeekState::TargetingHub,
            SeekState::SeekingCargo(IntakeSide::Left),
        ] {
            assert_eq!(machine.intake_command(seek), PerSide::splat(DEPLOYED));
        }
    }

    #[test]
    fn two_deploys_facing_intake_only() {
        let mut machine = CargoModeMachine::new(CargoMode::Two);

        assert_eq!(
            machine.intake_command(SeekState::SeekingCargo(IntakeSide::Left)),
            PerSide::new(DEPLOYED, RETRACTED)
        );
        assert_eq!(
            machine.intake_command(SeekState::Idle),
            PerSide::new(DEPLOYED, RETRACTED)
        );
        assert_eq!(
            machine.intake_command(SeekState::TargetingHub),
            PerSide::splat(RETRACTED)
        );
    }

    #[test]
    fn all_never_retracts_while_seeking() {
        let mut machine = CargoModeMachine::new(CargoMode::Three);
        machine.intake_command(SeekState::Idle);
        machine.toggle_all();

        assert_eq!(
            machine.intake_command(SeekState::SeekingCargo(IntakeSide::Right)),
            PerSide::splat(DEPLOYED)
        );
        assert_eq!(
            machine.intake_command(SeekState::TargetingHub),
            PerSide::splat(RETRACTED)
        );
        assert_eq!(
            machine.intake_command(SeekState::SeekingCargo(IntakeSide::Right)),
            PerSide::new(RETRACTED, DEPLOYED)
        );
    }

    #[test]
    fn idle_before_any_command_leaves_manual_control() {
        let mut machine = CargoModeMachine::new(CargoMode::Two);
        assert_eq!(machine.intake_command(SeekState::Idle), PerSide::splat(None));
    }
}
