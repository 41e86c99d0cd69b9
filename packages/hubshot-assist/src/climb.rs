//! Endgame climb sequencing.

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    config::ClimbConfig,
    error::AssistError,
    frame::{ControlFrame, IntakeState, PerSide},
    world::WorldState,
};

/// Trigger value above which a manual climber input takes over the climber drive.
const MANUAL_CLIMB_THRESHOLD: f64 = 0.5;

/// Progress through the endgame climb.
///
/// Phases are ordered; the sequencer only ever moves to the immediate successor.
#[derive(
    Default, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ClimbPhase {
    /// Climb automation is inactive.
    #[default]
    NotClimbing,
    /// The robot entered its hangar during the endgame and the climber deployed.
    HangarDeployed,
    /// The climber is ascending toward the mid rung.
    AscendingToRung,
    /// The climber is above the mid rung.
    AboveMidRung,
    /// The traversal mechanism reported completion.
    TraversalComplete,
}

impl ClimbPhase {
    /// The phase that follows this one, if any.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::NotClimbing => Some(Self::HangarDeployed),
            Self::HangarDeployed => Some(Self::AscendingToRung),
            Self::AscendingToRung => Some(Self::AboveMidRung),
            Self::AboveMidRung => Some(Self::TraversalComplete),
            Self::TraversalComplete => None,
        }
    }

    /// Returns `true` once the climb has started.
    #[must_use]
    pub const fn is_climbing(self) -> bool {
        !matches!(self, Self::NotClimbing)
    }
}

/// World signals the sequencer reacts to.
#[derive(Default, Debug, Clone, Copy, PartialEq)]
pub struct ClimbSignals {
    /// The match is in its endgame.
    pub endgame: bool,
    /// The robot is inside its alliance's hangar.
    pub in_hangar: bool,
    /// Measured climber height, in meters.
    pub height: f64,
    /// The traversal mechanism reports completion.
    pub traversal_complete: bool,
}

/// One-directional climb state machine.
///
/// The sequencer never resets itself. If the match is restarted, the host must call
/// [`ClimbSequencer::reinitialize`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimbSequencer {
    phase: ClimbPhase,
    config: ClimbConfig,
}

impl ClimbSequencer {
    /// Creates a sequencer in [`ClimbPhase::NotClimbing`].
    #[must_use]
    pub const fn new(config: &ClimbConfig) -> Self {
        Self {
            phase: ClimbPhase::NotClimbing,
            config: *config,
        }
    }

    /// The current phase.
    #[must_use]
    pub const fn phase(&self) -> ClimbPhase {
        self.phase
    }

    /// Extracts the signals relevant to climbing from the world.
    #[must_use]
    pub fn observe(&self, world: &WorldState) -> ClimbSignals {
        ClimbSignals {
            endgame: world.is_endgame(),
            in_hangar: self
                .config
                .hangar(world.alliance)
                .contains(world.pose.position),
            height: world.climb_height,
            traversal_complete: world.traversal_complete,
        }
    }

    /// Each phase paired with whether its trigger is active in `signals`.
    fn triggers(&self, signals: &ClimbSignals) -> [(bool, ClimbPhase); 4] {
        [
            (
                signals.endgame && signals.in_hangar,
                ClimbPhase::HangarDeployed,
            ),
            (
                self.phase == ClimbPhase::HangarDeployed,
                ClimbPhase::AscendingToRung,
            ),
            (
                signals.height >= self.config.mid_rung_height,
                ClimbPhase::AboveMidRung,
            ),
            (signals.traversal_complete, ClimbPhase::TraversalComplete),
        ]
    }

    /// Advances at most one phase based on this tick's signals.
    ///
    /// Triggers for phases that are already behind the sequencer are ignored. Triggers
    /// that would skip a phase are rejected and logged, and the current phase is held.
    pub fn update(&mut self, signals: &ClimbSignals) -> ClimbPhase {
        let from = self.phase;
        let triggers = self.triggers(signals);

        for (active, to) in triggers {
            if !active || to <= from {
                continue;
            }

            if self.phase == from {
                if let Err(error) = self.advance_to(to) {
                    debug!("{error}; holding {from:?}");
                }
            } else {
                debug!(
                    "{}; already advanced this tick",
                    AssistError::ClimbPrecondition { from, to }
                );
            }
        }

        self.phase
    }

    /// Moves to `to`, which must be the immediate successor of the current phase.
    pub fn advance_to(&mut self, to: ClimbPhase) -> Result<ClimbPhase, AssistError> {
        if self.phase.next() != Some(to) {
            return Err(AssistError::ClimbPrecondition {
                from: self.phase,
                to,
            });
        }

        info!("Climb phase {:?} -> {:?}", self.phase, to);
        self.phase = to;

        Ok(to)
    }

    /// Returns the sequencer to [`ClimbPhase::NotClimbing`].
    pub fn reinitialize(&mut self) {
        if self.phase.is_climbing() {
            info!("Climb sequencer reinitialized from {:?}", self.phase);
        }
        self.phase = ClimbPhase::NotClimbing;
    }

    /// Applies this phase's overrides to `frame`.
    ///
    /// Once climbing, both intakes are stowed. The climber drive follows the phase unless
    /// the operator is pressing either climber trigger.
    pub fn apply(&self, frame: &mut ControlFrame) {
        if !self.phase.is_climbing() {
            return;
        }

        frame.intakes = PerSide::splat(Some(IntakeState::Retracted));

        if frame.climber_forward >= MANUAL_CLIMB_THRESHOLD
            || frame.climber_reverse >= MANUAL_CLIMB_THRESHOLD
        {
            return;
        }

        match self.phase {
            ClimbPhase::HangarDeployed => frame.climber_extend = true,
            ClimbPhase::AscendingToRung | ClimbPhase::AboveMidRung => frame.climber_forward = 1.0,
            ClimbPhase::TraversalComplete => frame.climber_forward = 0.0,
            ClimbPhase::NotClimbing => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use hubshot_math::Vec2;

    use super::*;
    use crate::{
        frame::GamepadState,
        world::{Alliance, MatchPhase, Pose},
    };

    fn sequencer() -> ClimbSequencer {
        ClimbSequencer::new(&ClimbConfig::default())
    }

    fn hangar_signals() -> ClimbSignals {
        ClimbSignals {
            endgame: true,
            in_hangar: true,
            ..Default::default()
        }
    }

    #[test]
    fn full_sequence() {
        let mut climb = sequencer();

        assert_eq!(climb.update(&ClimbSignals::default()), ClimbPhase::NotClimbing);
        assert_eq!(climb.update(&hangar_signals()), ClimbPhase::HangarDeployed);
        assert_eq!(climb.update(&hangar_signals()), ClimbPhase::AscendingToRung);
        assert_eq!(
            climb.update(&ClimbSignals {
                height: 0.5,
                ..hangar_signals()
            }),
            ClimbPhase::AscendingToRung
        );
        assert_eq!(
            climb.update(&ClimbSignals {
                height: 0.8,
                ..hangar_signals()
            }),
            ClimbPhase::AboveMidRung
        );
        assert_eq!(
            climb.update(&ClimbSignals {
                height: 0.8,
                traversal_complete: true,
                ..hangar_signals()
            }),
            ClimbPhase::TraversalComplete
        );
    }

    #[test]
    fn triggers_track_signals_and_phase() {
        let mut climb = sequencer();
        let signals = ClimbSignals {
            height: 0.75,
            ..hangar_signals()
        };

        assert_eq!(
            climb.triggers(&signals),
            [
                (true, ClimbPhase::HangarDeployed),
                (false, ClimbPhase::AscendingToRung),
                (true, ClimbPhase::AboveMidRung),
                (false, ClimbPhase::TraversalComplete),
            ]
        );

        assert_eq!(climb.update(&signals), ClimbPhase::HangarDeployed);
        assert!(climb.triggers(&ClimbSignals::default())[1].0);
    }

    #[test]
    fn hangar_requires_endgame() {
        let mut climb = sequencer();
        let signals = ClimbSignals {
            endgame: false,
            ..hangar_signals()
        };
        assert_eq!(climb.update(&signals), ClimbPhase::NotClimbing);
    }

    #[test]
    fn skipping_triggers_hold_phase() {
        let mut climb = sequencer();
        let signals = ClimbSignals {
            height: 2.0,
            traversal_complete: true,
            ..Default::default()
        };
        assert_eq!(climb.update(&signals), ClimbPhase::NotClimbing);
        assert_eq!(
            climb.advance_to(ClimbPhase::AboveMidRung),
            Err(AssistError::ClimbPrecondition {
                from: ClimbPhase::NotClimbing,
                to: ClimbPhase::AboveMidRung,
            })
        );
    }

    #[test]
    fn never_regresses() {
        let mut climb = sequencer();
        let mut previous = climb.phase();

        for tick in 0..64_u32 {
            let signals = ClimbSignals {
                endgame: tick % 3 != 0,
                in_hangar: tick % 5 != 1,
                height: f64::from(tick % 7) * 0.2,
                traversal_complete: tick % 11 == 10,
            };
            let phase = climb.update(&signals);
            assert!(phase >= previous, "{phase:?} regressed from {previous:?}");
            previous = phase;
        }

        assert_eq!(previous, ClimbPhase::TraversalComplete);
    }

    #[test]
    fn only_reinitialize_resets() {
        let mut climb = sequencer();
        climb.update(&hangar_signals());
        assert_eq!(climb.update(&ClimbSignals::default()), ClimbPhase::AscendingToRung);

        climb.reinitialize();
        assert_eq!(climb.phase(), ClimbPhase::NotClimbing);
    }

    #[test]
    fn observes_own_hangar_only() {
        let climb = sequencer();
        let mut world = WorldState {
            pose: Pose::new(Vec2::new(2.0, 6.0), Default::default()),
            alliance: Alliance::Blue,
            phase: MatchPhase::Endgame,
            ..Default::default()
        };
        assert!(climb.observe(&world).in_hangar);
        assert!(climb.observe(&world).endgame);

        world.alliance = Alliance::Red;
        assert!(!climb.observe(&world).in_hangar);
    }

    #[test]
    fn overrides_follow_phase() {
        let mut climb = sequencer();
        let idle = ControlFrame::from(&GamepadState::default());

        let mut frame = idle;
        climb.apply(&mut frame);
        assert_eq!(frame, idle);

        climb.advance_to(ClimbPhase::HangarDeployed).unwrap();
        climb.apply(&mut frame);
        assert!(frame.climber_extend);
        assert_eq!(frame.intakes, PerSide::splat(Some(IntakeState::Retracted)));

        climb.advance_to(ClimbPhase::AscendingToRung).unwrap();
        let mut frame = idle;
        climb.apply(&mut frame);
        assert_eq!(frame.climber_forward, 1.0);

        let mut manual = ControlFrame::from(&GamepadState {
            trigger_left: 0.8,
            ..Default::default()
        });
        climb.apply(&mut manual);
        assert_eq!(manual.climber_forward, 0.0);
        assert_eq!(manual.climber_reverse, 0.8);
    }
}
