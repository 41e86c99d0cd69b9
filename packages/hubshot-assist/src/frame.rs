//! Controller input and remapped control output.

use core::ops::Not;

use hubshot_math::Angle;
use serde::{Deserialize, Serialize};

/// Raw gamepad state for one tick.
///
/// Axes are in `[-1, 1]` (triggers in `[0, 1]`). Stick Y axes follow the usual gamepad
/// convention where pushing the stick up produces a negative value.
#[allow(clippy::struct_excessive_bools)]
#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GamepadState {
    /// Bottom face button.
    pub a: bool,
    /// Right face button.
    pub b: bool,
    /// Left face button.
    pub x: bool,
    /// Top face button.
    pub y: bool,
    /// D-pad up.
    pub dpad_up: bool,
    /// D-pad down.
    pub dpad_down: bool,
    /// D-pad left.
    pub dpad_left: bool,
    /// D-pad right.
    pub dpad_right: bool,
    /// Left bumper. Engages cargo seeking.
    pub bumper_left: bool,
    /// Right bumper. Engages hub targeting.
    pub bumper_right: bool,
    /// Back/select button.
    pub back: bool,
    /// Start button.
    pub start: bool,
    /// Left stick X.
    pub left_x: f64,
    /// Left stick Y.
    pub left_y: f64,
    /// Right stick X.
    pub right_x: f64,
    /// Right stick Y.
    pub right_y: f64,
    /// Left trigger.
    pub trigger_left: f64,
    /// Right trigger.
    pub trigger_right: f64,
}

/// One of the two intakes mounted on the robot's flanks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeSide {
    /// Intake on the robot's left flank.
    Left,
    /// Intake on the robot's right flank.
    Right,
}

impl IntakeSide {
    /// The intake on the other flank.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Position of an intake flap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeState {
    /// Flap lowered, collecting cargo.
    Deployed,
    /// Flap raised.
    Retracted,
}

impl Not for IntakeState {
    type Output = Self;

    fn not(self) -> Self::Output {
        match self {
            Self::Deployed => Self::Retracted,
            Self::Retracted => Self::Deployed,
        }
    }
}

/// A value for each intake.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PerSide<T> {
    /// Value for the left intake.
    pub left: T,
    /// Value for the right intake.
    pub right: T,
}

impl<T> PerSide<T> {
    /// Creates a pair from its left and right values.
    pub const fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    /// Returns the value for `side`.
    pub const fn get(&self, side: IntakeSide) -> &T {
        match side {
            IntakeSide::Left => &self.left,
            IntakeSide::Right => &self.right,
        }
    }

    /// Returns the value for `side` mutably.
    pub const fn get_mut(&mut self, side: IntakeSide) -> &mut T {
        match side {
            IntakeSide::Left => &mut self.left,
            IntakeSide::Right => &mut self.right,
        }
    }

    /// Applies `f` to both values.
    pub fn map<U>(self, mut f: impl FnMut(IntakeSide, T) -> U) -> PerSide<U> {
        PerSide {
            left: f(IntakeSide::Left, self.left),
            right: f(IntakeSide::Right, self.right),
        }
    }
}

impl<T: Clone> PerSide<T> {
    /// Creates a pair holding the same value on both sides.
    pub fn splat(value: T) -> Self {
        Self {
            left: value.clone(),
            right: value,
        }
    }
}

/// The remapped control frame handed to the robot each tick.
///
/// Every field starts as the manual mapping of the [`GamepadState`] and is only replaced
/// where an automation component has an active override.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlFrame {
    /// Run the intakes in reverse.
    pub reverse_intake: bool,
    /// Press the right intake toggle.
    pub toggle_right_intake: bool,
    /// Press the left intake toggle.
    pub toggle_left_intake: bool,
    /// Fire held cargo.
    pub shoot: bool,
    /// Lower the hood.
    pub aim_down: bool,
    /// Raise the hood.
    pub aim_up: bool,
    /// Retract the climber arms.
    pub climber_retract: bool,
    /// Extend the climber arms.
    pub climber_extend: bool,
    /// Enable precision mode on the left side.
    pub precision_left: bool,
    /// Enable precision mode on the right side.
    pub precision_right: bool,
    /// Stop button.
    pub stop: bool,
    /// Restart button.
    pub restart: bool,
    /// Right stick Y, passed through.
    pub right_y: f64,
    /// Rotation command in `[-1, 1]`. Positive values turn counter-clockwise.
    pub rotate: f64,
    /// Forward/reverse drive axis.
    pub forward_reverse: f64,
    /// Strafe axis. Positive values move toward the robot's right flank.
    pub strafe: f64,
    /// Climber reverse drive.
    pub climber_reverse: f64,
    /// Climber forward drive.
    pub climber_forward: f64,
    /// Precision scale.
    pub precision: f64,
    /// Hood angle commanded by the lookup model, if any.
    pub hood_target: Option<Angle>,
    /// Commanded intake positions. `None` leaves that intake under manual control.
    pub intakes: PerSide<Option<IntakeState>>,
}

impl ControlFrame {
    /// Precision scale used when nothing overrides it.
    pub const DEFAULT_PRECISION: f64 = 0.3;
}

impl From<&GamepadState> for ControlFrame {
    fn from(gamepad: &GamepadState) -> Self {
        Self {
            reverse_intake: gamepad.a,
            toggle_right_intake: gamepad.b,
            toggle_left_intake: gamepad.x,
            shoot: gamepad.y,
            aim_down: gamepad.dpad_down,
            aim_up: gamepad.dpad_up,
            climber_retract: gamepad.dpad_left,
            climber_extend: gamepad.dpad_right,
            precision_left: gamepad.bumper_left,
            precision_right: gamepad.bumper_right,
            stop: gamepad.start,
            restart: gamepad.back,
            right_y: gamepad.right_y,
            rotate: gamepad.right_x,
            forward_reverse: gamepad.left_y,
            strafe: gamepad.left_x,
            climber_reverse: gamepad.trigger_left,
            climber_forward: gamepad.trigger_right,
            precision: Self::DEFAULT_PRECISION,
            hood_target: None,
            intakes: PerSide::default(),
        }
    }
}
