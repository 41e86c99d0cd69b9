use core::{
    f64::consts::{FRAC_PI_2, PI, TAU},
    fmt,
    ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

const DEGREES_PER_RADIAN: f64 = 180.0 / PI;
const RADIANS_PER_DEGREE: f64 = PI / 180.0;

/// A planar angle.
///
/// Stored internally in radians. Angles are serialized as degrees, since that is how
/// calibration tables and recorded simulator state express them.
#[derive(Default, Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Angle(f64);

impl Angle {
    /// An angle of zero.
    pub const ZERO: Self = Self(0.0);

    /// A quarter turn (90°).
    pub const QUARTER_TURN: Self = Self(FRAC_PI_2);

    /// Creates an angle from radians.
    #[must_use]
    pub const fn from_radians(radians: f64) -> Self {
        Self(radians)
    }

    /// Creates an angle from degrees.
    #[must_use]
    pub const fn from_degrees(degrees: f64) -> Self {
        Self(degrees * RADIANS_PER_DEGREE)
    }

    /// Creates an angle from gradians.
    #[must_use]
    pub const fn from_gradians(gradians: f64) -> Self {
        Self(gradians * (PI / 200.0))
    }

    /// Creates an angle from turns (revolutions).
    #[must_use]
    pub const fn from_turns(turns: f64) -> Self {
        Self(turns * TAU)
    }

    /// Returns this angle in radians.
    #[must_use]
    pub const fn as_radians(self) -> f64 {
        self.0
    }

    /// Returns this angle in degrees.
    #[must_use]
    pub const fn as_degrees(self) -> f64 {
        self.0 * DEGREES_PER_RADIAN
    }

    /// Wraps this angle into the half-open range `(-180°, 180°]`.
    ///
    /// This is the shortest signed rotation equivalent to `self`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hubshot_math::IntoAngle;
    ///
    /// let wrapped = 270.0.deg().wrapped_half();
    /// assert!((wrapped.as_degrees() + 90.0).abs() < 1e-9);
    ///
    /// let wrapped = (-180.0).deg().wrapped_half();
    /// assert!((wrapped.as_degrees() - 180.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn wrapped_half(self) -> Self {
        let full = self.0.rem_euclid(TAU);

        if full > PI {
            Self(full - TAU)
        } else {
            Self(full)
        }
    }

    /// Wraps this angle into the range `[0°, 360°)`.
    #[must_use]
    pub fn wrapped_full(self) -> Self {
        Self(self.0.rem_euclid(TAU))
    }

    /// Absolute value of this angle.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.abs())
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}°", self.as_degrees())
    }
}

// MARK: Operators

impl Add for Angle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Angle {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Mul<f64> for Angle {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Div<f64> for Angle {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Neg for Angle {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

// MARK: Serde

impl Serialize for Angle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_degrees())
    }
}

impl<'de> Deserialize<'de> for Angle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self::from_degrees)
    }
}

// MARK: Extension Trait

/// Extension trait for easily creating [`Angle`]s from floating-point
/// number literals.
pub trait IntoAngle {
    /// Creates an [`Angle`] of `self` degrees.
    fn deg(self) -> Angle;

    /// Creates an [`Angle`] of `self` gradians.
    fn grad(self) -> Angle;

    /// Creates an [`Angle`] of `self` radians.
    fn rad(self) -> Angle;

    /// Creates an [`Angle`] of `self` turns (revolutions).
    fn turns(self) -> Angle;
}

impl IntoAngle for f64 {
    fn deg(self) -> Angle {
        Angle::from_degrees(self)
    }

    fn rad(self) -> Angle {
        Angle::from_radians(self)
    }

    fn grad(self) -> Angle {
        Angle::from_gradians(self)
    }

    fn turns(self) -> Angle {
        Angle::from_turns(self)
    }
}
