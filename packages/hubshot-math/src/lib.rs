//! Math utilities & types.

mod angle;
mod vec2;

pub use angle::{Angle, IntoAngle};
pub use vec2::Vec2;

/// Linearly interpolates between `a` and `b` by the factor `t`.
///
/// `t` is not clamped, so values outside of `[0, 1]` extrapolate past the endpoints.
/// Callers that must stay within the endpoints are expected to clamp `t` themselves.
///
/// # Examples
///
/// ```
/// use hubshot_math::lerp;
///
/// assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
/// assert_eq!(lerp(10.0, 20.0, 0.25), 12.5);
/// assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
/// ```
#[must_use]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    (b - a).mul_add(t, a)
}
