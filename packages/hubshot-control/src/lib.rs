//! Control theory primitives.
//!
//! This crate provides the feedback loops and calibration lookups that the automation
//! layer composes each tick:
//!
//! - [`loops`]: the [`Feedback`](loops::Feedback) trait, a linear [`Pid`](loops::Pid) and
//!   an [`AngularPid`](loops::AngularPid) that operates on wrapped heading errors.
//! - [`LookupTable`]: piecewise-linear interpolation over calibration points, clamped to
//!   the calibrated range.

pub mod loops;

mod lookup;

pub use lookup::{LookupError, LookupTable};
