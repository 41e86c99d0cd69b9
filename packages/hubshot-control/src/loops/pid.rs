use std::time::Duration;

use hubshot_math::Angle;

use super::Feedback;

/// Proportional-Integral-Derivative (PID) feedback controller.
///
/// Each call to [`Pid::step`] accumulates the error into the integral term and
/// differentiates it against the previous error. The integrator and derivative memory
/// are only cleared by an explicit [`Pid::reset`].
///
/// # Integral limits
///
/// Two optional limits constrain the integral term:
///
/// - The *integration range* only accumulates error while `|error|` is below the range.
///   Outside of it the accumulator is held at its current value.
/// - The *integral limit* saturates the accumulator to `[-limit, limit]`, bounding windup.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hubshot_control::loops::Pid;
///
/// let mut pid = Pid::new(0.5, 0.0, 0.0, None);
/// let output = pid.step(2.0, Duration::from_millis(10));
///
/// assert_eq!(output, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pid {
    kp: f64,
    ki: f64,
    kd: f64,
    integration_range: Option<f64>,
    integral_limit: Option<f64>,
    output_limit: Option<f64>,

    integral: f64,
    prev_error: f64,
}

impl Pid {
    /// Creates a new PID controller with the given gains and integration range.
    #[must_use]
    pub const fn new(kp: f64, ki: f64, kd: f64, integration_range: Option<f64>) -> Self {
        Self {
            kp,
            ki,
            kd,
            integration_range,
            integral_limit: None,
            output_limit: None,
            integral: 0.0,
            prev_error: 0.0,
        }
    }

    /// Returns the current value of the integral accumulator.
    #[must_use]
    pub const fn integral(&self) -> f64 {
        self.integral
    }

    /// Returns the error passed to the most recent [`Pid::step`].
    #[must_use]
    pub const fn prev_error(&self) -> f64 {
        self.prev_error
    }

    /// Sets the saturation bound for the integral accumulator.
    #[must_use]
    pub const fn with_integral_limit(mut self, limit: Option<f64>) -> Self {
        self.integral_limit = limit;
        self
    }

    /// Sets the symmetric bound applied to the controller output.
    #[must_use]
    pub const fn with_output_limit(mut self, limit: Option<f64>) -> Self {
        self.output_limit = limit;
        self
    }

    /// Clears the integral accumulator and the previous error.
    pub const fn reset(&mut self) {
        self.integral = 0.0;
        self.prev_error = 0.0;
    }

    /// Advances the controller by one tick with the given error.
    ///
    /// A zero `dt` is an invalid tick: the derivative term is treated as zero and the
    /// integral step is skipped. The previous error is recorded regardless.
    pub fn step(&mut self, error: f64, dt: Duration) -> f64 {
        let dt = dt.as_secs_f64();

        let derivative = if dt > 0.0 {
            if self
                .integration_range
                .is_none_or(|range| error.abs() < range)
            {
                self.integral += error * dt;
            }

            if let Some(limit) = self.integral_limit {
                self.integral = self.integral.clamp(-limit, limit);
            }

            (error - self.prev_error) / dt
        } else {
            0.0
        };

        self.prev_error = error;

        let mut output = (self.kp * error) + (self.ki * self.integral) + (self.kd * derivative);

        if let Some(limit) = self.output_limit {
            output = output.clamp(-limit, limit);
        }

        output
    }
}

impl Feedback for Pid {
    type State = f64;
    type Signal = f64;

    fn update(&mut self, measurement: f64, setpoint: f64, dt: Duration) -> f64 {
        self.step(setpoint - measurement, dt)
    }
}

// MARK: Angular

/// A PID controller operating on angular error.
///
/// Errors are wrapped to the shortest signed rotation in `(-180°, 180°]` before being
/// fed to the underlying [`Pid`]. Gains are expressed per degree of error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AngularPid {
    pid: Pid,
}

impl AngularPid {
    /// Creates a new angular PID controller with the given gains and integration range
    /// (in degrees).
    #[must_use]
    pub const fn new(kp: f64, ki: f64, kd: f64, integration_range: Option<Angle>) -> Self {
        Self {
            pid: Pid::new(
                kp,
                ki,
                kd,
                match integration_range {
                    Some(range) => Some(range.as_degrees()),
                    None => None,
                },
            ),
        }
    }

    /// Wraps an existing linear [`Pid`] whose units are degrees.
    #[must_use]
    pub const fn from_pid(pid: Pid) -> Self {
        Self { pid }
    }

    /// Returns the underlying linear controller.
    #[must_use]
    pub const fn pid(&self) -> &Pid {
        &self.pid
    }

    /// Returns the current value of the integral accumulator, in degree-seconds.
    #[must_use]
    pub const fn integral(&self) -> f64 {
        self.pid.integral()
    }

    /// Clears the integral accumulator and the previous error.
    pub const fn reset(&mut self) {
        self.pid.reset();
    }

    /// Advances the controller by one tick with the given heading error.
    pub fn step(&mut self, error: Angle, dt: Duration) -> f64 {
        self.pid.step(error.wrapped_half().as_degrees(), dt)
    }
}

impl Feedback for AngularPid {
    type State = Angle;
    type Signal = f64;

    fn update(&mut self, measurement: Angle, setpoint: Angle, dt: Duration) -> f64 {
        self.step(setpoint - measurement, dt)
    }
}

#[cfg(test)]
mod tests {
    use hubshot_math::IntoAngle;

    use super::*;

    const DT: Duration = Duration::from_millis(10);

    #[test]
    fn proportional_only() {
        let mut pid = Pid::new(2.0, 0.0, 0.0, None);
        assert_eq!(pid.step(1.5, DT), 3.0);
        assert_eq!(pid.step(-0.5, DT), -1.0);
    }

    #[test]
    fn integral_grows_until_saturation() {
        let mut pid = Pid::new(0.0, 1.0, 0.0, None).with_integral_limit(Some(0.05));
        let mut last = 0.0;

        for _ in 0..4 {
            let output = pid.step(1.0, DT);
            assert!(output > last);
            last = output;
        }

        for _ in 0..10 {
            pid.step(1.0, DT);
        }
        assert!((pid.integral() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn integration_range_holds_accumulator() {
        let mut pid = Pid::new(0.0, 1.0, 0.0, Some(5.0));
        pid.step(1.0, DT);
        let held = pid.integral();
        pid.step(10.0, DT);
        assert_eq!(pid.integral(), held);
    }

    #[test]
    fn derivative_uses_previous_error() {
        let mut pid = Pid::new(0.0, 0.0, 1.0, None);
        pid.step(1.0, DT);
        let output = pid.step(2.0, DT);
        assert!((output - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_dt_skips_integral_and_derivative() {
        let mut pid = Pid::new(1.0, 1.0, 1.0, None);
        let output = pid.step(3.0, Duration::ZERO);

        assert_eq!(output, 3.0);
        assert_eq!(pid.integral(), 0.0);
        assert_eq!(pid.prev_error(), 3.0);
    }

    #[test]
    fn output_is_clamped() {
        let mut pid = Pid::new(10.0, 0.0, 0.0, None).with_output_limit(Some(1.0));
        assert_eq!(pid.step(5.0, DT), 1.0);
        assert_eq!(pid.step(-5.0, DT), -1.0);
    }

    #[test]
    fn reset_reproduces_fresh_output() {
        let mut fresh = Pid::new(0.3, 0.2, 0.01, None);
        let mut used = fresh;

        for error in [4.0, -2.0, 7.5] {
            used.step(error, DT);
        }
        used.reset();

        assert_eq!(used.step(1.25, DT), fresh.step(1.25, DT));
    }

    #[test]
    fn angular_error_is_wrapped() {
        let mut pid = AngularPid::new(1.0, 0.0, 0.0, None);
        let output = pid.step(350.0.deg(), DT);
        assert!((output + 10.0).abs() < 1e-9);
    }

    #[test]
    fn feedback_update_uses_setpoint_minus_measurement() {
        let mut pid = AngularPid::new(1.0, 0.0, 0.0, None);
        let output = pid.update(170.0.deg(), (-170.0).deg(), DT);
        assert!((output - 20.0).abs() < 1e-9);

        let mut linear = Pid::new(1.0, 0.0, 0.0, None);
        assert_eq!(linear.update(1.0, 3.0, DT), 2.0);
    }
}
