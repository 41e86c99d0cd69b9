use hubshot_math::lerp;

/// Errors produced when building a [`LookupTable`].
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum LookupError {
    /// The table has no calibration points.
    #[error("lookup table has no calibration points")]
    Empty,

    /// A calibration point contains a NaN or infinite value.
    #[error("calibration point {index} is not finite")]
    NonFinite {
        /// Index of the offending point.
        index: usize,
    },

    /// Calibration inputs are not strictly increasing.
    #[error("calibration point {index} does not increase past the previous input")]
    Unordered {
        /// Index of the offending point.
        index: usize,
    },
}

/// A piecewise-linear mapping defined by ordered calibration points.
///
/// Inputs between two calibration points are linearly interpolated. Inputs outside the
/// calibrated range are clamped to the output of the nearest endpoint; the table never
/// extrapolates.
///
/// # Examples
///
/// ```
/// use hubshot_control::LookupTable;
///
/// let table = LookupTable::new(vec![(1.0, 100.0), (2.0, 80.0), (3.0, 40.0)]).unwrap();
///
/// assert_eq!(table.sample(1.5), 90.0);
/// assert_eq!(table.sample(0.0), 100.0);
/// assert_eq!(table.sample(9.0), 40.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LookupTable {
    points: Vec<(f64, f64)>,
}

impl LookupTable {
    /// Creates a table from `(input, output)` calibration points.
    ///
    /// Points must be finite and sorted by strictly increasing input.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, LookupError> {
        if points.is_empty() {
            return Err(LookupError::Empty);
        }

        for (index, &(input, output)) in points.iter().enumerate() {
            if !input.is_finite() || !output.is_finite() {
                return Err(LookupError::NonFinite { index });
            }

            if index > 0 && input <= points[index - 1].0 {
                return Err(LookupError::Unordered { index });
            }
        }

        Ok(Self { points })
    }

    /// Returns the calibrated input range as `(min, max)`.
    #[must_use]
    pub fn domain(&self) -> (f64, f64) {
        let (first, last) = self.endpoints();
        (first.0, last.0)
    }

    fn endpoints(&self) -> ((f64, f64), (f64, f64)) {
        // Construction guarantees at least one point.
        let first = self.points[0];
        let last = self.points[self.points.len() - 1];
        (first, last)
    }

    /// Samples the table at `input`.
    ///
    /// NaN inputs are treated as lying below the calibrated range.
    #[must_use]
    pub fn sample(&self, input: f64) -> f64 {
        let (first, last) = self.endpoints();

        if input.is_nan() || input <= first.0 {
            return first.1;
        }
        if input >= last.0 {
            return last.1;
        }

        let upper = self.points.partition_point(|&(x, _)| x <= input);
        let (x0, y0) = self.points[upper - 1];
        let (x1, y1) = self.points[upper];

        lerp(y0, y1, (input - x0) / (x1 - x0))
    }
}
