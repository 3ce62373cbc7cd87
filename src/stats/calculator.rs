//! Series Calculator Module
//! Primitive arithmetic over daily time series: day-over-day differences,
//! guarded ratios and rolling means.

/// Window length for every smoothed dashboard column.
pub const ROLLING_WINDOW: usize = 7;

/// Pure series operations over optional daily values.
///
/// A `None` marks a value absent upstream or undefined by the derivation
/// rules; it is data, never an error.
pub struct SeriesCalculator;

impl SeriesCalculator {
    /// Day-over-day difference. The first row keeps the raw value itself;
    /// every later row is `values[i] - values[i - 1]`, or `None` when
    /// either operand is missing. Interior gaps are never back-filled.
    pub fn diff_from_previous(values: &[Option<f64>]) -> Vec<Option<f64>> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                if i == 0 {
                    value
                } else {
                    match (values[i - 1], value) {
                        (Some(prev), Some(cur)) => Some(cur - prev),
                        _ => None,
                    }
                }
            })
            .collect()
    }

    /// Element-wise `lhs - rhs`, `None` when either operand is missing.
    pub fn sub(lhs: &[Option<f64>], rhs: &[Option<f64>]) -> Vec<Option<f64>> {
        lhs.iter()
            .zip(rhs.iter())
            .map(|(&a, &b)| match (a, b) {
                (Some(a), Some(b)) => Some(a - b),
                _ => None,
            })
            .collect()
    }

    /// Element-wise `numerator / denominator * scale`. Zero or missing
    /// denominators yield `None`; no NaN or infinity ever leaves here.
    pub fn scaled_ratio(
        numerator: &[Option<f64>],
        denominator: &[Option<f64>],
        scale: f64,
    ) -> Vec<Option<f64>> {
        numerator
            .iter()
            .zip(denominator.iter())
            .map(|(&n, &d)| match (n, d) {
                (Some(n), Some(d)) if d != 0.0 => Some(n / d * scale),
                _ => None,
            })
            .collect()
    }

    /// Rolling mean over the trailing `window` values including the
    /// current one. Undefined until `window` values are available, and
    /// wherever the window contains a missing value.
    pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
        (0..values.len())
            .map(|i| {
                if i + 1 < window {
                    return None;
                }
                let w = &values[i + 1 - window..=i];
                if w.iter().any(|v| v.is_none()) {
                    None
                } else {
                    Some(w.iter().flatten().sum::<f64>() / window as f64)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn diff_keeps_raw_value_on_first_row() {
        let diff = SeriesCalculator::diff_from_previous(&some(&[10.0, 15.0, 22.0]));
        assert_eq!(diff, vec![Some(10.0), Some(5.0), Some(7.0)]);
    }

    #[test]
    fn diff_propagates_interior_gaps() {
        let diff =
            SeriesCalculator::diff_from_previous(&[Some(100.0), None, Some(300.0), Some(350.0)]);
        assert_eq!(diff, vec![Some(100.0), None, None, Some(50.0)]);
    }

    #[test]
    fn diff_keeps_missing_first_row_missing() {
        let diff = SeriesCalculator::diff_from_previous(&[None, Some(5.0)]);
        assert_eq!(diff, vec![None, None]);
    }

    #[test]
    fn ratio_guards_zero_and_missing_divisors() {
        let ratio = SeriesCalculator::scaled_ratio(
            &some(&[100.0, 200.0, 300.0]),
            &[Some(50.0), Some(0.0), None],
            100.0,
        );
        assert_eq!(ratio, vec![Some(200.0), None, None]);
    }

    #[test]
    fn rolling_mean_is_undefined_before_window_fills() {
        let values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]);
        let avg = SeriesCalculator::rolling_mean(&values, ROLLING_WINDOW);
        assert_eq!(&avg[..6], &[None; 6]);
        assert_eq!(avg[6], Some(4.0));
        assert_eq!(avg[7], Some(5.0));
    }

    #[test]
    fn rolling_mean_is_undefined_over_gaps() {
        let mut values = some(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0]);
        values[2] = None;
        let avg = SeriesCalculator::rolling_mean(&values, ROLLING_WINDOW);
        // Windows ending at rows 6..=8 all contain row 2.
        assert_eq!(avg[6], None);
        assert_eq!(avg[7], None);
        assert_eq!(avg[8], None);
        assert_eq!(avg[9], Some(7.0));
    }
}
