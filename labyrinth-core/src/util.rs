//! Utilities.
use crate::error::LabyrinthError;

/// Returns the index of the largest value, the lowest index on ties.
///
/// Returns 0 for an empty slice. NaN never wins against a number.
pub fn argmax(values: &[f32]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] || (values[best].is_nan() && !v.is_nan()) {
            best = i;
        }
    }
    best
}

/// Returns the largest value, `f32::MIN` for an empty slice.
pub fn max_value(values: &[f32]) -> f32 {
    values.iter().copied().fold(f32::MIN, f32::max)
}

/// Checks that `v` lies in `(0, 1]`.
pub fn check_unit_interval(name: &str, v: f64) -> Result<(), LabyrinthError> {
    if v > 0.0 && v <= 1.0 {
        Ok(())
    } else {
        Err(LabyrinthError::InvalidConfig(format!(
            "{} must be in (0, 1], got {}",
            name, v
        )))
    }
}

/// Checks that `v` is positive.
pub fn check_positive(name: &str, v: usize) -> Result<(), LabyrinthError> {
    if v > 0 {
        Ok(())
    } else {
        Err(LabyrinthError::InvalidConfig(format!(
            "{} must be positive",
            name
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_prefers_lowest_index_on_ties() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[-1.0, 2.0, 2.0, 1.0]), 1);
        assert_eq!(argmax(&[f32::NAN, -3.0, -2.0]), 2);
    }

    #[test]
    fn test_check_unit_interval() {
        assert!(check_unit_interval("gamma", 1.0).is_ok());
        assert!(check_unit_interval("gamma", 0.5).is_ok());
        assert!(matches!(
            check_unit_interval("gamma", 0.0),
            Err(LabyrinthError::InvalidConfig(_))
        ));
        assert!(check_unit_interval("gamma", 1.01).is_err());
        assert!(check_unit_interval("gamma", f64::NAN).is_err());
    }
}
