//! # Classification Breaks
//!
//! Thresholds bounding the color bins. A value falls in the bin of the
//! highest threshold it meets or exceeds, so a value exactly on a threshold
//! takes the higher bin.

use serde::{Deserialize, Serialize};

use crate::error::ClassifyError;

/// Binning method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassificationMethod {
    /// Equal-count groups over the sorted values; always six thresholds.
    #[default]
    Quantile,
    /// Evenly spaced thresholds between min and max, one per color.
    EqualInterval,
}

impl std::str::FromStr for ClassificationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "quantile" => Ok(Self::Quantile),
            "equal-interval" | "equal_interval" => Ok(Self::EqualInterval),
            other => Err(format!("unknown classification method {other:?}")),
        }
    }
}

/// Non-decreasing sequence of finite thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct ClassificationBreaks(Vec<f64>);

impl TryFrom<Vec<f64>> for ClassificationBreaks {
    type Error = ClassifyError;

    fn try_from(thresholds: Vec<f64>) -> Result<Self, Self::Error> {
        if let Some(index) = thresholds.iter().position(|t| !t.is_finite()) {
            return Err(ClassifyError::InvalidBreaks { index });
        }
        if let Some(index) = thresholds.windows(2).position(|w| w[1] < w[0]) {
            return Err(ClassifyError::InvalidBreaks { index: index + 1 });
        }
        Ok(Self(thresholds))
    }
}

impl From<ClassificationBreaks> for Vec<f64> {
    fn from(breaks: ClassificationBreaks) -> Self {
        breaks.0
    }
}

impl ClassificationBreaks {
    /// Compute breaks for `values` with `method` and a palette of
    /// `color_count` colors. Returns `None` when no finite value remains.
    pub fn compute(values: &[f64], method: ClassificationMethod, color_count: usize) -> Option<Self> {
        let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        let thresholds = match method {
            ClassificationMethod::Quantile => quantile_thresholds(&sorted),
            ClassificationMethod::EqualInterval => equal_interval_thresholds(&sorted, color_count),
        };
        Self::try_from(thresholds).ok()
    }

    /// The thresholds, ascending.
    pub fn thresholds(&self) -> &[f64] {
        &self.0
    }

    /// Index of the highest threshold `value` meets or exceeds; `None` when
    /// the value is below every threshold or not finite.
    pub fn bin_for(&self, value: f64) -> Option<usize> {
        if !value.is_finite() {
            return None;
        }
        self.0.iter().rposition(|&t| value >= t)
    }
}

/// Six thresholds at sorted positions `0, ⌊n/5⌋−1, ⌊2n/5⌋−1, ⌊3n/5⌋−1,
/// ⌊4n/5⌋−1, n−1`. Positions that fall below zero for small `n` take the
/// minimum.
fn quantile_thresholds(sorted: &[f64]) -> Vec<f64> {
    let n = sorted.len();
    let min = sorted[0];
    let at = |fifths: usize| {
        (fifths * n / 5)
            .checked_sub(1)
            .and_then(|i| sorted.get(i))
            .copied()
            .unwrap_or(min)
    };
    vec![min, at(1), at(2), at(3), at(4), sorted[n - 1]]
}

/// `min + i·(max−min)/(k−1)` for `i in 0..k`. When `max − min` overflows,
/// each threshold is interpolated as `min·(1−f) + max·f` instead, and the
/// result is forced non-decreasing within `[min, max]`.
fn equal_interval_thresholds(sorted: &[f64], color_count: usize) -> Vec<f64> {
    let min = sorted[0];
    let max = sorted[sorted.len() - 1];
    if color_count <= 1 {
        return vec![min];
    }
    let last = color_count - 1;
    let span = max - min;
    let mut floor = min;
    (0..color_count)
        .map(|i| {
            let t = if i == last {
                max
            } else if span.is_finite() {
                min + i as f64 * (span / last as f64)
            } else {
                let f = i as f64 / last as f64;
                min * (1.0 - f) + max * f
            };
            floor = t.clamp(floor, max);
            floor
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantile_reference_breaks() {
        let b = ClassificationBreaks::compute(&[10.0, 20.0, 30.0, 40.0, 50.0], ClassificationMethod::Quantile, 5)
            .unwrap();
        assert_eq!(b.thresholds(), &[10.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_quantile_ignores_input_order() {
        let b = ClassificationBreaks::compute(&[50.0, 10.0, 40.0, 30.0, 20.0], ClassificationMethod::Quantile, 5)
            .unwrap();
        assert_eq!(b.thresholds(), &[10.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn test_quantile_small_n_falls_back_to_min() {
        let b = ClassificationBreaks::compute(&[7.0, 3.0], ClassificationMethod::Quantile, 5).unwrap();
        // ⌊2/5⌋−1 and ⌊4/5⌋−1 are negative; ⌊6/5⌋−1 = 0, ⌊8/5⌋−1 = 0.
        assert_eq!(b.thresholds(), &[3.0, 3.0, 3.0, 3.0, 3.0, 7.0]);

        let single = ClassificationBreaks::compute(&[4.0], ClassificationMethod::Quantile, 5).unwrap();
        assert_eq!(single.thresholds(), &[4.0; 6]);
    }

    #[test]
    fn test_quantile_ten_values() {
        let values: Vec<f64> = (1..=10).map(f64::from).collect();
        let b = ClassificationBreaks::compute(&values, ClassificationMethod::Quantile, 5).unwrap();
        assert_eq!(b.thresholds(), &[1.0, 2.0, 4.0, 6.0, 8.0, 10.0]);
    }

    #[test]
    fn test_equal_interval() {
        let b = ClassificationBreaks::compute(&[0.0, 3.0, 100.0], ClassificationMethod::EqualInterval, 5).unwrap();
        assert_eq!(b.thresholds(), &[0.0, 25.0, 50.0, 75.0, 100.0]);
    }

    #[test]
    fn test_equal_interval_spanning_most_of_f64() {
        let b = ClassificationBreaks::compute(&[-1e308, 0.0, 1e308], ClassificationMethod::EqualInterval, 5)
            .unwrap();
        let t = b.thresholds();
        assert_eq!(t.len(), 5);
        assert_eq!(t[0], -1e308);
        assert_eq!(t[4], 1e308);
        assert!(t.iter().all(|v| v.is_finite()));
        assert!(t.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(b.bin_for(0.0), Some(2));
    }

    #[test]
    fn test_equal_interval_single_color() {
        let b = ClassificationBreaks::compute(&[2.0, 9.0], ClassificationMethod::EqualInterval, 1).unwrap();
        assert_eq!(b.thresholds(), &[2.0]);
    }

    #[test]
    fn test_non_finite_values_dropped() {
        assert!(ClassificationBreaks::compute(&[f64::NAN], ClassificationMethod::Quantile, 5).is_none());
        assert!(ClassificationBreaks::compute(&[], ClassificationMethod::EqualInterval, 5).is_none());
    }

    #[test]
    fn test_bin_for_ties_go_high() {
        let b = ClassificationBreaks::try_from(vec![10.0, 10.0, 20.0, 30.0, 40.0, 50.0]).unwrap();
        assert_eq!(b.bin_for(25.0), Some(2));
        assert_eq!(b.bin_for(20.0), Some(2));
        assert_eq!(b.bin_for(10.0), Some(1));
        assert_eq!(b.bin_for(50.0), Some(5));
        assert_eq!(b.bin_for(9.9), None);
        assert_eq!(b.bin_for(f64::NAN), None);
    }

    #[test]
    fn test_decreasing_breaks_rejected() {
        assert_eq!(
            ClassificationBreaks::try_from(vec![1.0, 3.0, 2.0]),
            Err(ClassifyError::InvalidBreaks { index: 2 })
        );
        assert!(ClassificationBreaks::try_from(vec![1.0, f64::INFINITY]).is_err());
    }

    #[test]
    fn test_method_parse() {
        assert_eq!("quantile".parse::<ClassificationMethod>(), Ok(ClassificationMethod::Quantile));
        assert_eq!("equal-interval".parse::<ClassificationMethod>(), Ok(ClassificationMethod::EqualInterval));
        assert!("jenks".parse::<ClassificationMethod>().is_err());
    }
}
