use itertools::Itertools;
use itertools::MinMaxResult;

/// Descriptive statistics over a set of binding energies (kcal/mol).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergySummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
}

impl EnergySummary {
    /// Returns `None` for an empty input.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        let (min, max) = match values.iter().copied().minmax_by(f64::total_cmp) {
            MinMaxResult::NoElements => return None,
            MinMaxResult::OneElement(v) => (v, v),
            MinMaxResult::MinMax(lo, hi) => (lo, hi),
        };
        let count = values.len();
        let mean = values.iter().sum::<f64>() / count as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count as f64;

        Some(Self {
            count,
            min,
            max,
            mean,
            std_dev: variance.sqrt(),
        })
    }
}

/// Fixed-width histogram over `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub min: f64,
    pub max: f64,
    pub counts: Vec<usize>,
}

impl Histogram {
    pub fn new(values: &[f64], bins: usize) -> Option<Self> {
        if bins == 0 {
            return None;
        }
        let summary = EnergySummary::from_values(values.iter().copied())?;
        let width = (summary.max - summary.min) / bins as f64;
        let mut counts = vec![0; bins];
        for &v in values {
            let idx = if width > 0.0 {
                (((v - summary.min) / width) as usize).min(bins - 1)
            } else {
                0
            };
            counts[idx] += 1;
        }
        Some(Self {
            min: summary.min,
            max: summary.max,
            counts,
        })
    }

    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.counts.len() as f64
    }

    /// Lower and upper edge of each bin.
    pub fn edges(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        let width = self.bin_width();
        (0..self.counts.len()).map(move |i| {
            (
                self.min + width * i as f64,
                self.min + width * (i + 1) as f64,
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_values_returns_none_for_empty_input() {
        assert_eq!(EnergySummary::from_values(Vec::<f64>::new()), None);
    }

    #[test]
    fn from_values_computes_moments() {
        let summary = EnergySummary::from_values([-10.0, -8.0, -6.0, -4.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.min, -10.0);
        assert_eq!(summary.max, -4.0);
        assert!((summary.mean + 7.0).abs() < 1e-12);
        assert!((summary.std_dev - 5.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn from_values_handles_single_value() {
        let summary = EnergySummary::from_values([-9.5]).unwrap();
        assert_eq!(summary.min, -9.5);
        assert_eq!(summary.max, -9.5);
        assert_eq!(summary.std_dev, 0.0);
    }

    #[test]
    fn histogram_places_extremes_in_first_and_last_bins() {
        let values = [-10.0, -9.0, -7.5, -5.0];
        let hist = Histogram::new(&values, 5).unwrap();
        assert_eq!(hist.counts.iter().sum::<usize>(), values.len());
        assert_eq!(hist.counts[0], 1);
        assert_eq!(hist.counts[4], 1);
        assert!((hist.bin_width() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn histogram_of_constant_values_uses_first_bin() {
        let hist = Histogram::new(&[-3.0, -3.0], 4).unwrap();
        assert_eq!(hist.counts, vec![2, 0, 0, 0]);
    }

    #[test]
    fn histogram_rejects_zero_bins() {
        assert!(Histogram::new(&[-1.0], 0).is_none());
    }
}
