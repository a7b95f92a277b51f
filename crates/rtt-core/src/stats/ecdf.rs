//! Empirical cumulative distribution for plotting.

use serde::{Deserialize, Serialize};

use super::SampleSet;

/// ECDF coordinates: `x` holds the sorted samples, `y[i] = (i + 1) / n`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl ChartSeries {
    pub fn from_samples(samples: &SampleSet) -> Self {
        let n = samples.len() as f64;
        let x = samples.as_slice().to_vec();
        let y = (1..=samples.len()).map(|rank| rank as f64 / n).collect();
        Self { x, y }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ecdf_five_points() {
        let samples = SampleSet::new(vec![50.0, 10.0, 40.0, 20.0, 30.0]).unwrap();
        let chart = ChartSeries::from_samples(&samples);

        assert_eq!(chart.x, vec![10.0, 20.0, 30.0, 40.0, 50.0]);
        assert_eq!(chart.y, vec![0.2, 0.4, 0.6, 0.8, 1.0]);
    }

    #[test]
    fn test_ecdf_single_point() {
        let samples = SampleSet::new(vec![12.0]).unwrap();
        let chart = ChartSeries::from_samples(&samples);

        assert_eq!(chart.len(), 1);
        assert_eq!(chart.y, vec![1.0]);
    }

    #[test]
    fn test_ecdf_is_deterministic() {
        let samples = SampleSet::new(vec![3.0, 3.0, 1.0]).unwrap();
        assert_eq!(
            ChartSeries::from_samples(&samples),
            ChartSeries::from_samples(&samples)
        );
    }
}
