use serde::{Deserialize, Serialize};

use crate::consts::NORMALIZATION_TOLERANCE;
use crate::errors::InputValidationError;

///
/// Discrete probability mass function over fragment-size bins.
///
/// Sizes are strictly increasing and the probabilities sum to one. The value is
/// immutable once built and is shared read-only by every likelihood computation.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFragmentDistribution")]
pub struct FragmentDistribution {
    sizes: Vec<i64>,
    probabilities: Vec<f64>,
}

#[derive(Deserialize)]
struct RawFragmentDistribution {
    sizes: Vec<i64>,
    probabilities: Vec<f64>,
}

impl TryFrom<RawFragmentDistribution> for FragmentDistribution {
    type Error = InputValidationError;

    fn try_from(raw: RawFragmentDistribution) -> Result<Self, Self::Error> {
        FragmentDistribution::new(raw.sizes, raw.probabilities)
    }
}

impl FragmentDistribution {
    ///
    /// Build a distribution from paired size bins and probabilities.
    ///
    /// # Arguments
    /// - sizes: fragment-size bins, strictly increasing
    /// - probabilities: probability mass of each bin, summing to one (±1e-9)
    ///
    pub fn new(
        sizes: Vec<i64>,
        probabilities: Vec<f64>,
    ) -> Result<FragmentDistribution, InputValidationError> {
        if sizes.len() != probabilities.len() {
            return Err(InputValidationError::MismatchedDistribution {
                sizes: sizes.len(),
                probabilities: probabilities.len(),
            });
        }
        if sizes.is_empty() {
            return Err(InputValidationError::EmptyDistribution);
        }

        for pair in sizes.windows(2) {
            if pair[0] >= pair[1] {
                return Err(InputValidationError::UnsortedSizes {
                    previous: pair[0],
                    next: pair[1],
                });
            }
        }

        for (&size, &probability) in sizes.iter().zip(probabilities.iter()) {
            if !probability.is_finite() || probability < 0.0 {
                return Err(InputValidationError::InvalidProbability { size, probability });
            }
        }

        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > NORMALIZATION_TOLERANCE {
            return Err(InputValidationError::NotNormalized(total));
        }

        Ok(FragmentDistribution {
            sizes,
            probabilities,
        })
    }

    pub fn sizes(&self) -> &[i64] {
        &self.sizes
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    /// Iterate over `(size, probability)` bins in ascending size order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.sizes
            .iter()
            .copied()
            .zip(self.probabilities.iter().copied())
    }

    /// Probability mass of the bin holding exactly `size`, zero if absent.
    pub fn probability_of(&self, size: i64) -> f64 {
        match self.sizes.binary_search(&size) {
            Ok(idx) => self.probabilities[idx],
            Err(_) => 0.0,
        }
    }

    /// Running sum of the bin probabilities, used for inverse-CDF sampling.
    pub fn cumulative(&self) -> Vec<f64> {
        self.probabilities
            .iter()
            .scan(0.0, |acc, &p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }
}
