//! Posterior distributions over interval identity and tail length.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::errors::{InputValidationError, NumericDegeneracyError, PolyaResult};
use crate::likelihood::likelihood_with_tail;
use crate::models::{FragmentDistribution, PrimingInterval, TailCandidate};
use crate::utils::normalize;

///
/// `P(target | d)` under a uniform prior over the intervals.
///
/// The interval likelihoods are re-summed across the whole set and the target is
/// divided by that sum, so the result coincides with [crate::likelihood::likelihood]
/// up to float rounding.
///
pub fn posterior_interval_given_read(
    intervals: &[PrimingInterval],
    target: usize,
    read: i64,
    fragments: &FragmentDistribution,
) -> PolyaResult<f64> {
    posterior_interval_given_read_with_tail(intervals, target, read, None, fragments)
}

pub fn posterior_interval_given_read_with_tail(
    intervals: &[PrimingInterval],
    target: usize,
    read: i64,
    tail: Option<TailCandidate>,
    fragments: &FragmentDistribution,
) -> PolyaResult<f64> {
    let posteriors = interval_posteriors(intervals, read, tail, fragments)?;
    posteriors.get(target).copied().ok_or_else(|| {
        InputValidationError::IntervalOutOfRange {
            index: target,
            len: intervals.len(),
        }
        .into()
    })
}

///
/// `P(interval_i | d)` for every interval.
///
pub fn interval_posteriors(
    intervals: &[PrimingInterval],
    read: i64,
    tail: Option<TailCandidate>,
    fragments: &FragmentDistribution,
) -> PolyaResult<Vec<f64>> {
    if intervals.is_empty() {
        return Err(InputValidationError::EmptyIntervals.into());
    }

    let prior = 1.0 / intervals.len() as f64;
    let joint = (0..intervals.len())
        .map(|idx| {
            likelihood_with_tail(read, intervals, idx, tail, fragments).map(|l| l * prior)
        })
        .collect::<PolyaResult<Vec<f64>>>()?;

    normalize(&joint).ok_or_else(|| NumericDegeneracyError::IncompatibleIntervals { read, tail }.into())
}

///
/// How per-read posteriors over tail length are combined into one estimate.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    /// Posterior of the last read processed; earlier reads are evaluated but discarded.
    #[default]
    Last,
    /// Product of per-read posteriors, assuming independent reads.
    Product,
    /// Arithmetic mean of per-read posteriors.
    Mean,
}

impl FromStr for Aggregation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last" => Ok(Aggregation::Last),
            "product" => Ok(Aggregation::Product),
            "mean" => Ok(Aggregation::Mean),
            _ => Err(format!("Invalid aggregation: {}", s)),
        }
    }
}

///
/// Combine per-read posteriors that share the same length support.
///
/// The product is taken in log space and renormalized; it fails when no length
/// keeps non-zero mass across all reads.
///
pub fn combine_posteriors(posteriors: &[Vec<f64>], aggregation: Aggregation) -> PolyaResult<Vec<f64>> {
    let Some(first) = posteriors.first() else {
        return Err(InputValidationError::NoReads.into());
    };
    let width = first.len();

    match aggregation {
        Aggregation::Last => Ok(posteriors[posteriors.len() - 1].clone()),
        Aggregation::Mean => {
            let mut mean = vec![0.0; width];
            for posterior in posteriors {
                for (acc, p) in mean.iter_mut().zip(posterior) {
                    *acc += p / posteriors.len() as f64;
                }
            }
            normalize(&mean)
                .ok_or_else(|| NumericDegeneracyError::DisjointPosteriors { reads: posteriors.len() }.into())
        }
        Aggregation::Product => {
            let mut log_sum = vec![0.0; width];
            for posterior in posteriors {
                for (acc, p) in log_sum.iter_mut().zip(posterior) {
                    *acc += p.ln();
                }
            }

            let max = log_sum.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max == f64::NEG_INFINITY {
                return Err(NumericDegeneracyError::DisjointPosteriors { reads: posteriors.len() }.into());
            }

            let scaled: Vec<f64> = log_sum.iter().map(|l| (l - max).exp()).collect();
            normalize(&scaled)
                .ok_or_else(|| NumericDegeneracyError::DisjointPosteriors { reads: posteriors.len() }.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::errors::PolyaError;
    use crate::likelihood::likelihood;
    use crate::models::Strand;

    #[fixture]
    fn intervals() -> Vec<PrimingInterval> {
        vec![
            PrimingInterval::new(500, 541, Strand::Plus, false),
            PrimingInterval::new(600, 621, Strand::Plus, false),
            PrimingInterval::new(650, 691, Strand::Plus, true),
        ]
    }

    #[fixture]
    fn fragments() -> FragmentDistribution {
        FragmentDistribution::new(vec![30, 60, 100, 130], vec![0.1, 0.3, 0.4, 0.2]).unwrap()
    }

    #[rstest]
    #[case(553)]
    #[case(480)]
    #[case(540)]
    fn test_posterior_sums_to_one(
        intervals: Vec<PrimingInterval>,
        fragments: FragmentDistribution,
        #[case] read: i64,
    ) {
        let total: f64 = (0..intervals.len())
            .map(|idx| posterior_interval_given_read(&intervals, idx, read, &fragments).unwrap())
            .sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[rstest]
    #[case(553)]
    #[case(480)]
    fn test_posterior_matches_likelihood_under_uniform_prior(
        intervals: Vec<PrimingInterval>,
        fragments: FragmentDistribution,
        #[case] read: i64,
    ) {
        for idx in 0..intervals.len() {
            let posterior = posterior_interval_given_read(&intervals, idx, read, &fragments).unwrap();
            let lik = likelihood(read, &intervals, idx, &fragments).unwrap();
            assert!((posterior - lik).abs() < 1e-12);
        }
    }

    #[rstest]
    fn test_posterior_out_of_range(intervals: Vec<PrimingInterval>, fragments: FragmentDistribution) {
        let err = posterior_interval_given_read(&intervals, 5, 553, &fragments).unwrap_err();
        assert!(matches!(
            err,
            PolyaError::InputValidation(InputValidationError::IntervalOutOfRange { index: 5, len: 3 })
        ));
    }

    #[rstest]
    #[case("last", Aggregation::Last)]
    #[case("Product", Aggregation::Product)]
    #[case("MEAN", Aggregation::Mean)]
    fn test_aggregation_from_str(#[case] s: &str, #[case] expected: Aggregation) {
        assert_eq!(Aggregation::from_str(s).unwrap(), expected);
    }

    #[rstest]
    fn test_combine_last() {
        let posteriors = vec![vec![0.5, 0.5], vec![0.1, 0.9]];
        assert_eq!(
            combine_posteriors(&posteriors, Aggregation::Last).unwrap(),
            vec![0.1, 0.9]
        );
    }

    #[rstest]
    fn test_combine_mean() {
        let posteriors = vec![vec![0.5, 0.5], vec![0.1, 0.9]];
        let combined = combine_posteriors(&posteriors, Aggregation::Mean).unwrap();
        assert!((combined[0] - 0.3).abs() < 1e-12);
        assert!((combined[1] - 0.7).abs() < 1e-12);
    }

    #[rstest]
    fn test_combine_product() {
        let posteriors = vec![vec![0.5, 0.5, 0.0], vec![0.2, 0.6, 0.2]];
        let combined = combine_posteriors(&posteriors, Aggregation::Product).unwrap();

        assert!((combined[0] - 0.25).abs() < 1e-12);
        assert!((combined[1] - 0.75).abs() < 1e-12);
        assert_eq!(combined[2], 0.0);
    }

    #[rstest]
    fn test_combine_product_disjoint() {
        let posteriors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let err = combine_posteriors(&posteriors, Aggregation::Product).unwrap_err();
        assert!(matches!(
            err,
            PolyaError::NumericDegeneracy(NumericDegeneracyError::DisjointPosteriors { reads: 2 })
        ));
    }

    #[rstest]
    fn test_combine_empty() {
        assert!(combine_posteriors(&[], Aggregation::Mean).is_err());
    }
}
