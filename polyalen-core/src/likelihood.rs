//! Read likelihoods under the fragment-size model.
//!
//! A read at coordinate `d` can come from an interval `[start, end)` through a
//! fragment of length `f` only if `start - d < f < end - d`. Both bounds are strict:
//! a fragment ending exactly on an interval edge is not counted.
//!
//! Two likelihoods are provided:
//!
//! - `P(d | interval)`, normalized over the candidate interval set
//! - `P(d | L)`, normalized over a range of tail lengths `L`, with a uniform
//!   position-within-tail prior contributing a `1 / L` factor

use log::debug;

use crate::errors::{InputValidationError, NumericDegeneracyError, PolyaError, PolyaResult};
use crate::models::priming_interval::resolve_bounds;
use crate::models::{Bounds, FragmentDistribution, PrimingInterval, TailCandidate, TailLengthRange};

///
/// Heaviside step that is zero at the origin.
///
pub fn step(x: i64) -> f64 {
    if x > 0 { 1.0 } else { 0.0 }
}

///
/// One when a fragment of length `fragment` starting at `read` fits strictly inside `bounds`.
///
pub fn feasibility(read: i64, bounds: Bounds, fragment: i64) -> f64 {
    step(fragment - (bounds.start - read)) * step(bounds.end - read - fragment)
}

///
/// Unnormalized score `Σ_f P(f) · feasibility(d, bounds, f)`.
///
pub fn interval_score(read: i64, bounds: Bounds, fragments: &FragmentDistribution) -> f64 {
    fragments
        .iter()
        .map(|(size, probability)| probability * feasibility(read, bounds, size))
        .sum()
}

///
/// Unnormalized score `Σ_f P(f) · (1 / L) · feasibility(d, [start, start + L), f)`.
///
pub fn length_score(read: i64, start: i64, length: i64, fragments: &FragmentDistribution) -> f64 {
    let bounds = Bounds {
        start,
        end: start + length,
    };
    fragments
        .iter()
        .map(|(size, probability)| probability / length as f64 * feasibility(read, bounds, size))
        .sum()
}

fn validate_target(intervals: &[PrimingInterval], target: usize) -> Result<(), InputValidationError> {
    if intervals.is_empty() {
        return Err(InputValidationError::EmptyIntervals);
    }
    if target >= intervals.len() {
        return Err(InputValidationError::IntervalOutOfRange {
            index: target,
            len: intervals.len(),
        });
    }
    Ok(())
}

///
/// `P(d | interval_i)` for every interval, normalized over the whole set.
///
/// # Arguments
/// - read: read coordinate
/// - intervals: candidate priming intervals
/// - tail: optional tail candidate overriding the tail interval's end
/// - fragments: fragment-size distribution
///
pub fn interval_likelihoods(
    read: i64,
    intervals: &[PrimingInterval],
    tail: Option<TailCandidate>,
    fragments: &FragmentDistribution,
) -> PolyaResult<Vec<f64>> {
    if intervals.is_empty() {
        return Err(InputValidationError::EmptyIntervals.into());
    }
    if let Some(candidate) = tail {
        validate_target(intervals, candidate.index)?;
        if candidate.length <= 0 {
            return Err(InputValidationError::NonPositiveLength(candidate.length).into());
        }
    }

    let scores: Vec<f64> = (0..intervals.len())
        .map(|idx| interval_score(read, resolve_bounds(intervals, idx, tail), fragments))
        .collect();

    let norm_factor: f64 = scores.iter().sum();
    if norm_factor <= 0.0 {
        debug!("Read {} has no feasible source interval", read);
        return Err(NumericDegeneracyError::IncompatibleIntervals { read, tail }.into());
    }

    Ok(scores.into_iter().map(|s| s / norm_factor).collect())
}

///
/// `P(d | target)` with every interval at its stored bounds.
///
pub fn likelihood(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    fragments: &FragmentDistribution,
) -> PolyaResult<f64> {
    likelihood_with_tail(read, intervals, target, None, fragments)
}

///
/// `P(d | target)` with the tail interval's end pinned by `tail`.
///
pub fn likelihood_with_tail(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    tail: Option<TailCandidate>,
    fragments: &FragmentDistribution,
) -> PolyaResult<f64> {
    validate_target(intervals, target)?;
    let likelihoods = interval_likelihoods(read, intervals, tail, fragments)?;
    Ok(likelihoods[target])
}

///
/// `P(d | L)` for every length of `length_range`, target interval extended to `start + L`.
///
/// When `weighted` is set, each length's score is additionally multiplied by
/// `P(d | target)` evaluated with the target pinned at that length, coupling the
/// chance that the read stems from the target at all into the length estimate.
///
pub fn length_likelihoods(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    fragments: &FragmentDistribution,
    length_range: &TailLengthRange,
    weighted: bool,
) -> PolyaResult<Vec<f64>> {
    length_likelihoods_with(read, intervals, target, fragments, length_range, weighted, true)
}

///
/// [length_likelihoods] with control over degenerate weights.
///
/// With `strict` unset, a length at which the read fits no interval gets a zero
/// weight instead of failing the whole read.
///
pub(crate) fn length_likelihoods_with(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    fragments: &FragmentDistribution,
    length_range: &TailLengthRange,
    weighted: bool,
    strict: bool,
) -> PolyaResult<Vec<f64>> {
    validate_target(intervals, target)?;
    length_range.validate()?;

    let scores = length_range
        .iter()
        .map(|length| {
            match weighted_length_score(read, intervals, target, length, fragments, weighted) {
                Err(PolyaError::NumericDegeneracy(_)) if !strict => Ok(0.0),
                score => score,
            }
        })
        .collect::<PolyaResult<Vec<f64>>>()?;

    let norm_factor: f64 = scores.iter().sum();
    if norm_factor <= 0.0 {
        return Err(NumericDegeneracyError::IncompatibleLengths {
            read,
            interval: target,
            first: length_range.first().unwrap_or_default(),
            last: length_range.last().unwrap_or_default(),
        }
        .into());
    }

    Ok(scores.into_iter().map(|s| s / norm_factor).collect())
}

fn weighted_length_score(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    length: i64,
    fragments: &FragmentDistribution,
    weighted: bool,
) -> PolyaResult<f64> {
    let score = length_score(read, intervals[target].start, length, fragments);
    if !weighted {
        return Ok(score);
    }

    let tail = TailCandidate {
        index: target,
        length,
    };
    let weight = likelihood_with_tail(read, intervals, target, Some(tail), fragments)?;
    Ok(score * weight)
}

///
/// `P(d | length)` normalized over `length_range`.
///
/// `length` itself need not be part of the range.
///
pub fn likelihood_given_length(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    length: i64,
    fragments: &FragmentDistribution,
    length_range: &TailLengthRange,
) -> PolyaResult<f64> {
    single_length_likelihood(read, intervals, target, length, fragments, length_range, false)
}

///
/// Weighted form of [likelihood_given_length].
///
pub fn likelihood_given_length_weighted(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    length: i64,
    fragments: &FragmentDistribution,
    length_range: &TailLengthRange,
) -> PolyaResult<f64> {
    single_length_likelihood(read, intervals, target, length, fragments, length_range, true)
}

fn single_length_likelihood(
    read: i64,
    intervals: &[PrimingInterval],
    target: usize,
    length: i64,
    fragments: &FragmentDistribution,
    length_range: &TailLengthRange,
    weighted: bool,
) -> PolyaResult<f64> {
    validate_target(intervals, target)?;
    length_range.validate()?;
    if length <= 0 {
        return Err(InputValidationError::NonPositiveLength(length).into());
    }

    let nominator = weighted_length_score(read, intervals, target, length, fragments, weighted)?;

    let mut norm_factor = 0.0;
    for candidate in length_range.iter() {
        norm_factor +=
            weighted_length_score(read, intervals, target, candidate, fragments, weighted)?;
    }

    if norm_factor <= 0.0 {
        return Err(NumericDegeneracyError::IncompatibleLengths {
            read,
            interval: target,
            first: length_range.first().unwrap_or_default(),
            last: length_range.last().unwrap_or_default(),
        }
        .into());
    }

    Ok(nominator / norm_factor)
}
