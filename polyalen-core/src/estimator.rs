//! Tail-length estimation over a batch of reads.

use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::{InputValidationError, PolyaError, PolyaResult};
use crate::likelihood::{interval_likelihoods, length_likelihoods_with};
use crate::models::{FragmentDistribution, PrimingInterval, TailCandidate, TailLengthRange};
use crate::posterior::{Aggregation, combine_posteriors};

///
/// Everything computed for a single read.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadPosterior {
    pub read: i64,
    /// `P(d | interval_i)` for each candidate length (outer) and interval (inner).
    /// `None` where the read fits no interval at that length (lenient mode only).
    pub interval_likelihoods: Vec<Option<Vec<f64>>>,
    /// Posterior over the candidate lengths.
    pub length_posterior: Vec<f64>,
}

///
/// Posterior over tail length for one target interval.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TailLengthEstimate {
    pub lengths: Vec<i64>,
    pub posterior: Vec<f64>,
    pub reads: usize,
    /// Reads left out because no candidate length could explain them (lenient mode only).
    pub skipped: usize,
    pub aggregation: Aggregation,
}

impl TailLengthEstimate {
    /// Length with the highest posterior mass; the shortest wins ties.
    pub fn map_length(&self) -> Option<i64> {
        let mut best: Option<(i64, f64)> = None;
        for (&length, &p) in self.lengths.iter().zip(self.posterior.iter()) {
            match best {
                Some((_, best_p)) if p <= best_p => {}
                _ => best = Some((length, p)),
            }
        }
        best.map(|(length, _)| length)
    }

    /// Posterior mean of the tail length.
    pub fn mean_length(&self) -> f64 {
        self.lengths
            .iter()
            .zip(self.posterior.iter())
            .map(|(&length, &p)| length as f64 * p)
            .sum()
    }
}

///
/// Estimates tail length for one interval set, validated once and reused across reads.
///
/// Interval records are borrowed immutably; the tail end is derived per candidate
/// length, so reads can be evaluated concurrently.
///
pub struct TailLengthEstimator<'a> {
    intervals: &'a [PrimingInterval],
    tail_index: usize,
    fragments: &'a FragmentDistribution,
    lengths: &'a TailLengthRange,
    weighted: bool,
    strict: bool,
}

impl<'a> TailLengthEstimator<'a> {
    pub fn new(
        intervals: &'a [PrimingInterval],
        tail_index: usize,
        fragments: &'a FragmentDistribution,
        lengths: &'a TailLengthRange,
        weighted: bool,
    ) -> PolyaResult<TailLengthEstimator<'a>> {
        if intervals.is_empty() {
            return Err(InputValidationError::EmptyIntervals.into());
        }
        if tail_index >= intervals.len() {
            return Err(InputValidationError::IntervalOutOfRange {
                index: tail_index,
                len: intervals.len(),
            }
            .into());
        }
        lengths.validate()?;

        if !intervals[tail_index].is_tail {
            warn!(
                "Interval {} ({}) is estimated as the tail but is not flagged is_tail",
                tail_index, intervals[tail_index]
            );
        }

        Ok(TailLengthEstimator {
            intervals,
            tail_index,
            fragments,
            lengths,
            weighted,
            strict: true,
        })
    }

    ///
    /// In strict mode (the default) a read that fits no interval at some candidate
    /// length aborts the estimate. Otherwise that bookkeeping entry is left empty and
    /// [TailLengthEstimator::estimate] skips reads that fit no candidate length.
    ///
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn lengths(&self) -> &TailLengthRange {
        self.lengths
    }

    ///
    /// Interval likelihoods at every candidate length, then the length posterior.
    ///
    pub fn estimate_read(&self, read: i64) -> PolyaResult<ReadPosterior> {
        let mut interval_probs = Vec::with_capacity(self.lengths.len());
        for length in self.lengths.iter() {
            let tail = TailCandidate {
                index: self.tail_index,
                length,
            };
            match interval_likelihoods(read, self.intervals, Some(tail), self.fragments) {
                Ok(probs) => interval_probs.push(Some(probs)),
                Err(PolyaError::NumericDegeneracy(err)) if !self.strict => {
                    debug!("{}", err);
                    interval_probs.push(None);
                }
                Err(err) => return Err(err),
            }
        }

        let length_posterior = length_likelihoods_with(
            read,
            self.intervals,
            self.tail_index,
            self.fragments,
            self.lengths,
            self.weighted,
            self.strict,
        )?;

        debug!("Read {}: length posterior {:?}", read, length_posterior);

        Ok(ReadPosterior {
            read,
            interval_likelihoods: interval_probs,
            length_posterior,
        })
    }

    ///
    /// Per-read results in input order, evaluated in parallel.
    ///
    pub fn estimate_reads(&self, reads: &[i64]) -> PolyaResult<Vec<ReadPosterior>> {
        reads
            .par_iter()
            .map(|&read| self.estimate_read(read))
            .collect()
    }

    ///
    /// Posterior over tail length for a batch of reads.
    ///
    pub fn estimate(&self, reads: &[i64], aggregation: Aggregation) -> PolyaResult<TailLengthEstimate> {
        self.estimate_with_reads(reads, aggregation)
            .map(|(estimate, _)| estimate)
    }

    ///
    /// Like [TailLengthEstimator::estimate], also returning the per-read results
    /// that went into the aggregate, in input order.
    ///
    /// Reads skipped in lenient mode are absent from the per-read list.
    ///
    pub fn estimate_with_reads(
        &self,
        reads: &[i64],
        aggregation: Aggregation,
    ) -> PolyaResult<(TailLengthEstimate, Vec<ReadPosterior>)> {
        if reads.is_empty() {
            return Err(InputValidationError::NoReads.into());
        }

        let results: Vec<PolyaResult<ReadPosterior>> = reads
            .par_iter()
            .map(|&read| self.estimate_read(read))
            .collect();

        let mut per_read: Vec<ReadPosterior> = Vec::with_capacity(results.len());
        let mut skipped = 0;
        for result in results {
            match result {
                Ok(read_posterior) => per_read.push(read_posterior),
                Err(PolyaError::NumericDegeneracy(err)) if !self.strict => {
                    warn!("Skipping read: {}", err);
                    skipped += 1;
                }
                Err(err) => return Err(err),
            }
        }

        if per_read.is_empty() {
            return Err(InputValidationError::NoReads.into());
        }
        let posteriors: Vec<Vec<f64>> = per_read
            .iter()
            .map(|r| r.length_posterior.clone())
            .collect();
        let posterior = combine_posteriors(&posteriors, aggregation)?;

        info!(
            "Estimated tail length of interval {} from {} reads, {} skipped ({:?} aggregation)",
            self.tail_index,
            per_read.len(),
            skipped,
            aggregation
        );

        let estimate = TailLengthEstimate {
            lengths: self.lengths.lengths().to_vec(),
            posterior,
            reads: per_read.len(),
            skipped,
            aggregation,
        };
        Ok((estimate, per_read))
    }

    ///
    /// Sequential pass over all reads returning only the last read's posterior.
    ///
    /// Every read is still evaluated, so an incompatible read anywhere in the batch
    /// aborts the estimate.
    ///
    pub fn estimate_last_read(&self, reads: &[i64]) -> PolyaResult<Vec<f64>> {
        let mut length_posterior = None;
        for &read in reads {
            length_posterior = Some(self.estimate_read(read)?.length_posterior);
        }
        length_posterior.ok_or_else(|| InputValidationError::NoReads.into())
    }
}

///
/// Posterior over `length_range` for the tail interval `tail_index`.
///
/// Only the last read's posterior is returned; use [TailLengthEstimator::estimate]
/// to combine reads.
///
/// # Arguments
/// - reads: read coordinates
/// - length_range: candidate tail lengths
/// - intervals: candidate priming intervals, including the tail
/// - tail_index: index of the tail interval in `intervals`
/// - fragments: fragment-size distribution
/// - weighted: weight each length by the interval-identity likelihood
///
pub fn estimate_tail_length(
    reads: &[i64],
    length_range: &TailLengthRange,
    intervals: &[PrimingInterval],
    tail_index: usize,
    fragments: &FragmentDistribution,
    weighted: bool,
) -> PolyaResult<Vec<f64>> {
    TailLengthEstimator::new(intervals, tail_index, fragments, length_range, weighted)?
        .estimate_last_read(reads)
}
