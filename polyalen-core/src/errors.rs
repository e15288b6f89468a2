use thiserror::Error;

use crate::models::TailCandidate;

/// Degenerate or malformed inputs. Fatal for the affected read or gene.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputValidationError {
    #[error("Size and intensity columns differ in length ({sizes} sizes, {intensities} intensities)")]
    MismatchedProfile { sizes: usize, intensities: usize },

    #[error("Bioanalyzer profile contains no measurements")]
    EmptyProfile,

    #[error("Bin size must be positive, got {0}")]
    InvalidBinSize(i64),

    #[error("Intensity at position {index} is not a finite, non-negative number: {value}")]
    InvalidIntensity { index: usize, value: f64 },

    #[error("Total intensity must be positive, got {0}")]
    ZeroTotalIntensity(f64),

    #[error("Fragment distribution has no bins")]
    EmptyDistribution,

    #[error("Fragment distribution has {sizes} sizes but {probabilities} probabilities")]
    MismatchedDistribution { sizes: usize, probabilities: usize },

    #[error("Fragment sizes must be strictly increasing, found {previous} before {next}")]
    UnsortedSizes { previous: i64, next: i64 },

    #[error("Probability for fragment size {size} is invalid: {probability}")]
    InvalidProbability { size: i64, probability: f64 },

    #[error("Fragment probabilities sum to {0}, expected 1")]
    NotNormalized(f64),

    #[error("Priming interval set is empty")]
    EmptyIntervals,

    #[error("Interval index {index} is out of range for {len} priming intervals")]
    IntervalOutOfRange { index: usize, len: usize },

    #[error("Tail length range is empty")]
    EmptyLengthRange,

    #[error("Tail lengths must be positive, got {0}")]
    NonPositiveLength(i64),

    #[error("Range step must be positive, got {0}")]
    InvalidStep(i64),

    #[error("No reads supplied")]
    NoReads,

    #[error("Invalid simulation parameters: {0}")]
    InvalidSimulation(String),
}

/// A read that no candidate source can explain under the fragment-size support.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumericDegeneracyError {
    #[error("Read {read} is incompatible with every priming interval{}", describe_tail(.tail))]
    IncompatibleIntervals {
        read: i64,
        tail: Option<TailCandidate>,
    },

    #[error(
        "Read {read} is incompatible with every tail length of interval {interval} (lengths {first}..={last})"
    )]
    IncompatibleLengths {
        read: i64,
        interval: usize,
        first: i64,
        last: i64,
    },

    #[error("Per-read posteriors of {reads} reads share no supported tail length")]
    DisjointPosteriors { reads: usize },
}

fn describe_tail(tail: &Option<TailCandidate>) -> String {
    match tail {
        Some(tail) => format!(
            " (tail interval {} at length {})",
            tail.index, tail.length
        ),
        None => String::new(),
    }
}

#[derive(Error, Debug)]
pub enum PolyaError {
    #[error(transparent)]
    InputValidation(#[from] InputValidationError),

    #[error(transparent)]
    NumericDegeneracy(#[from] NumericDegeneracyError),

    #[error("Error parsing {source_name} at line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

pub type PolyaResult<T> = std::result::Result<T, PolyaError>;
