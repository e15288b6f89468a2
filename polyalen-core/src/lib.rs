//! Bayesian estimation of poly(A) tail lengths.
//!
//! Reads from 3'-end sequencing start a fixed fragment length upstream of where
//! reverse transcription primed. Given the read coordinate, a set of candidate
//! priming intervals (internal A-rich sites plus the poly(A) tail) and the
//! fragment-size distribution of the library, this crate computes:
//!
//! - which interval a read most likely came from
//! - a posterior distribution over candidate tail lengths
//!
//! # Example
//!
//! ```no_run
//! use polyalen_core::models::{PrimingInterval, Strand, TailLengthRange};
//! use polyalen_core::profile::BioanalyzerProfile;
//! use polyalen_core::estimator::estimate_tail_length;
//!
//! let profile = BioanalyzerProfile::try_from("bioanalyzer.txt").unwrap();
//! let fragments = profile.discretize(5).unwrap();
//!
//! let intervals = vec![
//!     PrimingInterval::new(500, 541, Strand::Plus, false),
//!     PrimingInterval::new(600, 621, Strand::Plus, false),
//!     PrimingInterval::tail(650, Strand::Plus),
//! ];
//! let lengths = TailLengthRange::new(10, 250, 20).unwrap();
//!
//! let posterior = estimate_tail_length(&[553], &lengths, &intervals, 2, &fragments, false).unwrap();
//! ```

pub mod annotation;
pub mod config;
pub mod errors;
pub mod estimator;
pub mod likelihood;
pub mod models;
pub mod posterior;
pub mod profile;
pub mod simulate;
pub mod utils;

pub mod consts {
    pub const DEFAULT_BIN_SIZE: i64 = 5;
    pub const DEFAULT_LENGTH_START: i64 = 10;
    pub const DEFAULT_LENGTH_END: i64 = 250;
    pub const DEFAULT_LENGTH_STEP: i64 = 20;

    pub const DEFAULT_UTR_FEATURE: &str = "three_prime_utr";
    pub const DEFAULT_NAME_ATTRIBUTE: &str = "gene_id";

    /// Allowed deviation of a probability vector's sum from one.
    pub const NORMALIZATION_TOLERANCE: f64 = 1e-9;
}

// re-exports
pub use errors::{InputValidationError, NumericDegeneracyError, PolyaError, PolyaResult};
pub use estimator::{TailLengthEstimate, TailLengthEstimator, estimate_tail_length};
pub use likelihood::{likelihood, likelihood_given_length, likelihood_given_length_weighted};
pub use models::{FragmentDistribution, PrimingInterval, Strand, TailLengthRange};
pub use posterior::{Aggregation, posterior_interval_given_read};
pub use profile::discretize_profile;
