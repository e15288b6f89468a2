pub mod fragment_distribution;
pub mod priming_interval;
pub mod tail_length_range;

// re-export for cleaner imports
pub use self::fragment_distribution::FragmentDistribution;
pub use self::priming_interval::{Bounds, PrimingInterval, Strand, TailCandidate};
pub use self::tail_length_range::TailLengthRange;
