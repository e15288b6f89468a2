//! Synthetic reads from a fixed tail length, for validating the estimator.

use std::collections::BTreeMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::errors::{InputValidationError, PolyaResult};
use crate::models::priming_interval::find_tail_index;
use crate::models::{FragmentDistribution, PrimingInterval};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub reads_per_gene: usize,
    pub tail_length: i64,
    pub offset_min: i64,
    pub seed: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        SimulationParams {
            reads_per_gene: 100,
            tail_length: 42,
            offset_min: 1,
            seed: 42,
        }
    }
}

impl SimulationParams {
    fn validate(&self) -> Result<(), InputValidationError> {
        if self.offset_min < 1 {
            return Err(InputValidationError::InvalidSimulation(format!(
                "offset_min must be at least 1, got {}",
                self.offset_min
            )));
        }
        if self.tail_length <= self.offset_min {
            return Err(InputValidationError::InvalidSimulation(format!(
                "tail_length ({}) must exceed offset_min ({})",
                self.tail_length, self.offset_min
            )));
        }
        Ok(())
    }
}

///
/// Simulated reads of one gene with the values they were drawn from.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedReads {
    pub fragment_sizes: Vec<i64>,
    pub tail_offsets: Vec<i64>,
    pub reads: Vec<i64>,
}

///
/// Draw a fragment size by inverse-CDF sampling.
///
fn sample_fragment_size<R: Rng>(rng: &mut R, fragments: &FragmentDistribution, cumulative: &[f64]) -> i64 {
    let r: f64 = rng.random();
    let idx = cumulative
        .iter()
        .position(|&c| r <= c)
        .unwrap_or(cumulative.len() - 1);
    fragments.sizes()[idx]
}

///
/// Simulate reads for every gene that has a tail interval.
///
/// Each read primes at an offset drawn uniformly from `[offset_min, tail_length)`
/// past the tail start and extends upstream by a fragment length drawn from
/// `fragments`: `read = tail.start + offset - fragment_size`. Only the first tail
/// interval of a gene is used; genes without one are skipped.
///
pub fn simulate_reads(
    genes: &BTreeMap<String, Vec<PrimingInterval>>,
    fragments: &FragmentDistribution,
    params: &SimulationParams,
) -> PolyaResult<BTreeMap<String, SimulatedReads>> {
    params.validate()?;

    let mut rng = StdRng::seed_from_u64(params.seed);
    let cumulative = fragments.cumulative();
    let mut simulated: BTreeMap<String, SimulatedReads> = BTreeMap::new();

    for (gene, intervals) in genes {
        let Some(tail_index) = find_tail_index(intervals) else {
            debug!("Gene {} has no tail interval, skipping", gene);
            continue;
        };
        let tail = &intervals[tail_index];

        let mut result = SimulatedReads::default();
        for _ in 0..params.reads_per_gene {
            let fragment_size = sample_fragment_size(&mut rng, fragments, &cumulative);
            let offset = rng.random_range(params.offset_min..params.tail_length);

            result.fragment_sizes.push(fragment_size);
            result.tail_offsets.push(offset);
            result.reads.push(tail.start + offset - fragment_size);
        }

        simulated.insert(gene.clone(), result);
    }

    info!(
        "Simulated {} reads for each of {} genes (tail length {})",
        params.reads_per_gene,
        simulated.len(),
        params.tail_length
    );

    Ok(simulated)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::likelihood::interval_score;
    use crate::models::Strand;

    #[fixture]
    fn fragments() -> FragmentDistribution {
        FragmentDistribution::new(vec![100, 150, 200, 250], vec![0.1, 0.4, 0.4, 0.1]).unwrap()
    }

    #[fixture]
    fn genes() -> BTreeMap<String, Vec<PrimingInterval>> {
        let mut genes = BTreeMap::new();
        genes.insert("G1".to_string(), vec![PrimingInterval::tail(1_000, Strand::Plus)]);
        genes.insert(
            "G2".to_string(),
            vec![PrimingInterval::new(5_000, 5_030, Strand::Plus, false)],
        );
        genes
    }

    #[rstest]
    fn test_simulate_counts_and_ranges(
        genes: BTreeMap<String, Vec<PrimingInterval>>,
        fragments: FragmentDistribution,
    ) {
        let params = SimulationParams {
            reads_per_gene: 500,
            ..Default::default()
        };
        let simulated = simulate_reads(&genes, &fragments, &params).unwrap();

        // G2 has no tail interval
        assert_eq!(simulated.len(), 1);
        let g1 = &simulated["G1"];
        assert_eq!(g1.reads.len(), 500);

        for ((&size, &offset), &read) in g1
            .fragment_sizes
            .iter()
            .zip(g1.tail_offsets.iter())
            .zip(g1.reads.iter())
        {
            assert!(fragments.probability_of(size) > 0.0);
            assert!(offset >= params.offset_min && offset < params.tail_length);
            assert_eq!(read, 1_000 + offset - size);
        }
    }

    #[rstest]
    fn test_simulated_reads_are_feasible(
        genes: BTreeMap<String, Vec<PrimingInterval>>,
        fragments: FragmentDistribution,
    ) {
        let params = SimulationParams::default();
        let simulated = simulate_reads(&genes, &fragments, &params).unwrap();
        let tail = genes["G1"][0].bounds_with_length(params.tail_length);

        for (&read, &size) in simulated["G1"].reads.iter().zip(simulated["G1"].fragment_sizes.iter()) {
            let only_size = FragmentDistribution::new(vec![size], vec![1.0]).unwrap();
            assert_eq!(interval_score(read, tail, &only_size), 1.0);
        }
    }

    #[rstest]
    fn test_simulate_is_seeded(genes: BTreeMap<String, Vec<PrimingInterval>>, fragments: FragmentDistribution) {
        let params = SimulationParams::default();
        let a = simulate_reads(&genes, &fragments, &params).unwrap();
        let b = simulate_reads(&genes, &fragments, &params).unwrap();
        assert_eq!(a, b);
    }

    #[rstest]
    #[case(0, 42)]
    #[case(5, 5)]
    fn test_simulate_rejects_params(
        genes: BTreeMap<String, Vec<PrimingInterval>>,
        fragments: FragmentDistribution,
        #[case] offset_min: i64,
        #[case] tail_length: i64,
    ) {
        let params = SimulationParams {
            offset_min,
            tail_length,
            ..Default::default()
        };
        assert!(simulate_reads(&genes, &fragments, &params).is_err());
    }
}
