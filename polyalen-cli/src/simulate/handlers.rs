use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;

use polyalen_core::annotation::{priming_intervals_by_gene, read_utr_bed};
use polyalen_core::consts::DEFAULT_BIN_SIZE;
use polyalen_core::simulate::{SimulationParams, simulate_reads};
use polyalen_core::utils::get_dynamic_reader_w_stdin;

use crate::utils::{get_output_writer, load_fragments};

pub fn run_simulate(matches: &ArgMatches) -> Result<()> {
    let utr_bed = matches
        .get_one::<String>("utr-bed")
        .expect("--utr-bed is required");

    let profile = matches
        .get_one::<String>("profile")
        .expect("--profile is required");

    let bin_size = matches
        .get_one::<i64>("bin-size")
        .copied()
        .unwrap_or(DEFAULT_BIN_SIZE);

    let defaults = SimulationParams::default();
    let params = SimulationParams {
        reads_per_gene: matches
            .get_one::<usize>("reads-per-gene")
            .copied()
            .unwrap_or(defaults.reads_per_gene),
        tail_length: matches
            .get_one::<i64>("tail-length")
            .copied()
            .unwrap_or(defaults.tail_length),
        offset_min: matches
            .get_one::<i64>("offset-min")
            .copied()
            .unwrap_or(defaults.offset_min),
        seed: matches.get_one::<u64>("seed").copied().unwrap_or(defaults.seed),
    };

    let output = matches.get_one::<String>("output");

    let reader = get_dynamic_reader_w_stdin(utr_bed)
        .with_context(|| format!("Failed to open BED file: {}", utr_bed))?;
    let records = read_utr_bed(reader)
        .with_context(|| format!("Failed to parse BED file: {}", utr_bed))?;
    let genes = priming_intervals_by_gene(&records);

    let fragments = load_fragments(profile, bin_size)?;
    let simulated = simulate_reads(&genes, &fragments, &params)?;

    let mut writer = get_output_writer(output)?;
    serde_json::to_writer_pretty(&mut writer, &simulated)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
