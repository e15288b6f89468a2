use std::io::Write;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;
use serde::Serialize;

use polyalen_core::config::{EstimationConfig, LengthRangeConfig};
use polyalen_core::estimator::{ReadPosterior, TailLengthEstimate, TailLengthEstimator};
use polyalen_core::models::priming_interval::{find_tail_index, read_priming_intervals};
use polyalen_core::posterior::Aggregation;
use polyalen_core::utils::{get_dynamic_reader_w_stdin, read_coordinates};

use crate::utils::{get_output_writer, load_fragments};

#[derive(Serialize)]
struct EstimateOutput {
    tail_index: usize,
    #[serde(flatten)]
    estimate: TailLengthEstimate,
    map_length: Option<i64>,
    mean_length: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    per_read: Option<Vec<ReadPosterior>>,
}

///
/// Parse `start:end:step`.
///
fn parse_length_range(value: &str) -> Result<LengthRangeConfig> {
    let fields: Vec<&str> = value.split(':').collect();
    let [start, end, step] = fields.as_slice() else {
        anyhow::bail!("--lengths must be start:end:step, got '{}'", value);
    };

    Ok(LengthRangeConfig {
        start: start.trim().parse().context("invalid --lengths start")?,
        end: end.trim().parse().context("invalid --lengths end")?,
        step: step.trim().parse().context("invalid --lengths step")?,
    })
}

///
/// Load the config file, if any, then apply command-line overrides.
///
fn resolve_config(matches: &ArgMatches) -> Result<EstimationConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => EstimationConfig::try_from(Path::new(path))
            .with_context(|| format!("Failed to load config file: {}", path))?,
        None => EstimationConfig::default(),
    };

    if let Some(&bin_size) = matches.get_one::<i64>("bin-size") {
        config.bin_size = bin_size;
    }
    if let Some(lengths) = matches.get_one::<String>("lengths") {
        config.lengths = parse_length_range(lengths)?;
    }
    if matches.get_flag("weighted") {
        config.weighted = true;
    }
    if let Some(aggregate) = matches.get_one::<String>("aggregate") {
        config.aggregation = match Aggregation::from_str(aggregate) {
            Ok(aggregation) => aggregation,
            Err(_err) => anyhow::bail!("Unknown aggregation mode supplied: {}", aggregate),
        };
    }
    if let Some(&tail_index) = matches.get_one::<usize>("tail-index") {
        config.tail_index = Some(tail_index);
    }
    if matches.get_flag("lenient") {
        config.strict = false;
    }

    Ok(config)
}

pub fn run_estimate(matches: &ArgMatches) -> Result<()> {
    let profile = matches
        .get_one::<String>("profile")
        .expect("--profile is required");

    let intervals_path = matches
        .get_one::<String>("intervals")
        .expect("--intervals is required");

    let reads_path = matches
        .get_one::<String>("reads")
        .expect("--reads is required");

    let per_read = matches.get_flag("per-read");
    let output = matches.get_one::<String>("output");

    let config = resolve_config(matches)?;

    let fragments = load_fragments(profile, config.bin_size)?;
    let lengths = config.lengths.to_range()?;

    let reader = get_dynamic_reader_w_stdin(intervals_path)
        .with_context(|| format!("Failed to open intervals file: {}", intervals_path))?;
    let intervals = read_priming_intervals(reader)
        .with_context(|| format!("Failed to parse intervals file: {}", intervals_path))?;

    let reader = get_dynamic_reader_w_stdin(reads_path)
        .with_context(|| format!("Failed to open reads file: {}", reads_path))?;
    let reads = read_coordinates(reader)
        .with_context(|| format!("Failed to parse reads file: {}", reads_path))?;

    let tail_index = config
        .tail_index
        .or_else(|| find_tail_index(&intervals))
        .context("No tail interval: pass --tail-index or flag an interval is_tail")?;

    info!(
        "Estimating over {} candidate lengths with {} intervals and {} reads",
        lengths.len(),
        intervals.len(),
        reads.len()
    );

    let estimator = TailLengthEstimator::new(&intervals, tail_index, &fragments, &lengths, config.weighted)?
        .with_strict(config.strict);
    let (estimate, per_read) = if per_read {
        let (estimate, posteriors) = estimator.estimate_with_reads(&reads, config.aggregation)?;
        (estimate, Some(posteriors))
    } else {
        (estimator.estimate(&reads, config.aggregation)?, None)
    };

    let result = EstimateOutput {
        tail_index,
        map_length: estimate.map_length(),
        mean_length: estimate.mean_length(),
        estimate,
        per_read,
    };

    let mut writer = get_output_writer(output)?;
    serde_json::to_writer_pretty(&mut writer, &result)?;
    writeln!(writer)?;
    writer.flush()?;

    Ok(())
}
