use std::io::Write;

use anyhow::Result;
use clap::ArgMatches;
use log::info;

use polyalen_core::consts::DEFAULT_BIN_SIZE;

use crate::utils::{get_output_writer, load_fragments};

pub fn run_discretize(matches: &ArgMatches) -> Result<()> {
    let profile = matches
        .get_one::<String>("profile")
        .expect("--profile is required");

    let bin_size = matches
        .get_one::<i64>("bin-size")
        .copied()
        .unwrap_or(DEFAULT_BIN_SIZE);

    let output = matches.get_one::<String>("output");

    let fragments = load_fragments(profile, bin_size)?;
    info!("{} fragment-size bins of width {}", fragments.len(), bin_size);

    let mut writer = get_output_writer(output)?;
    for (size, probability) in fragments.iter() {
        writeln!(writer, "{}\t{}", size, probability)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use tempfile::NamedTempFile;

    use crate::build_parser;

    #[rstest]
    fn test_run_discretize_writes_bins() {
        let output = NamedTempFile::new().unwrap();
        let output_path = output.path().to_str().unwrap();

        let matches = build_parser()
            .try_get_matches_from([
                "polyalen",
                "discretize",
                "--profile",
                "../tests/data/profiles/bioanalyzer.txt.gz",
                "--bin-size",
                "10",
                "--output",
                output_path,
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        run_discretize(sub).unwrap();

        let written = std::fs::read_to_string(output_path).unwrap();
        let mut total = 0.0;
        for line in written.lines() {
            let (size, probability) = line.split_once('\t').unwrap();
            assert_eq!(size.parse::<i64>().unwrap() % 10, 0);
            total += probability.parse::<f64>().unwrap();
        }
        assert!((total - 1.0).abs() < 1e-9);
    }
}
