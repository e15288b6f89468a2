use std::io::Write;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use polyalen_core::annotation::{extract_three_prime_utrs, isoforms_per_gene};
use polyalen_core::utils::get_dynamic_reader_w_stdin;

use crate::utils::get_output_writer;

pub fn run_utr(matches: &ArgMatches) -> Result<()> {
    let gtf = matches.get_one::<String>("gtf").expect("--gtf is required");
    let feature = matches.get_one::<String>("feature").unwrap();
    let name_attribute = matches.get_one::<String>("name-attribute").unwrap();
    let output = matches.get_one::<String>("output");

    let reader = get_dynamic_reader_w_stdin(gtf)
        .with_context(|| format!("Failed to open GTF file: {}", gtf))?;
    let records = extract_three_prime_utrs(reader, feature, name_attribute)
        .with_context(|| format!("Failed to parse GTF file: {}", gtf))?;

    let isoforms = isoforms_per_gene(&records);
    let multi_isoform = isoforms.values().filter(|&&n| n > 1).count();
    info!(
        "{} genes, {} with more than one 3' UTR isoform",
        isoforms.len(),
        multi_isoform
    );

    let mut writer = get_output_writer(output)?;
    for record in &records {
        writeln!(writer, "{}", record.as_bed_line())?;
    }
    writer.flush()?;

    Ok(())
}
