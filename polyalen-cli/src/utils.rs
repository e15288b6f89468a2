use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use polyalen_core::FragmentDistribution;
use polyalen_core::profile::BioanalyzerProfile;

///
/// Buffered writer to `output`, or to stdout when no path is given.
///
pub fn get_output_writer(output: Option<&String>) -> Result<Box<dyn Write>> {
    match output {
        Some(path) => {
            let file = File::create(Path::new(path))
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

///
/// Load a profile (`-` for stdin) and discretize it.
///
pub fn load_fragments(profile: &str, bin_size: i64) -> Result<FragmentDistribution> {
    let profile = BioanalyzerProfile::try_from(profile)
        .with_context(|| format!("Failed to load Bioanalyzer profile: {}", profile))?;
    let fragments = profile
        .discretize(bin_size)
        .context("Failed to discretize Bioanalyzer profile")?;
    Ok(fragments)
}
