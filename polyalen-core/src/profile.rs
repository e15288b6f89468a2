//! Bioanalyzer profiles and their discretization into fragment-size distributions.

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use log::debug;

use crate::errors::{InputValidationError, PolyaError, PolyaResult};
use crate::models::FragmentDistribution;
use crate::utils::{get_dynamic_reader, get_dynamic_reader_w_stdin};

///
/// Raw sizing-instrument measurements: parallel fragment sizes and intensities.
///
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BioanalyzerProfile {
    pub sizes: Vec<i64>,
    pub intensities: Vec<f64>,
}

impl BioanalyzerProfile {
    pub fn new(sizes: Vec<i64>, intensities: Vec<f64>) -> Self {
        BioanalyzerProfile { sizes, intensities }
    }

    ///
    /// Parse a two-column whitespace-delimited `size intensity` source.
    ///
    /// Blank lines and `#` comments are skipped; extra columns are ignored.
    ///
    pub fn from_reader<R: BufRead>(reader: R) -> PolyaResult<BioanalyzerProfile> {
        let mut profile = BioanalyzerProfile::default();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let parse_error = |message: String| PolyaError::Parse {
                source_name: "bioanalyzer profile".to_string(),
                line: idx + 1,
                message,
            };

            let mut fields = trimmed.split_whitespace();
            let (Some(size), Some(intensity)) = (fields.next(), fields.next()) else {
                return Err(parse_error(
                    "expected two columns (size intensity)".to_string(),
                ));
            };

            let size = size
                .parse::<i64>()
                .map_err(|e| parse_error(format!("invalid size '{}': {}", size, e)))?;
            let intensity = intensity
                .parse::<f64>()
                .map_err(|e| parse_error(format!("invalid intensity '{}': {}", intensity, e)))?;

            profile.sizes.push(size);
            profile.intensities.push(intensity);
        }

        Ok(profile)
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn discretize(&self, bin_size: i64) -> Result<FragmentDistribution, InputValidationError> {
        discretize_profile(&self.sizes, &self.intensities, bin_size)
    }
}

impl TryFrom<&Path> for BioanalyzerProfile {
    type Error = PolyaError;

    ///
    /// Load a profile from a (possibly gzip-compressed) text file.
    ///
    fn try_from(value: &Path) -> PolyaResult<BioanalyzerProfile> {
        let reader = get_dynamic_reader(value)?;
        BioanalyzerProfile::from_reader(reader)
    }
}

impl TryFrom<&str> for BioanalyzerProfile {
    type Error = PolyaError;

    ///
    /// Like the `&Path` conversion, but `-` reads from stdin.
    ///
    fn try_from(value: &str) -> PolyaResult<BioanalyzerProfile> {
        let reader = get_dynamic_reader_w_stdin(value)?;
        BioanalyzerProfile::from_reader(reader)
    }
}

///
/// Bin raw `(size, intensity)` measurements into a fragment-size distribution.
///
/// Each size is rounded to the nearest multiple of `bin_size` (ties go to the even
/// multiple). Bin intensities are summed and divided by the total intensity of all
/// measurements. Only bins holding at least one measurement are emitted.
///
/// # Arguments
/// - sizes: measured fragment sizes
/// - intensities: measured intensity for each size
/// - bin_size: width of a bin, must be positive
///
pub fn discretize_profile(
    sizes: &[i64],
    intensities: &[f64],
    bin_size: i64,
) -> Result<FragmentDistribution, InputValidationError> {
    if bin_size <= 0 {
        return Err(InputValidationError::InvalidBinSize(bin_size));
    }
    if sizes.len() != intensities.len() {
        return Err(InputValidationError::MismatchedProfile {
            sizes: sizes.len(),
            intensities: intensities.len(),
        });
    }
    if sizes.is_empty() {
        return Err(InputValidationError::EmptyProfile);
    }

    if let Some((index, &value)) = intensities
        .iter()
        .enumerate()
        .find(|(_, v)| !v.is_finite() || **v < 0.0)
    {
        return Err(InputValidationError::InvalidIntensity { index, value });
    }

    let total_intensity: f64 = intensities.iter().sum();
    if total_intensity <= 0.0 {
        return Err(InputValidationError::ZeroTotalIntensity(total_intensity));
    }

    let mut bins: BTreeMap<i64, f64> = BTreeMap::new();
    for (&size, &intensity) in sizes.iter().zip(intensities.iter()) {
        *bins.entry(round_to_bin(size, bin_size)).or_insert(0.0) += intensity;
    }

    debug!(
        "Discretized {} measurements into {} bins of width {}",
        sizes.len(),
        bins.len(),
        bin_size
    );

    let (bin_sizes, probabilities): (Vec<i64>, Vec<f64>) = bins
        .into_iter()
        .map(|(bin, intensity)| (bin, intensity / total_intensity))
        .unzip();

    FragmentDistribution::new(bin_sizes, probabilities)
}

fn round_to_bin(size: i64, bin_size: i64) -> i64 {
    (size as f64 / bin_size as f64).round_ties_even() as i64 * bin_size
}
