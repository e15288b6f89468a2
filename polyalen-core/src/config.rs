use std::fs::read_to_string;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_BIN_SIZE, DEFAULT_LENGTH_END, DEFAULT_LENGTH_START, DEFAULT_LENGTH_STEP};
use crate::errors::{InputValidationError, PolyaError};
use crate::models::TailLengthRange;
use crate::posterior::Aggregation;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthRangeConfig {
    pub start: i64,
    pub end: i64,
    pub step: i64,
}

impl Default for LengthRangeConfig {
    fn default() -> Self {
        LengthRangeConfig {
            start: DEFAULT_LENGTH_START,
            end: DEFAULT_LENGTH_END,
            step: DEFAULT_LENGTH_STEP,
        }
    }
}

impl LengthRangeConfig {
    pub fn to_range(&self) -> Result<TailLengthRange, InputValidationError> {
        TailLengthRange::new(self.start, self.end, self.step)
    }
}

///
/// Parameters of one estimation run, as read from a `.toml` file.
///
/// Every key is optional; missing keys fall back to the defaults.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EstimationConfig {
    pub bin_size: i64,
    pub lengths: LengthRangeConfig,
    pub weighted: bool,
    pub aggregation: Aggregation,
    /// Defaults to the first interval flagged `is_tail`.
    pub tail_index: Option<usize>,
    /// Abort on reads that fit no interval instead of skipping them.
    pub strict: bool,
}

impl Default for EstimationConfig {
    fn default() -> Self {
        EstimationConfig {
            bin_size: DEFAULT_BIN_SIZE,
            lengths: LengthRangeConfig::default(),
            weighted: false,
            aggregation: Aggregation::default(),
            tail_index: None,
            strict: true,
        }
    }
}

impl TryFrom<&Path> for EstimationConfig {
    type Error = PolyaError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config = toml::from_str(&toml_str)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use std::path::PathBuf;

    #[rstest]
    fn test_defaults() {
        let config = EstimationConfig::default();
        assert_eq!(config.bin_size, 5);
        assert_eq!(
            config.lengths.to_range().unwrap().lengths(),
            &[10, 30, 50, 70, 90, 110, 130, 150, 170, 190, 210, 230]
        );
        assert_eq!(config.aggregation, Aggregation::Last);
    }

    #[rstest]
    fn test_partial_toml_uses_defaults() {
        let config: EstimationConfig = toml::from_str("weighted = true\n").unwrap();
        assert_eq!(config.weighted, true);
        assert_eq!(config.bin_size, DEFAULT_BIN_SIZE);
        assert_eq!(config.tail_index, None);
        assert_eq!(config.strict, true);
    }

    #[rstest]
    fn test_try_from_toml() {
        let path = PathBuf::from("../tests/data/config/estimate.toml");
        let config = EstimationConfig::try_from(path.as_path()).unwrap();

        assert_eq!(config.bin_size, 5);
        assert_eq!(
            config.lengths,
            LengthRangeConfig {
                start: 10,
                end: 200,
                step: 25
            }
        );
        assert_eq!(config.weighted, true);
        assert_eq!(config.aggregation, Aggregation::Product);
        assert_eq!(config.tail_index, Some(2));
        assert_eq!(config.strict, true);
    }

    #[rstest]
    fn test_lenient_toml() {
        let config: EstimationConfig = toml::from_str("strict = false\naggregation = \"mean\"\n").unwrap();
        assert_eq!(config.strict, false);
        assert_eq!(config.aggregation, Aggregation::Mean);
    }

    #[rstest]
    fn test_invalid_aggregation() {
        let result: Result<EstimationConfig, _> = toml::from_str("aggregation = \"median\"\n");
        assert!(result.is_err());
    }

    #[rstest]
    fn test_missing_file() {
        let result = EstimationConfig::try_from(Path::new("missing.toml"));
        assert!(matches!(result, Err(PolyaError::Io(_))));
    }
}
