use serde::{Deserialize, Serialize};

use crate::errors::InputValidationError;

///
/// Ordered, de-duplicated candidate tail lengths: the support of the posterior.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<i64>", into = "Vec<i64>")]
pub struct TailLengthRange {
    lengths: Vec<i64>,
}

impl TailLengthRange {
    ///
    /// Half-open arithmetic range `start, start + step, ...` strictly below `end`.
    ///
    /// Empty when `start >= end`.
    ///
    pub fn new(start: i64, end: i64, step: i64) -> Result<TailLengthRange, InputValidationError> {
        if step <= 0 {
            return Err(InputValidationError::InvalidStep(step));
        }

        let lengths = (start..end).step_by(step as usize).collect();
        Ok(TailLengthRange { lengths })
    }

    /// Build a range from arbitrary lengths; sorts and drops duplicates.
    pub fn from_lengths(mut lengths: Vec<i64>) -> TailLengthRange {
        lengths.sort_unstable();
        lengths.dedup();
        TailLengthRange { lengths }
    }

    pub fn lengths(&self) -> &[i64] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.lengths.iter().copied()
    }

    pub fn first(&self) -> Option<i64> {
        self.lengths.first().copied()
    }

    pub fn last(&self) -> Option<i64> {
        self.lengths.last().copied()
    }

    ///
    /// Fail unless the range is non-empty and every length is positive.
    ///
    /// Lengths enter the likelihood as `1 / length`.
    ///
    pub fn validate(&self) -> Result<(), InputValidationError> {
        if self.lengths.is_empty() {
            return Err(InputValidationError::EmptyLengthRange);
        }
        match self.lengths.iter().find(|&&length| length <= 0) {
            Some(&length) => Err(InputValidationError::NonPositiveLength(length)),
            None => Ok(()),
        }
    }
}

impl From<Vec<i64>> for TailLengthRange {
    fn from(lengths: Vec<i64>) -> Self {
        TailLengthRange::from_lengths(lengths)
    }
}

impl From<TailLengthRange> for Vec<i64> {
    fn from(range: TailLengthRange) -> Self {
        range.lengths
    }
}

impl From<&[i64]> for TailLengthRange {
    fn from(lengths: &[i64]) -> Self {
        TailLengthRange::from_lengths(lengths.to_vec())
    }
}

///
/// Candidate tail lengths `start..end` stepping by `step`.
///
pub fn tail_length_range(
    start: i64,
    end: i64,
    step: i64,
) -> Result<TailLengthRange, InputValidationError> {
    TailLengthRange::new(start, end, step)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case(10, 250, 20, vec![10, 30, 50, 70, 90, 110, 130, 150, 170, 190, 210, 230])]
    #[case(2, 63, 10, vec![2, 12, 22, 32, 42, 52, 62])]
    #[case(10, 11, 5, vec![10])]
    #[case(10, 10, 5, vec![])]
    #[case(20, 10, 5, vec![])]
    fn test_tail_length_range(
        #[case] start: i64,
        #[case] end: i64,
        #[case] step: i64,
        #[case] expected: Vec<i64>,
    ) {
        let range = tail_length_range(start, end, step).unwrap();
        assert_eq!(range.lengths(), expected.as_slice());
    }

    #[rstest]
    #[case(0)]
    #[case(-5)]
    fn test_non_positive_step(#[case] step: i64) {
        assert_eq!(
            tail_length_range(10, 20, step).unwrap_err(),
            InputValidationError::InvalidStep(step)
        );
    }

    #[rstest]
    fn test_from_lengths_sorts_and_dedups() {
        let range = TailLengthRange::from_lengths(vec![30, 10, 30, 20]);
        assert_eq!(range.lengths(), &[10, 20, 30]);
        assert_eq!(range.first(), Some(10));
        assert_eq!(range.last(), Some(30));
    }

    #[rstest]
    fn test_deserialized_lengths_are_sorted_and_deduped() {
        let range: TailLengthRange = serde_json::from_str("[30, 10, 30]").unwrap();
        assert_eq!(range.lengths(), &[10, 30]);
        assert_eq!(serde_json::to_string(&range).unwrap(), "[10,30]");
    }

    #[rstest]
    fn test_validate() {
        assert_eq!(
            TailLengthRange::from_lengths(vec![]).validate(),
            Err(InputValidationError::EmptyLengthRange)
        );
        assert_eq!(
            TailLengthRange::new(0, 20, 10).unwrap().validate(),
            Err(InputValidationError::NonPositiveLength(0))
        );
        assert!(TailLengthRange::new(10, 20, 5).unwrap().validate().is_ok());
    }
}
