use std::fmt::{self, Display};
use std::io::BufRead;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{PolyaError, PolyaResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Plus,
    #[serde(rename = "-")]
    Minus,
}

impl Strand {
    pub fn as_char(&self) -> char {
        match self {
            Strand::Plus => '+',
            Strand::Minus => '-',
        }
    }
}

impl FromStr for Strand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(Strand::Plus),
            "-" => Ok(Strand::Minus),
            _ => Err(format!("Invalid strand: {}", s)),
        }
    }
}

impl Display for Strand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

///
/// Half-open genomic bounds `[start, end)` a fragment must fall within.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub start: i64,
    pub end: i64,
}

///
/// Pins the end of the tail interval at `start + length` for one likelihood evaluation.
///
/// The interval records themselves are never mutated; the candidate is threaded
/// through every call that needs the tail end instead.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TailCandidate {
    pub index: usize,
    pub length: i64,
}

///
/// A candidate source of reads: an internal priming site or the poly(A) tail.
///
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimingInterval {
    pub start: i64,
    /// Stored end. Ignored for the tail interval whenever a [TailCandidate] is supplied.
    pub end: i64,
    pub strand: Strand,
    pub is_tail: bool,
}

impl PrimingInterval {
    pub fn new(start: i64, end: i64, strand: Strand, is_tail: bool) -> Self {
        PrimingInterval {
            start,
            end,
            strand,
            is_tail,
        }
    }

    ///
    /// A tail candidate whose end is derived per tail length.
    ///
    pub fn tail(start: i64, strand: Strand) -> Self {
        PrimingInterval {
            start,
            end: start,
            strand,
            is_tail: true,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            start: self.start,
            end: self.end,
        }
    }

    /// Bounds of this interval if it extended `length` bases past its start.
    pub fn bounds_with_length(&self, length: i64) -> Bounds {
        Bounds {
            start: self.start,
            end: self.start + length,
        }
    }

    pub fn as_string(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}",
            self.start, self.end, self.strand, self.is_tail
        )
    }
}

impl Display for PrimingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_string())
    }
}

impl FromStr for PrimingInterval {
    type Err = String;

    /// Parse a whitespace-delimited `start end strand is_tail` record.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(format!(
                "expected 4 columns (start end strand is_tail), found {}",
                fields.len()
            ));
        }

        let start = fields[0]
            .parse::<i64>()
            .map_err(|e| format!("invalid start '{}': {}", fields[0], e))?;
        let end = fields[1]
            .parse::<i64>()
            .map_err(|e| format!("invalid end '{}': {}", fields[1], e))?;
        let strand = Strand::from_str(fields[2])?;
        let is_tail = match fields[3].to_lowercase().as_str() {
            "true" | "1" | "yes" => true,
            "false" | "0" | "no" => false,
            other => return Err(format!("invalid is_tail flag '{}'", other)),
        };

        Ok(PrimingInterval::new(start, end, strand, is_tail))
    }
}

///
/// Index of the first interval flagged as the poly(A) tail, if any.
///
pub fn find_tail_index(intervals: &[PrimingInterval]) -> Option<usize> {
    intervals.iter().position(|iv| iv.is_tail)
}

///
/// Bounds of interval `index`, honoring a pinned tail candidate.
///
pub fn resolve_bounds(
    intervals: &[PrimingInterval],
    index: usize,
    tail: Option<TailCandidate>,
) -> Bounds {
    match tail {
        Some(candidate) if candidate.index == index => {
            intervals[index].bounds_with_length(candidate.length)
        }
        _ => intervals[index].bounds(),
    }
}

///
/// Read priming intervals from a whitespace-delimited text source.
///
/// Blank lines and lines starting with `#` are skipped.
///
pub fn read_priming_intervals<R: BufRead>(reader: R) -> PolyaResult<Vec<PrimingInterval>> {
    let mut intervals = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let interval = PrimingInterval::from_str(trimmed).map_err(|message| PolyaError::Parse {
            source_name: "priming intervals".to_string(),
            line: idx + 1,
            message,
        })?;
        intervals.push(interval);
    }

    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    #[fixture]
    fn intervals() -> Vec<PrimingInterval> {
        vec![
            PrimingInterval::new(500, 541, Strand::Plus, false),
            PrimingInterval::new(600, 621, Strand::Plus, false),
            PrimingInterval::new(650, 690, Strand::Plus, true),
        ]
    }

    #[rstest]
    fn test_resolve_bounds_pins_tail_only(intervals: Vec<PrimingInterval>) {
        let tail = Some(TailCandidate {
            index: 2,
            length: 30,
        });

        assert_eq!(
            resolve_bounds(&intervals, 2, tail),
            Bounds {
                start: 650,
                end: 680
            }
        );
        assert_eq!(
            resolve_bounds(&intervals, 1, tail),
            Bounds {
                start: 600,
                end: 621
            }
        );
        assert_eq!(resolve_bounds(&intervals, 2, None).end, 690);
    }

    #[rstest]
    fn test_find_tail_index(intervals: Vec<PrimingInterval>) {
        assert_eq!(find_tail_index(&intervals), Some(2));
        assert_eq!(find_tail_index(&intervals[..2]), None);
    }

    #[rstest]
    #[case("500 541 + false", PrimingInterval::new(500, 541, Strand::Plus, false))]
    #[case("650\t690\t-\tTRUE", PrimingInterval::new(650, 690, Strand::Minus, true))]
    #[case("10 20 + 1", PrimingInterval::new(10, 20, Strand::Plus, true))]
    fn test_parse_interval(#[case] line: &str, #[case] expected: PrimingInterval) {
        assert_eq!(PrimingInterval::from_str(line).unwrap(), expected);
    }

    #[rstest]
    #[case("500 541 +")]
    #[case("500 541 * false")]
    #[case("a 541 + false")]
    #[case("500 541 + maybe")]
    fn test_parse_interval_rejects(#[case] line: &str) {
        assert!(PrimingInterval::from_str(line).is_err());
    }

    #[rstest]
    fn test_read_priming_intervals_reports_line() {
        let text = "# header\n500 541 + false\n\n600 x + false\n";
        let err = read_priming_intervals(Cursor::new(text)).unwrap_err();

        match err {
            PolyaError::Parse { line, .. } => assert_eq!(line, 4),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    fn test_display_round_trips(intervals: Vec<PrimingInterval>) {
        let text: String = intervals
            .iter()
            .map(|iv| format!("{}\n", iv))
            .collect();
        let parsed = read_priming_intervals(Cursor::new(text)).unwrap();
        assert_eq!(parsed, intervals);
    }
}
