//! 3' UTR annotation: GTF extraction, BED records and tail candidates per gene.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::{self, Display};
use std::io::BufRead;
use std::path::Path;
use std::str::FromStr;

use log::info;

use crate::consts::{DEFAULT_NAME_ATTRIBUTE, DEFAULT_UTR_FEATURE};
use crate::errors::{PolyaError, PolyaResult};
use crate::models::{PrimingInterval, Strand};
use crate::utils::get_dynamic_reader;

///
/// One 3' UTR isoform in BED coordinates (0-based, half-open).
///
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UtrRecord {
    pub chr: String,
    pub start: i64,
    pub end: i64,
    pub name: String,
    pub strand: Strand,
    pub score: String,
}

impl UtrRecord {
    ///
    /// Six-column BED line: `chr start end name strand score`.
    ///
    pub fn as_bed_line(&self) -> String {
        format!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            self.chr, self.start, self.end, self.name, self.strand, self.score
        )
    }
}

impl Display for UtrRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_bed_line())
    }
}

impl FromStr for UtrRecord {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim_end().split('\t').collect();
        if fields.len() < 6 {
            return Err(format!("expected 6 BED columns, found {}", fields.len()));
        }

        Ok(UtrRecord {
            chr: fields[0].to_string(),
            start: fields[1]
                .parse()
                .map_err(|e| format!("invalid start '{}': {}", fields[1], e))?,
            end: fields[2]
                .parse()
                .map_err(|e| format!("invalid end '{}': {}", fields[2], e))?,
            name: fields[3].to_string(),
            strand: Strand::from_str(fields[4])?,
            score: fields[5].to_string(),
        })
    }
}

///
/// Value of `key` in a GTF attribute column (`key "value"; key2 "value2";`).
///
fn attribute_value<'a>(attributes: &'a str, key: &str) -> Option<&'a str> {
    attributes
        .split(';')
        .map(str::trim)
        .filter_map(|pair| pair.split_once(' '))
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.trim().trim_matches('"'))
}

///
/// Extract 3' UTR records from a GTF source.
///
/// Rows whose feature column equals `feature` are kept; coordinates are converted
/// from 1-based closed to 0-based half-open. Records are named by the
/// `name_attribute` attribute. Identical records of the same gene (isoforms
/// sharing a 3' UTR) are reported once, in first-seen order.
///
pub fn extract_three_prime_utrs<R: BufRead>(
    reader: R,
    feature: &str,
    name_attribute: &str,
) -> PolyaResult<Vec<UtrRecord>> {
    let mut records: Vec<UtrRecord> = Vec::new();
    let mut seen: HashSet<UtrRecord> = HashSet::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.starts_with('#') || line.trim().is_empty() {
            continue;
        }

        let parse_error = |message: String| PolyaError::Parse {
            source_name: "GTF".to_string(),
            line: idx + 1,
            message,
        };

        let fields: Vec<&str> = line.trim_end().split('\t').collect();
        if fields.len() < 9 {
            return Err(parse_error(format!(
                "expected 9 GTF columns, found {}",
                fields.len()
            )));
        }

        if fields[2] != feature {
            continue;
        }

        let start = fields[3]
            .parse::<i64>()
            .map_err(|e| parse_error(format!("invalid start '{}': {}", fields[3], e)))?
            - 1;
        let end = fields[4]
            .parse::<i64>()
            .map_err(|e| parse_error(format!("invalid end '{}': {}", fields[4], e)))?;
        let strand = Strand::from_str(fields[6]).map_err(parse_error)?;
        let name = attribute_value(fields[8], name_attribute).ok_or_else(|| {
            parse_error(format!("missing attribute '{}'", name_attribute))
        })?;

        let record = UtrRecord {
            chr: fields[0].to_string(),
            start,
            end,
            name: name.to_string(),
            strand,
            score: fields[5].to_string(),
        };

        if seen.insert(record.clone()) {
            records.push(record);
        }
    }

    info!("Extracted {} distinct {} records", records.len(), feature);

    Ok(records)
}

///
/// Extract `three_prime_utr` records named by `gene_id` from a (possibly gzipped) GTF file.
///
pub fn extract_three_prime_utrs_from_path(path: &Path) -> PolyaResult<Vec<UtrRecord>> {
    let reader = get_dynamic_reader(path)?;
    extract_three_prime_utrs(reader, DEFAULT_UTR_FEATURE, DEFAULT_NAME_ATTRIBUTE)
}

///
/// Read 6-column UTR BED records. Lines starting with `#`, `track` or `browser` are skipped.
///
pub fn read_utr_bed<R: BufRead>(reader: R) -> PolyaResult<Vec<UtrRecord>> {
    let mut records = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        let record = UtrRecord::from_str(&line).map_err(|message| PolyaError::Parse {
            source_name: "UTR BED".to_string(),
            line: idx + 1,
            message,
        })?;
        records.push(record);
    }

    Ok(records)
}

///
/// Tail candidates per gene: one per 3' UTR isoform, starting at the UTR end.
///
/// The tail end is a placeholder equal to the start; it is derived per candidate
/// length during estimation.
///
pub fn priming_intervals_by_gene(records: &[UtrRecord]) -> BTreeMap<String, Vec<PrimingInterval>> {
    let mut genes: BTreeMap<String, Vec<PrimingInterval>> = BTreeMap::new();

    for record in records {
        genes
            .entry(record.name.clone())
            .or_default()
            .push(PrimingInterval::tail(record.end, record.strand));
    }

    genes
}

///
/// Number of UTR isoforms per gene.
///
pub fn isoforms_per_gene(records: &[UtrRecord]) -> HashMap<&str, usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.name.as_str()).or_default() += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::io::Cursor;

    const GTF: &str = "#!genome-build GRCh38\n\
9\thavana\tthree_prime_utr\t101\t200\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\"; gene_name \"ALPHA\";\n\
9\thavana\texon\t1\t200\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T1\"; gene_name \"ALPHA\";\n\
9\thavana\tthree_prime_utr\t101\t200\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T2\"; gene_name \"ALPHA\";\n\
9\thavana\tthree_prime_utr\t101\t260\t.\t+\t.\tgene_id \"G1\"; transcript_id \"T3\"; gene_name \"ALPHA\";\n\
9\thavana\tthree_prime_utr\t501\t600\t.\t-\t.\tgene_id \"G2\"; transcript_id \"T4\"; gene_name \"BETA\";\n";

    #[rstest]
    #[case("gene_id \"G1\"; transcript_id \"T1\";", "gene_id", Some("G1"))]
    #[case("gene_id \"G1\"; transcript_id \"T1\";", "transcript_id", Some("T1"))]
    #[case("gene_id \"G1\";", "gene_name", None)]
    fn test_attribute_value(#[case] attributes: &str, #[case] key: &str, #[case] expected: Option<&str>) {
        assert_eq!(attribute_value(attributes, key), expected);
    }

    #[rstest]
    fn test_extract_dedups_shared_utrs() {
        let records =
            extract_three_prime_utrs(Cursor::new(GTF), DEFAULT_UTR_FEATURE, DEFAULT_NAME_ATTRIBUTE).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].as_bed_line(), "9\t100\t200\tG1\t+\t.");
        assert_eq!(records[1].end, 260);
        assert_eq!(records[2].strand, Strand::Minus);
    }

    #[rstest]
    fn test_extract_by_gene_name() {
        let records = extract_three_prime_utrs(Cursor::new(GTF), DEFAULT_UTR_FEATURE, "gene_name").unwrap();
        assert_eq!(records[0].name, "ALPHA");
        assert_eq!(records[2].name, "BETA");
    }

    #[rstest]
    fn test_extract_missing_attribute() {
        let err = extract_three_prime_utrs(Cursor::new(GTF), DEFAULT_UTR_FEATURE, "gene_biotype").unwrap_err();
        assert!(matches!(err, PolyaError::Parse { line: 2, .. }));
    }

    #[rstest]
    fn test_extract_short_line() {
        let err = extract_three_prime_utrs(Cursor::new("9\thavana\tgene\n"), DEFAULT_UTR_FEATURE, "gene_id")
            .unwrap_err();
        assert!(matches!(err, PolyaError::Parse { line: 1, .. }));
    }

    #[rstest]
    fn test_bed_round_trip() {
        let records =
            extract_three_prime_utrs(Cursor::new(GTF), DEFAULT_UTR_FEATURE, DEFAULT_NAME_ATTRIBUTE).unwrap();
        let bed: String = records.iter().map(|r| format!("{}\n", r)).collect();

        let parsed = read_utr_bed(Cursor::new(format!("track name=utr\n{}", bed))).unwrap();
        assert_eq!(parsed, records);
    }

    #[rstest]
    fn test_priming_intervals_by_gene() {
        let records =
            extract_three_prime_utrs(Cursor::new(GTF), DEFAULT_UTR_FEATURE, DEFAULT_NAME_ATTRIBUTE).unwrap();
        let genes = priming_intervals_by_gene(&records);

        assert_eq!(genes.len(), 2);
        assert_eq!(
            genes["G1"],
            vec![
                PrimingInterval::tail(200, Strand::Plus),
                PrimingInterval::tail(260, Strand::Plus)
            ]
        );
        assert!(genes["G2"][0].is_tail);

        let counts = isoforms_per_gene(&records);
        assert_eq!(counts["G1"], 2);
        assert_eq!(counts["G2"], 1);
    }
}
