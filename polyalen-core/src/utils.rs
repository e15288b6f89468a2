use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::errors::{PolyaError, PolyaResult};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

///
/// Get a reader for either a gzip'd or non-gzip'd file.
///
/// Compression is detected from the gzip magic bytes, not the file extension.
///
/// # Arguments
///
/// - path: path to the file to read
///
pub fn get_dynamic_reader(path: &Path) -> PolyaResult<BufReader<Box<dyn Read>>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let is_gzipped = reader.fill_buf()?.starts_with(&GZIP_MAGIC);

    let inner: Box<dyn Read> = match is_gzipped {
        true => Box::new(MultiGzDecoder::new(reader)),
        false => Box::new(reader),
    };

    Ok(BufReader::new(inner))
}

/// Get a reader for either a gzipped, non-gzipped file, or stdin
///
/// # Arguments
///
/// - file_path: path to the file to read, or '-' for stdin
pub fn get_dynamic_reader_w_stdin(file_path_str: &str) -> PolyaResult<BufReader<Box<dyn Read>>> {
    if file_path_str == "-" {
        Ok(BufReader::new(Box::new(std::io::stdin()) as Box<dyn Read>))
    } else {
        get_dynamic_reader(Path::new(file_path_str))
    }
}

///
/// Read integer read coordinates, one per line (first whitespace-separated column).
///
pub fn read_coordinates<R: BufRead>(reader: R) -> PolyaResult<Vec<i64>> {
    let mut reads = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let Some(field) = line.split_whitespace().next() else {
            continue;
        };
        if field.starts_with('#') {
            continue;
        }

        let read = field.parse::<i64>().map_err(|e| PolyaError::Parse {
            source_name: "read coordinates".to_string(),
            line: idx + 1,
            message: format!("invalid coordinate '{}': {}", field, e),
        })?;
        reads.push(read);
    }

    Ok(reads)
}

///
/// Rescale non-negative weights to sum to one; `None` when they sum to zero.
///
pub fn normalize(weights: &[f64]) -> Option<Vec<f64>> {
    let total: f64 = weights.iter().sum();
    if total > 0.0 && total.is_finite() {
        Some(weights.iter().map(|w| w / total).collect())
    } else {
        None
    }
}
