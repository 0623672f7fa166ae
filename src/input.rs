//! Reading marker lists from CSV

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::warn;

use crate::cluster::Marker;

/// Errors raised while loading markers
#[derive(Debug, Error)]
pub enum InputError {
    #[error("cannot open {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("line {line}: expected id,latitude,longitude but found {found} column(s)")]
    MissingColumns { line: u64, found: usize },
}

/// Reads markers from a CSV file
///
/// Expected format: `id,latitude,longitude` (header row is optional, extra
/// columns are ignored)
pub fn read_markers(path: &Path) -> Result<Vec<Marker>, InputError> {
    let file = File::open(path).map_err(|source| InputError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_markers_from(file)
}

/// Reads markers from any CSV source, see [`read_markers`]
///
/// Rows whose coordinates do not parse are skipped with a warning.
pub fn read_markers_from<R: io::Read>(reader: R) -> Result<Vec<Marker>, InputError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut markers = Vec::new();

    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        let line = record.position().map_or(idx as u64 + 1, |p| p.line());

        if record.len() < 3 {
            return Err(InputError::MissingColumns {
                line,
                found: record.len(),
            });
        }

        let lat = record[1].parse::<f64>();
        let lon = record[2].parse::<f64>();
        match (lat, lon) {
            (Ok(lat), Ok(lon)) => markers.push(Marker::new(&record[0], lat, lon)),
            // First row that is not numeric is the header
            _ if idx == 0 => continue,
            _ => warn!(line, "skipping row with invalid coordinates"),
        }
    }

    Ok(markers)
}
