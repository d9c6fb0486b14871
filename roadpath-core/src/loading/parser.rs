use std::fs::File;
use std::path::Path;

use log::warn;

use crate::Error;

/// Deserializes every well-formed row of a CSV file with headers
///
/// Malformed rows are skipped with a warning; the second value is how many.
pub fn deserialize_csv_file<T>(path: &Path) -> Result<(Vec<T>, usize), Error>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let file = File::open(path).map_err(|e| {
        std::io::Error::new(
            e.kind(),
            format!("Failed to open file '{}': {}", path.display(), e),
        )
    })?;

    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(file);
    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for record in reader.deserialize::<T>() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => {
                if e.is_io_error() {
                    return Err(e.into());
                }
                skipped += 1;
                warn!(
                    "Skipping malformed row in '{}' (line {}): {e}",
                    path.display(),
                    e.position().map_or(0, csv::Position::line)
                );
            }
        }
    }

    Ok((rows, skipped))
}
