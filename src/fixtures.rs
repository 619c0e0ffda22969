//! Fixture CSV files of historical observations.
//!
//! Expected format:
//! ```csv
//! hvac,indoor_temp,energy
//! 63.23,17.68,503.05
//! 53.00,18.70,493.01
//! ```
//!
//! Rows keep file order; no other ordering is implied.

use std::path::Path;

use thiserror::Error;

use crate::simulation::{ObservationRow, SyntheticDataset};

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("Fixture {0} contains no rows")]
    Empty(String),
}

fn csv_err(path: &Path) -> impl FnOnce(csv::Error) -> FixtureError + '_ {
    move |source| FixtureError::Csv {
        path: path.display().to_string(),
        source,
    }
}

pub const HEADER: [&str; 3] = ["hvac", "indoor_temp", "energy"];

/// Write `dataset` with a `hvac,indoor_temp,energy` header.
///
/// The header is written even when the dataset has no rows.
pub fn write_csv(path: &Path, dataset: &SyntheticDataset) -> Result<(), FixtureError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_err(path))?;
    writer.write_record(HEADER).map_err(csv_err(path))?;
    for row in dataset {
        writer.serialize(row).map_err(csv_err(path))?;
    }
    writer.flush().map_err(|source| FixtureError::Io {
        path: path.display().to_string(),
        source,
    })?;

    tracing::info!(path = %path.display(), rows = dataset.len(), "wrote fixture");
    Ok(())
}

/// Read a fixture file; an empty file (header only) is an error.
pub fn read_csv(path: &Path) -> Result<SyntheticDataset, FixtureError> {
    let mut reader = csv::Reader::from_path(path).map_err(csv_err(path))?;
    let rows = reader
        .deserialize::<ObservationRow>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err(path))?;

    if rows.is_empty() {
        return Err(FixtureError::Empty(path.display().to_string()));
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "read fixture");
    Ok(SyntheticDataset::from_rows(rows))
}

/// Number of rows in a fixture, used as the baseline simulation length.
pub fn baseline_len(path: &Path) -> Result<usize, FixtureError> {
    Ok(read_csv(path)?.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{simulate, Calibration, HvacInput, Samples};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_read_handwritten_fixture() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hvac,indoor_temp,energy").unwrap();
        writeln!(file, "63.23,17.68,503.05").unwrap();
        writeln!(file, "53.0,18.7,493.01").unwrap();

        let data = read_csv(file.path()).unwrap();
        assert_eq!(data.len(), 2);
        assert!((data.rows()[0].hvac - 63.23).abs() < 1e-9);
        assert!((data.rows()[1].energy - 493.01).abs() < 1e-9);
        assert_eq!(baseline_len(file.path()).unwrap(), 2);
    }

    #[test]
    fn test_written_fixture_reads_back_in_order() {
        let data = simulate(
            Calibration::Additive,
            &HvacInput::PerSample(vec![10.0, 40.0, 70.0]),
            Samples::Count(3),
            true,
            &mut StdRng::seed_from_u64(3),
        )
        .unwrap();

        let file = NamedTempFile::new().unwrap();
        write_csv(file.path(), &data).unwrap();

        let header = std::fs::read_to_string(file.path()).unwrap();
        assert!(header.starts_with("hvac,indoor_temp,energy"));

        let back = read_csv(file.path()).unwrap();
        assert_eq!(back.hvac(), vec![10.0, 40.0, 70.0]);
        for (a, b) in data.iter().zip(back.iter()) {
            assert!((a.indoor_temp - b.indoor_temp).abs() < 1e-9);
            assert!((a.energy - b.energy).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_dataset_still_gets_header() {
        let file = NamedTempFile::new().unwrap();
        write_csv(file.path(), &SyntheticDataset::default()).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written.trim_end(), "hvac,indoor_temp,energy");
        assert!(matches!(
            read_csv(file.path()),
            Err(FixtureError::Empty(_))
        ));
    }

    #[test]
    fn test_header_written_once() {
        let data = SyntheticDataset::from_rows(vec![
            ObservationRow { hvac: 50.0, indoor_temp: 19.0, energy: 490.0 },
            ObservationRow { hvac: 60.0, indoor_temp: 18.0, energy: 500.0 },
        ]);
        let file = NamedTempFile::new().unwrap();
        write_csv(file.path(), &data).unwrap();

        let written = std::fs::read_to_string(file.path()).unwrap();
        assert_eq!(written.matches("hvac").count(), 1);
        assert_eq!(written.lines().count(), 3);
        assert_eq!(read_csv(file.path()).unwrap(), data);
    }

    #[test]
    fn test_header_only_is_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hvac,indoor_temp,energy").unwrap();
        assert!(matches!(
            read_csv(file.path()),
            Err(FixtureError::Empty(_))
        ));
    }

    #[test]
    fn test_malformed_value_is_csv_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "hvac,indoor_temp,energy").unwrap();
        writeln!(file, "50,warm,490").unwrap();
        assert!(matches!(
            read_csv(file.path()),
            Err(FixtureError::Csv { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_error() {
        assert!(read_csv(Path::new("/nonexistent/fixture.csv")).is_err());
    }
}
