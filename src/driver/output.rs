//! Generation log persistence
//!
//! The log is an append-only CSV file: a header row written once at run
//! start (truncating any previous file), then one row per completed
//! generation. It is never read back by the run that writes it.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::error::{EvoResult, GenomeError};

/// The per-generation unit of persistence
#[derive(Clone, Debug, PartialEq)]
pub struct GenerationRecord {
    /// Generation index, starting at zero
    pub generation: u32,
    /// Fitness of the generation's representative best candidate
    pub best_fitness: f64,
    /// The winning candidate's genes
    pub genes: Vec<f64>,
}

/// Append-only CSV log of per-generation winners
pub struct GenerationLog {
    path: PathBuf,
    columns: usize,
}

impl GenerationLog {
    /// Header columns for a robot with the given actuator count
    pub fn header(num_actuators: usize) -> Vec<String> {
        let mut columns = vec!["generation".to_string(), "best_fitness".to_string()];
        for i in 0..num_actuators {
            columns.push(format!("frequency{}", i));
            columns.push(format!("amplitude{}", i));
            columns.push(format!("phase_offset{}", i));
        }
        columns
    }

    /// Create the log file, truncating any existing one, and write the header
    pub fn create(path: impl Into<PathBuf>, num_actuators: usize) -> EvoResult<Self> {
        let path = path.into();
        let header = Self::header(num_actuators);

        let mut writer = csv::Writer::from_path(&path)?;
        writer.write_record(&header)?;
        writer.flush()?;

        log::debug!(
            "created generation log at {} ({} columns)",
            path.display(),
            header.len()
        );
        Ok(Self {
            path,
            columns: header.len(),
        })
    }

    /// Append one generation's record
    ///
    /// The file is reopened in append mode for each row, so every completed
    /// generation is durable even if a later one crashes the run.
    pub fn append(&self, record: &GenerationRecord) -> EvoResult<()> {
        let width = 2 + record.genes.len();
        if width != self.columns {
            return Err(GenomeError::DimensionMismatch {
                expected: self.columns,
                actual: width,
            }
            .into());
        }

        let file = OpenOptions::new().append(true).open(&self.path)?;
        let mut writer = csv::Writer::from_writer(file);

        let mut row = Vec::with_capacity(width);
        row.push(record.generation.to_string());
        row.push(record.best_fitness.to_string());
        for gene in &record.genes {
            row.push(gene.to_string());
        }
        writer.write_record(&row)?;
        writer.flush()?;
        Ok(())
    }

    /// Column count, fixed by the header: 2 + 3 x actuator count
    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Path of the log file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genome::actuator::GENES_PER_ACTUATOR;

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_header_layout() {
        let header = GenerationLog::header(2);
        assert_eq!(
            header,
            vec![
                "generation",
                "best_fitness",
                "frequency0",
                "amplitude0",
                "phase_offset0",
                "frequency1",
                "amplitude1",
                "phase_offset1",
            ]
        );
        assert_eq!(header.len(), 2 + 2 * GENES_PER_ACTUATOR);
    }

    #[test]
    fn test_create_truncates_and_writes_header_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        std::fs::write(&path, "stale contents\nfrom a previous run\n").unwrap();

        let log = GenerationLog::create(&path, 2).unwrap();
        let rows = read_rows(log.path());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], GenerationLog::header(2));
    }

    #[test]
    fn test_append_adds_one_row_per_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.csv");
        let log = GenerationLog::create(&path, 1).unwrap();

        log.append(&GenerationRecord {
            generation: 0,
            best_fitness: -1.25,
            genes: vec![1.0, 0.5, 0.0],
        })
        .unwrap();
        log.append(&GenerationRecord {
            generation: 1,
            best_fitness: -2.5,
            genes: vec![1.1, 0.4, 0.2],
        })
        .unwrap();

        let rows = read_rows(&path);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1][0], "0");
        assert_eq!(rows[1][1], "-1.25");
        assert_eq!(rows[2][0], "1");
        for row in &rows[1..] {
            assert_eq!(row.len(), log.columns());
        }
    }

    #[test]
    fn test_append_rejects_wrong_width() {
        let dir = tempfile::tempdir().unwrap();
        let log = GenerationLog::create(dir.path().join("output.csv"), 2).unwrap();

        let err = log
            .append(&GenerationRecord {
                generation: 0,
                best_fitness: 0.0,
                genes: vec![1.0, 0.5, 0.0],
            })
            .unwrap_err();
        assert!(matches!(
            err,
            crate::error::EvolutionError::Genome(GenomeError::DimensionMismatch {
                expected: 8,
                actual: 5,
            })
        ));

        // The bad record must not have touched the file
        let rows = read_rows(log.path());
        assert_eq!(rows.len(), 1);
    }
}
