// ============================================================
// Layer 6 — Metrics Logger
// ============================================================
// Appends one CSV row per completed epoch so training runs can
// be inspected and plotted after the fact. Observability only:
// nothing reads this file back — cross-fold selection happens
// in memory in the trainer.
//
// Output file: <checkpoint_dir>/metrics.csv
//
//   fold,epoch,train_loss,val_loss,val_accuracy
//   1,1,0.693100,0.691800,0.525000
//   1,2,0.651400,0.660200,0.612500
//   ...

use anyhow::Result;
use std::{
    fs::{self, OpenOptions},
    io::Write,
    path::PathBuf,
};
use serde::{Deserialize, Serialize};

use crate::ml::monitors::EpochStats;

/// One row of metrics data for a single epoch of a single fold.
/// The fold is recorded 1-based, matching the run logs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpochRow {
    pub fold:         usize,
    pub epoch:        usize,
    pub train_loss:   f64,
    pub val_loss:     f64,
    pub val_accuracy: f64,
}

impl EpochRow {
    pub fn from_stats(stats: &EpochStats) -> Self {
        Self {
            fold:         stats.fold + 1,
            epoch:        stats.epoch,
            train_loss:   stats.train_loss,
            val_loss:     stats.val_loss,
            val_accuracy: stats.val_accuracy,
        }
    }
}

/// Appends epoch metrics to a CSV file for later analysis.
pub struct MetricsLogger {
    csv_path: PathBuf,
}

impl MetricsLogger {
    /// Create a new MetricsLogger, writing the CSV header if the
    /// file doesn't exist yet so runs can append across restarts.
    pub fn new(dir: impl Into<String>) -> Result<Self> {
        let dir = PathBuf::from(dir.into());
        fs::create_dir_all(&dir)?;

        let csv_path = dir.join("metrics.csv");
        if !csv_path.exists() {
            let mut f = fs::File::create(&csv_path)?;
            writeln!(f, "fold,epoch,train_loss,val_loss,val_accuracy")?;
            tracing::debug!("Created metrics CSV: '{}'", csv_path.display());
        }

        Ok(Self { csv_path })
    }

    /// Append one epoch's metrics as a new CSV row.
    pub fn log(&self, row: &EpochRow) -> Result<()> {
        let mut f = OpenOptions::new().append(true).open(&self.csv_path)?;
        writeln!(
            f,
            "{},{},{:.6},{:.6},{:.6}",
            row.fold, row.epoch, row.train_loss, row.val_loss, row.val_accuracy,
        )?;
        Ok(())
    }

    pub fn csv_path(&self) -> &PathBuf {
        &self.csv_path
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_header_and_appends_rows() {
        let dir = std::env::temp_dir().join(format!("petlens-metrics-{}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);

        let logger = MetricsLogger::new(dir.to_string_lossy().into_owned()).unwrap();
        let row = EpochRow { fold: 1, epoch: 1, train_loss: 0.7, val_loss: 0.69, val_accuracy: 0.5 };
        logger.log(&row).unwrap();
        logger.log(&EpochRow { epoch: 2, ..row }).unwrap();

        let content = fs::read_to_string(logger.csv_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "fold,epoch,train_loss,val_loss,val_accuracy");
        assert!(lines[1].starts_with("1,1,"));
        assert!(lines[2].starts_with("1,2,"));

        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_from_stats_reports_fold_one_based() {
        let stats = EpochStats { fold: 0, epoch: 3, train_loss: 0.5, val_loss: 0.4, val_accuracy: 0.8 };
        let row = EpochRow::from_stats(&stats);
        assert_eq!(row.fold, 1);
        assert_eq!(row.epoch, 3);
    }
}
