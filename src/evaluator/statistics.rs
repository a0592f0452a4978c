//! Running throw statistics and their append-only persistence.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use crate::error::Result;

/// Success/failure totals for a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ThrowStats {
    pub successes: u64,
    pub failures: u64,
}

impl ThrowStats {
    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn record(&mut self, is_successful: bool) {
        if is_successful {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
    }

    /// Share of successful throws in percent, 0 when nothing was thrown.
    pub fn success_percentage(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.successes as f64 / total as f64 * 100.0,
        }
    }

    /// On-screen summary, e.g. `"66% = 2 / 3"`.
    pub fn summary(&self) -> String {
        format!(
            "{}% = {} / {}",
            self.success_percentage() as u64,
            self.successes,
            self.total()
        )
    }

    /// One `successes,failures` record terminated by a newline.
    pub fn to_csv_line(&self) -> String {
        format!("{},{}\n", self.successes, self.failures)
    }
}

/// Append a run's totals to the statistics file, creating it if needed.
pub fn append_statistics(path: impl AsRef<Path>, stats: &ThrowStats) -> Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path.as_ref())?;
    file.write_all(stats.to_csv_line().as_bytes())?;
    Ok(())
}
