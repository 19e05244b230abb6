use crate::pack::writer::SealedUnit;
use serde::Serialize;

/// End-of-run accounting: what was fixed, discovered, sealed, and how
/// fast. Soft diagnostics (unmatched payloads, rows without a payload)
/// live here; they never fail the run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub batch_id: String,
    pub fixed_copies: usize,
    pub fixed_filenames: usize,
    pub group_count: usize,
    pub payload_files: usize,
    pub units: Vec<SealedUnit>,
    /// "group/name" for every packaged file with no manifest row.
    pub unmatched_payloads: Vec<String>,
    /// Manifest filenames that matched no payload file anywhere.
    pub rows_without_payload: Vec<String>,
    pub bytes_written: u64,
    pub elapsed_secs: f64,
}

impl BatchReport {
    pub fn throughput_mib_s(&self) -> f64 {
        if self.elapsed_secs <= 0.0 {
            return 0.0;
        }
        (self.bytes_written as f64 / (1024.0 * 1024.0)) / self.elapsed_secs
    }
}
