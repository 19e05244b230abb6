use crate::error::{PackError, Result};
use crate::manifest::row::{ManifestRow, REQUIRED_COLUMNS};
use std::collections::BTreeSet;

/// Rows whose filename was packed into one archive unit, original order
/// preserved. Matching is exact and case-sensitive: both sides carry
/// sanitized names, so the comparison is a plain string equality.
pub fn rows_for_unit<'a>(
    rows: &'a [ManifestRow],
    packed_keys: &BTreeSet<&str>,
) -> Vec<&'a ManifestRow> {
    rows.iter()
        .filter(|r| packed_keys.contains(r.filename.as_str()))
        .collect()
}

/// Serialize a row subset with the fixed header, the same shape as the
/// source manifest.
pub fn slice_csv(rows: &[&ManifestRow]) -> Result<Vec<u8>> {
    let mut w = csv::Writer::from_writer(Vec::new());
    w.write_record(REQUIRED_COLUMNS)?;
    for r in rows {
        w.write_record(r.fields())?;
    }
    w.into_inner().map_err(|e| PackError::Io(e.into_error()))
}
