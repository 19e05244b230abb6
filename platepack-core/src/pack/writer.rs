use crate::container::Container;
use crate::container::zipc::ZipSink;
use crate::error::{PackError, Result};
use crate::manifest::partition::slice_csv;
use crate::manifest::row::{MANIFEST_NAME, ManifestRow};
use crate::pack::plan::UnitPlan;
use serde::Serialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A sealed, fully written archive.
#[derive(Clone, Debug, Serialize)]
pub struct SealedUnit {
    pub group: String,
    pub part: u32,
    pub path: PathBuf,
    pub file_count: usize,
    pub row_count: usize,
    pub payload_bytes: u64,
    pub archive_bytes: u64,
    pub oversized: bool,
}

/// Archive file name for one (group, part) pair. The root group renders
/// literally as "root".
pub fn unit_name(batch_id: &str, group: &str, part: u32) -> String {
    format!("{batch_id}_{group}_part{part}.zip")
}

/// Write one unit: payload entries in plan order, then the manifest slice,
/// then an atomic rename from a temp name to the final name. A failed
/// write never leaves a file under the final name.
pub fn write_unit(
    dest_dir: &Path,
    batch_id: &str,
    group: &str,
    plan: &UnitPlan,
    rows: &[&ManifestRow],
) -> Result<SealedUnit> {
    let final_path = dest_dir.join(unit_name(batch_id, group, plan.part));
    let tmp = NamedTempFile::new_in(dest_dir)?;

    let mut sink = ZipSink::new(tmp.as_file());
    for f in &plan.files {
        let mut src = File::open(&f.path)?;
        sink.add_file(&f.name, &mut src)?;
    }
    sink.add_bytes(MANIFEST_NAME, &slice_csv(rows)?)?;
    let archive_bytes = sink.finish()?;

    tmp.persist(&final_path).map_err(|e| PackError::Io(e.error))?;

    Ok(SealedUnit {
        group: group.to_string(),
        part: plan.part,
        path: final_path,
        file_count: plan.files.len(),
        row_count: rows.len(),
        payload_bytes: plan.bytes,
        archive_bytes,
        oversized: plan.oversized,
    })
}
