use crate::error::{PackError, Result};
use crate::locate::{PayloadFile, locate_payloads};
use crate::manifest::normalize::normalize;
use crate::manifest::partition::rows_for_unit;
use crate::manifest::row::{MANIFEST_NAME, ManifestRow};
use crate::pack::plan::plan_units;
use crate::pack::writer::{SealedUnit, write_unit};
use crate::report::BatchReport;
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Inputs for one packaging run.
#[derive(Clone, Debug)]
pub struct BatchOptions {
    /// Batch root: payload files live here (two-tier layout) and sealed
    /// archives are written back into it.
    pub root: PathBuf,
    /// Manifest path; defaults to `meta.csv` in the batch root.
    pub manifest: Option<PathBuf>,
    /// Identifier used in archive names; defaults to the root folder name.
    pub batch_id: Option<String>,
    /// Per-archive size cap in bytes (soft target, see `pack::plan`).
    pub size_cap: u64,
}

impl BatchOptions {
    pub fn manifest_path(&self) -> PathBuf {
        self.manifest
            .clone()
            .unwrap_or_else(|| self.root.join(MANIFEST_NAME))
    }

    pub fn effective_batch_id(&self) -> String {
        self.batch_id.clone().unwrap_or_else(|| {
            self.root
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "batch".to_string())
        })
    }
}

struct GroupOutcome {
    units: Vec<SealedUnit>,
    unmatched: Vec<String>,
}

/// Run the whole pipeline: normalize, locate, pack groups in parallel,
/// partition the manifest into every sealed archive.
///
/// Normalization and discovery failures abort before any output. A group
/// whose archive write fails is reported and fails the run, but other
/// groups' sealed archives remain valid on disk.
pub fn run_batch(opts: &BatchOptions) -> Result<BatchReport> {
    let started = Instant::now();

    let raw = fs::read_to_string(opts.manifest_path())?;
    let normalized = normalize(&raw)?;

    let groups = locate_payloads(&opts.root)?;
    let payload_files: usize = groups.values().map(Vec::len).sum();
    let batch_id = opts.effective_batch_id();

    // Groups are independent; packing inside one group is sequential.
    let results: Vec<(String, Result<GroupOutcome>)> = groups
        .par_iter()
        .map(|(group, files)| {
            let res = pack_group(
                &opts.root,
                &batch_id,
                group,
                files,
                &normalized.rows,
                opts.size_cap,
            )
            .map_err(|e| PackError::ArchiveWriteFailed {
                group: group.clone(),
                source: Box::new(e),
            });
            (group.clone(), res)
        })
        .collect();

    let mut units: Vec<SealedUnit> = Vec::new();
    let mut unmatched: Vec<String> = Vec::new();
    let mut first_err: Option<PackError> = None;
    for (group, res) in results {
        match res {
            Ok(outcome) => {
                units.extend(outcome.units);
                unmatched.extend(outcome.unmatched);
            }
            Err(e) => {
                tracing::error!(group = %group, error = %e, "group packing failed");
                if first_err.is_none() {
                    first_err = Some(e);
                }
            }
        }
    }
    if let Some(e) = first_err {
        return Err(e);
    }

    // Rows whose file was discovered nowhere: retained in the normalized
    // manifest but absent from every slice. Soft diagnostic.
    let discovered: BTreeSet<&str> = groups
        .values()
        .flatten()
        .map(|f| f.key.as_str())
        .collect();
    let mut rows_without_payload: Vec<String> = Vec::new();
    for row in &normalized.rows {
        if !discovered.contains(row.filename.as_str())
            && !rows_without_payload.contains(&row.filename)
        {
            tracing::warn!(filename = %row.filename, "manifest row has no payload file");
            rows_without_payload.push(row.filename.clone());
        }
    }

    units.sort_by(|a, b| (&a.group, a.part).cmp(&(&b.group, b.part)));
    let bytes_written = units.iter().map(|u| u.archive_bytes).sum();

    Ok(BatchReport {
        batch_id,
        fixed_copies: normalized.fixed_copies,
        fixed_filenames: normalized.fixed_filenames,
        group_count: groups.len(),
        payload_files,
        units,
        unmatched_payloads: unmatched,
        rows_without_payload,
        bytes_written,
        elapsed_secs: started.elapsed().as_secs_f64(),
    })
}

fn pack_group(
    root: &Path,
    batch_id: &str,
    group: &str,
    files: &[PayloadFile],
    rows: &[ManifestRow],
    size_cap: u64,
) -> Result<GroupOutcome> {
    let mut units = Vec::new();
    let mut unmatched = Vec::new();

    for plan in plan_units(files, size_cap) {
        let keys: BTreeSet<&str> = plan.files.iter().map(|f| f.key.as_str()).collect();
        let slice = rows_for_unit(rows, &keys);

        let matched: BTreeSet<&str> = slice.iter().map(|r| r.filename.as_str()).collect();
        for f in &plan.files {
            if !matched.contains(f.key.as_str()) {
                tracing::warn!(group = %group, file = %f.name, "payload has no manifest row");
                unmatched.push(format!("{group}/{}", f.name));
            }
        }
        if plan.oversized {
            tracing::warn!(
                group = %group,
                part = plan.part,
                bytes = plan.bytes,
                "single file exceeds the size cap; packaged alone"
            );
        }

        let sealed = write_unit(root, batch_id, group, &plan, &slice)?;
        tracing::info!(
            group = %group,
            part = sealed.part,
            files = sealed.file_count,
            rows = sealed.row_count,
            bytes = sealed.archive_bytes,
            "sealed archive"
        );
        units.push(sealed);
    }

    Ok(GroupOutcome { units, unmatched })
}
