use std::path::PathBuf;

use platepack_core::batch::{BatchOptions, run_batch};
use platepack_core::error::{PackError, Result};
use platepack_core::locate::locate_payloads;
use platepack_core::manifest::normalize::normalize;
use platepack_core::manifest::row::MANIFEST_NAME;
use platepack_core::pack::plan::plan_units;
use platepack_core::pack::writer::unit_name;

pub fn handle_pack(
    root: PathBuf,
    manifest: Option<PathBuf>,
    batch_id: Option<String>,
    size_cap: u64,
) -> Result<()> {
    let opts = BatchOptions {
        root,
        manifest,
        batch_id,
        size_cap,
    };
    let report = run_batch(&opts)?;

    for u in &report.units {
        println!(
            "{:>12}  {}  ({} files, {} rows{})",
            u.archive_bytes,
            u.path.display(),
            u.file_count,
            u.row_count,
            if u.oversized { ", oversized" } else { "" }
        );
    }
    if report.fixed_copies > 0 {
        eprintln!("pack: corrected {} row(s) with copies=0 or empty", report.fixed_copies);
    }
    if report.fixed_filenames > 0 {
        eprintln!("pack: corrected {} filename(s)", report.fixed_filenames);
    }
    for name in &report.unmatched_payloads {
        eprintln!("pack: warning: {name} has no manifest row");
    }
    for name in &report.rows_without_payload {
        eprintln!("pack: warning: no payload file for manifest row {name}");
    }
    eprintln!(
        "pack: {} unit(s) across {} group(s), {} byte(s) in {:.1}s ({:.1} MiB/s)",
        report.units.len(),
        report.group_count,
        report.bytes_written,
        report.elapsed_secs,
        report.throughput_mib_s()
    );
    Ok(())
}

pub fn handle_validate(root: PathBuf, manifest: Option<PathBuf>) -> Result<()> {
    let path = manifest.unwrap_or_else(|| root.join(MANIFEST_NAME));
    let raw = std::fs::read_to_string(&path)?;
    match normalize(&raw) {
        Ok(n) => {
            println!(
                "validate: OK — {} row(s), {} copies fix(es), {} filename fix(es)",
                n.rows.len(),
                n.fixed_copies,
                n.fixed_filenames
            );
            Ok(())
        }
        Err(PackError::ValidationFailed(diags)) => {
            eprintln!("validate: failed:");
            for d in &diags {
                eprintln!("  {d}");
            }
            Err(PackError::ValidationFailed(diags))
        }
        Err(e) => Err(e),
    }
}

pub fn handle_plan(root: PathBuf, batch_id: Option<String>, size_cap: u64) -> Result<()> {
    let groups = locate_payloads(&root)?;
    let batch_id = batch_id.unwrap_or_else(|| {
        root.file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "batch".to_string())
    });

    for (group, files) in &groups {
        for unit in plan_units(files, size_cap) {
            println!(
                "{:>12}  {}  ({} files{})",
                unit.bytes,
                unit_name(&batch_id, group, unit.part),
                unit.files.len(),
                if unit.oversized { ", oversized" } else { "" }
            );
        }
    }
    Ok(())
}
