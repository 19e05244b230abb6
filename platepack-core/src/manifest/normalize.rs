use crate::error::{PackError, Result, RowDiagnostic};
use crate::manifest::row::{ManifestRow, REQUIRED_COLUMNS, normalize_filename};
use csv::ReaderBuilder;

/// Outcome of a successful normalization pass. Fix counters are reported
/// for observability; they never fail the run on their own.
#[derive(Debug, Default)]
pub struct Normalized {
    pub rows: Vec<ManifestRow>,
    pub fixed_copies: usize,
    pub fixed_filenames: usize,
}

/// Parse raw manifest text (UTF-8, optional BOM) into validated rows.
///
/// All-or-nothing gate: any row with missing/invalid fields after the
/// fix-up pass fails the whole manifest, so a partially valid batch never
/// produces a partially correct package set.
pub fn normalize(raw: &str) -> Result<Normalized> {
    let text = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = reader.records();
    let header = match records.next() {
        Some(rec) => rec?,
        None => {
            return Err(PackError::HeaderMismatch {
                found: Vec::new(),
                expected: expected_columns(),
            });
        }
    };
    check_header(&header)?;

    let mut out = Normalized::default();
    let mut diagnostics: Vec<RowDiagnostic> = Vec::new();

    // Row numbers count the header as row 1, matching what operators see
    // in their spreadsheet.
    for (i, rec) in records.enumerate() {
        let rec = rec?;
        let mut row = ManifestRow::from_record(&rec);
        if row.is_blank() {
            continue;
        }

        // Fixes and errors are independent passes: a row with other
        // missing fields still gets its copies/filename repaired.
        if row.copies.is_empty() || row.copies == "0" {
            row.copies = "1".to_string();
            out.fixed_copies += 1;
        }
        let fixed = normalize_filename(&row.filename);
        if fixed != row.filename {
            row.filename = fixed;
            out.fixed_filenames += 1;
        }

        let bad = row.problem_fields();
        if !bad.is_empty() {
            diagnostics.push(RowDiagnostic {
                row: i + 2,
                fields: bad,
            });
        }
        out.rows.push(row);
    }

    if !diagnostics.is_empty() {
        for d in &diagnostics {
            tracing::error!(%d, "manifest row rejected");
        }
        return Err(PackError::ValidationFailed(diagnostics));
    }

    tracing::info!(
        rows = out.rows.len(),
        fixed_copies = out.fixed_copies,
        fixed_filenames = out.fixed_filenames,
        "manifest normalized"
    );
    Ok(out)
}

fn expected_columns() -> Vec<String> {
    REQUIRED_COLUMNS.iter().map(|c| (*c).to_string()).collect()
}

fn check_header(rec: &csv::StringRecord) -> Result<()> {
    let found: Vec<String> = rec
        .iter()
        .take(REQUIRED_COLUMNS.len())
        .map(|h| h.trim().to_ascii_lowercase())
        .collect();
    if found.len() != REQUIRED_COLUMNS.len()
        || !found.iter().map(String::as_str).eq(REQUIRED_COLUMNS)
    {
        return Err(PackError::HeaderMismatch {
            found: rec.iter().map(|h| h.to_string()).collect(),
            expected: expected_columns(),
        });
    }
    Ok(())
}
