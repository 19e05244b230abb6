use serde::{Deserialize, Serialize};

/// Manifest column names, fixed order. The header check and every embedded
/// manifest slice use exactly these eight.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    "batch",
    "filename",
    "material",
    "part_id",
    "copies",
    "next_step",
    "order_id",
    "technology",
];

/// Canonical payload extension; appended to manifest filenames when missing.
pub const PAYLOAD_EXT: &str = ".stl";

/// Grouping key for payload files sitting directly in the batch root.
pub const ROOT_GROUP: &str = "root";

/// Fixed manifest file name: the converter hands it off under this name in
/// the batch root, and each archive embeds its slice under the same name.
pub const MANIFEST_NAME: &str = "meta.csv";

/// One part instance to manufacture. All fields are text; values are
/// trimmed at parse time, so a whitespace-only field reads as blank.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub batch: String,
    pub filename: String,
    pub material: String,
    pub part_id: String,
    pub copies: String,
    pub next_step: String,
    pub order_id: String,
    pub technology: String,
}

impl ManifestRow {
    /// Build a row from the first eight fields of a record; short records
    /// read as blank trailing fields. Columns beyond eight are ignored.
    pub fn from_record(rec: &csv::StringRecord) -> Self {
        let field = |i: usize| rec.get(i).unwrap_or("").trim().to_string();
        Self {
            batch: field(0),
            filename: field(1),
            material: field(2),
            part_id: field(3),
            copies: field(4),
            next_step: field(5),
            order_id: field(6),
            technology: field(7),
        }
    }

    /// Field values in `REQUIRED_COLUMNS` order.
    pub fn fields(&self) -> [&str; 8] {
        [
            &self.batch,
            &self.filename,
            &self.material,
            &self.part_id,
            &self.copies,
            &self.next_step,
            &self.order_id,
            &self.technology,
        ]
    }

    /// A blank row (every field empty) is skipped, not validated.
    pub fn is_blank(&self) -> bool {
        self.fields().iter().all(|v| v.is_empty())
    }

    /// Names of fields that are blank, plus `copies` when it is not a
    /// positive integer. Run after the fix-up pass.
    pub fn problem_fields(&self) -> Vec<String> {
        let mut bad: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .zip(self.fields())
            .filter(|(_, v)| v.is_empty())
            .map(|(n, _)| (*n).to_string())
            .collect();
        if !self.copies.is_empty() && self.copies.parse::<u64>().map_or(true, |n| n == 0) {
            bad.push("copies".to_string());
        }
        bad
    }
}

/// Restrict a filename to `[A-Za-z0-9_.]`; anything outside the set is
/// deleted, not substituted. Idempotent by construction.
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '.')
        .collect()
}

/// Full filename fix-up: append the payload extension unless already
/// present (case-insensitive), then sanitize. Blank input stays blank so
/// the missing-field check still fires for it.
pub fn normalize_filename(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let mut name = trimmed.to_string();
    if !trimmed.to_ascii_lowercase().ends_with(PAYLOAD_EXT) {
        name.push_str(PAYLOAD_EXT);
    }
    sanitize_filename(&name)
}
