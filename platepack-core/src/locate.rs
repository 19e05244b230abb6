use crate::error::{PackError, Result};
use crate::manifest::row::{PAYLOAD_EXT, ROOT_GROUP, sanitize_filename};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A payload file discovered under the batch root. `name` is the on-disk
/// file name and becomes the archive entry name; `key` is the sanitized
/// name the manifest is matched against.
#[derive(Clone, Debug)]
pub struct PayloadFile {
    pub name: String,
    pub key: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Grouping key -> payload files, both in lexicographic order so packing
/// and part numbering are reproducible across runs.
pub type GroupMap = BTreeMap<String, Vec<PayloadFile>>;

fn is_payload(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(PAYLOAD_EXT)
}

/// Two-tier scan of the batch root: files directly in the root land in the
/// "root" group, files one level down land in their folder's group.
/// Deeper nesting is not scanned; folders without payloads do not appear.
pub fn locate_payloads(root: &Path) -> Result<GroupMap> {
    let mut groups: GroupMap = BTreeMap::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(2).follow_links(false) {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        if !is_payload(&name) {
            continue;
        }

        let group = if entry.depth() == 1 {
            ROOT_GROUP.to_string()
        } else {
            entry
                .path()
                .parent()
                .and_then(|p| p.file_name())
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| ROOT_GROUP.to_string())
        };
        let size = entry
            .metadata()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?
            .len();

        groups.entry(group).or_default().push(PayloadFile {
            key: sanitize_filename(&name),
            name,
            path: entry.path().to_path_buf(),
            size,
        });
    }

    for files in groups.values_mut() {
        files.sort_by(|a, b| a.name.cmp(&b.name));
    }

    if groups.is_empty() {
        return Err(PackError::NoPayloadFound(root.to_path_buf()));
    }

    for (group, files) in &groups {
        tracing::info!(group = %group, files = files.len(), "payload group discovered");
    }
    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path, len: usize) {
        fs::write(path, vec![0u8; len]).unwrap();
    }

    #[test]
    fn groups_root_and_subfolders() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.stl"), 4);
        touch(&dir.path().join("meta.csv"), 4);
        fs::create_dir(dir.path().join("petg")).unwrap();
        touch(&dir.path().join("petg").join("b.stl"), 8);
        touch(&dir.path().join("petg").join("notes.txt"), 1);

        let groups = locate_payloads(dir.path()).unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["petg", "root"]);
        assert_eq!(groups["root"].len(), 1);
        assert_eq!(groups["root"][0].name, "a.stl");
        assert_eq!(groups["petg"][0].size, 8);
    }

    #[test]
    fn ignores_nesting_below_two_tiers() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.stl"), 1);
        fs::create_dir_all(dir.path().join("pla").join("deep")).unwrap();
        touch(&dir.path().join("pla").join("deep").join("hidden.stl"), 1);

        let groups = locate_payloads(dir.path()).unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["root"]);
    }

    #[test]
    fn empty_folders_are_invisible() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.stl"), 1);
        fs::create_dir(dir.path().join("empty")).unwrap();

        let groups = locate_payloads(dir.path()).unwrap();
        assert!(!groups.contains_key("empty"));
    }

    #[test]
    fn no_payload_anywhere_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("meta.csv"), 1);
        assert!(matches!(
            locate_payloads(dir.path()),
            Err(PackError::NoPayloadFound(_))
        ));
    }

    #[test]
    fn extension_match_is_case_insensitive_and_files_sorted() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("B.STL"), 1);
        touch(&dir.path().join("a.stl"), 1);

        let groups = locate_payloads(dir.path()).unwrap();
        let names: Vec<&str> = groups["root"].iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["B.STL", "a.stl"]);
    }

    #[test]
    fn key_is_sanitized_disk_name() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("part one.stl"), 1);
        let groups = locate_payloads(dir.path()).unwrap();
        assert_eq!(groups["root"][0].name, "part one.stl");
        assert_eq!(groups["root"][0].key, "partone.stl");
    }
}
