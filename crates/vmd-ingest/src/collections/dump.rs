//! Diagnostic dumps for rejected records
//!
//! When a record fails structurally, its raw JSON document is written to
//! disk for offline inspection before the record is dropped from the
//! batch. The file name combines a generated identity token with the
//! error message. This is a debugging artifact, not a stable interface.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use super::{CollectionsError, Result};

/// Write a rejected raw record to `dir`, returning the dump file path.
pub fn dump_record(
    dir: &Path,
    raw: &serde_json::Value,
    error: &CollectionsError,
) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let file_name = format!("{} - {}.json", Uuid::new_v4(), sanitize(&error.to_string()));
    let path = dir.join(file_name);

    let file = std::fs::File::create(&path)?;
    serde_json::to_writer_pretty(file, raw)?;

    Ok(path)
}

/// Strip characters that are unsafe in file names and cap the length.
fn sanitize(message: &str) -> String {
    message
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\n' => '_',
            c => c,
        })
        .take(120)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn dump_writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let raw = json!({"id": "co1", "attributes": {}});
        let error = CollectionsError::structure("links.self");

        let path = dump_record(dir.path(), &raw, &error).unwrap();

        assert!(path.exists());
        let contents = std::fs::read_to_string(&path).unwrap();
        let round_trip: serde_json::Value = serde_json::from_str(&contents).unwrap();
        assert_eq!(round_trip, raw);
        assert!(path
            .file_name()
            .unwrap()
            .to_string_lossy()
            .contains("links.self"));
    }

    #[test]
    fn dump_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("rejected/objects");
        let error = CollectionsError::structure("multimedia.processed");

        let path = dump_record(&nested, &json!({}), &error).unwrap();
        assert!(path.starts_with(&nested));
    }

    #[test]
    fn sanitize_replaces_path_separators() {
        assert_eq!(sanitize("a/b:c"), "a_b_c");
    }
}
