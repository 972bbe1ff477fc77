//! JSON file persistence for the rule table.
//!
//! The whole table is rewritten on every save. Writes go to a sibling
//! temporary file first and are renamed into place, so a crash mid-write
//! never leaves a truncated data file behind.

use super::error::StoreError;
use super::types::{EndpointRecord, RuleTable};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Indentation used for the data file.
const INDENT: &[u8] = b"    ";

/// Reads the rule table from `path`.
///
/// Returns `Ok(None)` if the file does not exist. The file must hold a JSON
/// object; individual entries that are not valid records are logged and
/// skipped so one bad entry does not cost the others.
pub fn read_table(path: &Path) -> Result<Option<RuleTable>, StoreError> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let entries: Map<String, Value> = serde_json::from_slice(&bytes)?;

    let mut table = RuleTable::new();
    for (rule_name, entry) in entries {
        match serde_json::from_value::<EndpointRecord>(entry) {
            Ok(record) => {
                table.insert(rule_name, record);
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), rule = %rule_name, error = %e, "Skipping invalid rule record");
            }
        }
    }

    Ok(Some(table))
}

/// Serializes the full table and replaces the file at `path`.
pub fn write_table(path: &Path, table: &RuleTable) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    table.serialize(&mut serializer)?;

    let tmp = temp_path(path);
    std::fs::write(&tmp, &buf).map_err(io_err)?;
    if let Err(e) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(io_err(e));
    }

    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(&dir.path().join("absent.json")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("rules.json");

        let mut table = RuleTable::new();
        table.insert(
            "web".to_string(),
            EndpointRecord::new("1.2.3.4", "8080", Some("t1".into())),
        );
        table.insert("ssh".to_string(), EndpointRecord::new("5.6.7.8", 22u16, None));

        write_table(&path, &table).unwrap();

        assert_eq!(read_table(&path).unwrap(), Some(table));
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_write_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");

        let mut table = RuleTable::new();
        table.insert("web".to_string(), EndpointRecord::new("1.2.3.4", "80", None));
        write_table(&path, &table).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n    \"web\": {\n        \"ip\""));
    }

    #[test]
    fn test_write_overwrites_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "garbage that is much longer than an empty table").unwrap();

        write_table(&path, &RuleTable::new()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_read_skips_only_invalid_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(
            &path,
            r#"{
                "web": {"ip": "1.2.3.4", "port": "8080", "timestamp": 1700000000},
                "nas": {"ip": "5.6.7.8", "port": 5001, "timestamp": "t"},
                "bad": "not a record",
                "list": {"ip": "9.9.9.9", "port": [22]}
            }"#,
        )
        .unwrap();

        let table = read_table(&path).unwrap().unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table["web"].timestamp, Some(serde_json::json!(1700000000)));
        assert_eq!(table["nas"].ip, "5.6.7.8");
    }

    #[test]
    fn test_read_non_object_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();

        assert!(matches!(
            read_table(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_read_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        std::fs::write(&path, "{not json").unwrap();

        assert!(matches!(
            read_table(&path),
            Err(StoreError::Serialization(_))
        ));
    }
}
