//! Flat-file persistence for the registry.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::core::record::RecordFormat;
use crate::core::registry::Registry;

/// Where the starting registry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    /// The data file was read; `records` entries were kept.
    File { records: usize },
    /// The data file was missing or unreadable; the registry starts empty.
    Fresh,
}

/// Registry loaded at startup plus its provenance.
#[derive(Debug, Clone)]
pub struct Loaded {
    pub registry: Registry,
    pub source: LoadSource,
}

/// Load the registry from `path`.
///
/// Lines are decoded in file order until the first one that fails to decode.
/// Blank lines between records are skipped. Ids are not checked for
/// uniqueness. A missing or unreadable file yields an empty registry instead
/// of an error.
pub fn load_registry(path: &Path, format: RecordFormat, capacity: usize) -> Loaded {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "no readable data file");
            return Loaded {
                registry: Registry::with_capacity(capacity),
                source: LoadSource::Fresh,
            };
        }
    };

    let mut records = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match format.decode(line) {
            Ok(candidate) => records.push(candidate),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    line = index + 1,
                    error = %err,
                    "stopped loading at malformed record"
                );
                break;
            }
        }
    }

    let (registry, dropped) = Registry::from_records(records, capacity);
    if dropped > 0 {
        warn!(dropped, capacity, "data file holds more candidates than capacity");
    }
    debug!(path = %path.display(), %format, records = registry.len(), "registry loaded");
    Loaded {
        source: LoadSource::File {
            records: registry.len(),
        },
        registry,
    }
}

/// Overwrite `path` with every candidate in registry order, one per line.
///
/// The write is not atomic: a crash mid-write can leave a truncated file.
pub fn save_registry(path: &Path, format: RecordFormat, registry: &Registry) -> Result<()> {
    debug!(path = %path.display(), %format, records = registry.len(), "writing registry");
    let file = File::create(path).with_context(|| format!("open {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for candidate in registry.iter() {
        let line = format
            .encode(candidate)
            .with_context(|| format!("encode candidate {}", candidate.id))?;
        writeln!(writer, "{line}").with_context(|| format!("write {}", path.display()))?;
    }
    writer
        .flush()
        .with_context(|| format!("flush {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::DEFAULT_CAPACITY;
    use crate::test_support::{candidate, registry_with};

    #[test]
    fn missing_file_starts_fresh() {
        let temp = tempfile::tempdir().expect("tempdir");
        let loaded = load_registry(
            &temp.path().join("missing.txt"),
            RecordFormat::Csv,
            DEFAULT_CAPACITY,
        );
        assert_eq!(loaded.source, LoadSource::Fresh);
        assert!(loaded.registry.is_empty());
        assert_eq!(loaded.registry.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn directory_in_place_of_file_starts_fresh() {
        let temp = tempfile::tempdir().expect("tempdir");
        let loaded = load_registry(temp.path(), RecordFormat::Csv, DEFAULT_CAPACITY);
        assert_eq!(loaded.source, LoadSource::Fresh);
    }

    /// Verifies save → load preserves the (id, name, votes) sequence for both formats.
    #[test]
    fn save_then_load_round_trips() {
        let temp = tempfile::tempdir().expect("tempdir");
        let registry = registry_with(vec![
            candidate(3, "Carol", 0),
            candidate(1, "Alice", 7),
            candidate(2, "", 1),
        ]);

        for format in [RecordFormat::Csv, RecordFormat::Jsonl] {
            let path = temp.path().join(format!("results.{format}"));
            save_registry(&path, format, &registry).expect("save");
            let loaded = load_registry(&path, format, DEFAULT_CAPACITY);
            assert_eq!(loaded.source, LoadSource::File { records: 3 });
            assert_eq!(loaded.registry, registry);
        }
    }

    #[test]
    fn csv_output_matches_positional_layout() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        let registry = registry_with(vec![candidate(1, "Alice", 2), candidate(2, "Bob", 1)]);

        save_registry(&path, RecordFormat::Csv, &registry).expect("save");

        let contents = fs::read_to_string(&path).expect("read");
        assert_eq!(contents, "1,Alice,2\n2,Bob,1\n");
    }

    #[test]
    fn save_overwrites_previous_contents() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        fs::write(&path, "9,Old,9\n8,Older,8\n").expect("seed");

        save_registry(&path, RecordFormat::Csv, &registry_with(vec![candidate(1, "New", 0)]))
            .expect("save");

        assert_eq!(fs::read_to_string(&path).expect("read"), "1,New,0\n");
    }

    #[test]
    fn load_stops_at_first_malformed_line() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        fs::write(&path, "1,Alice,2\n2,Bob\n3,Carol,4\n").expect("seed");

        let loaded = load_registry(&path, RecordFormat::Csv, DEFAULT_CAPACITY);

        assert_eq!(loaded.source, LoadSource::File { records: 1 });
        assert_eq!(loaded.registry, registry_with(vec![candidate(1, "Alice", 2)]));
    }

    #[test]
    fn load_skips_blank_lines_between_records() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        fs::write(&path, "1,Alice,2\n\n  \r\n2,Bob,1\n\n").expect("seed");

        let loaded = load_registry(&path, RecordFormat::Csv, DEFAULT_CAPACITY);

        assert_eq!(loaded.source, LoadSource::File { records: 2 });
        assert_eq!(
            loaded.registry,
            registry_with(vec![candidate(1, "Alice", 2), candidate(2, "Bob", 1)])
        );
    }

    #[test]
    fn load_keeps_duplicate_ids() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        fs::write(&path, "1,Alice,2\n1,Alice Again,0\n").expect("seed");

        let loaded = load_registry(&path, RecordFormat::Csv, DEFAULT_CAPACITY);

        assert_eq!(loaded.registry.len(), 2);
    }

    #[test]
    fn load_never_exceeds_capacity() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("voting_results.txt");
        fs::write(&path, "1,A,0\n2,B,0\n3,C,0\n").expect("seed");

        let loaded = load_registry(&path, RecordFormat::Csv, 2);

        assert_eq!(loaded.registry.len(), 2);
        assert!(loaded.registry.is_full());
    }

    #[test]
    fn save_into_missing_directory_fails_without_touching_registry() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("no-such-dir").join("voting_results.txt");
        let registry = registry_with(vec![candidate(1, "Alice", 1)]);
        let before = registry.clone();

        let err = save_registry(&path, RecordFormat::Csv, &registry).unwrap_err();

        assert!(format!("{err:#}").contains("open"));
        assert_eq!(registry, before);
    }
}
