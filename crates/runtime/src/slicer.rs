//! Splits one CSV file into per-value fragment files (per season, per match).

use std::collections::HashSet;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use ipl_core::{CoreError, Result};
use serde::Serialize;
use tracing::info;

use crate::metrics::MetricsRegistry;

#[derive(Debug, Clone)]
pub struct SliceConfig {
    pub column: String,
    pub out_dir: PathBuf,
    pub prefix: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Fragment {
    pub key: String,
    pub path: PathBuf,
    pub rows: usize,
}

/// Write one `<prefix><value>.csv` per distinct value of `cfg.column`, each
/// with the input header. Fragments come back in first-seen order.
///
/// Values that map to the same file name (`"a b"` and `"a_b"`) get a
/// numeric suffix, so no fragment overwrites another.
pub fn slice_csv(
    input: &Path,
    cfg: &SliceConfig,
    metrics: &MetricsRegistry,
) -> Result<Vec<Fragment>> {
    let file = File::open(input).map_err(|e| CoreError::io(input, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader.headers().map_err(|e| CoreError::csv(input, e))?.clone();
    let column = headers
        .iter()
        .position(|h| h.trim() == cfg.column)
        .ok_or_else(|| CoreError::MissingField { field: cfg.column.clone() })?;
    metrics.inc_files_opened(1);

    let mut groups: IndexMap<String, Vec<csv::StringRecord>> = IndexMap::new();
    for row in reader.records() {
        let row = row.map_err(|e| CoreError::csv(input, e))?;
        metrics.inc_records_read(1);
        let key = row.get(column).unwrap_or_default().trim().to_string();
        groups.entry(key).or_default().push(row);
    }

    fs::create_dir_all(&cfg.out_dir).map_err(|e| CoreError::io(&cfg.out_dir, e))?;

    let mut fragments = Vec::with_capacity(groups.len());
    let mut stems = HashSet::new();
    for (key, rows) in groups {
        let stem = unique_stem(file_stem_for(&key), &mut stems);
        let path = cfg.out_dir.join(format!("{}{}.csv", cfg.prefix, stem));
        write_fragment(&path, &headers, &rows)?;
        metrics.inc_fragments_written(1);
        info!(path = %path.display(), rows = rows.len(), "wrote fragment");
        fragments.push(Fragment { key, path, rows: rows.len() });
    }
    Ok(fragments)
}

fn write_fragment(
    path: &Path,
    headers: &csv::StringRecord,
    rows: &[csv::StringRecord],
) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| CoreError::csv(path, e))?;
    writer.write_record(headers).map_err(|e| CoreError::csv(path, e))?;
    for row in rows {
        writer.write_record(row).map_err(|e| CoreError::csv(path, e))?;
    }
    writer.flush().map_err(|e| CoreError::io(path, e))
}

fn file_stem_for(key: &str) -> String {
    if key.is_empty() {
        return "blank".to_string();
    }
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Claims `stem` in `taken`, appending `-2`, `-3`, ... until it is free.
/// Comparison ignores ASCII case for case-insensitive filesystems.
fn unique_stem(stem: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(stem.to_ascii_lowercase()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}");
        if taken.insert(candidate.to_ascii_lowercase()) {
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_path_safe() {
        assert_eq!(file_stem_for("2016"), "2016");
        assert_eq!(file_stem_for("a/b c"), "a_b_c");
        assert_eq!(file_stem_for(""), "blank");
    }

    #[test]
    fn clashing_stems_get_suffixes() {
        let mut taken = HashSet::new();
        assert_eq!(unique_stem("a_b".to_string(), &mut taken), "a_b");
        assert_eq!(unique_stem("a_b".to_string(), &mut taken), "a_b-2");
        assert_eq!(unique_stem("A_B".to_string(), &mut taken), "A_B-3");
        assert_eq!(unique_stem("blank".to_string(), &mut taken), "blank");
    }
}
