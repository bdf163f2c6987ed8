use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::input::InputError;
use crate::input::table::read_tsv;

/// Names of the manifest columns carrying the sample identity and file paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestColumns {
    pub sample_id: String,
    pub maf: String,
    pub segments: String,
}

impl Default for ManifestColumns {
    fn default() -> Self {
        Self {
            sample_id: "sample_id".to_string(),
            maf: "maf_fn".to_string(),
            segments: "acs_fn".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SampleRecord {
    pub id: String,
    pub maf_path: Option<PathBuf>,
    pub segment_path: Option<PathBuf>,
    /// Remaining manifest columns, in header order.
    pub metadata: Vec<(String, String)>,
}

impl SampleRecord {
    pub fn metadata_value(&self, column: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Manifest {
    pub path: PathBuf,
    pub samples: Vec<SampleRecord>,
    by_id: HashMap<String, usize>,
}

impl Manifest {
    pub fn load(path: &Path, columns: &ManifestColumns) -> Result<Self, InputError> {
        let table = read_tsv(path)?;
        let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

        let id_col = table
            .column_index(&columns.sample_id)
            .ok_or_else(|| InputError::MissingColumn {
                column: columns.sample_id.clone(),
                path: path.to_path_buf(),
            })?;
        let maf_col = table.column_index(&columns.maf);
        let seg_col = table.column_index(&columns.segments);
        if maf_col.is_none() {
            tracing::warn!(
                "manifest {} has no '{}' column; mutation tables unavailable",
                path.display(),
                columns.maf
            );
        }
        if seg_col.is_none() {
            tracing::warn!(
                "manifest {} has no '{}' column; segment tables unavailable",
                path.display(),
                columns.segments
            );
        }

        let mut samples = Vec::with_capacity(table.n_rows());
        let mut by_id = HashMap::with_capacity(table.n_rows());
        for (row_idx, row) in table.rows().iter().enumerate() {
            let id = table.value(row_idx, id_col).to_string();
            if id.is_empty() {
                tracing::warn!(
                    "manifest row {} has an empty sample id; skipping",
                    row_idx + 1
                );
                continue;
            }
            if by_id.contains_key(&id) {
                return Err(InputError::DuplicateSample(id));
            }

            let resolve = |col: Option<usize>| -> Option<PathBuf> {
                let raw = table.value(row_idx, col?);
                if raw.is_empty() {
                    return None;
                }
                let p = PathBuf::from(raw);
                Some(if p.is_relative() { base_dir.join(p) } else { p })
            };

            let metadata = table
                .columns()
                .iter()
                .zip(row.iter())
                .enumerate()
                .filter(|(i, _)| *i != id_col && Some(*i) != maf_col && Some(*i) != seg_col)
                .map(|(_, (name, value))| (name.clone(), value.clone()))
                .collect();

            by_id.insert(id.clone(), samples.len());
            samples.push(SampleRecord {
                id,
                maf_path: resolve(maf_col),
                segment_path: resolve(seg_col),
                metadata,
            });
        }

        tracing::info!(
            "loaded manifest {} with {} samples",
            path.display(),
            samples.len()
        );

        Ok(Self {
            path: path.to_path_buf(),
            samples,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn position(&self, sample_id: &str) -> Option<usize> {
        self.by_id.get(sample_id).copied()
    }

    pub fn get(&self, sample_id: &str) -> Option<&SampleRecord> {
        self.position(sample_id).map(|i| &self.samples[i])
    }

    pub fn require(&self, sample_id: &str) -> Result<&SampleRecord, InputError> {
        self.get(sample_id)
            .ok_or_else(|| InputError::UnknownSample(sample_id.to_string()))
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.samples.iter().map(|s| s.id.as_str())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/manifest.rs"]
mod tests;
