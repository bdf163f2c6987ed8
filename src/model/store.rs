use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::fields::{AnnotationValue, FieldDef, ValidationError};

pub const SAMPLE_ID_KEY: &str = "sample_id";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("unknown annotation field: {0}")]
    UnknownField(String),
    #[error("annotation field '{0}' is already registered with a different kind")]
    SchemaConflict(String),
    #[error("annotation field name '{0}' is reserved")]
    ReservedField(String),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed annotation store {}: {source}", .path.display())]
    Format {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotationRecord {
    values: BTreeMap<String, AnnotationValue>,
    /// Stored values that are not annotation values (`true`, `null`,
    /// objects); written back unchanged.
    passthrough: BTreeMap<String, serde_json::Value>,
}

impl AnnotationRecord {
    pub fn get(&self, field: &str) -> Option<&AnnotationValue> {
        self.values.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnnotationValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn to_json(&self) -> BTreeMap<String, serde_json::Value> {
        let mut out = self.passthrough.clone();
        for (field, value) in &self.values {
            let json = match value {
                AnnotationValue::Number(v) => serde_json::json!(v),
                AnnotationValue::Text(s) => serde_json::json!(s),
                AnnotationValue::List(items) => serde_json::json!(items),
            };
            out.insert(field.clone(), json);
        }
        out
    }

    pub fn passthrough(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.passthrough.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.passthrough.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    fields: Vec<FieldDef>,
    records: Vec<RecordRow>,
}

#[derive(Debug, Serialize, Deserialize)]
struct RecordRow {
    sample_id: String,
    #[serde(flatten)]
    values: BTreeMap<String, serde_json::Value>,
}

/// Reviewer annotations keyed by sample id. Single writer; every accepted
/// value has passed its field's validation.
#[derive(Debug, Clone)]
pub struct AnnotationStore {
    path: PathBuf,
    fields: Vec<FieldDef>,
    records: BTreeMap<String, AnnotationRecord>,
}

impl AnnotationStore {
    pub fn new(path: &Path, fields: Vec<FieldDef>) -> Result<Self, StoreError> {
        let mut store = Self {
            path: path.to_path_buf(),
            fields: Vec::new(),
            records: BTreeMap::new(),
        };
        for field in fields {
            store.register_field(field)?;
        }
        Ok(store)
    }

    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let file: StoreFile = serde_json::from_str(&text).map_err(|source| StoreError::Format {
            path: path.to_path_buf(),
            source,
        })?;

        let mut store = Self::new(path, file.fields)?;
        for row in file.records {
            let mut record = AnnotationRecord::default();
            for (field, raw) in row.values {
                let value = match serde_json::from_value::<AnnotationValue>(raw.clone()) {
                    Ok(value) => value,
                    Err(_) => {
                        tracing::warn!(
                            "stored annotation {} = {} for {} is not a number, text or list; kept as is",
                            field,
                            raw,
                            row.sample_id
                        );
                        record.passthrough.insert(field, raw);
                        continue;
                    }
                };
                match store.field(&field) {
                    Some(def) => {
                        if let Err(err) = def.validate(&value) {
                            tracing::warn!("stored annotation for {} is invalid: {}", row.sample_id, err);
                        }
                    }
                    None => tracing::warn!(
                        "stored annotation for {} uses unregistered field '{}'",
                        row.sample_id,
                        field
                    ),
                }
                record.values.insert(field, value);
            }
            store.records.insert(row.sample_id, record);
        }

        tracing::info!(
            "loaded annotation store {} ({} samples, {} fields)",
            path.display(),
            store.records.len(),
            store.fields.len()
        );
        Ok(store)
    }

    /// Loads the store at `path` when it exists, otherwise starts an empty
    /// one, then registers `fields` on top.
    pub fn open(path: &Path, fields: &[FieldDef]) -> Result<Self, StoreError> {
        if path.exists() {
            let mut store = Self::load(path)?;
            for field in fields {
                store.register_field(field.clone())?;
            }
            Ok(store)
        } else {
            tracing::info!("starting new annotation store at {}", path.display());
            Self::new(path, fields.to_vec())
        }
    }

    pub fn register_field(&mut self, def: FieldDef) -> Result<(), StoreError> {
        if def.name == SAMPLE_ID_KEY {
            return Err(StoreError::ReservedField(def.name));
        }
        match self.fields.iter().find(|f| f.name == def.name) {
            Some(existing) if existing.kind == def.kind => Ok(()),
            Some(_) => Err(StoreError::SchemaConflict(def.name)),
            None => {
                self.fields.push(def);
                Ok(())
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn require_field(&self, name: &str) -> Result<&FieldDef, StoreError> {
        self.field(name)
            .ok_or_else(|| StoreError::UnknownField(name.to_string()))
    }

    pub fn parse_value(&self, field: &str, raw: &str) -> Result<AnnotationValue, StoreError> {
        Ok(self.require_field(field)?.parse(raw)?)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn sample_ids(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn get(&self, sample_id: &str) -> Option<&AnnotationRecord> {
        self.records.get(sample_id)
    }

    pub fn set(
        &mut self,
        sample_id: &str,
        field: &str,
        value: AnnotationValue,
    ) -> Result<(), StoreError> {
        self.set_many(sample_id, &[(field.to_string(), value)])
    }

    /// Applies every edit or none of them.
    pub fn set_many(
        &mut self,
        sample_id: &str,
        edits: &[(String, AnnotationValue)],
    ) -> Result<(), StoreError> {
        if edits.is_empty() {
            return Ok(());
        }
        for (field, value) in edits {
            self.require_field(field)?.validate(value)?;
        }
        let record = self.records.entry(sample_id.to_string()).or_default();
        for (field, value) in edits {
            record.passthrough.remove(field);
            record.values.insert(field.clone(), value.clone());
        }
        tracing::debug!("set {} annotation(s) for {}", edits.len(), sample_id);
        Ok(())
    }

    pub fn persist(&self) -> Result<(), StoreError> {
        let file = StoreFile {
            fields: self.fields.clone(),
            records: self
                .records
                .iter()
                .map(|(id, record)| RecordRow {
                    sample_id: id.clone(),
                    values: record.to_json(),
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(|source| StoreError::Format {
            path: self.path.clone(),
            source,
        })?;

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(io_err)?;
        }
        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = self.path.with_file_name(tmp_name);
        fs::write(&tmp_path, json + "\n").map_err(io_err)?;
        fs::rename(&tmp_path, &self.path).map_err(io_err)?;

        tracing::info!(
            "persisted {} annotation records to {}",
            self.records.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/store.rs"]
mod tests;
