use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::maf::DEFAULT_COLUMNS;
use crate::input::manifest::ManifestColumns;
use crate::model::fields::{FieldDef, FieldKind};
use crate::model::session::AutofillRules;
use crate::pipeline::project::DEFAULT_PAGE_SIZE;
use crate::report::style::StyleRule;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Reviewer setup. Every section is optional in the JSON file; omitted
/// sections fall back to the purity reviewer preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewConfig {
    pub manifest: ManifestColumns,
    pub default_columns: Vec<String>,
    pub fields: Vec<FieldDef>,
    pub autofill: AutofillRules,
    pub custom_colors: Vec<StyleRule>,
    pub sample_info_columns: Vec<String>,
    pub page_size: usize,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self::purity_reviewer()
    }
}

impl ReviewConfig {
    pub fn purity_reviewer() -> Self {
        Self {
            manifest: ManifestColumns::default(),
            default_columns: DEFAULT_COLUMNS.iter().map(|s| s.to_string()).collect(),
            fields: vec![
                FieldDef::number("purity", Some(0.0), Some(1.0)),
                FieldDef::number("ploidy", Some(0.0), None),
                FieldDef::text("notes"),
            ],
            autofill: AutofillRules::new(),
            custom_colors: Vec::new(),
            sample_info_columns: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::info!(
            "loaded config {} ({} annotation fields, {} autofill buttons)",
            path.display(),
            config.fields.len(),
            config.autofill.len()
        );
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut names = BTreeSet::new();
        for field in &self.fields {
            if field.name.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "annotation field with empty name".to_string(),
                ));
            }
            if !names.insert(field.name.as_str()) {
                return Err(ConfigError::Invalid(format!(
                    "annotation field '{}' defined twice",
                    field.name
                )));
            }
            match &field.kind {
                FieldKind::Categorical { options } if options.is_empty() => {
                    return Err(ConfigError::Invalid(format!(
                        "categorical field '{}' has no options",
                        field.name
                    )));
                }
                FieldKind::Number {
                    min: Some(lo),
                    max: Some(hi),
                } if lo > hi => {
                    return Err(ConfigError::Invalid(format!(
                        "number field '{}' has min {} above max {}",
                        field.name, lo, hi
                    )));
                }
                _ => {}
            }
        }

        for (button, targets) in &self.autofill {
            for field in targets.keys() {
                if !names.contains(field.as_str()) {
                    return Err(ConfigError::Invalid(format!(
                        "autofill button '{button}' targets unknown field '{field}'"
                    )));
                }
            }
        }

        if self.page_size == 0 {
            return Err(ConfigError::Invalid("page_size must be positive".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/src_inline/config.rs"]
mod tests;
