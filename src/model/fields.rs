use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Closed set of annotation field kinds, each with a fixed validation rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Number {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        max: Option<f64>,
    },
    Categorical {
        options: Vec<String>,
    },
    Text,
    List {
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        options: Vec<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnnotationValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for AnnotationValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationValue::Number(v) => write!(f, "{v}"),
            AnnotationValue::Text(s) => write!(f, "{s}"),
            AnnotationValue::List(items) => write!(f, "{}", items.join(", ")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid value for '{field}': {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl FieldDef {
    pub fn number(name: &str, min: Option<f64>, max: Option<f64>) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Number { min, max },
        }
    }

    pub fn categorical(name: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Categorical {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    pub fn text(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::Text,
        }
    }

    pub fn list(name: &str, options: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            kind: FieldKind::List {
                options: options.iter().map(|s| s.to_string()).collect(),
            },
        }
    }

    fn reject(&self, reason: impl Into<String>) -> ValidationError {
        ValidationError {
            field: self.name.clone(),
            reason: reason.into(),
        }
    }

    pub fn validate(&self, value: &AnnotationValue) -> Result<(), ValidationError> {
        match (&self.kind, value) {
            (FieldKind::Number { min, max }, AnnotationValue::Number(x)) => {
                if !x.is_finite() {
                    return Err(self.reject(format!("{x} is not a finite number")));
                }
                if let Some(lo) = min {
                    if x < lo {
                        return Err(self.reject(format!("{x} is below minimum {lo}")));
                    }
                }
                if let Some(hi) = max {
                    if x > hi {
                        return Err(self.reject(format!("{x} is above maximum {hi}")));
                    }
                }
                Ok(())
            }
            (FieldKind::Categorical { options }, AnnotationValue::Text(s)) => {
                if options.iter().any(|o| o == s) {
                    Ok(())
                } else {
                    Err(self.reject(format!(
                        "'{s}' is not one of [{}]",
                        options.join(", ")
                    )))
                }
            }
            (FieldKind::Text, AnnotationValue::Text(_)) => Ok(()),
            (FieldKind::List { options }, AnnotationValue::List(items)) => {
                if options.is_empty() {
                    return Ok(());
                }
                match items.iter().find(|item| !options.contains(item)) {
                    Some(bad) => Err(self.reject(format!(
                        "list item '{bad}' is not one of [{}]",
                        options.join(", ")
                    ))),
                    None => Ok(()),
                }
            }
            (kind, _) => Err(self.reject(format!("expected a {} value", kind.label()))),
        }
    }

    /// Converts reviewer-entered text into a value of this field's kind.
    /// Validation is a separate step.
    pub fn parse(&self, raw: &str) -> Result<AnnotationValue, ValidationError> {
        let raw = raw.trim();
        match &self.kind {
            FieldKind::Number { .. } => raw
                .parse::<f64>()
                .map(AnnotationValue::Number)
                .map_err(|_| self.reject(format!("'{raw}' is not a number"))),
            FieldKind::Categorical { .. } | FieldKind::Text => {
                Ok(AnnotationValue::Text(raw.to_string()))
            }
            FieldKind::List { .. } => Ok(AnnotationValue::List(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect(),
            )),
        }
    }
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::Number { .. } => "number",
            FieldKind::Categorical { .. } => "categorical",
            FieldKind::Text => "text",
            FieldKind::List { .. } => "list",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/fields.rs"]
mod tests;
