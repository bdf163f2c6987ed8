use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::{InputError, Manifest, MutationTable, load_sample_mutations};
use crate::model::fields::AnnotationValue;
use crate::model::store::{AnnotationStore, StoreError};
use crate::pipeline::project::{FilterSelection, ProjectedView, project};

/// Where an autofill button takes a field's value from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutofillSource {
    /// Current value of a named UI component.
    Observed(String),
    Literal(AnnotationValue),
}

/// Button name -> annotation field -> source.
pub type AutofillRules = BTreeMap<String, BTreeMap<String, AutofillSource>>;

/// Component name -> currently displayed value.
pub type ObservedValues = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no sample selected")]
    NoSample,
    #[error("no annotation edit in progress")]
    NotEditing,
    #[error("unknown autofill button: {0}")]
    UnknownAutofill(String),
    #[error("component '{0}' has no observed value")]
    Unobserved(String),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone)]
pub struct LoadedSample {
    pub sample_id: String,
    pub mutations: Rc<MutationTable>,
    pub selection: FilterSelection,
}

/// Field edits not yet committed, in entry order, one per field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PendingEdit {
    values: Vec<(String, AnnotationValue)>,
}

impl PendingEdit {
    pub fn with(&self, field: &str, value: AnnotationValue) -> Self {
        let mut values = self.values.clone();
        match values.iter_mut().find(|(name, _)| name == field) {
            Some(slot) => slot.1 = value,
            None => values.push((field.to_string(), value)),
        }
        Self { values }
    }

    pub fn get(&self, field: &str) -> Option<&AnnotationValue> {
        self.values
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    pub fn values(&self) -> &[(String, AnnotationValue)] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Review session as a value: every transition returns a new state and
/// leaves `self` untouched, so a failed transition keeps the prior state.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    #[default]
    NoSample,
    SampleLoaded(LoadedSample),
    Editing {
        sample: LoadedSample,
        pending: PendingEdit,
    },
}

impl SessionState {
    pub fn loaded(&self) -> Option<&LoadedSample> {
        match self {
            SessionState::NoSample => None,
            SessionState::SampleLoaded(sample) => Some(sample),
            SessionState::Editing { sample, .. } => Some(sample),
        }
    }

    pub fn sample_id(&self) -> Option<&str> {
        self.loaded().map(|s| s.sample_id.as_str())
    }

    pub fn pending(&self) -> Option<&PendingEdit> {
        match self {
            SessionState::Editing { pending, .. } => Some(pending),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, SessionState::Editing { .. })
    }

    fn require_loaded(&self) -> Result<&LoadedSample, SessionError> {
        self.loaded().ok_or(SessionError::NoSample)
    }

    /// Loads the sample's mutation table and resets the filters. Column
    /// choices and page size carry over from the previous sample.
    pub fn select_sample(
        &self,
        manifest: &Manifest,
        sample_id: &str,
    ) -> Result<SessionState, SessionError> {
        let record = manifest.require(sample_id)?;
        let mutations = load_sample_mutations(record)?;
        if let Some(pending) = self.pending().filter(|p| !p.is_empty()) {
            tracing::warn!(
                "discarding {} uncommitted edit(s) for {}",
                pending.values().len(),
                self.sample_id().unwrap_or_default()
            );
        }
        let selection = match self.loaded() {
            Some(prev) => prev.selection.reset_filters(),
            None => FilterSelection::default(),
        };
        tracing::info!("selected sample {}", sample_id);
        Ok(SessionState::SampleLoaded(LoadedSample {
            sample_id: sample_id.to_string(),
            mutations: Rc::new(mutations),
            selection,
        }))
    }

    pub fn with_selection(&self, selection: FilterSelection) -> Result<SessionState, SessionError> {
        let sample = LoadedSample {
            selection,
            ..self.require_loaded()?.clone()
        };
        Ok(match self {
            SessionState::Editing { pending, .. } => SessionState::Editing {
                sample,
                pending: pending.clone(),
            },
            _ => SessionState::SampleLoaded(sample),
        })
    }

    pub fn edit(&self, field: &str, value: AnnotationValue) -> Result<SessionState, SessionError> {
        let sample = self.require_loaded()?.clone();
        let pending = self.pending().cloned().unwrap_or_default().with(field, value);
        Ok(SessionState::Editing { sample, pending })
    }

    /// Parses `raw` according to the field's kind, then behaves like `edit`.
    pub fn edit_raw(
        &self,
        store: &AnnotationStore,
        field: &str,
        raw: &str,
    ) -> Result<SessionState, SessionError> {
        let value = store.parse_value(field, raw)?;
        self.edit(field, value)
    }

    /// Copies the values a button is configured with into the pending edit.
    /// Nothing is copied unless every source resolves.
    pub fn autofill(
        &self,
        rules: &AutofillRules,
        button: &str,
        observed: &ObservedValues,
        store: &AnnotationStore,
    ) -> Result<SessionState, SessionError> {
        self.require_loaded()?;
        let targets = rules
            .get(button)
            .ok_or_else(|| SessionError::UnknownAutofill(button.to_string()))?;

        let mut values = Vec::with_capacity(targets.len());
        for (field, source) in targets {
            let value = match source {
                AutofillSource::Observed(component) => {
                    let raw = observed
                        .get(component)
                        .ok_or_else(|| SessionError::Unobserved(component.clone()))?;
                    store.parse_value(field, raw)?
                }
                AutofillSource::Literal(value) => value.clone(),
            };
            values.push((field.as_str(), value));
        }

        let mut next = self.clone();
        for (field, value) in values {
            next = next.edit(field, value)?;
        }
        Ok(next)
    }

    pub fn discard(&self) -> Result<SessionState, SessionError> {
        match self {
            SessionState::Editing { sample, .. } => Ok(SessionState::SampleLoaded(sample.clone())),
            _ => Err(SessionError::NotEditing),
        }
    }

    /// Writes the pending edit to the store and flushes it. On a validation
    /// failure nothing is applied; on a flush failure the store keeps the
    /// values in memory and the session stays in editing so the commit can
    /// be retried.
    pub fn commit(&self, store: &mut AnnotationStore) -> Result<SessionState, SessionError> {
        let SessionState::Editing { sample, pending } = self else {
            return Err(SessionError::NotEditing);
        };
        if !pending.is_empty() {
            store.set_many(&sample.sample_id, pending.values())?;
            store.persist()?;
        }
        Ok(SessionState::SampleLoaded(sample.clone()))
    }

    pub fn view<'s>(&'s self, default_columns: &[String]) -> Option<ProjectedView<'s>> {
        self.loaded()
            .map(|s| project(&s.mutations, default_columns, &s.selection))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/model/session.rs"]
mod tests;
