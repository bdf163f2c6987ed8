use std::io::{BufRead, Write};

use thiserror::Error;

use crate::config::ReviewConfig;
use crate::input::Manifest;
use crate::model::session::{ObservedValues, SessionError, SessionState};
use crate::model::store::{AnnotationStore, StoreError};
use crate::pipeline::project::{FilterSelection, dropdown_options};
use crate::report::text::{
    render_annotations_text, render_fields_text, render_options_text, render_pending_text,
    render_view_text,
};

pub const HELP: &str = "\
Commands:
  samples                      list sample ids
  select <id> | next | prev    load a sample
  view | options               show the table page | dropdown choices
  columns <a,b,...>            extra columns after the defaults
  gene|class|cluster [v ...]   filter values (none clears the filter)
  clear                        clear all filters
  page <n> | size <n>          page number (1-based) | rows per page
  fields                       list annotation fields
  observe <component> <value>  record a displayed UI value
  autofill <button>            copy configured values into the edit
  edit <field> <value>         stage an annotation value
  pending | discard | commit   inspect, drop or save staged edits
  show                         stored annotations for the sample
  save                         flush the annotation store again
  help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Samples,
    Select(String),
    Next,
    Prev,
    View,
    Options,
    Columns(Vec<String>),
    Genes(Vec<String>),
    Classifications(Vec<String>),
    Clusters(Vec<String>),
    Clear,
    Page(usize),
    Size(usize),
    Fields,
    Observe { component: String, value: String },
    Autofill(String),
    Edit { field: String, value: String },
    Pending,
    Discard,
    Commit,
    Show,
    Save,
    Quit,
}

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("unknown command '{0}' (try 'help')")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
}

fn split_values(rest: &str) -> Vec<String> {
    rest.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn split_pair(rest: &str) -> Option<(String, String)> {
    let (key, value) = rest.trim().split_once(char::is_whitespace)?;
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}

/// Blank lines and `#` comments parse to `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ReviewError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r.trim()),
        None => (line, ""),
    };
    let number = |usage: &'static str| {
        rest.parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or(ReviewError::Usage(usage))
    };

    let cmd = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "samples" => Command::Samples,
        "select" if !rest.is_empty() => Command::Select(rest.to_string()),
        "select" => return Err(ReviewError::Usage("select <sample_id>")),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "view" => Command::View,
        "options" => Command::Options,
        "columns" => Command::Columns(split_values(rest)),
        "gene" | "genes" => Command::Genes(split_values(rest)),
        "class" | "classification" => Command::Classifications(split_values(rest)),
        "cluster" | "clusters" => Command::Clusters(split_values(rest)),
        "clear" => Command::Clear,
        "page" => Command::Page(number("page <n>")? - 1),
        "size" => Command::Size(number("size <n>")?),
        "fields" => Command::Fields,
        "observe" => {
            let (component, value) =
                split_pair(rest).ok_or(ReviewError::Usage("observe <component> <value>"))?;
            Command::Observe { component, value }
        }
        "autofill" if !rest.is_empty() => Command::Autofill(rest.to_string()),
        "autofill" => return Err(ReviewError::Usage("autofill <button>")),
        "edit" | "set" => {
            let (field, value) =
                split_pair(rest).ok_or(ReviewError::Usage("edit <field> <value>"))?;
            Command::Edit { field, value }
        }
        "pending" => Command::Pending,
        "discard" => Command::Discard,
        "commit" => Command::Commit,
        "show" => Command::Show,
        "save" => Command::Save,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ReviewError::UnknownCommand(other.to_string())),
    };
    Ok(Some(cmd))
}

/// Interactive driver around `SessionState`. Each command maps to one state
/// transition; a failed transition leaves the current state in place.
pub struct ReviewLoop<'a> {
    config: &'a ReviewConfig,
    manifest: &'a Manifest,
    store: AnnotationStore,
    state: SessionState,
    observed: ObservedValues,
}

impl<'a> ReviewLoop<'a> {
    pub fn new(config: &'a ReviewConfig, manifest: &'a Manifest, store: AnnotationStore) -> Self {
        Self {
            config,
            manifest,
            store,
            state: SessionState::NoSample,
            observed: ObservedValues::new(),
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &AnnotationStore {
        &self.store
    }

    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> std::io::Result<()> {
        writeln!(
            out,
            "{} samples in manifest; type 'help' for commands",
            self.manifest.len()
        )?;
        for line in input.lines() {
            let line = line?;
            match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(cmd)) => match self.handle(cmd) {
                    Ok(text) => write!(out, "{text}")?,
                    Err(err) => writeln!(out, "error: {err}")?,
                },
                Err(err) => writeln!(out, "error: {err}")?,
            }
        }
        if self.state.is_editing() {
            tracing::warn!(
                "review ended with {} uncommitted edit(s)",
                self.state.pending().map_or(0, |p| p.values().len())
            );
        }
        Ok(())
    }

    fn update_selection(
        &mut self,
        change: impl FnOnce(&mut FilterSelection),
    ) -> Result<String, ReviewError> {
        let loaded = self.state.loaded().ok_or(SessionError::NoSample)?;
        let mut selection = loaded.selection.clone();
        change(&mut selection);
        self.state = self.state.with_selection(selection)?;
        self.render_view()
    }

    fn select(&mut self, sample_id: &str) -> Result<String, ReviewError> {
        let first = self.state.loaded().is_none();
        let mut next = self.state.select_sample(self.manifest, sample_id)?;
        if first {
            let mut selection = FilterSelection::default();
            selection.page_size = self.config.page_size;
            next = next.with_selection(selection)?;
        }
        self.state = next;
        self.render_view()
    }

    fn step(&mut self, forward: bool) -> Result<String, ReviewError> {
        if self.manifest.is_empty() {
            return Err(ReviewError::Usage("manifest has no samples"));
        }
        let last = self.manifest.len() - 1;
        let target = match self.state.sample_id().and_then(|id| self.manifest.position(id)) {
            Some(pos) if forward => (pos + 1).min(last),
            Some(pos) => pos.saturating_sub(1),
            None => 0,
        };
        let id = self.manifest.samples[target].id.clone();
        self.select(&id)
    }

    pub fn render_view(&self) -> Result<String, ReviewError> {
        let loaded = self.state.loaded().ok_or(SessionError::NoSample)?;
        let view = self
            .state
            .view(&self.config.default_columns)
            .ok_or(SessionError::NoSample)?;
        let page = view.page(loaded.selection.page, loaded.selection.page_size);
        Ok(render_view_text(&loaded.sample_id, &view, &page))
    }

    pub fn handle(&mut self, cmd: Command) -> Result<String, ReviewError> {
        match cmd {
            Command::Help => Ok(format!("{HELP}\n")),
            Command::Samples => {
                let current = self.state.sample_id();
                let mut out = String::new();
                for id in self.manifest.ids() {
                    let mark = if Some(id) == current { "*" } else { " " };
                    let done = if self.store.get(id).is_some_and(|r| !r.is_empty()) {
                        " (annotated)"
                    } else {
                        ""
                    };
                    out.push_str(&format!("{mark} {id}{done}\n"));
                }
                Ok(out)
            }
            Command::Select(id) => self.select(&id),
            Command::Next => self.step(true),
            Command::Prev => self.step(false),
            Command::View => self.render_view(),
            Command::Options => {
                let loaded = self.state.loaded().ok_or(SessionError::NoSample)?;
                Ok(render_options_text(&dropdown_options(&loaded.mutations)))
            }
            Command::Columns(columns) => self.update_selection(|s| s.columns = columns),
            Command::Genes(values) => self.update_selection(|s| {
                s.genes = values.into_iter().collect();
                s.page = 0;
            }),
            Command::Classifications(values) => self.update_selection(|s| {
                s.classifications = values.into_iter().collect();
                s.page = 0;
            }),
            Command::Clusters(values) => self.update_selection(|s| {
                s.clusters = values.into_iter().collect();
                s.page = 0;
            }),
            Command::Clear => self.update_selection(|s| *s = s.reset_filters()),
            Command::Page(page) => self.update_selection(|s| s.page = page),
            Command::Size(size) => self.update_selection(|s| {
                s.page_size = size;
                s.page = 0;
            }),
            Command::Fields => Ok(render_fields_text(&self.store)),
            Command::Observe { component, value } => {
                let text = format!("observed {component} = {value}\n");
                self.observed.insert(component, value);
                Ok(text)
            }
            Command::Autofill(button) => {
                self.state = self.state.autofill(
                    &self.config.autofill,
                    &button,
                    &self.observed,
                    &self.store,
                )?;
                Ok(self.render_pending())
            }
            Command::Edit { field, value } => {
                self.state = self.state.edit_raw(&self.store, &field, &value)?;
                Ok(self.render_pending())
            }
            Command::Pending => Ok(self.render_pending()),
            Command::Discard => {
                self.state = self.state.discard()?;
                Ok("pending edits discarded\n".to_string())
            }
            Command::Commit => {
                self.state = self.state.commit(&mut self.store)?;
                let id = self.state.sample_id().unwrap_or_default();
                Ok(format!(
                    "committed; {}",
                    render_annotations_text(&self.store, Some(id))
                ))
            }
            Command::Show => {
                let id = self.state.sample_id().ok_or(SessionError::NoSample)?;
                Ok(render_annotations_text(&self.store, Some(id)))
            }
            Command::Save => {
                self.store.persist()?;
                Ok(format!("saved {}\n", self.store.path().display()))
            }
            Command::Quit => Ok(String::new()),
        }
    }

    fn render_pending(&self) -> String {
        match self.state.pending() {
            Some(pending) => render_pending_text(pending),
            None => render_pending_text(&Default::default()),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/review/mod.rs"]
mod tests;
