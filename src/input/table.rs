use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::input::InputError;

/// Header plus row-major string cells, as read from a TSV file.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    index: HashMap<String, usize>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            columns,
            rows,
            index,
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolves a `|`-separated list of alternative spellings to the first
    /// one present in the header.
    pub fn resolve_alias(&self, alias: &str) -> Option<usize> {
        alias
            .split('|')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .find_map(|name| self.column_index(name))
    }

    pub fn value(&self, row: usize, col: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn open_maybe_gz(path: &Path) -> Result<Box<dyn BufRead>, InputError> {
    if !path.exists() {
        return Err(InputError::MissingFile(path.to_path_buf()));
    }
    let file = File::open(path)?;
    if path.extension().is_some_and(|ext| ext == "gz") {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

pub fn read_tsv(path: &Path) -> Result<Table, InputError> {
    let reader = open_maybe_gz(path)?;
    parse_tsv(reader, &path.display().to_string())
}

pub fn parse_tsv<R: BufRead>(mut reader: R, source: &str) -> Result<Table, InputError> {
    let mut buf = String::new();
    let mut header: Option<Vec<String>> = None;
    let mut rows = Vec::new();
    let mut line_no = 0usize;

    loop {
        buf.clear();
        let read = reader.read_line(&mut buf)?;
        if read == 0 {
            break;
        }
        line_no += 1;
        let line = buf.trim_end_matches(['\n', '\r']);
        if line.trim().is_empty() {
            continue;
        }

        let Some(n_cols) = header.as_ref().map(Vec::len) else {
            if !line.starts_with('#') {
                header = Some(line.split('\t').map(|s| s.trim().to_string()).collect());
            }
            continue;
        };

        let mut row: Vec<String> = line.split('\t').map(|s| s.trim().to_string()).collect();
        if row.len() > n_cols {
            tracing::debug!(
                "{}: line {} has {} fields, header has {}; extra fields dropped",
                source,
                line_no,
                row.len(),
                n_cols
            );
        }
        row.resize(n_cols, String::new());
        rows.push(row);
    }

    let columns = header.ok_or_else(|| InputError::Parse(format!("{source} has no header")))?;
    Ok(Table::new(columns, rows))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/table.rs"]
mod tests;
