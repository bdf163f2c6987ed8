use std::path::{Path, PathBuf};

use crate::input::InputError;
use crate::input::table::{Table, read_tsv};

const SEG_CHROMOSOME: &str = "Chromosome|chromosome|Chr";
const SEG_START: &str = "Start.bp|Start|start";
const SEG_END: &str = "End.bp|End|end";
const SEG_MU_MAJOR: &str = "mu.major";
const SEG_MU_MINOR: &str = "mu.minor";
const SEG_SIGMA_MAJOR: &str = "sigma.major";
const SEG_SIGMA_MINOR: &str = "sigma.minor";
const SEG_LENGTH: &str = "length";

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub chromosome: String,
    pub start: u64,
    pub end: u64,
    pub length: u64,
    pub mu_major: f64,
    pub mu_minor: f64,
    pub sigma_major: Option<f64>,
    pub sigma_minor: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct SegmentTable {
    pub path: PathBuf,
    pub segments: Vec<Segment>,
}

impl SegmentTable {
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let table = read_tsv(path)?;
        let segments = Self::from_table(path, &table);
        tracing::info!(
            "loaded segment table {} ({} segments)",
            path.display(),
            segments.segments.len()
        );
        Ok(segments)
    }

    /// A table missing any required column yields no segments.
    pub fn from_table(path: &Path, table: &Table) -> Self {
        let require = |alias: &str| {
            let col = table.resolve_alias(alias);
            if col.is_none() {
                tracing::warn!("segment table {} lacks column {}", path.display(), alias);
            }
            col
        };
        let (Some(chromosome), Some(start), Some(end), Some(mu_major), Some(mu_minor)) = (
            require(SEG_CHROMOSOME),
            require(SEG_START),
            require(SEG_END),
            require(SEG_MU_MAJOR),
            require(SEG_MU_MINOR),
        ) else {
            return Self {
                path: path.to_path_buf(),
                segments: Vec::new(),
            };
        };
        let cols = SegmentColumns {
            chromosome,
            start,
            end,
            mu_major,
            mu_minor,
            sigma_major: table.resolve_alias(SEG_SIGMA_MAJOR),
            sigma_minor: table.resolve_alias(SEG_SIGMA_MINOR),
            length: table.resolve_alias(SEG_LENGTH),
        };

        let mut segments = Vec::with_capacity(table.n_rows());
        let mut skipped = 0usize;
        for row in 0..table.n_rows() {
            match parse_segment(table, row, &cols) {
                Some(segment) => segments.push(segment),
                None => skipped += 1,
            }
        }
        if skipped > 0 {
            tracing::warn!(
                "{}: skipped {} unparseable segment rows",
                path.display(),
                skipped
            );
        }

        Self {
            path: path.to_path_buf(),
            segments,
        }
    }
}

struct SegmentColumns {
    chromosome: usize,
    start: usize,
    end: usize,
    mu_major: usize,
    mu_minor: usize,
    sigma_major: Option<usize>,
    sigma_minor: Option<usize>,
    length: Option<usize>,
}

fn parse_segment(table: &Table, row: usize, cols: &SegmentColumns) -> Option<Segment> {
    let start = parse_coord(table.value(row, cols.start))?;
    let end = parse_coord(table.value(row, cols.end))?;
    let mu_major = table.value(row, cols.mu_major).parse::<f64>().ok()?;
    let mu_minor = table.value(row, cols.mu_minor).parse::<f64>().ok()?;
    let length = match cols.length {
        Some(col) => parse_coord(table.value(row, col))?,
        None => end.saturating_sub(start) + 1,
    };
    let sigma = |col: Option<usize>| col.and_then(|c| table.value(row, c).parse::<f64>().ok());
    Some(Segment {
        chromosome: table.value(row, cols.chromosome).to_string(),
        start,
        end,
        length,
        mu_major,
        mu_minor,
        sigma_major: sigma(cols.sigma_major),
        sigma_minor: sigma(cols.sigma_minor),
    })
}

fn parse_coord(raw: &str) -> Option<u64> {
    raw.parse::<u64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/segments.rs"]
mod tests;
