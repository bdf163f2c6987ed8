use std::path::PathBuf;

use thiserror::Error;

pub mod maf;
pub mod manifest;
pub mod segments;
pub mod table;

pub use maf::MutationTable;
pub use manifest::{Manifest, SampleRecord};
pub use segments::SegmentTable;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("missing file: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("missing column '{column}' in {}", .path.display())]
    MissingColumn { column: String, path: PathBuf },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("duplicate sample id in manifest: {0}")]
    DuplicateSample(String),
    #[error("unknown sample: {0}")]
    UnknownSample(String),
    #[error("sample {sample} has no {kind} file")]
    NoFile { sample: String, kind: &'static str },
}

/// Loads the mutation table referenced by a sample record.
pub fn load_sample_mutations(sample: &SampleRecord) -> Result<MutationTable, InputError> {
    let path = sample.maf_path.as_ref().ok_or_else(|| InputError::NoFile {
        sample: sample.id.clone(),
        kind: "mutation",
    })?;
    MutationTable::load(path)
}

pub fn load_sample_segments(sample: &SampleRecord) -> Result<SegmentTable, InputError> {
    let path = sample
        .segment_path
        .as_ref()
        .ok_or_else(|| InputError::NoFile {
            sample: sample.id.clone(),
            kind: "segment",
        })?;
    SegmentTable::load(path)
}
