use std::path::{Path, PathBuf};

use crate::input::InputError;
use crate::input::table::{Table, read_tsv};

pub const HUGO_SYMBOL: &str = "Hugo_Symbol";
pub const CHROMOSOME: &str = "Chromosome";
pub const START_POSITION: &str = "Start_position|Start_Position";
pub const END_POSITION: &str = "End_position|End_Position";
pub const PROTEIN_CHANGE: &str = "Protein_change|Protein_Change";
pub const VARIANT_CLASSIFICATION: &str = "Variant_Classification";
pub const T_REF_COUNT: &str = "t_ref_count|t_ref_count_pre_forecall";
pub const T_ALT_COUNT: &str = "t_alt_count|t_alt_count_pre_forecall";
pub const N_REF_COUNT: &str = "n_ref_count";
pub const N_ALT_COUNT: &str = "n_alt_count";
pub const CLUSTER_ASSIGNMENT: &str = "Cluster_Assignment";

pub const DEFAULT_COLUMNS: [&str; 10] = [
    HUGO_SYMBOL,
    CHROMOSOME,
    START_POSITION,
    END_POSITION,
    PROTEIN_CHANGE,
    VARIANT_CLASSIFICATION,
    T_REF_COUNT,
    T_ALT_COUNT,
    N_REF_COUNT,
    N_ALT_COUNT,
];

/// Row attributes the pipeline and plots address by meaning rather than by
/// header spelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MafField {
    Gene,
    Chromosome,
    Start,
    Classification,
    RefCount,
    AltCount,
    Cluster,
}

impl MafField {
    pub const REQUIRED: [MafField; 6] = [
        MafField::Gene,
        MafField::Chromosome,
        MafField::Start,
        MafField::Classification,
        MafField::RefCount,
        MafField::AltCount,
    ];

    pub fn alias(self) -> &'static str {
        match self {
            MafField::Gene => HUGO_SYMBOL,
            MafField::Chromosome => CHROMOSOME,
            MafField::Start => START_POSITION,
            MafField::Classification => VARIANT_CLASSIFICATION,
            MafField::RefCount => T_REF_COUNT,
            MafField::AltCount => T_ALT_COUNT,
            MafField::Cluster => CLUSTER_ASSIGNMENT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MutationTable {
    pub path: PathBuf,
    pub table: Table,
    fields: [Option<usize>; 7],
}

impl MutationTable {
    pub fn load(path: &Path) -> Result<Self, InputError> {
        let table = read_tsv(path)?;
        let maf = Self::from_table(path, table);
        tracing::info!(
            "loaded mutation table {} ({} rows, {} columns)",
            path.display(),
            maf.table.n_rows(),
            maf.table.columns().len()
        );
        Ok(maf)
    }

    pub fn from_table(path: &Path, table: Table) -> Self {
        let mut fields = [None; 7];
        for field in [
            MafField::Gene,
            MafField::Chromosome,
            MafField::Start,
            MafField::Classification,
            MafField::RefCount,
            MafField::AltCount,
            MafField::Cluster,
        ] {
            fields[field as usize] = table.resolve_alias(field.alias());
        }
        for field in MafField::REQUIRED {
            if fields[field as usize].is_none() {
                tracing::warn!(
                    "mutation table {} lacks expected column {}",
                    path.display(),
                    field.alias()
                );
            }
        }
        Self {
            path: path.to_path_buf(),
            table,
            fields,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.table.n_rows()
    }

    pub fn column(&self, field: MafField) -> Option<usize> {
        self.fields[field as usize]
    }

    pub fn attribute(&self, row: usize, field: MafField) -> Option<&str> {
        self.column(field).map(|col| self.table.value(row, col))
    }

    pub fn count(&self, row: usize, field: MafField) -> Option<u64> {
        let raw = self.attribute(row, field)?;
        raw.parse::<u64>()
            .ok()
            .or_else(|| raw.parse::<f64>().ok().filter(|v| *v >= 0.0).map(|v| v as u64))
    }
}

#[cfg(test)]
#[path = "../../tests/src_inline/input/maf.rs"]
mod tests;
