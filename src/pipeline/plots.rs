use serde::Serialize;

use crate::input::maf::{MafField, MutationTable};
use crate::input::segments::Segment;

/// hg19 chromosome lengths, 1..22 then X (23) and Y (24).
pub const CHROM_SIZES: [u64; 24] = [
    249_250_621,
    243_199_373,
    198_022_430,
    191_154_276,
    180_915_260,
    171_115_067,
    159_138_663,
    146_364_022,
    141_213_431,
    135_534_747,
    135_006_516,
    133_851_895,
    115_169_878,
    107_349_540,
    102_531_392,
    90_354_753,
    81_195_210,
    78_077_248,
    59_128_983,
    63_025_520,
    48_129_895,
    51_304_566,
    156_040_895,
    57_227_415,
];

pub const CNP_HIST_MAX_MU: f64 = 2.0;
pub const CNP_HIST_STEP: f64 = 0.05;

/// Maps `1`..`24`, `X`, `Y`, with or without a `chr` prefix, to 1..=24.
pub fn chromosome_number(raw: &str) -> Option<usize> {
    let trimmed = raw.trim();
    let name = trimmed
        .strip_prefix("chr")
        .or_else(|| trimmed.strip_prefix("Chr"))
        .or_else(|| trimmed.strip_prefix("CHR"))
        .unwrap_or(trimmed);
    let n = match name {
        "X" | "x" => 23,
        "Y" | "y" => 24,
        other => other.parse::<usize>().ok()?,
    };
    (1..=CHROM_SIZES.len()).contains(&n).then_some(n)
}

pub fn genome_offset(chromosome: usize) -> u64 {
    CHROM_SIZES[..chromosome.saturating_sub(1).min(CHROM_SIZES.len())]
        .iter()
        .sum()
}

pub fn genome_position(chromosome: &str, position: u64) -> Option<u64> {
    chromosome_number(chromosome).and_then(|n| genome_offset(n).checked_add(position))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlleleFractionPoint {
    pub row: usize,
    pub gene: String,
    pub chromosome: String,
    pub position: u64,
    pub genome_position: u64,
    pub tumor_f: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,
}

/// Tumor allele fraction per mutation along the concatenated genome. Rows
/// with zero depth, unknown chromosome or unparseable counts are skipped.
pub fn allele_fraction_points(maf: &MutationTable, rows: &[usize]) -> Vec<AlleleFractionPoint> {
    let mut points = Vec::with_capacity(rows.len());
    let mut skipped = 0usize;
    for &row in rows {
        match allele_fraction_point(maf, row) {
            Some(p) => points.push(p),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::debug!(
            "{}: {} mutations not plotted (missing coordinates or zero depth)",
            maf.path.display(),
            skipped
        );
    }
    points
}

fn allele_fraction_point(maf: &MutationTable, row: usize) -> Option<AlleleFractionPoint> {
    let chromosome = maf.attribute(row, MafField::Chromosome)?;
    let position = maf.count(row, MafField::Start)?;
    let alt = maf.count(row, MafField::AltCount)?;
    let reference = maf.count(row, MafField::RefCount)?;
    let depth = alt.checked_add(reference)?;
    if depth == 0 {
        return None;
    }
    Some(AlleleFractionPoint {
        row,
        gene: maf
            .attribute(row, MafField::Gene)
            .unwrap_or_default()
            .to_string(),
        chromosome: chromosome.to_string(),
        position,
        genome_position: genome_position(chromosome, position)?,
        tumor_f: alt as f64 / depth as f64,
        cluster: maf
            .attribute(row, MafField::Cluster)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSegment {
    pub chromosome: String,
    pub genome_start: u64,
    pub genome_end: u64,
    pub mu_major: f64,
    pub mu_minor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma_major: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sigma_minor: Option<f64>,
}

pub fn copy_number_profile(segments: &[Segment]) -> Vec<ProfileSegment> {
    segments
        .iter()
        .filter_map(|seg| {
            let offset = genome_offset(chromosome_number(&seg.chromosome)?);
            Some(ProfileSegment {
                chromosome: seg.chromosome.clone(),
                genome_start: offset.checked_add(seg.start)?,
                genome_end: offset.checked_add(seg.end)?,
                mu_major: seg.mu_major,
                mu_minor: seg.mu_minor,
                sigma_major: seg.sigma_major,
                sigma_minor: seg.sigma_minor,
            })
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub mu_bin: f64,
    pub length: u64,
}

/// Total segment length per allelic copy-ratio bin. Each segment counts once
/// for its major and once for its minor allele; values at or past `max_mu`
/// land in the last bin, negative ones in the first.
pub fn copy_number_histogram(segments: &[Segment], max_mu: f64, step: f64) -> Vec<HistogramBin> {
    let n_bins = ((max_mu / step).round() as usize) + 1;
    let mut bins: Vec<HistogramBin> = (0..n_bins)
        .map(|i| HistogramBin {
            mu_bin: round_bin(i as f64 * step),
            length: 0,
        })
        .collect();
    let bin_of = |mu: f64| -> usize {
        if mu.is_nan() || mu <= 0.0 {
            return 0;
        }
        ((mu / step + 1e-9).floor() as usize).min(n_bins - 1)
    };
    for seg in segments {
        bins[bin_of(seg.mu_major)].length += seg.length;
        bins[bin_of(seg.mu_minor)].length += seg.length;
    }
    bins
}

fn round_bin(v: f64) -> f64 {
    (v * 1e6).round() / 1e6
}

#[cfg(test)]
#[path = "../../tests/src_inline/pipeline/plots.rs"]
mod tests;
