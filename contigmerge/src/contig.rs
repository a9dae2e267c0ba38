use std::collections::HashMap;

use crate::registry::ContigKey;

/// An immutable assembled sequence, created once at input (spec §3).
#[derive(Debug, Clone, PartialEq, Eq)]
#[derive(serde::Serialize, serde::Deserialize)]
pub struct Contig {
    pub name: String,
    pub sequence: String,
    pub coverage: u32,
}

impl AsRef<str> for Contig {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// Minimal adoption of the workspace's generic contig interface, so a
/// [`Contig`] can be handed to anything written against it.
impl biocore::genome::Contig for Contig {
    fn size(&self) -> u64 {
        self.sequence.len() as u64
    }
}

/// Per-k-mer coverage, `coverage / (length - k + 1)` (spec §4.6).
/// `None` when the contig is too short for the given k-mer size.
pub fn per_kmer_coverage(contig: &Contig, k: u32) -> Option<f64> {
    let overlap = u64::from(k).checked_sub(1)?;
    let len = contig.sequence.len() as u64;
    let denom = len.checked_sub(overlap)?;
    if denom == 0 {
        return None;
    }
    Some(f64::from(contig.coverage) / denom as f64)
}

/// The in-memory contig table the splicer and output formatter read from.
#[derive(Debug, Default)]
pub struct ContigTable {
    contigs: HashMap<ContigKey, Contig>,
}

impl ContigTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: ContigKey, contig: Contig) {
        self.contigs.insert(key, contig);
    }

    pub fn get(&self, key: ContigKey) -> Option<&Contig> {
        self.contigs.get(&key)
    }

    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContigKey, &Contig)> {
        self.contigs.iter().map(|(&k, c)| (k, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contig(coverage: u32, len: usize) -> Contig {
        Contig {
            name: "c".to_owned(),
            sequence: "A".repeat(len),
            coverage,
        }
    }

    #[test]
    fn per_kmer_coverage_excludes_too_short_contigs() {
        assert_eq!(per_kmer_coverage(&contig(10, 2), 3), None);
    }

    #[test]
    fn per_kmer_coverage_divides_by_kmer_count() {
        // length 10, k=3 => 8 k-mers.
        assert_eq!(per_kmer_coverage(&contig(80, 10), 3), Some(10.0));
    }
}
