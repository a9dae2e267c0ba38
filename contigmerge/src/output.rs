//! Renders canonical paths as either a plain path listing or merged
//! FASTA records, and reports coverage diagnostics (spec §4.6).

use std::{
    collections::BTreeSet,
    io::{self, Write},
};

use crate::{
    contig::{self, ContigTable},
    dna::Alphabet,
    path::Path,
    registry::{ContigIdRegistry, RegistryError},
    splice::{self, SpliceError},
};

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Splice(#[from] SpliceError),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

fn format_path(registry: &ContigIdRegistry, ordinal: usize, path: &Path) -> Result<String, RegistryError> {
    let mut line = ordinal.to_string();
    for element in path.as_slice() {
        line.push(' ');
        line.push_str(registry.name(element.id)?);
        line.push(if element.reverse { '-' } else { '+' });
    }
    Ok(line)
}

/// Paths-only mode (spec §4.6): one `<ordinal> <elem0><sign0> ...` line
/// per canonical path.
pub fn write_paths_only(registry: &ContigIdRegistry, paths: &[Path], mut out: impl Write) -> Result<(), OutputError> {
    for (ordinal, path) in paths.iter().enumerate() {
        writeln!(out, "{}", format_path(registry, ordinal, path)?)?;
    }
    Ok(())
}

fn next_fresh_id(registry: &ContigIdRegistry) -> u64 {
    // Only numeric pre-existing names participate in the fresh-id
    // sequence; non-numeric contig names never collide with it.
    let highest = registry.names().filter_map(|name| name.parse::<u64>().ok()).max();
    highest.map_or(0, |h| h + 1)
}

/// FASTA mode (spec §4.6): splices every canonical path into a fresh
/// record, emits every input contig that didn't end up in any path
/// unchanged, and logs the coverage diagnostics.
pub fn write_fasta(
    registry: &ContigIdRegistry,
    paths: &[Path],
    contigs: &ContigTable,
    k: u32,
    alphabet: Alphabet,
    mut out: impl Write,
) -> Result<(), OutputError> {
    let mut next_id = next_fresh_id(registry);
    let mut used = BTreeSet::new();

    for path in paths {
        let (sequence, coverage) = splice::splice(path, contigs, k, alphabet)?;
        let path_text = format_path(registry, 0, path)?;
        // `format_path` always prepends an ordinal; strip it back off
        // since the FASTA comment wants just the element list.
        let path_text = path_text.splitn(2, ' ').nth(1).unwrap_or("");

        writeln!(out, ">{} {} {} {}", next_id, sequence.len(), coverage, path_text)?;
        writeln!(out, "{sequence}")?;
        next_id += 1;

        for element in path.as_slice() {
            used.insert(element.id);
        }
    }

    let mut unused: Vec<_> = contigs.iter().filter(|(key, _)| !used.contains(key)).collect();
    unused.sort_by_key(|(key, _)| *key);
    for (_, contig) in unused {
        writeln!(out, ">{} {}", contig.name, contig.sequence.len())?;
        writeln!(out, "{}", contig.sequence)?;
    }

    report_coverage(contigs, &used, k);

    Ok(())
}

/// Logs the minimum per-k-mer coverage across all input contigs and
/// across only those used in a canonical path, suggesting a raised
/// threshold when the two diverge (spec §4.6).
fn report_coverage(contigs: &ContigTable, used: &BTreeSet<crate::registry::ContigKey>, k: u32) {
    let all_min = contigs
        .iter()
        .filter_map(|(_, c)| contig::per_kmer_coverage(c, k))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));
    let used_min = contigs
        .iter()
        .filter(|(key, _)| used.contains(key))
        .filter_map(|(_, c)| contig::per_kmer_coverage(c, k))
        .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.min(v))));

    match (all_min, used_min) {
        (Some(all_min), Some(used_min)) => {
            log::info!("minimum per-k-mer coverage across all input contigs: {all_min}");
            log::info!("minimum per-k-mer coverage across merged contigs: {used_min}");
            if all_min < used_min {
                log::warn!("consider raising the coverage threshold to {used_min}");
            }
        }
        (Some(all_min), None) => {
            log::info!("minimum per-k-mer coverage across all input contigs: {all_min}");
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        contig::Contig,
        parser,
        path::OrientedContig,
        registry::{test_support::key, ContigIdRegistry},
    };

    #[test]
    fn paths_only_emits_ordinal_and_signed_elements() {
        let mut registry = ContigIdRegistry::new();
        let a = registry.intern("a").unwrap();
        let b = registry.intern("b").unwrap();
        let path = Path::new(vec![
            OrientedContig { id: a, reverse: false },
            OrientedContig { id: b, reverse: true },
        ]);

        let mut buf = Vec::new();
        write_paths_only(&registry, &[path], &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "0 a+ b-\n");
    }

    #[test]
    fn fasta_mode_emits_spliced_record_and_unused_contig() {
        let mut registry = ContigIdRegistry::new();
        let mut store = crate::path::PathStore::new();
        parser::parse_all(&mut registry, &mut store, "@0+ -> 1+\n").unwrap();

        let mut contigs = ContigTable::new();
        contigs.insert(key(0), Contig { name: "0".into(), sequence: "AACGT".into(), coverage: 10 });
        contigs.insert(key(1), Contig { name: "1".into(), sequence: "GTTTA".into(), coverage: 20 });
        contigs.insert(key(2), Contig { name: "2".into(), sequence: "CCCCC".into(), coverage: 5 });

        let path = store.get(key(0)).unwrap().clone();
        let mut buf = Vec::new();
        write_fasta(&registry, &[path], &contigs, 3, Alphabet::Nucleotide, &mut buf).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with(">2 8 30 0+ 1+\nAACGTTTA\n"));
        assert!(text.contains(">2 5\nCCCCC\n"));
    }
}
