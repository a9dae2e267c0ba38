//! Reads the input contig table from FASTA (spec §6): one record per
//! contig, name taken from the definition line, coverage parsed out of
//! the description if present. Follows the same
//! `noodles::fasta::Reader` + definition-stripping idiom used
//! elsewhere in the workspace for plain (non-indexed) FASTA reads.

use std::io::BufRead;

use crate::contig::Contig;

#[derive(Debug, thiserror::Error)]
pub enum ContigReadError {
    #[error("fasta record is missing a name")]
    MissingName,
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Reads every record of `reader` into a flat contig list, in file
/// order. Coverage is parsed from the first whitespace-separated token
/// of the description, defaulting to 0 when absent or unparseable —
/// this is a convenience for test fixtures and hand-edited inputs, not
/// a format requirement.
pub fn read_contigs(reader: impl BufRead) -> Result<Vec<Contig>, ContigReadError> {
    let mut fasta = noodles::fasta::Reader::new(reader);
    let mut contigs = Vec::new();

    for result in fasta.records() {
        let record = result?;
        let definition = record.definition().to_string();
        let definition = definition.strip_prefix('>').unwrap_or(&definition);
        let (name, description) = definition.split_once(' ').unwrap_or((definition, ""));
        if name.is_empty() {
            return Err(ContigReadError::MissingName);
        }

        let coverage = description
            .split_whitespace()
            .next()
            .and_then(|tok| tok.parse::<u32>().ok())
            .unwrap_or(0);

        let sequence = String::from_utf8_lossy(record.sequence().as_ref()).into_owned();

        contigs.push(Contig { name: name.to_owned(), sequence, coverage });
    }

    Ok(contigs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_name_sequence_and_coverage() {
        let fasta = b">a 12 extra\nACGTACGT\n>b\nTTTT\n".as_slice();
        let contigs = read_contigs(fasta).unwrap();
        assert_eq!(contigs.len(), 2);
        assert_eq!(contigs[0].name, "a");
        assert_eq!(contigs[0].sequence, "ACGTACGT");
        assert_eq!(contigs[0].coverage, 12);
        assert_eq!(contigs[1].name, "b");
        assert_eq!(contigs[1].coverage, 0);
    }
}
