//! Sequence alphabet handling.
//!
//! The splicer is oblivious to whether a contig is nucleotide or
//! color-space DNA beyond literal string equality (spec §3), so unlike
//! `biocore::dna`'s typed `DnaBase` enum, sequences here stay plain
//! ASCII strings and [`Alphabet`] only changes how reversal
//! complements (or doesn't).

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
pub enum Alphabet {
    Nucleotide,
    ColorSpace,
}

impl Alphabet {
    /// Inferred from the first symbol of the first contig (spec §6): a
    /// digit means color space, anything else means nucleotide.
    pub fn infer(first_symbol: u8) -> Self {
        if first_symbol.is_ascii_digit() {
            Alphabet::ColorSpace
        } else {
            Alphabet::Nucleotide
        }
    }
}

/// Reverses `seq` and, for nucleotide sequences, complements each base.
/// Case is preserved; color-space digits reverse with no complementing.
pub fn reverse_complement(seq: &str, alphabet: Alphabet) -> String {
    match alphabet {
        Alphabet::Nucleotide => seq.chars().rev().map(complement_base).collect(),
        Alphabet::ColorSpace => seq.chars().rev().collect(),
    }
}

fn complement_base(c: char) -> char {
    match c {
        'A' => 'T',
        'T' => 'A',
        'C' => 'G',
        'G' => 'C',
        'N' => 'N',
        'a' => 't',
        't' => 'a',
        'c' => 'g',
        'g' => 'c',
        'n' => 'n',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nucleotide_complement_preserves_case() {
        assert_eq!(reverse_complement("ACGTacgt", Alphabet::Nucleotide), "acgtACGT");
    }

    #[test]
    fn color_space_only_reverses() {
        assert_eq!(reverse_complement("0123", Alphabet::ColorSpace), "3210");
    }

    #[test]
    fn reverse_complement_is_involutive() {
        for (seq, alphabet) in [("ACGTN", Alphabet::Nucleotide), ("0123", Alphabet::ColorSpace)] {
            let twice = reverse_complement(&reverse_complement(seq, alphabet), alphabet);
            assert_eq!(twice, seq);
        }
    }

    #[test]
    fn infers_alphabet_from_first_symbol() {
        assert_eq!(Alphabet::infer(b'0'), Alphabet::ColorSpace);
        assert_eq!(Alphabet::infer(b'A'), Alphabet::Nucleotide);
    }
}
