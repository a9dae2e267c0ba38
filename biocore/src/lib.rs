#![feature(ascii_char)]
#![feature(iterator_try_collect)]
#![feature(map_try_insert)]

pub mod aminoacid;
pub mod bcf;
pub mod dna;
pub mod fasta;
pub mod genome;
pub mod location;
pub mod mutation;
pub mod rna;
pub mod sequence;
pub mod vcf;
