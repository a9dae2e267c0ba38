//! Top-level error type returned by the library entry points (spec §7).

use crate::{
    consistency::ConsistencyError, fasta_io::ContigReadError, output::OutputError, parser::PathParseError,
    registry::RegistryError,
};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("malformed path file: {0}")]
    PathParse(#[from] PathParseError),
    #[error("internal invariant violated while linking paths: {0}")]
    Consistency(#[from] ConsistencyError),
    #[error(transparent)]
    ContigRead(#[from] ContigReadError),
    #[error(transparent)]
    Output(#[from] OutputError),
    #[error("path references contig {0:?}, which was never seen in the contig input")]
    UnknownContig(String),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
