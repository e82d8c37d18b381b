use thiserror::Error;

use aiv_core::CoreError;

#[derive(Error, Debug, PartialEq)]
pub enum MergeError {
    #[error("Protein-DNA interaction has no chromosome: {0}")]
    Chromosome(#[from] CoreError),

    #[error("Unknown node: {0}")]
    UnknownNode(String),

    #[error("Unknown edge: {0}")]
    UnknownEdge(String),
}

pub type MergeResult<T> = std::result::Result<T, MergeError>;
