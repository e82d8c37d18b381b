use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("Not a decimal number: {0}")]
    InvalidDecimal(String),

    #[error("Exponent out of range in decimal number: {0}")]
    ExponentOutOfRange(String),

    #[error("Can't derive a chromosome from gene id: {0}")]
    InvalidChromosome(String),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
