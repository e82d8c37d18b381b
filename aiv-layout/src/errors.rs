use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum LayoutError {
    #[error("Container height {height} leaves no room for {bands} bands (needs more than {reserved})")]
    ContainerTooSmall {
        height: f64,
        reserved: f64,
        bands: usize,
    },

    #[error("Layout dimension `{name}` must be finite and non-negative, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

pub type LayoutResult<T> = std::result::Result<T, LayoutError>;
