//! # aiv-layout
//!
//! Everything between a merged graph and something drawable:
//!
//! - [`localization`]: score normalization, primary locality and band order,
//! - [`donut`]: proportional ring segments per node,
//! - [`layout`]: the layered, band-per-locality placement,
//! - [`palette`]: locality colors.
pub mod donut;
pub mod errors;
pub mod layout;
pub mod localization;
pub mod palette;

pub use donut::{CIRCUMFERENCE, DonutEncoder, DonutEncoding, DonutSegment, ROTATION_OFFSET};
pub use errors::{LayoutError, LayoutResult};
pub use layout::{BandExtent, LayeredLayout, LayoutConfig};
pub use localization::{
    CANONICAL_LOCALITIES, LocalityBand, LocalizationAggregator, normalize_scores,
    primary_locality,
};
pub use palette::LocalityPalette;
