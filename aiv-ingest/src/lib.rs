//! # Ingestion of interaction and localization sources.
//!
//! This crate turns raw source payloads into normalized
//! [`InteractionRecord`](aiv_core::models::InteractionRecord)s:
//!
//! - [`primary`]: the first-party interactions API (JSON keyed by query gene),
//! - [`exchange`]: the two PSICQUIC exchange feeds (MITAB-like text),
//! - [`localization`]: subcellular localization scores,
//! - [`fetch`]: concurrent fetching of all of the above with per-source failure reporting.
//!
pub mod error;
pub mod exchange;
pub mod fetch;
pub mod localization;
pub mod primary;

// re-expose core functions
pub use error::*;
pub use exchange::{ExchangeLine, ExchangeParser, Token};
pub use fetch::{
    FetchFailure, FetchOutcome, HttpFetcher, SourceFetcher, SourceKind, SourceRequest,
    SourceResponse, fetch_all,
};
pub use localization::{GeneLocalization, LocalizationResponse, parse_localizations};
pub use primary::{normalize_primary, normalize_primary_response};
