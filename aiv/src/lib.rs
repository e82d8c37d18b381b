//! # aiv
//!
//! Interaction graph sessions for Arabidopsis genes. A query fetches
//! protein-protein and protein-DNA interactions from the primary interactions
//! API and two PSICQUIC exchange feeds, merges them into one deduplicated
//! graph, enriches it with subcellular localization scores and lays the
//! nodes out in one band per locality.
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use aiv::pipeline::run_query;
//! use aiv::{AivConfig, Session};
//! use aiv::ingest::HttpFetcher;
//!
//! # async fn query() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AivConfig::default();
//! let fetcher = Arc::new(HttpFetcher::new(config.endpoints.timeout())?);
//! let mut session = Session::new(config);
//! let report = run_query(&mut session, fetcher, &["AT1G01010".to_string()]).await?;
//! println!("{} edges, {} failed sources", session.engine().edge_count(), report.failures.len());
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod document;
pub mod pipeline;
pub mod session;

pub use config::{AivConfig, ConfigError};
pub use document::{DocumentError, GraphDocument, ImportKind};
pub use pipeline::{PipelineError, QueryReport, run_query};
pub use session::Session;

#[doc(inline)]
pub use aiv_core as core;

#[doc(inline)]
pub use aiv_ingest as ingest;

#[doc(inline)]
pub use aiv_graph as graph;

#[doc(inline)]
pub use aiv_layout as layout;
