//! # aiv-core
//!
//! Shared data model for the interaction viewer crates: normalized
//! [`InteractionRecord`](models::InteractionRecord)s, graph nodes and edges,
//! per-chromosome protein-DNA aggregates and the layout area.
//!
//! ```
//! use aiv_core::models::{GraphNode, NodeType};
//! use aiv_core::utils::{normalize_decimal, normalize_locus};
//!
//! let node = GraphNode::new(&normalize_locus("AT1G01010"), NodeType::Protein, true);
//! assert_eq!(node.id, "Protein_At1g01010");
//! assert_eq!(normalize_decimal("1.5e-3").unwrap(), "0.0015");
//! ```
pub mod errors;
pub mod models;
pub mod utils;

pub use errors::*;
