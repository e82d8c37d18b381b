//! The exported graph document.
//!
//! Documents written by this crate carry `"aivGraph": true`. Importing one
//! restores the graph exactly as it was. Documents without the marker were
//! authored elsewhere, so their nodes are re-banded and laid out after the
//! import.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use aiv_core::models::{ChromosomeAggregate, GraphEdge, GraphNode, Position};
use aiv_graph::MergeError;
use aiv_layout::LayoutError;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Malformed graph document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Inconsistent graph document: {0}")]
    Graph(#[from] MergeError),
    #[error("Imported graph could not be laid out: {0}")]
    Layout(#[from] LayoutError),
}

pub type DocumentResult<T> = std::result::Result<T, DocumentError>;

fn default_zoom() -> f64 {
    1.0
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
    /// Protein-DNA records stored behind each chromosome node.
    #[serde(default)]
    pub chromosomes: Vec<ChromosomeAggregate>,
    #[serde(default = "default_zoom")]
    pub zoom: f64,
    #[serde(default)]
    pub pan: Position,
    #[serde(default)]
    pub aiv_graph: bool,
}

/// How an imported document was restored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    Native,
    External,
}

impl GraphDocument {
    pub fn from_json(json: &str) -> DocumentResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> DocumentResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn kind(&self) -> ImportKind {
        if self.aiv_graph {
            ImportKind::Native
        } else {
            ImportKind::External
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use aiv_core::models::NodeType;

    #[rstest]
    fn test_export_shape() {
        let document = GraphDocument {
            nodes: vec![GraphNode::new("At1g01010", NodeType::Protein, true)],
            edges: vec![],
            chromosomes: vec![],
            zoom: 1.5,
            pan: Position { x: 10.0, y: -4.0 },
            aiv_graph: true,
        };
        let value: serde_json::Value = serde_json::from_str(&document.to_json().unwrap()).unwrap();
        assert_eq!(value["aivGraph"], serde_json::Value::Bool(true));
        assert_eq!(value["pan"]["x"], serde_json::json!(10.0));
        assert_eq!(value["nodes"][0]["id"], "Protein_At1g01010");
    }

    #[rstest]
    fn test_missing_marker_is_external() {
        let document = GraphDocument::from_json(r#"{"nodes": [], "edges": []}"#).unwrap();
        assert_eq!(document.kind(), ImportKind::External);
        assert_eq!(document.zoom, 1.0);
        assert!(document.chromosomes.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("[]")]
    #[case(r#"{"nodes": [{"id": 3}], "edges": []}"#)]
    fn test_malformed(#[case] json: &str) {
        assert!(matches!(
            GraphDocument::from_json(json),
            Err(DocumentError::Json(_))
        ));
    }
}
