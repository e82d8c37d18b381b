use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::utils::is_locus;

/// Locality used for proteins without usable localization data.
pub const UNKNOWN_LOCALITY: &str = "unknown";

/// Locality reserved for non-gene entities (pathogen effectors).
pub const EXTRACELLULAR_LOCALITY: &str = "extracellular";

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum NodeType {
    Protein,
    Effector,
    #[serde(rename = "DNA")]
    Dna,
    #[serde(rename = "Compound")]
    CompoundLocality,
}

impl NodeType {
    /// Prefix of node ids of this type.
    pub fn tag(&self) -> &'static str {
        match self {
            NodeType::Protein => "Protein",
            NodeType::Effector => "Effector",
            NodeType::Dna => "DNA",
            NodeType::CompoundLocality => "Compound",
        }
    }

    ///
    /// Interaction partners that are AGI loci are proteins, anything else
    /// (pathogen effectors and the like) is an effector.
    ///
    pub fn for_gene_id(gene_id: &str) -> NodeType {
        if is_locus(gene_id) {
            NodeType::Protein
        } else {
            NodeType::Effector
        }
    }

    pub fn node_id(&self, gene_id: &str) -> String {
        format!("{}_{}", self.tag(), gene_id)
    }
}

impl Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct LocalityScore {
    pub locality: String,
    pub fraction: f64,
}

/// Which kinds of evidence the localization scores were built from.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LocalizationEvidence {
    pub predicted: bool,
    pub experimental: bool,
}

#[derive(PartialEq, Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

///
/// A node of the interaction graph.
///
/// The id is `<type tag>_<gene id>`, so there is exactly one node per
/// `(type, gene id)` pair.
///
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    pub gene_id: String,
    pub node_type: NodeType,
    pub localization: Option<String>,
    #[serde(default)]
    pub localization_scores: Vec<LocalityScore>,
    #[serde(default)]
    pub localization_evidence: LocalizationEvidence,
    #[serde(default)]
    pub is_query_gene: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub locked: bool,
}

impl GraphNode {
    pub fn new(gene_id: &str, node_type: NodeType, is_query_gene: bool) -> Self {
        GraphNode {
            id: node_type.node_id(gene_id),
            gene_id: gene_id.to_string(),
            node_type,
            localization: None,
            localization_scores: Vec::new(),
            localization_evidence: LocalizationEvidence::default(),
            is_query_gene,
            parent: None,
            position: None,
            locked: false,
        }
    }

    /// Pin the node; the layout engine never moves locked nodes.
    pub fn lock_at(&mut self, position: Position) {
        self.position = Some(position);
        self.locked = true;
    }

    /// Primary locality, falling back to `"unknown"`.
    pub fn locality(&self) -> &str {
        self.localization.as_deref().unwrap_or(UNKNOWN_LOCALITY)
    }

    /// Sum of all localization fractions; 1.0 (± rounding) when scores exist.
    pub fn occupied_fraction(&self) -> f64 {
        self.localization_scores.iter().map(|s| s.fraction).sum()
    }
}
