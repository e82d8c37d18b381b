use serde::{Deserialize, Serialize};

use super::record::OriginDatabase;

///
/// An edge of the interaction graph.
///
/// `reference_list` is a newline-delimited blob of origin-tagged citations,
/// e.g. `BAR:PubMed12345\nBioGRID:pubmed:67890`.
///
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub published: bool,
    pub confidence: Option<String>,
    pub correlation: Option<String>,
    #[serde(default)]
    pub reference_list: String,
    #[serde(default)]
    pub mi_annotations: Vec<String>,
    #[serde(default)]
    pub origins: Vec<OriginDatabase>,
}

impl GraphEdge {
    pub fn edge_id(source_id: &str, target_id: &str) -> String {
        format!("{}_{}", source_id, target_id)
    }

    /// Confidence as a number, for range filters.
    pub fn confidence_value(&self) -> Option<f64> {
        self.confidence.as_deref().and_then(|c| c.parse::<f64>().ok())
    }

    pub fn correlation_value(&self) -> Option<f64> {
        self.correlation.as_deref().and_then(|c| c.parse::<f64>().ok())
    }

    pub fn references(&self) -> impl Iterator<Item = &str> {
        self.reference_list
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Append a reference unless the blob already holds it.
    pub fn push_reference(&mut self, reference: &str) -> bool {
        let reference = reference.trim();
        if reference.is_empty() || self.references().any(|r| r == reference) {
            return false;
        }
        if !self.reference_list.is_empty() {
            self.reference_list.push('\n');
        }
        self.reference_list.push_str(reference);
        true
    }

    /// Union an MI annotation into the edge.
    pub fn push_mi_annotation(&mut self, annotation: &str) -> bool {
        if annotation.is_empty() || self.mi_annotations.iter().any(|a| a == annotation) {
            return false;
        }
        self.mi_annotations.push(annotation.to_string());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn edge() -> GraphEdge {
        GraphEdge {
            id: GraphEdge::edge_id("Protein_At1g01010", "Protein_At2g01010"),
            source: "Protein_At1g01010".to_string(),
            target: "Protein_At2g01010".to_string(),
            published: false,
            confidence: Some("0.0015".to_string()),
            correlation: None,
            reference_list: String::new(),
            mi_annotations: vec![],
            origins: vec![OriginDatabase::PrimaryApi],
        }
    }

    #[rstest]
    fn test_edge_id(edge: GraphEdge) {
        assert_eq!(edge.id, "Protein_At1g01010_Protein_At2g01010");
    }

    #[rstest]
    fn test_push_reference_skips_duplicates(mut edge: GraphEdge) {
        assert!(edge.push_reference("BAR:PubMed1"));
        assert!(edge.push_reference("BioGRID:pubmed:2"));
        assert!(!edge.push_reference("BAR:PubMed1"));
        assert!(!edge.push_reference("  "));
        assert_eq!(edge.reference_list, "BAR:PubMed1\nBioGRID:pubmed:2");
    }

    #[rstest]
    fn test_confidence_value(edge: GraphEdge) {
        assert_eq!(edge.confidence_value(), Some(0.0015));
        assert_eq!(edge.correlation_value(), None);
    }
}
