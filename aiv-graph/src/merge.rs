//! The deduplicating interaction graph.
//!
//! [`GraphMergeEngine`] owns every node and edge of a query session. Node
//! insertion is idempotent by id, and an interaction rediscovered by another
//! source is merged into the edge that already exists:
//!
//! - MI annotations and references are unioned,
//! - the edge becomes published (an independent source implies publication),
//! - confidence and correlation stay as the first source reported them.
//!
//! Protein-DNA interactions are not materialized as edges. They are collected
//! per chromosome in a [`ChromosomeAggregate`] behind a single DNA node that is
//! pinned to the bottom of the [`LayoutArea`].
//!
//! # Example
//!
//! ```
//! use aiv_core::models::{NodeType, OriginDatabase};
//! use aiv_graph::{EdgeInsert, GraphMergeEngine};
//!
//! let mut engine = GraphMergeEngine::default();
//! engine.add_node("At1g01010", NodeType::Protein, true);
//!
//! let mut insert = EdgeInsert::ppi("At1g01010", "At2g30000", OriginDatabase::PrimaryApi);
//! insert.confidence = Some("3".to_string());
//! engine.add_edge(insert);
//!
//! let mut rediscovered = EdgeInsert::ppi("At1g01010", "At2g30000", OriginDatabase::ExchangeA);
//! rediscovered.published = true;
//! rediscovered.references = vec!["pubmed:123".to_string()];
//! engine.add_edge(rediscovered);
//!
//! assert_eq!(engine.edge_count(), 1);
//! let edge = engine.edges().next().unwrap();
//! assert!(edge.published);
//! assert_eq!(edge.confidence.as_deref(), Some("3"));
//! ```

use fxhash::FxHashMap as HashMap;
use log::{debug, warn};

use aiv_core::models::{
    ChromosomeAggregate, GraphEdge, GraphNode, InteractionKind, InteractionRecord, LayoutArea,
    NodeType, OriginDatabase, PdiRow,
};
use aiv_core::utils::normalize_decimal;

use crate::errors::{MergeError, MergeResult};
use crate::mi::MiDictionary;
use crate::references::{ReferenceClassifier, ReferenceLink};

/// Arguments of [`GraphMergeEngine::add_edge`].
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeInsert {
    pub source_gene: String,
    pub source_type: NodeType,
    pub target_gene: String,
    pub target_type: NodeType,
    pub references: Vec<String>,
    pub published: bool,
    pub confidence: Option<String>,
    pub origin: OriginDatabase,
    pub correlation: Option<String>,
    pub mi_terms: Vec<String>,
}

impl EdgeInsert {
    /// Bare protein-protein insert; endpoint types are derived from the ids.
    pub fn ppi(source_gene: &str, target_gene: &str, origin: OriginDatabase) -> Self {
        EdgeInsert {
            source_gene: source_gene.to_string(),
            source_type: NodeType::for_gene_id(source_gene),
            target_gene: target_gene.to_string(),
            target_type: NodeType::for_gene_id(target_gene),
            references: Vec::new(),
            published: false,
            confidence: None,
            origin,
            correlation: None,
            mi_terms: Vec::new(),
        }
    }
}

impl From<&InteractionRecord> for EdgeInsert {
    fn from(record: &InteractionRecord) -> Self {
        EdgeInsert {
            source_gene: record.source_gene_id.clone(),
            source_type: NodeType::for_gene_id(&record.source_gene_id),
            target_gene: record.target_gene_id.clone(),
            target_type: NodeType::for_gene_id(&record.target_gene_id),
            references: record.references.clone(),
            published: record.published,
            confidence: record.confidence.clone(),
            origin: record.origin,
            correlation: record.correlation.clone(),
            mi_terms: record.mi_term_codes.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MergeOutcome {
    EdgeCreated(String),
    EdgeMerged(String),
    PdiAggregated(char),
}

/// Tally of a batch merge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MergeSummary {
    pub created: usize,
    pub merged: usize,
    pub pdi: usize,
    pub skipped: usize,
}

fn fixed_point(value: Option<String>) -> Option<String> {
    value.map(|v| normalize_decimal(&v).unwrap_or(v))
}

#[derive(Debug, Clone)]
pub struct GraphMergeEngine {
    area: LayoutArea,
    nodes: Vec<GraphNode>,
    node_index: HashMap<String, usize>,
    edges: Vec<GraphEdge>,
    edge_index: HashMap<String, usize>,
    chromosomes: Vec<ChromosomeAggregate>,
    mi: MiDictionary,
}

impl Default for GraphMergeEngine {
    fn default() -> Self {
        GraphMergeEngine::new(LayoutArea::default())
    }
}

impl GraphMergeEngine {
    pub fn new(area: LayoutArea) -> Self {
        GraphMergeEngine {
            area,
            nodes: Vec::new(),
            node_index: HashMap::default(),
            edges: Vec::new(),
            edge_index: HashMap::default(),
            chromosomes: Vec::new(),
            mi: MiDictionary::default(),
        }
    }

    pub fn area(&self) -> LayoutArea {
        self.area
    }

    /// Change the drawing area; pinned chromosome nodes follow the bottom edge.
    pub fn set_area(&mut self, area: LayoutArea) {
        self.area = area;
        for aggregate in &self.chromosomes {
            if let Some(&i) = self.node_index.get(&aggregate.node_id()) {
                self.nodes[i].lock_at(area.chromosome_position(aggregate.label));
            }
        }
    }

    ///
    /// Add a node unless one with the same id exists. Adding an existing node
    /// as a query gene marks it as such; nothing ever unmarks it.
    ///
    pub fn add_node(&mut self, gene_id: &str, node_type: NodeType, is_query: bool) -> &GraphNode {
        let id = node_type.node_id(gene_id);
        let index = match self.node_index.get(&id) {
            Some(&i) => {
                self.nodes[i].is_query_gene |= is_query;
                i
            }
            None => {
                self.nodes.push(GraphNode::new(gene_id, node_type, is_query));
                self.node_index.insert(id, self.nodes.len() - 1);
                self.nodes.len() - 1
            }
        };
        &self.nodes[index]
    }

    pub fn has_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&GraphNode> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    /// Mutable access for enrichment passes. Node ids must not be changed.
    pub fn node_mut(&mut self, id: &str) -> Option<&mut GraphNode> {
        self.node_index.get(id).map(|&i| &mut self.nodes[i])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Mutable access for enrichment passes. Node ids must not be changed.
    pub fn nodes_mut(&mut self) -> impl Iterator<Item = &mut GraphNode> {
        self.nodes.iter_mut()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge(&self, id: &str) -> Option<&GraphEdge> {
        self.edge_index.get(id).map(|&i| &self.edges[i])
    }

    pub fn edges(&self) -> impl Iterator<Item = &GraphEdge> {
        self.edges.iter()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn edge_position(&self, source_id: &str, target_id: &str) -> Option<usize> {
        self.edge_index
            .get(&GraphEdge::edge_id(source_id, target_id))
            .or_else(|| self.edge_index.get(&GraphEdge::edge_id(target_id, source_id)))
            .copied()
    }

    /// Edge between two node ids, in either orientation.
    pub fn find_edge(&self, source_id: &str, target_id: &str) -> Option<&GraphEdge> {
        self.edge_position(source_id, target_id)
            .map(|i| &self.edges[i])
    }

    fn annotate(&self, origin: OriginDatabase, terms: &[String]) -> Vec<String> {
        let mut annotations: Vec<String> = Vec::with_capacity(terms.len());
        for term in terms {
            let annotation = if origin.is_exchange_feed() {
                self.mi.reformat(term)
            } else {
                self.mi.resolve(term)
            };
            if !annotation.is_empty() && !annotations.contains(&annotation) {
                annotations.push(annotation);
            }
        }
        annotations
    }

    ///
    /// Insert an interaction, or merge it into the edge already connecting the
    /// same endpoints. Missing endpoint nodes are created.
    ///
    pub fn add_edge(&mut self, insert: EdgeInsert) -> MergeOutcome {
        let source_id = self
            .add_node(&insert.source_gene, insert.source_type, false)
            .id
            .clone();
        let target_id = self
            .add_node(&insert.target_gene, insert.target_type, false)
            .id
            .clone();

        let annotations = self.annotate(insert.origin, &insert.mi_terms);
        let tagged: Vec<String> = insert
            .references
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| format!("{}:{}", insert.origin.tag(), r))
            .collect();

        match self.edge_position(&source_id, &target_id) {
            Some(i) => {
                let edge = &mut self.edges[i];
                for annotation in &annotations {
                    edge.push_mi_annotation(annotation);
                }
                for reference in &tagged {
                    edge.push_reference(reference);
                }
                if edge.origins.contains(&insert.origin) {
                    edge.published |= insert.published;
                } else {
                    // a second, independent source always implies publication
                    edge.published = true;
                    edge.origins.push(insert.origin);
                }
                debug!("Merged {} evidence into {}", insert.origin, edge.id);
                MergeOutcome::EdgeMerged(edge.id.clone())
            }
            None => {
                let id = GraphEdge::edge_id(&source_id, &target_id);
                let mut edge = GraphEdge {
                    id: id.clone(),
                    source: source_id,
                    target: target_id,
                    published: insert.published,
                    confidence: fixed_point(insert.confidence),
                    correlation: fixed_point(insert.correlation),
                    reference_list: String::new(),
                    mi_annotations: annotations,
                    origins: vec![insert.origin],
                };
                for reference in &tagged {
                    edge.push_reference(reference);
                }
                self.edges.push(edge);
                self.edge_index.insert(id.clone(), self.edges.len() - 1);
                MergeOutcome::EdgeCreated(id)
            }
        }
    }

    fn chromosome_mut(&mut self, label: char) -> MergeResult<&mut ChromosomeAggregate> {
        let position = match self.chromosomes.iter().position(|c| c.label == label) {
            Some(i) => i,
            None => {
                let aggregate = ChromosomeAggregate::new(label)?;
                let position = self.area.chromosome_position(label);
                let gene_id = aggregate.gene_id();
                self.add_node(&gene_id, NodeType::Dna, false);
                if let Some(node) = self.node_mut(&aggregate.node_id()) {
                    node.lock_at(position);
                }
                debug!("Pinned chromosome node {} at {:?}", gene_id, position);
                self.chromosomes.push(aggregate);
                self.chromosomes.len() - 1
            }
        };
        Ok(&mut self.chromosomes[position])
    }

    /// Merge one normalized record.
    pub fn add_record(&mut self, record: &InteractionRecord) -> MergeResult<MergeOutcome> {
        match record.kind {
            InteractionKind::Ppi => Ok(self.add_edge(EdgeInsert::from(record))),
            InteractionKind::Pdi => {
                let label = ChromosomeAggregate::label_for(record)?;
                self.add_node(
                    &record.source_gene_id,
                    NodeType::for_gene_id(&record.source_gene_id),
                    false,
                );
                self.chromosome_mut(label)?.push(record.clone());
                Ok(MergeOutcome::PdiAggregated(label))
            }
        }
    }

    /// Merge a batch of records; records that can't be placed are skipped.
    pub fn add_records<'a>(
        &mut self,
        records: impl IntoIterator<Item = &'a InteractionRecord>,
    ) -> MergeSummary {
        let mut summary = MergeSummary::default();
        for record in records {
            match self.add_record(record) {
                Ok(MergeOutcome::EdgeCreated(_)) => summary.created += 1,
                Ok(MergeOutcome::EdgeMerged(_)) => summary.merged += 1,
                Ok(MergeOutcome::PdiAggregated(_)) => summary.pdi += 1,
                Err(e) => {
                    warn!("Skipping {} record: {}", record.origin, e);
                    summary.skipped += 1;
                }
            }
        }
        summary
    }

    pub fn chromosome(&self, label: char) -> Option<&ChromosomeAggregate> {
        self.chromosomes.iter().find(|c| c.label == label)
    }

    pub fn chromosomes(&self) -> impl Iterator<Item = &ChromosomeAggregate> {
        self.chromosomes.iter()
    }

    /// Protein-DNA table over every chromosome, in first-seen chromosome order.
    pub fn pdi_table(&self) -> Vec<PdiRow> {
        self.chromosomes.iter().flat_map(|c| c.table()).collect()
    }

    ///
    /// Hyperlink metadata for every reference of an edge; unclassifiable
    /// references come back without a link.
    ///
    pub fn edge_links(
        &self,
        edge_id: &str,
        classifier: &mut ReferenceClassifier,
    ) -> MergeResult<Vec<(String, Option<ReferenceLink>)>> {
        let edge = self
            .edge(edge_id)
            .ok_or_else(|| MergeError::UnknownEdge(edge_id.to_string()))?;
        Ok(classifier
            .sanitize(&edge.reference_list)
            .into_iter()
            .map(|reference| {
                let link = classifier.link_or_none(&reference);
                (reference, link)
            })
            .collect())
    }

    ///
    /// Replace the whole graph with previously exported nodes, edges and
    /// chromosome aggregates. Duplicate ids keep their first occurrence;
    /// edges whose endpoints are missing and aggregates without their
    /// chromosome node are rejected.
    ///
    pub fn restore(
        &mut self,
        nodes: Vec<GraphNode>,
        edges: Vec<GraphEdge>,
        chromosomes: Vec<ChromosomeAggregate>,
    ) -> MergeResult<()> {
        let mut restored = GraphMergeEngine::new(self.area);
        for node in nodes {
            if !restored.node_index.contains_key(&node.id) {
                restored.node_index.insert(node.id.clone(), restored.nodes.len());
                restored.nodes.push(node);
            }
        }
        for edge in edges {
            for endpoint in [&edge.source, &edge.target] {
                if !restored.has_node(endpoint) {
                    return Err(MergeError::UnknownNode(endpoint.clone()));
                }
            }
            if restored.edge_position(&edge.source, &edge.target).is_none() {
                restored.edge_index.insert(edge.id.clone(), restored.edges.len());
                restored.edges.push(edge);
            }
        }
        for aggregate in chromosomes {
            ChromosomeAggregate::new(aggregate.label)?;
            if !restored.has_node(&aggregate.node_id()) {
                return Err(MergeError::UnknownNode(aggregate.node_id()));
            }
            match restored.chromosomes.iter_mut().find(|c| c.label == aggregate.label) {
                Some(existing) => existing.records.extend(aggregate.records),
                None => restored.chromosomes.push(aggregate),
            }
        }
        *self = restored;
        Ok(())
    }

    /// Forget everything; the drawing area is kept.
    pub fn clear(&mut self) {
        *self = GraphMergeEngine::new(self.area);
    }
}
