//! Subcellular localization of graph nodes.
//!
//! Raw per-gene scores are normalized into fractions, the largest fraction
//! picks the node's primary locality and every primary locality gets a slot in
//! the [`LocalityBand`], which fixes the top-to-bottom order of layout bands.

use fxhash::FxHashMap as HashMap;
use log::debug;
use serde::Serialize;

use aiv_core::models::{
    EXTRACELLULAR_LOCALITY, GraphNode, LocalityScore, NodeType, UNKNOWN_LOCALITY,
};
use aiv_graph::GraphMergeEngine;
use aiv_ingest::LocalizationResponse;

/// Outside-in cell order used for bands.
pub const CANONICAL_LOCALITIES: [&str; 11] = [
    EXTRACELLULAR_LOCALITY,
    "plasma membrane",
    "cytoskeleton",
    "cytosol",
    "endoplasmic reticulum",
    "golgi",
    "vacuole",
    "peroxisome",
    "mitochondrion",
    "plastid",
    "nucleus",
];

fn canonical_name(locality: &str) -> String {
    locality.trim().to_ascii_lowercase()
}

///
/// Turn raw `(locality, score)` pairs into fractions of their sum.
///
/// Scores that are zero, negative or not a number are dropped first, so they
/// neither show up nor dilute the rest. Names differing only in case or
/// surrounding blanks are summed into one entry. First-seen order is kept.
///
pub fn normalize_scores(pairs: &[(String, f64)]) -> Vec<LocalityScore> {
    let mut kept: Vec<(String, f64)> = Vec::new();
    for (locality, score) in pairs.iter().filter(|(_, s)| s.is_finite() && *s > 0.0) {
        let locality = canonical_name(locality);
        match kept.iter_mut().find(|(l, _)| *l == locality) {
            Some((_, total)) => *total += score,
            None => kept.push((locality, *score)),
        }
    }
    let total: f64 = kept.iter().map(|(_, score)| score).sum();

    kept.into_iter()
        .map(|(locality, score)| LocalityScore {
            locality,
            fraction: score / total,
        })
        .collect()
}

/// Locality with the largest fraction; the first one wins a tie.
pub fn primary_locality(scores: &[LocalityScore]) -> Option<&str> {
    let mut best: Option<&LocalityScore> = None;
    for score in scores {
        if best.is_none_or(|b| score.fraction > b.fraction) {
            best = Some(score);
        }
    }
    best.map(|s| s.locality.as_str())
}

///
/// Ordered set of localities that have nodes.
///
/// Canonical localities come first in [`CANONICAL_LOCALITIES`] order, other
/// names follow in the order they were first registered and `"unknown"` is
/// always last.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocalityBand {
    seen: Vec<String>,
    order: Vec<String>,
}

impl LocalityBand {
    /// Register a locality; returns true if it was not known yet.
    pub fn register(&mut self, locality: &str) -> bool {
        let name = canonical_name(locality);
        if self.seen.contains(&name) {
            return false;
        }
        self.seen.push(name);

        let mut order = self.seen.clone();
        order.sort_by_key(|name| {
            if name == UNKNOWN_LOCALITY {
                (2, 0)
            } else {
                match CANONICAL_LOCALITIES.iter().position(|c| c == name) {
                    Some(i) => (0, i),
                    // stable sort keeps first-seen order
                    None => (1, 0),
                }
            }
        });
        self.order = order;
        true
    }

    pub fn index_of(&self, locality: &str) -> Option<usize> {
        let name = canonical_name(locality);
        self.order.iter().position(|l| *l == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.seen.clear();
        self.order.clear();
    }
}

/// True for nodes that belong to a locality band.
pub fn is_banded(node: &GraphNode) -> bool {
    matches!(node.node_type, NodeType::Protein | NodeType::Effector)
}

/// Session-scoped localization state: the band and memoized normalizations.
#[derive(Debug, Default)]
pub struct LocalizationAggregator {
    band: LocalityBand,
    normalized: HashMap<String, Vec<LocalityScore>>,
}

impl LocalizationAggregator {
    pub fn band(&self) -> &LocalityBand {
        &self.band
    }

    ///
    /// Enrich every banded node of the graph with localization data.
    ///
    /// Proteins present in the response get their normalized scores and
    /// primary locality; proteins never seen with data fall back to
    /// `"unknown"` and effectors are always `"extracellular"`. Returns the
    /// number of proteins that received scores.
    ///
    pub fn apply(&mut self, engine: &mut GraphMergeEngine, response: &LocalizationResponse) -> usize {
        let mut enriched = 0;
        for node in engine.nodes_mut() {
            match node.node_type {
                NodeType::Protein => {
                    if let Some(gene) = response.get(&node.gene_id) {
                        let scores = self
                            .normalized
                            .entry(node.gene_id.clone())
                            .or_insert_with(|| normalize_scores(&gene.scores))
                            .clone();
                        node.localization = Some(
                            primary_locality(&scores)
                                .unwrap_or(UNKNOWN_LOCALITY)
                                .to_string(),
                        );
                        node.localization_scores = scores;
                        node.localization_evidence = gene.evidence;
                        enriched += 1;
                    } else if node.localization.is_none() {
                        node.localization = Some(UNKNOWN_LOCALITY.to_string());
                    }
                }
                NodeType::Effector => {
                    node.localization = Some(EXTRACELLULAR_LOCALITY.to_string());
                }
                NodeType::Dna | NodeType::CompoundLocality => continue,
            }
            if self.band.register(node.locality()) {
                debug!("New locality band: {}", node.locality());
            }
        }
        enriched
    }

    /// Register localities of nodes that already carry one, e.g. after an import.
    pub fn observe(&mut self, engine: &GraphMergeEngine) {
        for node in engine.nodes().filter(|n| is_banded(n)) {
            self.band.register(node.locality());
        }
    }

    /// Banded node ids grouped by primary locality, in band order.
    pub fn locality_groups(&self, engine: &GraphMergeEngine) -> Vec<(String, Vec<String>)> {
        self.band
            .iter()
            .map(|locality| {
                let members: Vec<String> = engine
                    .nodes()
                    .filter(|n| is_banded(n) && n.locality() == locality)
                    .map(|n| n.id.clone())
                    .collect();
                (locality.to_string(), members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect()
    }

    ///
    /// Create one compound node per non-empty locality group and parent the
    /// group's members to it. Returns the compound node ids in band order.
    ///
    pub fn assign_compounds(&self, engine: &mut GraphMergeEngine) -> Vec<String> {
        let mut compounds = Vec::new();
        for (locality, members) in self.locality_groups(engine) {
            let compound_id = {
                let compound = engine.add_node(&locality, NodeType::CompoundLocality, false);
                compound.id.clone()
            };
            if let Some(compound) = engine.node_mut(&compound_id) {
                compound.localization = Some(locality.clone());
            }
            for member in &members {
                if let Some(node) = engine.node_mut(member) {
                    node.parent = Some(compound_id.clone());
                }
            }
            compounds.push(compound_id);
        }
        compounds
    }

    /// Forget band order and memoized scores.
    pub fn reset(&mut self) {
        self.band.clear();
        self.normalized.clear();
    }
}
