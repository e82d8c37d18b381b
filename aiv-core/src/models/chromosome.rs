use serde::{Deserialize, Serialize};

use super::node::{NodeType, Position};
use super::record::{InteractionKind, InteractionRecord};
use crate::errors::{CoreError, CoreResult};
use crate::utils::chromosome_of;

/// Chromosome labels in the order they are laid out along the bottom edge.
pub const CHROMOSOME_LABELS: [char; 7] = ['1', '2', '3', '4', '5', 'M', 'C'];

///
/// Drawing area shared by the merge engine (chromosome pinning) and the
/// layered layout.
///
#[derive(PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LayoutArea {
    pub width: f64,
    pub height: f64,
    /// Height of the strip at the bottom reserved for chromosome nodes.
    pub chromosome_row: f64,
}

impl Default for LayoutArea {
    fn default() -> Self {
        LayoutArea {
            width: 1200.0,
            height: 900.0,
            chromosome_row: 80.0,
        }
    }
}

impl LayoutArea {
    ///
    /// Fixed position of a chromosome node: evenly spaced along the bottom
    /// strip, in `CHROMOSOME_LABELS` order.
    ///
    pub fn chromosome_position(&self, label: char) -> Position {
        let ordinal = CHROMOSOME_LABELS
            .iter()
            .position(|c| *c == label)
            .unwrap_or(CHROMOSOME_LABELS.len() - 1);
        let step = self.width / (CHROMOSOME_LABELS.len() + 1) as f64;
        Position {
            x: step * (ordinal + 1) as f64,
            y: self.height - self.chromosome_row / 2.0,
        }
    }
}

/// One row of the protein-DNA interaction table.
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PdiRow {
    pub source: String,
    pub target: String,
    pub published: bool,
    pub confidence: Option<String>,
    pub references: Vec<String>,
    pub mi_annotations: Vec<String>,
}

///
/// All protein-DNA interactions that land on one chromosome.
///
/// PDIs are not materialized as individual edges; the chromosome node stands
/// in for them and this aggregate keeps the raw records for the table view.
///
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct ChromosomeAggregate {
    pub label: char,
    pub records: Vec<InteractionRecord>,
}

impl ChromosomeAggregate {
    pub fn new(label: char) -> CoreResult<Self> {
        if !CHROMOSOME_LABELS.contains(&label) {
            return Err(CoreError::InvalidChromosome(label.to_string()));
        }
        Ok(ChromosomeAggregate {
            label,
            records: Vec::new(),
        })
    }

    /// Chromosome label of the gene a PDI record targets.
    pub fn label_for(record: &InteractionRecord) -> CoreResult<char> {
        chromosome_of(&record.target_gene_id)
    }

    /// Gene id of the chromosome node, e.g. `Chr1` or `ChrM`.
    pub fn gene_id(&self) -> String {
        format!("Chr{}", self.label)
    }

    pub fn node_id(&self) -> String {
        NodeType::Dna.node_id(&self.gene_id())
    }

    pub fn push(&mut self, record: InteractionRecord) {
        debug_assert_eq!(record.kind, InteractionKind::Pdi);
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    ///
    /// Rows of the protein-DNA table: one per (source, target) gene pair, with
    /// evidence from repeated records folded together.
    ///
    pub fn table(&self) -> Vec<PdiRow> {
        let mut rows: Vec<PdiRow> = Vec::new();
        for record in &self.records {
            let tagged = record.tagged_references();
            match rows
                .iter_mut()
                .find(|r| r.source == record.source_gene_id && r.target == record.target_gene_id)
            {
                Some(row) => {
                    row.published |= record.published;
                    for reference in tagged {
                        if !row.references.contains(&reference) {
                            row.references.push(reference);
                        }
                    }
                    for code in &record.mi_term_codes {
                        if !row.mi_annotations.contains(code) {
                            row.mi_annotations.push(code.clone());
                        }
                    }
                }
                None => rows.push(PdiRow {
                    source: record.source_gene_id.clone(),
                    target: record.target_gene_id.clone(),
                    published: record.published,
                    confidence: record.confidence.clone(),
                    references: tagged,
                    mi_annotations: record.mi_term_codes.clone(),
                }),
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::record::OriginDatabase;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn pdi(source: &str, target: &str, reference: &str) -> InteractionRecord {
        InteractionRecord {
            source_gene_id: source.to_string(),
            target_gene_id: target.to_string(),
            kind: InteractionKind::Pdi,
            origin: OriginDatabase::PrimaryApi,
            published: false,
            confidence: None,
            correlation: None,
            references: vec![reference.to_string()],
            mi_term_codes: vec!["MI:0432".to_string()],
        }
    }

    #[rstest]
    fn test_chromosome_ids() {
        let aggregate = ChromosomeAggregate::new('M').unwrap();
        assert_eq!(aggregate.gene_id(), "ChrM");
        assert_eq!(aggregate.node_id(), "DNA_ChrM");
        assert!(ChromosomeAggregate::new('7').is_err());
    }

    #[rstest]
    fn test_table_folds_repeated_pairs() {
        let mut aggregate = ChromosomeAggregate::new('2').unwrap();
        aggregate.push(pdi("At1g01010", "At2g00100", "PubMed1"));
        aggregate.push(pdi("At1g01010", "At2g00100", "PubMed2"));
        aggregate.push(pdi("At1g01010", "At2g00200", "PubMed1"));

        let table = aggregate.table();
        assert_eq!(aggregate.len(), 3);
        assert_eq!(table.len(), 2);
        assert_eq!(
            table[0].references,
            vec!["BAR:PubMed1".to_string(), "BAR:PubMed2".to_string()]
        );
        assert_eq!(table[0].mi_annotations, vec!["MI:0432".to_string()]);
    }

    #[rstest]
    fn test_chromosome_positions_sit_on_the_bottom_row() {
        let area = LayoutArea::default();
        let first = area.chromosome_position('1');
        let last = area.chromosome_position('C');
        assert!(first.x < last.x);
        assert_eq!(first.y, area.height - area.chromosome_row / 2.0);
        assert!(last.x < area.width);
    }
}
