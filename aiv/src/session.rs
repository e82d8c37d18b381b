//! Per-query state.
//!
//! A [`Session`] owns the graph and everything derived from it. All of it is
//! scoped to one query: [`Session::reset_session`] drops the graph, the
//! reference cache, the locality bands and the palette in one go.

use std::collections::BTreeMap;

use log::{debug, info};

use aiv_core::models::{InteractionRecord, NodeType, PdiRow, Position};
use aiv_graph::{
    GraphMergeEngine, MergeResult, MergeSummary, ReferenceClassifier, ReferenceLink,
};
use aiv_ingest::LocalizationResponse;
use aiv_layout::{
    BandExtent, DonutEncoder, DonutEncoding, LayeredLayout, LayoutResult, LocalityPalette,
    LocalizationAggregator,
};

use crate::config::AivConfig;
use crate::document::{DocumentResult, GraphDocument, ImportKind};

pub struct Session {
    config: AivConfig,
    engine: GraphMergeEngine,
    classifier: ReferenceClassifier,
    aggregator: LocalizationAggregator,
    layout: LayeredLayout,
    palette: LocalityPalette,
    donuts: BTreeMap<String, DonutEncoding>,
    bands: Vec<BandExtent>,
    zoom: f64,
    pan: Position,
}

impl Default for Session {
    fn default() -> Self {
        Session::new(AivConfig::default())
    }
}

impl Session {
    pub fn new(config: AivConfig) -> Self {
        Session {
            engine: GraphMergeEngine::new(config.layout.area()),
            classifier: ReferenceClassifier::with_capacity(config.cache.reference_capacity),
            aggregator: LocalizationAggregator::default(),
            layout: LayeredLayout::new(config.layout.layout_config()),
            palette: LocalityPalette::new(config.layout.seed),
            donuts: BTreeMap::new(),
            bands: Vec::new(),
            zoom: 1.0,
            pan: Position::default(),
            config,
        }
    }

    pub fn config(&self) -> &AivConfig {
        &self.config
    }

    pub fn engine(&self) -> &GraphMergeEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GraphMergeEngine {
        &mut self.engine
    }

    pub fn aggregator(&self) -> &LocalizationAggregator {
        &self.aggregator
    }

    pub fn classifier_mut(&mut self) -> &mut ReferenceClassifier {
        &mut self.classifier
    }

    pub fn bands(&self) -> &[BandExtent] {
        &self.bands
    }

    pub fn donut(&self, node_id: &str) -> Option<&DonutEncoding> {
        self.donuts.get(node_id)
    }

    pub fn donuts(&self) -> impl Iterator<Item = (&String, &DonutEncoding)> {
        self.donuts.iter()
    }

    pub fn set_viewport(&mut self, zoom: f64, pan: Position) {
        self.zoom = zoom;
        self.pan = pan;
    }

    ///
    /// Start over: clears the graph, the reference cache, band state, donuts
    /// and palette assignments. Configuration is kept.
    ///
    pub fn reset_session(&mut self) {
        self.engine.clear();
        self.classifier.reset();
        self.aggregator.reset();
        self.palette.reset();
        self.donuts.clear();
        self.bands.clear();
        self.zoom = 1.0;
        self.pan = Position::default();
        debug!("Session reset");
    }

    pub fn add_query_genes(&mut self, genes: &[String]) {
        for gene in genes {
            self.engine
                .add_node(gene, NodeType::for_gene_id(gene), true);
        }
    }

    ///
    /// Merge normalized records in the order given. References that can't be
    /// classified are kept on the edge and only logged.
    ///
    pub fn merge_records(&mut self, records: &[InteractionRecord]) -> MergeSummary {
        for reference in records.iter().flat_map(|r| r.references.iter()) {
            if self.classifier.link_or_none(reference).is_none() {
                debug!("Reference without a link: {}", reference);
            }
        }
        self.engine.add_records(records)
    }

    fn encode_donuts(&mut self) {
        let encoder = DonutEncoder;
        self.donuts = self
            .engine
            .nodes()
            .filter(|n| n.node_type == NodeType::Protein)
            .map(|n| {
                let mut encoding = encoder.encode_node(n);
                encoding.paint(&mut self.palette);
                (n.id.clone(), encoding)
            })
            .collect();
    }

    ///
    /// Enrich the graph with localization data, group nodes into locality
    /// compounds, encode donuts and lay everything out.
    ///
    pub fn apply_localizations(&mut self, response: &LocalizationResponse) -> LayoutResult<usize> {
        let enriched = self.aggregator.apply(&mut self.engine, response);
        self.aggregator.assign_compounds(&mut self.engine);
        self.encode_donuts();
        self.relayout()?;
        Ok(enriched)
    }

    pub fn relayout(&mut self) -> LayoutResult<&[BandExtent]> {
        self.bands = self.layout.run(&mut self.engine, self.aggregator.band())?;
        Ok(&self.bands)
    }

    /// Show or hide every donut at once.
    pub fn set_donuts_visible(&mut self, visible: bool) {
        for encoding in self.donuts.values_mut() {
            encoding.set_visible(visible);
        }
    }

    pub fn edge_links(&mut self, edge_id: &str) -> MergeResult<Vec<(String, Option<ReferenceLink>)>> {
        self.engine.edge_links(edge_id, &mut self.classifier)
    }

    pub fn pdi_table(&self) -> Vec<PdiRow> {
        self.engine.pdi_table()
    }

    pub fn export_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.engine.nodes().cloned().collect(),
            edges: self.engine.edges().cloned().collect(),
            chromosomes: self.engine.chromosomes().cloned().collect(),
            zoom: self.zoom,
            pan: self.pan,
            aiv_graph: true,
        }
    }

    ///
    /// Replace the session's graph with a document. Nothing in the session
    /// changes unless the whole import succeeds.
    ///
    pub fn import_document(&mut self, json: &str) -> DocumentResult<ImportKind> {
        let document = GraphDocument::from_json(json)?;
        let kind = document.kind();

        let mut engine = GraphMergeEngine::new(self.config.layout.area());
        engine.restore(document.nodes, document.edges, document.chromosomes)?;
        let mut aggregator = LocalizationAggregator::default();
        let mut bands = Vec::new();
        match kind {
            ImportKind::Native => aggregator.observe(&engine),
            ImportKind::External => {
                aggregator.apply(&mut engine, &LocalizationResponse::new());
                aggregator.assign_compounds(&mut engine);
                bands = self.layout.run(&mut engine, aggregator.band())?;
            }
        }

        self.reset_session();
        self.engine = engine;
        self.aggregator = aggregator;
        self.bands = bands;
        self.zoom = document.zoom;
        self.pan = document.pan;
        self.encode_donuts();
        info!(
            "Imported {:?} document with {} nodes and {} edges",
            kind,
            self.engine.node_count(),
            self.engine.edge_count()
        );
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    use aiv_core::models::{InteractionKind, LocalizationEvidence, OriginDatabase};
    use aiv_ingest::GeneLocalization;

    use crate::document::DocumentError;

    fn ppi(source: &str, target: &str, origin: OriginDatabase) -> InteractionRecord {
        InteractionRecord {
            source_gene_id: source.to_string(),
            target_gene_id: target.to_string(),
            kind: InteractionKind::Ppi,
            origin,
            published: false,
            confidence: None,
            correlation: None,
            references: vec!["PubMed1".to_string()],
            mi_term_codes: vec![],
        }
    }

    #[fixture]
    fn session() -> Session {
        let mut config = AivConfig::default();
        config.layout.seed = Some(11);
        let mut session = Session::new(config);
        session.add_query_genes(&["At1g01010".to_string()]);
        session.merge_records(&[
            ppi("At1g01010", "At2g30000", OriginDatabase::PrimaryApi),
            ppi("At1g01010", "At3g50000", OriginDatabase::ExchangeA),
        ]);

        let mut response = LocalizationResponse::new();
        response.insert(
            "At1g01010".to_string(),
            GeneLocalization {
                scores: vec![("nucleus".to_string(), 3.0), ("cytosol".to_string(), 1.0)],
                evidence: LocalizationEvidence::default(),
            },
        );
        session.apply_localizations(&response).unwrap();
        session
    }

    #[rstest]
    fn test_apply_localizations(session: Session) {
        let donut = session.donut("Protein_At1g01010").unwrap();
        assert_eq!(donut.segments.len(), 2);
        assert!(session.donut("Protein_At2g30000").unwrap().neutral);

        let localities: Vec<&str> = session.bands().iter().map(|b| b.locality.as_str()).collect();
        assert_eq!(localities, vec!["nucleus", "unknown"]);
        assert!(session.engine().node("Compound_nucleus").is_some());
    }

    #[rstest]
    fn test_donut_visibility(mut session: Session) {
        session.set_donuts_visible(false);
        assert!(session.donuts().all(|(_, d)| !d.is_visible()));
    }

    #[rstest]
    fn test_reset_session(mut session: Session) {
        session.edge_links("Protein_At1g01010_Protein_At2g30000").unwrap();
        session.reset_session();

        assert_eq!(session.engine().node_count(), 0);
        assert!(session.aggregator().band().is_empty());
        assert!(session.bands().is_empty());
        assert_eq!(session.donuts().count(), 0);
        assert_eq!(session.classifier_mut().cached_entries(), 0);
    }

    #[rstest]
    fn test_native_round_trip(mut session: Session) {
        session.set_viewport(2.0, Position { x: 5.0, y: 6.0 });
        let json = session.export_document().to_json().unwrap();
        let before: Vec<_> = session.engine().nodes().cloned().collect();

        let mut restored = Session::default();
        assert_eq!(restored.import_document(&json).unwrap(), ImportKind::Native);
        let after: Vec<_> = restored.engine().nodes().cloned().collect();
        assert_eq!(after.len(), before.len());
        for (a, b) in after.iter().zip(&before) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.localization, b.localization);
            match (a.position, b.position) {
                (Some(pa), Some(pb)) => {
                    assert!((pa.x - pb.x).abs() < 1e-9 && (pa.y - pb.y).abs() < 1e-9)
                }
                (pa, pb) => assert_eq!(pa, pb),
            }
        }
        assert_eq!(restored.export_document().zoom, 2.0);
        assert_eq!(restored.aggregator().band().len(), 2);
    }

    #[rstest]
    fn test_external_import_is_laid_out(session: Session) {
        let mut document = session.export_document();
        document.aiv_graph = false;
        for node in &mut document.nodes {
            node.position = None;
        }
        let json = document.to_json().unwrap();

        let mut imported = Session::default();
        assert_eq!(imported.import_document(&json).unwrap(), ImportKind::External);
        assert!(!imported.bands().is_empty());
        assert!(
            imported
                .engine()
                .nodes()
                .filter(|n| n.node_type == NodeType::Protein)
                .all(|n| n.position.is_some())
        );
    }

    #[rstest]
    fn test_malformed_import_leaves_session_alone(mut session: Session) {
        let nodes = session.engine().node_count();
        assert!(matches!(
            session.import_document("{\"nodes\": 1}"),
            Err(DocumentError::Json(_))
        ));
        let dangling = r#"{"nodes": [], "edges": [{"id": "a_b", "source": "a", "target": "b",
            "published": false, "confidence": null, "correlation": null,
            "referenceList": "", "miAnnotations": [], "origins": []}]}"#;
        assert!(matches!(
            session.import_document(dangling),
            Err(DocumentError::Graph(_))
        ));
        assert_eq!(session.engine().node_count(), nodes);
    }
}
