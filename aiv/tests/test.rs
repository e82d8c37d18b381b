use std::collections::HashMap;
use std::fs::read_to_string;
use std::future::Future;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use rstest::*;

use aiv::config::AivConfig;
use aiv::core::models::{NodeType, OriginDatabase};
use aiv::ingest::error::FetchError;
use aiv::ingest::{SourceFetcher, SourceKind, SourceRequest};
use aiv::layout::LayoutError;
use aiv::{ImportKind, PipelineError, Session, run_query};

const PRIMARY_URL: &str = "http://primary.test/interactions";
const LOCALIZATION_URL: &str = "http://suba.test/scores";

/// Answers from files keyed by URL; any other URL is a 503.
struct CannedFetcher {
    responses: HashMap<String, String>,
}

impl SourceFetcher for CannedFetcher {
    fn fetch(
        &self,
        request: &SourceRequest,
    ) -> impl Future<Output = Result<String, FetchError>> + Send {
        let result = self.responses.get(&request.url).cloned().ok_or(FetchError::Status {
            kind: request.kind,
            status: 503,
            url: request.url.clone(),
        });
        async move { result }
    }
}

fn fixture(name: &str) -> String {
    read_to_string(format!("../tests/data/aiv/{}", name)).unwrap()
}

#[fixture]
fn config() -> AivConfig {
    let mut config = AivConfig::default();
    config.endpoints.primary = PRIMARY_URL.to_string();
    config.endpoints.exchange_a = "http://biogrid.test/{gene}".to_string();
    config.endpoints.exchange_b = "http://intact.test/{gene}".to_string();
    config.endpoints.localization = LOCALIZATION_URL.to_string();
    config.layout.seed = Some(5);
    config
}

#[fixture]
fn responses() -> HashMap<String, String> {
    HashMap::from([
        (PRIMARY_URL.to_string(), fixture("primary.json")),
        ("http://biogrid.test/At1g01010".to_string(), fixture("biogrid.tab")),
        ("http://intact.test/At1g01010".to_string(), fixture("intact.tab")),
        (LOCALIZATION_URL.to_string(), fixture("localization.json")),
    ])
}

fn query(config: AivConfig, responses: HashMap<String, String>) -> (Session, aiv::QueryReport) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut session = Session::new(config);
    let fetcher = Arc::new(CannedFetcher { responses });
    let report = runtime
        .block_on(run_query(&mut session, fetcher, &["AT1G01010".to_string()]))
        .unwrap();
    (session, report)
}

#[rstest]
fn test_sources_merge_into_one_edge(config: AivConfig, responses: HashMap<String, String>) {
    let (session, report) = query(config, responses);
    assert!(report.failures.is_empty());

    let engine = session.engine();
    let edge = engine
        .find_edge("Protein_At1g01010", "Protein_At2g30000")
        .unwrap();
    assert!(edge.published);
    assert_eq!(edge.confidence.as_deref(), Some("3"));
    assert_eq!(edge.correlation.as_deref(), Some("0.0015"));
    assert_eq!(
        edge.references().collect::<Vec<_>>(),
        vec![
            "BAR:PubMed19095804",
            "BioGRID:pubmed:20000001",
            "IntAct:pubmed:21798944"
        ]
    );
    assert_eq!(
        edge.mi_annotations,
        vec![
            "MI:0018 (two hybrid)".to_string(),
            "MI:0004 (affinity chromatography technology)".to_string(),
            "MI:0397 (two hybrid array)".to_string(),
        ]
    );
    assert_eq!(
        edge.origins,
        vec![
            OriginDatabase::PrimaryApi,
            OriginDatabase::ExchangeA,
            OriginDatabase::ExchangeB
        ]
    );

    assert_eq!(engine.edge_count(), 3);
    assert_eq!((report.created, report.merged, report.pdi), (3, 2, 2));
    let effector = engine
        .find_edge("Protein_At1g01010", "Effector_HopZ1a")
        .unwrap();
    assert_eq!(effector.confidence.as_deref(), Some("200"));
}

#[rstest]
fn test_protein_dna_interactions(config: AivConfig, responses: HashMap<String, String>) {
    let (session, _) = query(config, responses);
    let engine = session.engine();

    let chr5 = engine.node("DNA_Chr5").unwrap();
    assert!(chr5.locked);
    assert_eq!(chr5.position, Some(engine.area().chromosome_position('5')));

    let table = session.pdi_table();
    assert_eq!(table.len(), 2);
    assert!(table.iter().all(|row| row.source == "At1g01010" && row.published));
}

#[rstest]
fn test_localization_bands(config: AivConfig, responses: HashMap<String, String>) {
    let (session, report) = query(config, responses);
    let engine = session.engine();

    assert_eq!(report.localized, 3);
    let localities: Vec<&str> = report.bands.iter().map(|b| b.locality.as_str()).collect();
    assert_eq!(
        localities,
        vec!["extracellular", "plasma membrane", "nucleus", "unknown"]
    );

    for node in engine
        .nodes()
        .filter(|n| matches!(n.node_type, NodeType::Protein | NodeType::Effector))
    {
        let band = report
            .bands
            .iter()
            .find(|b| b.locality == node.locality())
            .unwrap();
        assert!(band.contains(node.position.unwrap().y));
    }

    let query_donut = session.donut("Protein_At1g01010").unwrap();
    assert_eq!(query_donut.segments.len(), 2);
    assert!((query_donut.total_length() - 100.0).abs() < 1e-9);
    assert!(session.donut("Protein_At3g50000").unwrap().neutral);
}

#[rstest]
fn test_failing_sources_are_reported(config: AivConfig, mut responses: HashMap<String, String>) {
    responses.remove("http://intact.test/At1g01010");
    responses.remove(LOCALIZATION_URL);
    let (session, report) = query(config, responses);

    let failed: Vec<SourceKind> = report.failures.iter().map(|f| f.source).collect();
    assert_eq!(failed, vec![SourceKind::ExchangeB, SourceKind::Localization]);
    assert_eq!(report.failures[0].status, Some(503));

    // the other sources still made it into the graph
    let edge = session
        .engine()
        .find_edge("Protein_At1g01010", "Protein_At2g30000")
        .unwrap();
    assert_eq!(edge.origins.len(), 2);
    assert_eq!(
        session.engine().node("Protein_At1g01010").unwrap().locality(),
        "unknown"
    );
}

#[rstest]
fn test_unreadable_primary_payload(config: AivConfig, mut responses: HashMap<String, String>) {
    responses.insert(PRIMARY_URL.to_string(), "<html>oops</html>".to_string());
    let (session, report) = query(config, responses);

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, SourceKind::PrimaryApi);
    assert_eq!(report.failures[0].status, None);
    assert_eq!(session.engine().edge_count(), 2);
}

#[rstest]
fn test_exported_document_round_trips(config: AivConfig, responses: HashMap<String, String>) {
    let (session, _) = query(config.clone(), responses);
    let json = session.export_document().to_json().unwrap();

    let mut restored = Session::new(config);
    assert_eq!(restored.import_document(&json).unwrap(), ImportKind::Native);
    assert_eq!(restored.engine().node_count(), session.engine().node_count());
    assert_eq!(restored.engine().edge_count(), session.engine().edge_count());
    assert!(restored.engine().node("DNA_Chr5").unwrap().locked);
    assert_eq!(restored.pdi_table(), session.pdi_table());
    assert_eq!(restored.pdi_table().len(), 2);
}

#[rstest]
fn test_unusable_layout_area_fails_the_query(
    mut config: AivConfig,
    responses: HashMap<String, String>,
) {
    config.layout.height = f64::NAN;
    assert!(config.validate().is_err());

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let mut session = Session::new(config);
    let fetcher = Arc::new(CannedFetcher { responses });
    let result = runtime.block_on(run_query(&mut session, fetcher, &["AT1G01010".to_string()]));
    assert!(matches!(
        result,
        Err(PipelineError::Layout(LayoutError::InvalidDimension { name: "height", .. }))
    ));
}
