//! One query from gene list to laid-out graph.
//!
//! 1. reset the session and add the query genes,
//! 2. fetch the primary API and both exchange feeds concurrently,
//! 3. merge primary API, feed A and feed B records, in that order,
//! 4. fetch localization scores for every protein in the graph,
//! 5. band, encode and lay out.
//!
//! A source that fails or answers garbage is reported in the [`QueryReport`]
//! and the query carries on with what the other sources returned.

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use aiv_core::models::{InteractionRecord, NodeType, OriginDatabase};
use aiv_core::utils::normalize_locus;
use aiv_graph::MergeSummary;
use aiv_ingest::{
    ExchangeParser, FetchFailure, LocalizationResponse, SourceFetcher, SourceKind, SourceRequest,
    SourceResponse, fetch_all, normalize_primary, parse_localizations,
};
use aiv_layout::{BandExtent, LayoutError};

use crate::config::{EndpointConfig, GENE_PLACEHOLDER};
use crate::session::Session;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("No query genes given")]
    NoGenes,
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReport {
    pub genes: Vec<String>,
    pub created: usize,
    pub merged: usize,
    pub pdi: usize,
    pub skipped: usize,
    pub localized: usize,
    pub bands: Vec<BandExtent>,
    pub failures: Vec<FetchFailure>,
}

impl QueryReport {
    fn add(&mut self, summary: MergeSummary) {
        self.created += summary.created;
        self.merged += summary.merged;
        self.pdi += summary.pdi;
        self.skipped += summary.skipped;
    }
}

/// Canonical, de-duplicated query genes in input order.
pub fn normalize_genes(genes: &[String]) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(genes.len());
    for gene in genes.iter().map(|g| normalize_locus(g)) {
        if !gene.is_empty() && !normalized.contains(&gene) {
            normalized.push(gene);
        }
    }
    normalized
}

/// Primary API request plus one request per gene and exchange feed.
pub fn interaction_requests(endpoints: &EndpointConfig, genes: &[String]) -> Vec<SourceRequest> {
    let mut requests = vec![SourceRequest::post(
        SourceKind::PrimaryApi,
        &endpoints.primary,
        json!({ "loci": genes, "recursive": false, "published": false }),
    )];
    if endpoints.exchange_feeds {
        for (kind, template) in [
            (SourceKind::ExchangeA, &endpoints.exchange_a),
            (SourceKind::ExchangeB, &endpoints.exchange_b),
        ] {
            for gene in genes {
                let url = template.replace(GENE_PLACEHOLDER, gene);
                requests.push(SourceRequest::get(kind, url).for_gene(gene.as_str()));
            }
        }
    }
    requests
}

pub fn localization_request(endpoints: &EndpointConfig, genes: &[String]) -> SourceRequest {
    SourceRequest::post(
        SourceKind::Localization,
        &endpoints.localization,
        json!({ "AGI_IDs": genes, "include_predicted": "yes" }),
    )
}

fn unreadable(response: &SourceResponse, message: String) -> FetchFailure {
    FetchFailure {
        source: response.request.kind,
        url: response.request.url.clone(),
        status: None,
        message,
    }
}

fn exchange_records(response: &SourceResponse, origin: OriginDatabase) -> Vec<InteractionRecord> {
    match &response.request.query_gene {
        Some(gene) => ExchangeParser::new(origin).parse(&response.body, gene),
        None => Vec::new(),
    }
}

///
/// Run a complete query against `fetcher`, leaving the result in `session`.
///
pub async fn run_query<F: SourceFetcher>(
    session: &mut Session,
    fetcher: Arc<F>,
    genes: &[String],
) -> PipelineResult<QueryReport> {
    let genes = normalize_genes(genes);
    if genes.is_empty() {
        return Err(PipelineError::NoGenes);
    }

    session.reset_session();
    session.add_query_genes(&genes);
    let mut report = QueryReport {
        genes: genes.clone(),
        created: 0,
        merged: 0,
        pdi: 0,
        skipped: 0,
        localized: 0,
        bands: Vec::new(),
        failures: Vec::new(),
    };

    let endpoints = session.config().endpoints.clone();
    let outcome = fetch_all(Arc::clone(&fetcher), interaction_requests(&endpoints, &genes)).await;
    report.failures.extend(outcome.failures.iter().cloned());

    for response in outcome.responses_for(SourceKind::PrimaryApi) {
        match normalize_primary(&response.body) {
            Ok(records) => report.add(session.merge_records(&records)),
            Err(e) => {
                warn!("{}", e);
                report.failures.push(unreadable(response, e.to_string()));
            }
        }
    }
    for (kind, origin) in [
        (SourceKind::ExchangeA, OriginDatabase::ExchangeA),
        (SourceKind::ExchangeB, OriginDatabase::ExchangeB),
    ] {
        for response in outcome.responses_for(kind) {
            let records = exchange_records(response, origin);
            report.add(session.merge_records(&records));
        }
    }

    let proteins: Vec<String> = session
        .engine()
        .nodes()
        .filter(|n| n.node_type == NodeType::Protein)
        .map(|n| n.gene_id.clone())
        .collect();
    let outcome = fetch_all(fetcher, vec![localization_request(&endpoints, &proteins)]).await;
    report.failures.extend(outcome.failures.iter().cloned());

    let mut localizations = LocalizationResponse::new();
    for response in &outcome.responses {
        match parse_localizations(&response.body) {
            Ok(parsed) => localizations.extend(parsed),
            Err(e) => {
                warn!("{}", e);
                report.failures.push(unreadable(response, e.to_string()));
            }
        }
    }

    report.localized = session.apply_localizations(&localizations)?;
    report.bands = session.bands().to_vec();
    info!(
        "Query {:?}: {} nodes, {} edges, {} failed sources",
        genes,
        session.engine().node_count(),
        session.engine().edge_count(),
        report.failures.len()
    );
    Ok(report)
}
