//! Concurrent fan-out/fan-in over the interaction and localization sources.
//!
//! Every request is spawned onto the current runtime and the caller waits
//! until all of them have settled. A failing source never cancels its
//! siblings; it shows up as a [`FetchFailure`] next to the successful
//! responses, which are returned in request order.

use std::fmt::{self, Display};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinSet;

use crate::error::FetchError;

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize)]
pub enum SourceKind {
    PrimaryApi,
    ExchangeA,
    ExchangeB,
    Localization,
}

impl Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceKind::PrimaryApi => "BAR interactions API",
            SourceKind::ExchangeA => "BioGRID PSICQUIC",
            SourceKind::ExchangeB => "IntAct PSICQUIC",
            SourceKind::Localization => "SUBA localization",
        };
        write!(f, "{}", name)
    }
}

/// One outbound request. `body` switches the request from GET to a JSON POST.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRequest {
    pub kind: SourceKind,
    pub url: String,
    pub body: Option<Value>,
    /// Gene the request was issued for; exchange-feed parsing needs it.
    pub query_gene: Option<String>,
}

impl SourceRequest {
    pub fn get(kind: SourceKind, url: impl Into<String>) -> Self {
        SourceRequest {
            kind,
            url: url.into(),
            body: None,
            query_gene: None,
        }
    }

    pub fn post(kind: SourceKind, url: impl Into<String>, body: Value) -> Self {
        SourceRequest {
            kind,
            url: url.into(),
            body: Some(body),
            query_gene: None,
        }
    }

    pub fn for_gene(mut self, gene: impl Into<String>) -> Self {
        self.query_gene = Some(gene.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceResponse {
    pub request: SourceRequest,
    pub body: String,
}

/// Fetch-failure event surfaced to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchFailure {
    pub source: SourceKind,
    pub url: String,
    pub status: Option<u16>,
    pub message: String,
}

impl From<(&SourceRequest, FetchError)> for FetchFailure {
    fn from((request, error): (&SourceRequest, FetchError)) -> Self {
        FetchFailure {
            source: error.source_kind(),
            url: request.url.clone(),
            status: error.status(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FetchOutcome {
    pub responses: Vec<SourceResponse>,
    pub failures: Vec<FetchFailure>,
}

impl FetchOutcome {
    pub fn responses_for(&self, kind: SourceKind) -> impl Iterator<Item = &SourceResponse> {
        self.responses.iter().filter(move |r| r.request.kind == kind)
    }
}

///
/// Transport seam. The HTTP implementation is [`HttpFetcher`]; tests plug in
/// canned responses.
///
pub trait SourceFetcher: Send + Sync + 'static {
    fn fetch(
        &self,
        request: &SourceRequest,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(HttpFetcher { client })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, request: &SourceRequest) -> Result<String, FetchError> {
        let transport = |e: reqwest::Error| FetchError::Transport {
            kind: request.kind,
            url: request.url.clone(),
            message: e.to_string(),
        };

        let builder = match &request.body {
            Some(body) => self.client.post(&request.url).json(body),
            None => self.client.get(&request.url),
        };
        let response = builder.send().await.map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                kind: request.kind,
                status: status.as_u16(),
                url: request.url.clone(),
            });
        }
        response.text().await.map_err(transport)
    }
}

///
/// Issue every request concurrently and wait for all of them to settle.
///
pub async fn fetch_all<F: SourceFetcher>(
    fetcher: Arc<F>,
    requests: Vec<SourceRequest>,
) -> FetchOutcome {
    let mut tasks = JoinSet::new();
    for (index, request) in requests.iter().cloned().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        tasks.spawn(async move {
            let result = fetcher.fetch(&request).await;
            (index, result)
        });
    }

    let mut settled: Vec<Option<Result<String, FetchError>>> = vec![None; requests.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => settled[index] = Some(result),
            Err(e) => warn!("Fetch task did not complete: {}", e),
        }
    }

    let mut outcome = FetchOutcome::default();
    for (request, result) in requests.into_iter().zip(settled) {
        let result = result.unwrap_or_else(|| {
            Err(FetchError::Transport {
                kind: request.kind,
                url: request.url.clone(),
                message: "request was aborted".to_string(),
            })
        });
        match result {
            Ok(body) => {
                debug!("{} answered {} bytes", request.kind, body.len());
                outcome.responses.push(SourceResponse { request, body });
            }
            Err(error) => {
                warn!("{}", error);
                outcome.failures.push(FetchFailure::from((&request, error)));
            }
        }
    }
    outcome
}
