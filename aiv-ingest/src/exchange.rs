//! Line parser for the PSICQUIC exchange feeds.
//!
//! Both feeds answer with tab-delimited MITAB-like text. Each line is
//! tokenized into typed tokens ([`Token`]) and folded into an
//! [`ExchangeLine`]; the normalizer then turns lines that involve the query
//! gene into [`InteractionRecord`]s. Lines that do not parse are skipped,
//! so malformed text yields zero records rather than an error.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use aiv_core::models::{InteractionKind, InteractionRecord, OriginDatabase};
use aiv_core::utils::normalize_locus;

static LOCUS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bAT[1-5CM]G\d{5}\b").unwrap());

// psi-mi:"MI:0018"(two hybrid), with or without the quotes being escaped
static MI_TERM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)psi-mi:\\?"?(MI:\d{4})\\?"?\s*(?:\(([^)]*)\))?"#).unwrap()
});

/// Minimum number of columns a line needs to carry a detection method and a citation.
const MIN_COLUMNS: usize = 9;
const DETECTION_METHOD_COLUMN: usize = 6;
const PUBLICATION_COLUMN: usize = 8;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    MiTerm { code: String, label: Option<String> },
    Citation(String),
}

/// Column layout of one exchange feed.
#[derive(Debug, Clone, Copy)]
struct FeedLayout {
    /// columns searched for the locus of interactor A
    side_a: &'static [usize],
    /// columns searched for the locus of interactor B
    side_b: &'static [usize],
    /// citation databases preferred over the first listed citation
    preferred_citation: Option<&'static str>,
}

impl FeedLayout {
    fn for_origin(origin: OriginDatabase) -> FeedLayout {
        match origin {
            // entrez gene/locuslink:AT1G01010 in the alt id and alias columns
            OriginDatabase::ExchangeA => FeedLayout {
                side_a: &[2, 4],
                side_b: &[3, 5],
                preferred_citation: None,
            },
            // tair:At1g01010 in the id columns, uniprotkb:AT1G01010(locus name) in the alt ids
            OriginDatabase::ExchangeB | OriginDatabase::PrimaryApi => FeedLayout {
                side_a: &[0, 2, 4],
                side_b: &[1, 3, 5],
                preferred_citation: Some("pubmed"),
            },
        }
    }
}

///
/// Normalize an MI term token such as `psi-mi:"MI:0018"(two hybrid)` into
/// `MI:0018 (two hybrid)`.
///
pub fn normalize_mi_token(raw: &str) -> Option<Token> {
    let captures = MI_TERM_RE.captures(raw)?;
    let code = captures.get(1)?.as_str().to_ascii_uppercase();
    let label = captures
        .get(2)
        .map(|m| m.as_str().trim().to_string())
        .filter(|l| !l.is_empty());
    Some(Token::MiTerm { code, label })
}

impl Token {
    /// Annotation string stored on edges for MI tokens.
    pub fn annotation(&self) -> Option<String> {
        match self {
            Token::MiTerm {
                code,
                label: Some(label),
            } => Some(format!("{} ({})", code, label)),
            Token::MiTerm { code, label: None } => Some(code.clone()),
            _ => None,
        }
    }
}

/// One tokenized feed line.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExchangeLine {
    pub locus_a: Option<String>,
    pub locus_b: Option<String>,
    pub detection_method: Option<Token>,
    pub citation: Option<Token>,
}

impl ExchangeLine {
    ///
    /// The interaction partner of `query_gene`, or `None` when the line does
    /// not involve the query gene or describes a self-interaction.
    ///
    pub fn partner_of(&self, query_gene: &str) -> Option<&str> {
        let a = self.locus_a.as_deref()?;
        let b = self.locus_b.as_deref()?;
        let partner = if a == query_gene {
            b
        } else if b == query_gene {
            a
        } else {
            return None;
        };
        (partner != query_gene).then_some(partner)
    }
}

pub struct ExchangeParser {
    origin: OriginDatabase,
    layout: FeedLayout,
}

impl ExchangeParser {
    pub fn new(origin: OriginDatabase) -> Self {
        ExchangeParser {
            origin,
            layout: FeedLayout::for_origin(origin),
        }
    }

    pub fn origin(&self) -> OriginDatabase {
        self.origin
    }

    fn first_locus(columns: &[&str], wanted: &[usize]) -> Option<String> {
        wanted
            .iter()
            .filter_map(|i| columns.get(*i))
            .find_map(|column| LOCUS_RE.find(column))
            .map(|m| normalize_locus(m.as_str()))
    }

    fn citation(&self, column: &str) -> Option<Token> {
        let citations: Vec<&str> = column
            .split('|')
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != "-")
            .collect();
        let preferred = self.layout.preferred_citation.and_then(|db| {
            citations
                .iter()
                .find(|c| c.to_ascii_lowercase().starts_with(db))
        });
        preferred
            .or_else(|| citations.first())
            .map(|c| Token::Citation(c.to_string()))
    }

    /// Tokenize one line; `None` for comments, blank or short lines.
    pub fn tokenize(&self, line: &str) -> Option<ExchangeLine> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line.trim().is_empty() || line.starts_with('#') {
            return None;
        }
        let columns: Vec<&str> = line.split('\t').collect();
        if columns.len() < MIN_COLUMNS {
            return None;
        }

        Some(ExchangeLine {
            locus_a: Self::first_locus(&columns, self.layout.side_a),
            locus_b: Self::first_locus(&columns, self.layout.side_b),
            detection_method: normalize_mi_token(columns[DETECTION_METHOD_COLUMN]),
            citation: self.citation(columns[PUBLICATION_COLUMN]),
        })
    }

    ///
    /// Extract one record per line that pairs `query_gene` with another locus.
    ///
    /// Repeated lines for the same partner are all kept; merging them is the
    /// graph's job.
    ///
    pub fn parse(&self, text: &str, query_gene: &str) -> Vec<InteractionRecord> {
        let query_gene = normalize_locus(query_gene);
        let records: Vec<InteractionRecord> = text
            .lines()
            .filter_map(|line| self.tokenize(line))
            .filter_map(|line| {
                let partner = line.partner_of(&query_gene)?.to_string();
                let references = match &line.citation {
                    Some(Token::Citation(c)) => vec![c.clone()],
                    _ => Vec::new(),
                };
                let mi_term_codes = line
                    .detection_method
                    .as_ref()
                    .and_then(Token::annotation)
                    .into_iter()
                    .collect();
                Some(InteractionRecord {
                    source_gene_id: query_gene.clone(),
                    target_gene_id: partner,
                    kind: InteractionKind::Ppi,
                    origin: self.origin,
                    published: true,
                    confidence: None,
                    correlation: None,
                    references,
                    mi_term_codes,
                })
            })
            .collect();

        debug!(
            "{} feed yielded {} records for {}",
            self.origin,
            records.len(),
            query_gene
        );
        records
    }
}
