//! Classification of citation strings into typed references with outbound links.
//!
//! Patterns are tried in a fixed priority order and the first match wins:
//! PubMed, MIND, AI-1, DOI, cross-database numeric ids and finally generic
//! `db:identifier` bibliographic ids. Results are memoized per query session
//! in a bounded cache owned by [`ReferenceClassifier`].

use std::hash::Hash;
use std::sync::LazyLock;

use fxhash::FxHashMap as HashMap;
use log::debug;
use regex::{Captures, Regex};
use serde::Serialize;
use thiserror::Error;

use aiv_core::models::OriginDatabase;

pub const DEFAULT_CACHE_CAPACITY: usize = 4096;

const AI1_LINK: &str = "https://doi.org/10.1126/science.1203877";
const MIND_LINK: &str = "https://associomics.dpb.carnegiescience.edu/Associomics/Home.html";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unrecognized reference format: {0}")]
pub struct ReferenceFormatError(pub String);

#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize)]
pub enum ReferenceKind {
    PubMed,
    Mind,
    Ai1,
    Doi,
    CrossDatabase,
    Bibliographic,
}

/// Rendering descriptor of one citation.
#[derive(PartialEq, Debug, Clone, Serialize)]
pub struct ReferenceLink {
    pub kind: ReferenceKind,
    pub origin: Option<OriginDatabase>,
    pub id: String,
    pub label: String,
    pub url: String,
}

struct ReferencePattern {
    kind: ReferenceKind,
    regex: Regex,
}

// order matters: the first matching pattern wins
static PATTERNS: LazyLock<Vec<ReferencePattern>> = LazyLock::new(|| {
    [
        (ReferenceKind::PubMed, r"(?i)^(?:pubmed|pmid)?[:\s_-]*(\d{1,9})$"),
        (ReferenceKind::Mind, r"(?i)^mind[:\s_-]*(\d+)$"),
        (ReferenceKind::Ai1, r"(?i)^ai-1(?:[:\s_-]+(.*))?$"),
        (
            ReferenceKind::Doi,
            r"(?i)^(?:doi:\s*|https?://(?:dx\.)?doi\.org/)?(10\.\d{4,9}/\S+)$",
        ),
        (
            ReferenceKind::CrossDatabase,
            r"(?i)^(biogrid|intact|mint|dip|bind)[:\s_-]*(\d+)$",
        ),
        (ReferenceKind::Bibliographic, r"^([A-Za-z][\w.]*):\s*(\S+)$"),
    ]
    .into_iter()
    .map(|(kind, pattern)| ReferencePattern {
        kind,
        regex: Regex::new(pattern).unwrap(),
    })
    .collect()
});

///
/// Split off a leading origin tag (`BAR:`, `BioGRID:`, `IntAct:`) as written
/// into edge reference blobs.
///
fn split_origin(citation: &str) -> (Option<OriginDatabase>, &str) {
    for origin in OriginDatabase::ALL {
        if let Some(rest) = citation
            .strip_prefix(origin.tag())
            .and_then(|rest| rest.strip_prefix(':'))
            .filter(|rest| !rest.trim().is_empty())
        {
            return (Some(origin), rest.trim());
        }
    }
    (None, citation)
}

fn describe(kind: ReferenceKind, caps: &Captures) -> (String, String, String) {
    let group = |i: usize| caps.get(i).map_or("", |m| m.as_str()).trim().to_string();
    match kind {
        ReferenceKind::PubMed => {
            let id = group(1);
            (
                format!("PubMed {}", id),
                format!("https://pubmed.ncbi.nlm.nih.gov/{}/", id),
                id,
            )
        }
        ReferenceKind::Mind => {
            let id = group(1);
            (format!("MIND ID {}", id), MIND_LINK.to_string(), id)
        }
        ReferenceKind::Ai1 => {
            let tag = group(1);
            let label = if tag.is_empty() {
                "AI-1".to_string()
            } else {
                format!("AI-1 {}", tag)
            };
            (label, AI1_LINK.to_string(), tag)
        }
        ReferenceKind::Doi => {
            let doi = group(1);
            (
                format!("DOI {}", doi),
                format!("https://doi.org/{}", doi),
                doi,
            )
        }
        ReferenceKind::CrossDatabase => {
            let db = group(1).to_ascii_lowercase();
            let id = group(2);
            let url = match db.as_str() {
                "biogrid" => format!("https://thebiogrid.org/interaction/{}", id),
                _ => format!("https://identifiers.org/{}:{}", db, id),
            };
            (format!("{} {}", db.to_ascii_uppercase(), id), url, id)
        }
        ReferenceKind::Bibliographic => {
            let db = group(1).to_ascii_lowercase();
            let id = group(2);
            (
                format!("{} {}", db, id),
                format!("https://identifiers.org/{}:{}", db, id),
                id,
            )
        }
    }
}

///
/// Classify a citation string without consulting any cache.
///
pub fn classify_reference(citation: &str) -> Result<ReferenceLink, ReferenceFormatError> {
    let (origin, body) = split_origin(citation.trim());
    PATTERNS
        .iter()
        .find_map(|pattern| {
            pattern.regex.captures(body).map(|caps| {
                let (label, url, id) = describe(pattern.kind, &caps);
                ReferenceLink {
                    kind: pattern.kind,
                    origin,
                    id,
                    label,
                    url,
                }
            })
        })
        .ok_or_else(|| ReferenceFormatError(citation.to_string()))
}

/// Split a newline-delimited reference blob into trimmed, non-empty entries.
pub fn sanitize_references(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

///
/// Map with a hard size bound: once full, the next insert starts over from an
/// empty map.
///
#[derive(Debug)]
pub struct BoundedCache<K, V> {
    entries: HashMap<K, V>,
    capacity: usize,
}

impl<K: Eq + Hash, V: Clone> BoundedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        BoundedCache {
            entries: HashMap::default(),
            capacity: capacity.max(1),
        }
    }

    pub fn get_or_insert_with(&mut self, key: K, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.entries.get(&key) {
            return value.clone();
        }
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        let value = compute();
        self.entries.insert(key, value.clone());
        value
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Memoizing front end for [`classify_reference`] and [`sanitize_references`].
#[derive(Debug)]
pub struct ReferenceClassifier {
    links: BoundedCache<String, Result<ReferenceLink, ReferenceFormatError>>,
    blobs: BoundedCache<String, Vec<String>>,
}

impl Default for ReferenceClassifier {
    fn default() -> Self {
        ReferenceClassifier::with_capacity(DEFAULT_CACHE_CAPACITY)
    }
}

impl ReferenceClassifier {
    pub fn with_capacity(capacity: usize) -> Self {
        ReferenceClassifier {
            links: BoundedCache::new(capacity),
            blobs: BoundedCache::new(capacity),
        }
    }

    pub fn classify(&mut self, citation: &str) -> Result<ReferenceLink, ReferenceFormatError> {
        self.links
            .get_or_insert_with(citation.to_string(), || classify_reference(citation))
    }

    /// Like [`classify`](Self::classify) but renders failures as "no link".
    pub fn link_or_none(&mut self, citation: &str) -> Option<ReferenceLink> {
        match self.classify(citation) {
            Ok(link) => Some(link),
            Err(e) => {
                debug!("{}", e);
                None
            }
        }
    }

    pub fn sanitize(&mut self, blob: &str) -> Vec<String> {
        self.blobs
            .get_or_insert_with(blob.to_string(), || sanitize_references(blob))
    }

    /// Drop everything memoized during the previous query.
    pub fn reset(&mut self) {
        self.links.clear();
        self.blobs.clear();
    }

    pub fn cached_entries(&self) -> usize {
        self.links.len() + self.blobs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("PubMed19095804", ReferenceKind::PubMed, "19095804")]
    #[case("pubmed:21798944", ReferenceKind::PubMed, "21798944")]
    #[case("20000001", ReferenceKind::PubMed, "20000001")]
    #[case("MIND123", ReferenceKind::Mind, "123")]
    #[case("mind:45", ReferenceKind::Mind, "45")]
    #[case("AI-1 Y2H", ReferenceKind::Ai1, "Y2H")]
    #[case("AI-1", ReferenceKind::Ai1, "")]
    #[case("doi:10.1038/nmeth.1223", ReferenceKind::Doi, "10.1038/nmeth.1223")]
    #[case("10.1126/science.1203877", ReferenceKind::Doi, "10.1126/science.1203877")]
    #[case("biogrid:778899", ReferenceKind::CrossDatabase, "778899")]
    #[case("MINT-8093321", ReferenceKind::CrossDatabase, "8093321")]
    #[case("imex:IM-15151", ReferenceKind::Bibliographic, "IM-15151")]
    fn test_classify(#[case] citation: &str, #[case] kind: ReferenceKind, #[case] id: &str) {
        let link = classify_reference(citation).unwrap();
        assert_eq!(link.kind, kind);
        assert_eq!(link.id, id);
    }

    #[rstest]
    fn test_classify_links() {
        let pubmed = classify_reference("PubMed123").unwrap();
        assert_eq!(pubmed.url, "https://pubmed.ncbi.nlm.nih.gov/123/");
        assert_eq!(pubmed.label, "PubMed 123");

        let doi = classify_reference("doi:10.1038/nmeth.1223").unwrap();
        assert_eq!(doi.url, "https://doi.org/10.1038/nmeth.1223");
    }

    #[rstest]
    fn test_classify_strips_origin_tag() {
        let link = classify_reference("BioGRID:pubmed:555").unwrap();
        assert_eq!(link.origin, Some(OriginDatabase::ExchangeA));
        assert_eq!(link.kind, ReferenceKind::PubMed);
        assert_eq!(link.id, "555");
    }

    #[rstest]
    #[case("")]
    #[case("Smith et al. 2010")]
    #[case("unpublished")]
    fn test_classify_failure(#[case] citation: &str) {
        assert_eq!(
            classify_reference(citation),
            Err(ReferenceFormatError(citation.to_string()))
        );
    }

    #[rstest]
    fn test_sanitize_references() {
        assert_eq!(
            sanitize_references("BAR:PubMed1\n\n  BioGRID:pubmed:2 \n"),
            vec!["BAR:PubMed1".to_string(), "BioGRID:pubmed:2".to_string()]
        );
        assert!(sanitize_references("\n \n").is_empty());
    }

    #[rstest]
    fn test_classifier_memoizes_and_resets() {
        let mut classifier = ReferenceClassifier::default();
        assert!(classifier.link_or_none("PubMed1").is_some());
        assert!(classifier.link_or_none("no idea").is_none());
        assert!(classifier.link_or_none("PubMed1").is_some());
        classifier.sanitize("a\nb");
        assert_eq!(classifier.cached_entries(), 3);

        classifier.reset();
        assert_eq!(classifier.cached_entries(), 0);
    }

    #[rstest]
    fn test_bounded_cache_never_exceeds_capacity() {
        let mut cache: BoundedCache<u32, u32> = BoundedCache::new(2);
        for key in 0..5 {
            cache.get_or_insert_with(key, || key * 2);
            assert!(cache.len() <= 2);
        }
        assert_eq!(cache.get_or_insert_with(4, || 0), 8);
    }
}
