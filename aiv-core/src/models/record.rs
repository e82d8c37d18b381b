use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

///
/// Kind of a physical interaction.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum InteractionKind {
    /// protein-protein interaction
    #[serde(rename = "PPI")]
    Ppi,
    /// protein-DNA interaction
    #[serde(rename = "PDI")]
    Pdi,
}

///
/// The database an interaction record was reported by.
///
#[derive(Eq, PartialEq, Hash, Debug, Clone, Copy, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OriginDatabase {
    /// First-party tabular interactions API
    #[serde(rename = "BAR")]
    PrimaryApi,
    /// BioGRID-style PSICQUIC feed
    #[serde(rename = "BioGRID")]
    ExchangeA,
    /// IntAct-style PSICQUIC feed
    #[serde(rename = "IntAct")]
    ExchangeB,
}

impl OriginDatabase {
    pub const ALL: [OriginDatabase; 3] = [
        OriginDatabase::PrimaryApi,
        OriginDatabase::ExchangeA,
        OriginDatabase::ExchangeB,
    ];

    /// Short tag used to prefix references coming from this database.
    pub fn tag(&self) -> &'static str {
        match self {
            OriginDatabase::PrimaryApi => "BAR",
            OriginDatabase::ExchangeA => "BioGRID",
            OriginDatabase::ExchangeB => "IntAct",
        }
    }

    pub fn from_tag(tag: &str) -> Option<OriginDatabase> {
        OriginDatabase::ALL
            .into_iter()
            .find(|db| db.tag().eq_ignore_ascii_case(tag))
    }

    /// Exchange feeds ship MI terms already annotated.
    pub fn is_exchange_feed(&self) -> bool {
        !matches!(self, OriginDatabase::PrimaryApi)
    }
}

impl Display for OriginDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

///
/// One interaction reported by one source, already normalized.
///
/// Gene ids are in canonical `At#g#####` form (or verbatim for non-AGI
/// entities). Numeric fields are fixed-point decimal strings.
///
#[derive(PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct InteractionRecord {
    pub source_gene_id: String,
    pub target_gene_id: String,
    pub kind: InteractionKind,
    pub origin: OriginDatabase,
    pub published: bool,
    pub confidence: Option<String>,
    pub correlation: Option<String>,
    pub references: Vec<String>,
    pub mi_term_codes: Vec<String>,
}

impl InteractionRecord {
    ///
    /// Reference strings tagged with the origin database, e.g. `BioGRID:pubmed:123`.
    ///
    pub fn tagged_references(&self) -> Vec<String> {
        self.references
            .iter()
            .map(|r| r.trim())
            .filter(|r| !r.is_empty())
            .map(|r| format!("{}:{}", self.origin.tag(), r))
            .collect()
    }
}
