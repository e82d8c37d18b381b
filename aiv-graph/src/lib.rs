//! # aiv-graph
//!
//! The interaction graph of a query session: a deduplicating merge engine over
//! normalized interaction records, the PSI-MI term dictionary used to annotate
//! edges and the classifier that turns edge citations into links.
pub mod errors;
pub mod merge;
pub mod mi;
pub mod references;

pub use errors::{MergeError, MergeResult};
pub use merge::{EdgeInsert, GraphMergeEngine, MergeOutcome, MergeSummary};
pub use mi::MiDictionary;
pub use references::{
    ReferenceClassifier, ReferenceFormatError, ReferenceKind, ReferenceLink, classify_reference,
    sanitize_references,
};
