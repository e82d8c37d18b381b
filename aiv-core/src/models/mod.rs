pub mod chromosome;
pub mod edge;
pub mod node;
pub mod record;

// re-export for cleaner imports
pub use self::chromosome::{CHROMOSOME_LABELS, ChromosomeAggregate, LayoutArea, PdiRow};
pub use self::edge::GraphEdge;
pub use self::node::{
    EXTRACELLULAR_LOCALITY, GraphNode, LocalityScore, LocalizationEvidence, NodeType, Position,
    UNKNOWN_LOCALITY,
};
pub use self::record::{InteractionKind, InteractionRecord, OriginDatabase};
