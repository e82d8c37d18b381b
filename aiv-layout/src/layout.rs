//! Layered layout: one horizontal band per locality, stacked top to bottom in
//! band order, with band heights proportional to their node counts.

use log::{debug, info};
use rand::prelude::*;
use serde::{Deserialize, Serialize};

use aiv_core::models::{NodeType, Position};
use aiv_graph::GraphMergeEngine;

use crate::errors::{LayoutError, LayoutResult};
use crate::localization::{LocalityBand, is_banded};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical gap above, between and below bands.
    pub separation: f64,
    /// Horizontal margin kept free on both sides.
    pub margin: f64,
    pub seed: Option<u64>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            separation: 20.0,
            margin: 40.0,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BandExtent {
    pub locality: String,
    pub index: usize,
    pub top: f64,
    pub height: f64,
    pub node_count: usize,
}

impl BandExtent {
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn contains(&self, y: f64) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

pub struct LayeredLayout {
    config: LayoutConfig,
    rng: StdRng,
}

impl Default for LayeredLayout {
    fn default() -> Self {
        LayeredLayout::new(LayoutConfig::default())
    }
}

impl LayeredLayout {
    pub fn new(config: LayoutConfig) -> Self {
        let rng = match config.seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        LayeredLayout { config, rng }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    ///
    /// Position every unlocked protein and effector node inside the band of
    /// its primary locality.
    ///
    /// Localities carried by nodes but missing from `band` are added in the
    /// usual band order. Locked nodes keep their position and still count
    /// towards the size of their band. The whole layout is recomputed on
    /// every call.
    ///
    pub fn run(
        &mut self,
        engine: &mut GraphMergeEngine,
        band: &LocalityBand,
    ) -> LayoutResult<Vec<BandExtent>> {
        let mut order = band.clone();
        for node in engine.nodes().filter(|n| is_banded(n)) {
            order.register(node.locality());
        }

        let counts: Vec<(String, usize)> = order
            .iter()
            .map(|locality| {
                let count = engine
                    .nodes()
                    .filter(|n| is_banded(n) && n.locality() == locality)
                    .count();
                (locality.to_string(), count)
            })
            .filter(|(_, count)| *count > 0)
            .collect();
        if counts.is_empty() {
            return Ok(Vec::new());
        }

        let area = engine.area();
        for (name, value) in [
            ("width", area.width),
            ("height", area.height),
            ("chromosome_row", area.chromosome_row),
            ("separation", self.config.separation),
            ("margin", self.config.margin),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidDimension { name, value });
            }
        }
        let chromosome_row = if engine.nodes().any(|n| n.node_type == NodeType::Dna) {
            area.chromosome_row
        } else {
            0.0
        };
        let separation = self.config.separation;
        let reserved = chromosome_row + separation * (counts.len() + 1) as f64;
        let usable = area.height - reserved;
        if !(usable > 0.0) {
            return Err(LayoutError::ContainerTooSmall {
                height: area.height,
                reserved,
                bands: counts.len(),
            });
        }

        let total: usize = counts.iter().map(|(_, count)| count).sum();
        let mut top = separation;
        let extents: Vec<BandExtent> = counts
            .into_iter()
            .enumerate()
            .map(|(index, (locality, node_count))| {
                let height = usable * node_count as f64 / total as f64;
                let extent = BandExtent {
                    locality,
                    index,
                    top,
                    height,
                    node_count,
                };
                top += height + separation;
                extent
            })
            .collect();

        let margin = self.config.margin;
        let mut moved = 0;
        for node in engine.nodes_mut().filter(|n| is_banded(n) && !n.locked) {
            let Some(extent) = extents.iter().find(|e| e.locality == node.locality()) else {
                continue;
            };
            let x = if area.width > 2.0 * margin {
                self.rng.gen_range(margin..=area.width - margin)
            } else {
                area.width / 2.0
            };
            let y = self.rng.gen_range(extent.top..=extent.bottom());
            node.position = Some(Position { x, y });
            moved += 1;
        }

        for extent in &extents {
            debug!(
                "Band {} '{}': top {:.1}, height {:.1}, {} nodes",
                extent.index, extent.locality, extent.top, extent.height, extent.node_count
            );
        }
        info!("Placed {} nodes in {} bands", moved, extents.len());
        Ok(extents)
    }
}
