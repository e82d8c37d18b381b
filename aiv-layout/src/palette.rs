use fxhash::FxHashMap as HashMap;
use rand::prelude::*;

use aiv_core::models::UNKNOWN_LOCALITY;

const FIXED_COLORS: &[(&str, &str)] = &[
    ("extracellular", "#FFD672"),
    ("plasma membrane", "#EDAA27"),
    ("cytoskeleton", "#DD8A0F"),
    ("cytosol", "#E0498A"),
    ("endoplasmic reticulum", "#D1111B"),
    ("golgi", "#A5A417"),
    ("vacuole", "#ECEA3A"),
    ("peroxisome", "#CE8665"),
    ("mitochondrion", "#41ABF9"),
    ("plastid", "#13971E"),
    ("nucleus", "#0032FF"),
    (UNKNOWN_LOCALITY, "#D8D8D8"),
];

const FALLBACK_COLORS: &[&str] = &[
    "#8A2BE2", "#5F9EA0", "#7FFF00", "#FF7F50", "#6495ED", "#008B8B", "#B8860B", "#556B2F",
];

///
/// Color assignment for localities.
///
/// Known localities have fixed colors. Others take the fallback colors in
/// order, and once those run out get random ones. An assignment never changes
/// until [`reset`](Self::reset).
///
#[derive(Debug)]
pub struct LocalityPalette {
    assigned: HashMap<String, String>,
    next_fallback: usize,
    rng: StdRng,
}

impl Default for LocalityPalette {
    fn default() -> Self {
        LocalityPalette::new(None)
    }
}

impl LocalityPalette {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None => StdRng::from_entropy(),
        };
        LocalityPalette {
            assigned: HashMap::default(),
            next_fallback: 0,
            rng,
        }
    }

    pub fn color_for(&mut self, locality: &str) -> String {
        if let Some((_, color)) = FIXED_COLORS.iter().find(|(name, _)| *name == locality) {
            return color.to_string();
        }
        if let Some(color) = self.assigned.get(locality) {
            return color.clone();
        }

        let color = match FALLBACK_COLORS.get(self.next_fallback) {
            Some(color) => {
                self.next_fallback += 1;
                color.to_string()
            }
            None => format!("#{:06X}", self.rng.gen_range(0..=0xFF_FFFFu32)),
        };
        self.assigned.insert(locality.to_string(), color.clone());
        color
    }

    pub fn reset(&mut self) {
        self.assigned.clear();
        self.next_fallback = 0;
    }
}
