// THEORY:
// The `Classifier` answers one question: which named color is this sample? It
// is the comparative half of the pixel layer. A `Pixel` knows how to describe
// itself in Lab; the classifier compares that description against every anchor
// of an injected `Palette` and reports the nearest one.
//
// Key architectural principles:
// 1.  **Total**: the search starts with an unbounded best distance, so the first
//     anchor always becomes a candidate and every RGB value gets an answer.
//     There is no "unknown" category and no error path.
// 2.  **Deterministic ties**: a later anchor replaces the current best only when
//     it is strictly closer, so exact ties go to the anchor listed first.
// 3.  **Exhaustive scan**: no early exit and no spatial index. The table is a
//     few hundred entries and classification runs once per sampled region, not
//     per raw pixel.
// 4.  **Shared, read-only palette**: classifiers hold an `Arc<Palette>` and are
//     cheap to clone into worker tasks.

use crate::core_modules::category::Category;
use crate::core_modules::palette::{Palette, PaletteEntry};
use crate::core_modules::pixel::pixel::{Lab, Pixel};
use std::sync::Arc;
use tracing::trace;

/// The outcome of a nearest-anchor search.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match {
    pub category: Category,
    pub reference: Pixel,
    pub distance: f64,
}

/// Strictly-closer scan, so equal distances keep the earlier entry.
fn nearest_entry<'a>(entries: &'a [PaletteEntry], lab: &Lab) -> Option<(&'a PaletteEntry, f64)> {
    let mut best: Option<(&PaletteEntry, f64)> = None;
    for entry in entries {
        let distance = entry.lab.distance(lab);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((entry, distance)),
        }
    }
    best
}

impl Palette {
    /// Nearest anchor to `lab`; ties resolve to the earliest entry.
    pub fn nearest(&self, lab: &Lab) -> Match {
        match nearest_entry(self.entries(), lab) {
            Some((entry, distance)) => Match {
                category: entry.reference.category,
                reference: entry.reference.color,
                distance,
            },
            // Only reachable for an empty palette, which `Palette::new` refuses.
            None => Match {
                category: Category::default(),
                reference: Pixel::default(),
                distance: f64::INFINITY,
            },
        }
    }

    pub fn lookup(&self, pixel: Pixel) -> Category {
        self.nearest(&pixel.to_lab()).category
    }
}

/// Maps samples to categories against a shared palette.
#[derive(Debug, Clone)]
pub struct Classifier {
    palette: Arc<Palette>,
}

impl Classifier {
    pub fn new(palette: Arc<Palette>) -> Self {
        Self { palette }
    }

    /// A classifier over the built-in reference table.
    pub fn standard() -> Self {
        Self::new(Arc::new(Palette::standard()))
    }

    pub fn palette(&self) -> &Arc<Palette> {
        &self.palette
    }

    pub fn classify(&self, pixel: impl Into<Pixel>) -> Category {
        self.classify_match(pixel).category
    }

    pub fn classify_match(&self, pixel: impl Into<Pixel>) -> Match {
        let pixel = pixel.into();
        let found = self.palette.nearest(&pixel.to_lab());
        trace!(
            sample = %pixel,
            reference = %found.reference,
            category = %found.category,
            distance = found.distance,
            "classified sample"
        );
        found
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::standard()
    }
}
