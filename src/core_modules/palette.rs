// THEORY:
// The reference palette is the curated set of anchors the classifier measures
// against: a few hundred hand-picked sRGB colors, each labelled with the category
// a person would name it. It is leaf data. Nothing here classifies anything.
//
// Key architectural principles:
// 1.  **Explicit construction, shared by reference**: a `Palette` is built once
//     (usually `Palette::standard()`) and handed to classifiers behind an `Arc`.
//     There is no hidden global; the palette is immutable after construction, so
//     any number of threads may read it without locking.
// 2.  **Order is meaningful**: entries are kept in the order given. The
//     nearest-neighbor search breaks exact distance ties in favour of the entry
//     that comes first, so the order is part of the observable behavior.
// 3.  **Precomputation**: each anchor's Lab coordinates are computed at
//     construction, so a lookup only converts the sample itself.
// 4.  **Uniqueness**: two anchors may not share an RGB triple, otherwise a sample
//     sitting exactly on that color would have two equally valid answers.

use crate::core_modules::category::Category::{self, *};
use crate::core_modules::pixel::pixel::{Lab, Pixel};
use crate::error::{PerceptionError, Result};
use std::collections::HashSet;
use tracing::debug;

/// A curated (color, category) anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferencePoint {
    pub color: Pixel,
    pub category: Category,
}

impl ReferencePoint {
    pub const fn new(color: Pixel, category: Category) -> Self {
        Self { color, category }
    }
}

const fn point(red: u8, green: u8, blue: u8, category: Category) -> ReferencePoint {
    ReferencePoint::new(Pixel::new(red, green, blue), category)
}

/// A reference point together with its precomputed Lab coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteEntry {
    pub reference: ReferencePoint,
    pub lab: Lab,
}

/// Immutable, ordered nearest-neighbor anchor table.
#[derive(Debug, Clone)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Builds a palette from caller-supplied anchors, keeping their order.
    pub fn new(points: impl IntoIterator<Item = ReferencePoint>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();
        for reference in points {
            if !seen.insert(reference.color) {
                return Err(PerceptionError::DuplicateReference(reference.color.channels()));
            }
            entries.push(PaletteEntry {
                lab: reference.color.to_lab(),
                reference,
            });
        }
        if entries.is_empty() {
            return Err(PerceptionError::EmptyPalette);
        }
        debug!(entries = entries.len(), "built reference palette");
        Ok(Self { entries })
    }

    /// The curated built-in table.
    pub fn standard() -> Self {
        let entries = STANDARD_REFERENCE_POINTS
            .iter()
            .map(|reference| PaletteEntry {
                reference: *reference,
                lab: reference.color.to_lab(),
            })
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Never true for a palette built through `new` or `standard`.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::standard()
    }
}

/// The curated anchors, in lookup priority order.
pub const STANDARD_REFERENCE_POINTS: &[ReferencePoint] = &[
    point(0x00, 0x00, 0x00, Black),
    point(0xA1, 0x88, 0x7F, Brown),
    point(0x8D, 0x6E, 0x63, Brown),
    point(0xA0, 0x7F, 0x6C, Brown),
    point(0x9B, 0x7B, 0x5B, Brown),
    point(0x75, 0x64, 0x5B, Brown),
    point(0x79, 0x55, 0x48, Brown),
    point(0x6D, 0x4C, 0x41, Brown),
    point(0x5D, 0x40, 0x37, Brown),
    point(0x9B, 0x61, 0x36, Brown),
    point(0xC1, 0xA4, 0x87, Brown),
    point(0xAA, 0x80, 0x62, Brown),
    point(0x6B, 0x55, 0x46, Brown),
    point(0xB4, 0xB5, 0x9C, Brown),
    point(0xB2, 0xB4, 0x9B, Green),
    point(0xE0, 0xE0, 0xE0, Grey),
    point(0x9E, 0x9E, 0x9E, Grey),
    point(0x75, 0x75, 0x75, Grey),
    point(0x61, 0x61, 0x61, Grey),
    point(0x42, 0x42, 0x42, Grey),
    point(0x84, 0x7A, 0x72, Grey),
    point(0xDF, 0xE0, 0xE1, Grey),
    point(0xFF, 0xFF, 0xFF, White),
    point(0xE4, 0xE4, 0xE4, White),
    point(0xE7, 0xE7, 0xE7, White),
    point(0xF3, 0xE5, 0xF5, Purple),
    point(0xE1, 0xBE, 0xE7, Purple),
    point(0xCE, 0x93, 0xD8, Purple),
    point(0xBA, 0x68, 0xC8, Purple),
    point(0xAB, 0x47, 0xBC, Purple),
    point(0x9C, 0x27, 0xB0, Purple),
    point(0x9B, 0x31, 0x8F, Purple),
    point(0x86, 0x00, 0x7E, Purple),
    point(0x8E, 0x24, 0xAA, Purple),
    point(0x7B, 0x1F, 0xA2, Purple),
    point(0x6A, 0x1B, 0x9A, Purple),
    point(0x4A, 0x14, 0x8C, Purple),
    point(0xAA, 0x00, 0xFF, Purple),
    point(0xED, 0xE7, 0xF6, Purple),
    point(0xD1, 0xC4, 0xE9, Purple),
    point(0xB3, 0x9D, 0xDB, Purple),
    point(0x95, 0x75, 0xCD, Purple),
    point(0x7E, 0x57, 0xC2, Purple),
    point(0x5E, 0x35, 0xB1, Purple),
    point(0x67, 0x3A, 0xB7, Purple),
    point(0x51, 0x2D, 0xA8, Purple),
    point(0x45, 0x27, 0xA0, Purple),
    point(0x31, 0x1B, 0x92, Purple),
    point(0xB3, 0x88, 0xFF, Purple),
    point(0x7C, 0x4D, 0xFF, Purple),
    point(0x8E, 0x64, 0x93, Purple),
    point(0x5E, 0x3A, 0x5E, Purple),
    point(0x44, 0x0E, 0x79, Purple),
    point(0x48, 0x36, 0x78, Purple),
    point(0x4E, 0x38, 0x80, Purple),
    point(0x3B, 0x0E, 0x79, Purple),
    point(0x3F, 0x51, 0xB5, Blue),
    point(0xC5, 0xCA, 0xE9, Blue),
    point(0x5C, 0x6B, 0xC0, Blue),
    point(0x39, 0x49, 0xAB, Blue),
    point(0x30, 0x3F, 0x9F, Blue),
    point(0x28, 0x35, 0x93, Blue),
    point(0x1A, 0x23, 0x7E, Blue),
    point(0x53, 0x6D, 0xFE, Blue),
    point(0x3D, 0x5A, 0xFE, Blue),
    point(0x30, 0x4F, 0xFE, Blue),
    point(0x21, 0x96, 0xF3, Blue),
    point(0xBB, 0xDE, 0xFB, Blue),
    point(0x90, 0xCA, 0xF9, Blue),
    point(0x64, 0xB5, 0xF6, Blue),
    point(0x42, 0xA5, 0xF5, Blue),
    point(0x1E, 0x88, 0xE5, Blue),
    point(0x19, 0x76, 0xD2, Blue),
    point(0x15, 0x65, 0xC0, Blue),
    point(0x0D, 0x47, 0xA1, Blue),
    point(0x82, 0xB1, 0xFF, Blue),
    point(0x44, 0x8A, 0xFF, Blue),
    point(0x29, 0x79, 0xFF, Blue),
    point(0x29, 0x62, 0xFF, Blue),
    point(0x03, 0xA9, 0xF6, Blue),
    point(0xB3, 0xE5, 0xFC, Blue),
    point(0x81, 0xD4, 0xFA, Blue),
    point(0x4F, 0xC3, 0xF7, Blue),
    point(0x29, 0xB6, 0xF6, Blue),
    point(0x03, 0x9B, 0xE5, Blue),
    point(0x02, 0x88, 0xD1, Blue),
    point(0x02, 0x77, 0xBD, Blue),
    point(0x01, 0x57, 0x9B, Blue),
    point(0x80, 0xD8, 0xFF, Blue),
    point(0x40, 0xC4, 0xFF, Blue),
    point(0x00, 0xB0, 0xFF, Blue),
    point(0x00, 0x91, 0xEA, Blue),
    point(0x60, 0x7D, 0x8B, Blue),
    point(0x78, 0x90, 0x9C, Blue),
    point(0x54, 0x6E, 0x7A, Blue),
    point(0x37, 0x47, 0x4F, Blue),
    point(0xE4, 0xEB, 0xFD, Blue),
    point(0x7D, 0xD3, 0xEA, Blue),
    point(0x07, 0x63, 0x99, Blue),
    point(0x28, 0x44, 0x6B, Blue),
    point(0x4A, 0xC8, 0xF5, Blue),
    point(0x08, 0x00, 0xF4, Blue),
    point(0x01, 0x2D, 0x5F, Blue),
    point(0xB2, 0xEB, 0xF2, Cyan),
    point(0x80, 0xDE, 0xEA, Cyan),
    point(0x4D, 0xD0, 0xE1, Cyan),
    point(0x26, 0xC6, 0xDA, Cyan),
    point(0x00, 0xB8, 0xD4, Cyan),
    point(0x00, 0xBC, 0xD4, Cyan),
    point(0x00, 0xAC, 0xC1, Cyan),
    point(0x00, 0x97, 0xA7, Cyan),
    point(0x00, 0x83, 0x8F, Cyan),
    point(0x00, 0x60, 0x64, Cyan),
    point(0x84, 0xFF, 0xFF, Cyan),
    point(0x18, 0xFF, 0xFF, Cyan),
    point(0x00, 0xE5, 0xFF, Cyan),
    point(0x00, 0x96, 0x88, Teal),
    point(0x00, 0x89, 0x7B, Teal),
    point(0x00, 0x79, 0x6B, Teal),
    point(0x00, 0x69, 0x5C, Teal),
    point(0x04, 0x5D, 0x5C, Teal),
    point(0x24, 0x5A, 0x5F, Teal),
    point(0x03, 0x45, 0x4F, Teal),
    point(0x2C, 0x54, 0x5E, Teal),
    point(0x17, 0x47, 0x41, Teal),
    point(0xE8, 0xF5, 0xE9, Green),
    point(0xC8, 0xE6, 0xC9, Green),
    point(0xAB, 0xC7, 0xB0, Green),
    point(0xA5, 0xD6, 0xA7, Green),
    point(0x81, 0xC7, 0x84, Green),
    point(0x66, 0xBB, 0x6A, Green),
    point(0x4C, 0xAF, 0x50, Green),
    point(0x43, 0xA0, 0x47, Green),
    point(0x38, 0x8E, 0x3C, Green),
    point(0x2E, 0x7D, 0x32, Green),
    point(0x1B, 0x5E, 0x20, Green),
    point(0xF1, 0xF8, 0xE9, Green),
    point(0xDC, 0xED, 0xC8, Green),
    point(0xC5, 0xE1, 0xA5, Green),
    point(0xAE, 0xD5, 0x81, Green),
    point(0x8B, 0xC3, 0x4A, Green),
    point(0x9C, 0xCC, 0x65, Green),
    point(0x7C, 0xB3, 0x42, Green),
    point(0x68, 0x9F, 0x38, Green),
    point(0x55, 0x8B, 0x2F, Green),
    point(0x33, 0x69, 0x1E, Green),
    point(0xB9, 0xF6, 0xCA, Green),
    point(0x69, 0xF0, 0xAE, Green),
    point(0x00, 0xC8, 0x53, Green),
    point(0x00, 0xE6, 0x76, Green),
    point(0xCC, 0xFF, 0x90, Green),
    point(0xB2, 0xFF, 0x59, Green),
    point(0x76, 0xFF, 0x03, Green),
    point(0x64, 0xDD, 0x17, Green),
    point(0xDD, 0xD5, 0x79, Green),
    point(0xEE, 0xEC, 0xA2, Green),
    point(0x24, 0x4E, 0x3B, Green),
    point(0x9A, 0x9D, 0x47, Green),
    point(0xBE, 0xBD, 0x76, Green),
    point(0x5C, 0x5A, 0x30, Green),
    point(0xB3, 0xC1, 0x6C, Green),
    point(0xAC, 0xA7, 0x83, Green),
    point(0x47, 0x4C, 0x25, Green),
    point(0xCD, 0xD0, 0x87, Green),
    point(0x79, 0x6D, 0x41, Green),
    point(0xF0, 0xF4, 0xC3, Lime),
    point(0xE6, 0xEE, 0x9C, Lime),
    point(0xDC, 0xE7, 0x75, Lime),
    point(0xD4, 0xE1, 0x57, Lime),
    point(0xCD, 0xDC, 0x39, Lime),
    point(0xC0, 0xCA, 0x33, Lime),
    point(0xAF, 0xB4, 0x2B, Lime),
    point(0xEE, 0xFF, 0x41, Lime),
    point(0xC6, 0xFF, 0x00, Lime),
    point(0xAE, 0xEA, 0x00, Lime),
    point(0xFF, 0xF9, 0xC4, Yellow),
    point(0xFF, 0xF5, 0x9D, Yellow),
    point(0xFF, 0xF1, 0x76, Yellow),
    point(0xFF, 0xEE, 0x58, Yellow),
    point(0xFF, 0xFF, 0x8D, Yellow),
    point(0xFF, 0xFF, 0x00, Yellow),
    point(0xFF, 0xD5, 0x4F, Yellow),
    point(0xFF, 0xCA, 0x28, Yellow),
    point(0xE3, 0xCE, 0x81, Yellow),
    point(0xD1, 0xAF, 0x52, Yellow),
    point(0xEE, 0xBB, 0x2B, Yellow),
    point(0xD3, 0xA8, 0x3A, Yellow),
    point(0xC5, 0xA7, 0x02, Yellow),
    point(0x9F, 0x82, 0x01, Yellow),
    point(0xE8, 0xCE, 0x03, Yellow),
    point(0xF9, 0xA8, 0x25, Orange),
    point(0xFF, 0x98, 0x00, Orange),
    point(0xFF, 0xA7, 0x26, Orange),
    point(0xFB, 0x8C, 0x00, Orange),
    point(0xF5, 0x7C, 0x00, Orange),
    point(0xEF, 0x6C, 0x00, Orange),
    point(0xFF, 0x91, 0x00, Orange),
    point(0xFF, 0x6D, 0x00, Orange),
    point(0xFD, 0x9A, 0x31, Orange),
    point(0x7D, 0x27, 0x04, Orange),
    point(0xFD, 0x57, 0x1F, Orange),
    point(0xF8, 0x67, 0x04, Orange),
    point(0xFD, 0x9A, 0x00, Orange),
    point(0xFE, 0x8A, 0x00, Orange),
    point(0xF1, 0x96, 0x52, Orange),
    point(0xE5, 0x83, 0x47, Orange),
    point(0xC9, 0x4C, 0x30, Orange),
    point(0x9F, 0x56, 0x01, Orange),
    point(0xFA, 0x68, 0x01, Orange),
    point(0xBB, 0x72, 0x3D, Orange),
    point(0xFF, 0x52, 0x52, Red),
    point(0xF4, 0x43, 0x36, Red),
    point(0xEF, 0x53, 0x50, Red),
    point(0xE5, 0x39, 0x35, Red),
    point(0xF6, 0x29, 0x2E, Red),
    point(0xFC, 0x25, 0x2D, Red),
    point(0xD3, 0x2F, 0x2F, Red),
    point(0xC6, 0x28, 0x28, Red),
    point(0xBA, 0x28, 0x30, Red),
    point(0xB7, 0x1C, 0x1C, Red),
    point(0xD5, 0x00, 0x00, Red),
    point(0xDB, 0x08, 0x06, Red),
    point(0xCF, 0x09, 0x04, Red),
    point(0xD8, 0x1A, 0x14, Red),
    point(0xCC, 0x17, 0x08, Red),
    point(0xD8, 0x0A, 0x07, Red),
    point(0xDE, 0x26, 0x16, Red),
    point(0xEE, 0x24, 0x0F, Red),
    point(0xA1, 0x21, 0x1F, Red),
    point(0x70, 0x12, 0x19, Red),
    point(0x51, 0x12, 0x18, Red),
    point(0x49, 0x11, 0x14, Red),
    point(0xFC, 0xE4, 0xEC, Pink),
    point(0xFD, 0xC8, 0xEB, Pink),
    point(0xE7, 0x9F, 0xA6, Pink),
    point(0xF8, 0xBB, 0xD0, Pink),
    point(0xF4, 0x8F, 0xB1, Pink),
    point(0xFF, 0x80, 0xAB, Pink),
    point(0xFF, 0x40, 0x81, Pink),
    point(0xF5, 0x00, 0x57, Pink),
    point(0xF0, 0x62, 0x92, Pink),
    point(0xEC, 0x40, 0x7A, Pink),
    point(0xE9, 0x1E, 0x63, Pink),
    point(0xD8, 0x1B, 0x60, Pink),
    point(0xC2, 0x18, 0x5B, Pink),
    point(0xFF, 0x00, 0xFF, Magenta),
    point(0xE5, 0x00, 0xE5, Magenta),
    point(0xF0, 0x00, 0xB5, Magenta),
    point(0xCE, 0x00, 0x9B, Magenta),
    point(0xC0, 0x05, 0x5B, Magenta),
    point(0xB0, 0x00, 0x85, Magenta),
    point(0xA8, 0x28, 0x63, Magenta),
    point(0x5B, 0x00, 0x2F, Magenta),
    point(0x4B, 0x01, 0x21, Magenta),
    point(0x86, 0x02, 0x25, Magenta),
    point(0xCB, 0x02, 0x3D, Magenta),
    point(0x64, 0x07, 0x1A, Magenta),
    point(0x9E, 0x00, 0x47, Magenta),
    point(0xDC, 0x7A, 0xCF, Magenta),
    point(0xED, 0xDE, 0xAC, Gold),
    point(0xE8, 0xB4, 0x51, Gold),
    point(0xC0, 0x8A, 0x3E, Gold),
    point(0xA2, 0x7D, 0x4B, Gold),
    point(0x75, 0x55, 0x31, Gold),
    point(0xD1, 0x93, 0x27, Gold),
    point(0xDE, 0xA2, 0x53, Gold),
    point(0xD5, 0xAA, 0x6F, Gold),
    point(0xF5, 0xEA, 0xD4, Gold),
];
