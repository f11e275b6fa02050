// THEORY:
// The `Category` registry is the closed vocabulary of the engine: the sixteen
// human-meaningful color names every sample is eventually reduced to.
//
// Key architectural principles:
// 1.  **Ordinals are a storage contract**: each variant's discriminant is written
//     to storage as a single hex digit (0-F). Reordering or inserting variants is
//     a breaking change to every stored record, not a refactor.
// 2.  **Static, per-variant facts**: the display name, the salience weight used
//     for "main color" voting and the example swatch shown by UIs are all
//     resolved with a `match`, so the registry needs no tables or hashing.
// 3.  **Two orders**: ordinal order (storage) and presentation order (`ALL`,
//     warm to cold, then neutrals) differ.

use crate::core_modules::pixel::pixel::Pixel;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub const CATEGORY_COUNT: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
#[repr(u8)]
pub enum Category {
    #[default]
    Black = 0x0,
    Brown = 0x1,
    Grey = 0x2,
    White = 0x3,
    Purple = 0x4,
    Gold = 0x5,
    Blue = 0x6,
    Cyan = 0x7,
    Teal = 0x8,
    Green = 0x9,
    Lime = 0xA,
    Yellow = 0xB,
    Magenta = 0xC,
    Orange = 0xD,
    Red = 0xE,
    Pink = 0xF,
}

/// UI-facing description of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryInfo {
    pub name: String,
    pub label: String,
    pub example: String,
}

impl Category {
    /// Every category in presentation order.
    pub const ALL: [Category; CATEGORY_COUNT] = [
        Category::Red,
        Category::Magenta,
        Category::Pink,
        Category::Orange,
        Category::Gold,
        Category::Yellow,
        Category::Lime,
        Category::Green,
        Category::Teal,
        Category::Cyan,
        Category::Blue,
        Category::Purple,
        Category::Brown,
        Category::White,
        Category::Grey,
        Category::Black,
    ];

    /// Every category in ordinal order.
    pub const BY_ORDINAL: [Category; CATEGORY_COUNT] = [
        Category::Black,
        Category::Brown,
        Category::Grey,
        Category::White,
        Category::Purple,
        Category::Gold,
        Category::Blue,
        Category::Cyan,
        Category::Teal,
        Category::Green,
        Category::Lime,
        Category::Yellow,
        Category::Magenta,
        Category::Orange,
        Category::Red,
        Category::Pink,
    ];

    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Category> {
        Self::BY_ORDINAL.get(ordinal as usize).copied()
    }

    /// Lowercase identifier. Black and White are stored as "dark" and "bright".
    pub const fn name(self) -> &'static str {
        match self {
            Category::Black => "dark",
            Category::Brown => "brown",
            Category::Grey => "grey",
            Category::White => "bright",
            Category::Purple => "purple",
            Category::Gold => "gold",
            Category::Blue => "blue",
            Category::Cyan => "cyan",
            Category::Teal => "teal",
            Category::Green => "green",
            Category::Lime => "lime",
            Category::Yellow => "yellow",
            Category::Magenta => "magenta",
            Category::Orange => "orange",
            Category::Red => "red",
            Category::Pink => "pink",
        }
    }

    /// Capitalised display form of `name()`.
    pub fn label(self) -> String {
        let name = self.name();
        let mut chars = name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// How strongly one sample of this category counts toward the main color.
    /// Vivid, rare hues outvote desaturated ones.
    pub const fn weight(self) -> u16 {
        match self {
            Category::Grey => 1,
            Category::Black | Category::Brown | Category::White => 2,
            Category::Blue | Category::Green => 3,
            Category::Purple
            | Category::Gold
            | Category::Cyan
            | Category::Teal
            | Category::Orange
            | Category::Red
            | Category::Pink => 4,
            Category::Lime | Category::Yellow | Category::Magenta => 5,
        }
    }

    /// Representative swatch for UI presentation.
    pub const fn example(self) -> Pixel {
        match self {
            Category::Red => Pixel::new(0xE5, 0x73, 0x73),
            Category::Magenta => Pixel::new(0xFF, 0x00, 0xFF),
            Category::Pink => Pixel::new(0xF0, 0x62, 0x92),
            Category::Orange => Pixel::new(0xFF, 0xB7, 0x4D),
            Category::Brown => Pixel::new(0xA1, 0x88, 0x7F),
            Category::Gold => Pixel::new(0xFF, 0xD5, 0x4F),
            Category::Yellow => Pixel::new(0xFF, 0xF1, 0x76),
            Category::Lime => Pixel::new(0xDC, 0xE7, 0x75),
            Category::Green => Pixel::new(0x81, 0xC7, 0x84),
            Category::Teal => Pixel::new(0x4D, 0xB6, 0xAC),
            Category::Cyan => Pixel::new(0x4D, 0xD0, 0xE1),
            Category::Blue => Pixel::new(0x64, 0xB5, 0xF6),
            Category::Purple => Pixel::new(0xBA, 0x68, 0xC8),
            Category::White => Pixel::new(0xF5, 0xF5, 0xF5),
            Category::Grey => Pixel::new(0xBD, 0xBD, 0xBD),
            Category::Black => Pixel::new(0x33, 0x33, 0x33),
        }
    }

    pub fn info(self) -> CategoryInfo {
        CategoryInfo {
            name: self.name().to_string(),
            label: self.label(),
            example: self.example().hex(),
        }
    }

    /// Presentation records for every category, in presentation order.
    pub fn list() -> Vec<CategoryInfo> {
        Self::ALL.iter().map(|category| category.info()).collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown color category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::BY_ORDINAL
            .iter()
            .copied()
            .find(|category| category.name() == needle)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        category.name().to_string()
    }
}

impl TryFrom<String> for Category {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ordinals_are_stable() {
        for (index, category) in Category::BY_ORDINAL.iter().enumerate() {
            assert_eq!(category.ordinal() as usize, index);
        }
        assert_eq!(Category::Black.ordinal(), 0x0);
        assert_eq!(Category::Lime.ordinal(), 0xA);
        assert_eq!(Category::Pink.ordinal(), 0xF);
        assert_eq!(Category::from_ordinal(16), None);
    }

    #[test]
    fn presentation_order_covers_every_category_once() {
        let unique: HashSet<_> = Category::ALL.iter().collect();
        assert_eq!(unique.len(), CATEGORY_COUNT);
        assert_eq!(Category::ALL[0], Category::Red);
        assert_eq!(Category::ALL[15], Category::Black);
    }

    #[test]
    fn weights_favour_vivid_hues() {
        assert_eq!(Category::Grey.weight(), 1);
        assert_eq!(Category::Magenta.weight(), 5);
        for category in Category::ALL {
            assert!((1..=5).contains(&category.weight()));
        }
    }

    #[test]
    fn names_labels_and_parsing() {
        assert_eq!(Category::Black.name(), "dark");
        assert_eq!(Category::White.label(), "Bright");
        assert_eq!(Category::Teal.label(), "Teal");
        assert_eq!("Magenta".parse::<Category>(), Ok(Category::Magenta));
        assert_eq!(" bright ".parse::<Category>(), Ok(Category::White));
        assert!("black".parse::<Category>().is_err());
    }

    #[test]
    fn info_uses_example_swatch() {
        let info = Category::Red.info();
        assert_eq!(info.name, "red");
        assert_eq!(info.label, "Red");
        assert_eq!(info.example, "#E57373");
        assert_eq!(Category::list().len(), CATEGORY_COUNT);
    }
}
