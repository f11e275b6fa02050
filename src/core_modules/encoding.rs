// THEORY:
// The storage layer keeps a classification as four short strings so the values
// can sit in ordinary indexed text columns and be matched with LIKE queries:
//
//   colors      one uppercase hex digit per sample   (category ordinal, 0-F)
//   main_color  one hex digit                         (category ordinal)
//   luminance   two uppercase hex digits per sample   (brightness byte, 00-FF)
//   chroma      two hex digits                        (opaque intensity byte)
//
// Encoding can never fail because every domain value is in range by
// construction. Decoding is strict: anything other than `[0-9A-F]` in the exact
// expected width rejects the whole string, with no partial results and no
// lowercase leniency.

use crate::core_modules::category::Category;
use crate::core_modules::perception::{Chroma, ClassificationResult, Luminance};
use crate::error::{MalformedReason, PerceptionError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

const UPPER_HEX: &[u8; 16] = b"0123456789ABCDEF";

fn hex_digit(c: char) -> Option<u8> {
    match c {
        '0'..='9' => Some(c as u8 - b'0'),
        'A'..='F' => Some(c as u8 - b'A' + 10),
        _ => None,
    }
}

/// Validates width and alphabet, then returns one nibble per character.
/// Lengths and positions in errors count characters, not bytes.
fn nibbles(field: &'static str, encoded: &str, width: usize) -> Result<Vec<u8>> {
    let len = encoded.chars().count();
    if len % width != 0 {
        return Err(PerceptionError::malformed(
            field,
            MalformedReason::InvalidLength { len, width },
        ));
    }
    encoded
        .chars()
        .enumerate()
        .map(|(position, found)| {
            hex_digit(found).ok_or_else(|| PerceptionError::malformed(
                field,
                MalformedReason::InvalidDigit { position, found },
            ))
        })
        .collect()
}

fn exact_len(field: &'static str, encoded: &str, expected: usize) -> Result<()> {
    let len = encoded.chars().count();
    if len != expected {
        return Err(PerceptionError::malformed(
            field,
            MalformedReason::ExpectedLength { len, expected },
        ));
    }
    Ok(())
}

pub fn encode_category(category: Category) -> char {
    UPPER_HEX[category.ordinal() as usize] as char
}

pub fn encode_categories(colors: &[Category]) -> String {
    colors.iter().map(|category| encode_category(*category)).collect()
}

pub fn decode_categories(encoded: &str) -> Result<Vec<Category>> {
    nibbles("colors", encoded, 1)?
        .into_iter()
        .enumerate()
        .map(|(position, value)| {
            Category::from_ordinal(value).ok_or_else(|| PerceptionError::malformed(
                "colors",
                MalformedReason::OrdinalOutOfRange { position, value },
            ))
        })
        .collect()
}

/// Decodes the single-digit main color field.
pub fn decode_category(encoded: &str) -> Result<Category> {
    exact_len("main_color", encoded, 1)?;
    let value = nibbles("main_color", encoded, 1)?[0];
    Category::from_ordinal(value).ok_or_else(|| PerceptionError::malformed(
        "main_color",
        MalformedReason::OrdinalOutOfRange { position: 0, value },
    ))
}

pub fn encode_brightness(luminance: &[Luminance]) -> String {
    let mut encoded = String::with_capacity(luminance.len() * 2);
    for value in luminance {
        // Writing into a String cannot fail.
        let _ = write!(encoded, "{value:02X}");
    }
    encoded
}

pub fn decode_brightness(encoded: &str) -> Result<Vec<Luminance>> {
    Ok(nibbles("luminance", encoded, 2)?
        .chunks_exact(2)
        .map(|pair| (pair[0] << 4) | pair[1])
        .collect())
}

pub fn encode_chroma(chroma: Chroma) -> String {
    format!("{:02X}", chroma.value())
}

pub fn decode_chroma(encoded: &str) -> Result<Chroma> {
    exact_len("chroma", encoded, 2)?;
    let digits = nibbles("chroma", encoded, 2)?;
    Ok(Chroma((digits[0] << 4) | digits[1]))
}

/// The persisted form of a `ClassificationResult`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StoredPerception {
    pub colors: String,
    pub main_color: String,
    pub luminance: String,
    pub chroma: String,
}

impl StoredPerception {
    pub fn decode(&self) -> Result<ClassificationResult> {
        let colors = decode_categories(&self.colors)?;
        let main_color = decode_category(&self.main_color)?;
        let luminance = decode_brightness(&self.luminance)?;
        let chroma = decode_chroma(&self.chroma)?;
        if colors.len() != luminance.len() {
            return Err(PerceptionError::malformed(
                "luminance",
                MalformedReason::LengthMismatch {
                    colors: colors.len(),
                    luminance: luminance.len(),
                },
            ));
        }
        Ok(ClassificationResult::from_parts(colors, main_color, luminance, chroma))
    }
}

impl ClassificationResult {
    pub fn to_stored(&self) -> StoredPerception {
        StoredPerception {
            colors: encode_categories(self.colors()),
            main_color: encode_category(self.main_color()).to_string(),
            luminance: encode_brightness(self.luminance()),
            chroma: encode_chroma(self.chroma()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequences_encode_to_empty_strings() {
        assert_eq!(encode_categories(&[]), "");
        assert_eq!(encode_brightness(&[]), "");
        assert_eq!(decode_categories("").unwrap(), Vec::<Category>::new());
        assert_eq!(decode_brightness("").unwrap(), Vec::<Luminance>::new());
    }

    #[test]
    fn categories_use_one_uppercase_digit_each() {
        let colors = [Category::Black, Category::Lime, Category::Pink, Category::Grey];
        assert_eq!(encode_categories(&colors), "0AF2");
        assert_eq!(decode_categories("0AF2").unwrap(), colors);
        assert_eq!(decode_categories("F").unwrap(), vec![Category::Pink]);
    }

    #[test]
    fn brightness_uses_two_padded_digits_each() {
        assert_eq!(encode_brightness(&[0, 7, 171, 255]), "0007ABFF");
        assert_eq!(decode_brightness("0007ABFF").unwrap(), vec![0, 7, 171, 255]);
        assert_eq!(decode_brightness("FF").unwrap(), vec![255]);
    }

    #[test]
    fn invalid_characters_are_rejected() {
        assert_eq!(
            decode_categories("Q").unwrap_err(),
            PerceptionError::malformed(
                "colors",
                MalformedReason::InvalidDigit { position: 0, found: 'Q' }
            )
        );
        assert!(decode_categories("G").is_err());
        assert!(decode_categories("0a").is_err());
        assert!(decode_brightness("0g").is_err());
        assert!(decode_brightness("é").is_err());
    }

    #[test]
    fn odd_brightness_length_is_rejected() {
        assert_eq!(
            decode_brightness("A").unwrap_err(),
            PerceptionError::malformed(
                "luminance",
                MalformedReason::InvalidLength { len: 1, width: 2 }
            )
        );
    }

    #[test]
    fn errors_count_characters_not_bytes() {
        assert_eq!(
            decode_category("é").unwrap_err(),
            PerceptionError::malformed(
                "main_color",
                MalformedReason::InvalidDigit { position: 0, found: 'é' }
            )
        );
        assert_eq!(
            decode_chroma("é").unwrap_err(),
            PerceptionError::malformed(
                "chroma",
                MalformedReason::ExpectedLength { len: 1, expected: 2 }
            )
        );
        assert_eq!(
            decode_categories("0éZ").unwrap_err(),
            PerceptionError::malformed(
                "colors",
                MalformedReason::InvalidDigit { position: 1, found: 'é' }
            )
        );
        assert_eq!(
            decode_brightness("0é0").unwrap_err(),
            PerceptionError::malformed(
                "luminance",
                MalformedReason::InvalidLength { len: 3, width: 2 }
            )
        );
    }

    #[test]
    fn single_value_fields() {
        assert_eq!(encode_category(Category::Magenta), 'C');
        assert_eq!(decode_category("C").unwrap(), Category::Magenta);
        assert!(decode_category("").is_err());
        assert!(decode_category("CC").is_err());
        assert_eq!(encode_chroma(Chroma(9)), "09");
        assert_eq!(decode_chroma("09").unwrap(), Chroma(9));
        assert!(decode_chroma("9").is_err());
    }

    #[test]
    fn stored_record_round_trip() {
        let result = ClassificationResult::from_parts(
            vec![Category::Red, Category::Grey, Category::Red],
            Category::Red,
            vec![12, 128, 250],
            Chroma(77),
        );
        let stored = result.to_stored();
        assert_eq!(
            stored,
            StoredPerception {
                colors: "E2E".into(),
                main_color: "E".into(),
                luminance: "0C80FA".into(),
                chroma: "4D".into(),
            }
        );
        assert_eq!(stored.decode().unwrap(), result);
    }

    #[test]
    fn stored_record_rejects_mismatched_lengths() {
        let stored = StoredPerception {
            colors: "E2".into(),
            main_color: "E".into(),
            luminance: "0C".into(),
            chroma: "00".into(),
        };
        assert_eq!(
            stored.decode().unwrap_err(),
            PerceptionError::malformed(
                "luminance",
                MalformedReason::LengthMismatch { colors: 2, luminance: 1 }
            )
        );
    }
}
