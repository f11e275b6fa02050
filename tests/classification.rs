//! End-to-end behavior of the public API.

use color_perception::{
    Category, Chroma, Classifier, MalformedReason, PerceptionAggregator, PerceptionError, Pixel,
    StoredPerception, decode_brightness, decode_categories,
};

#[test]
fn extremes_classify_to_black_and_white() {
    let classifier = Classifier::standard();
    assert_eq!(classifier.classify(Pixel::new(0, 0, 0)), Category::Black);
    assert_eq!(classifier.classify(Pixel::new(255, 255, 255)), Category::White);
}

#[test]
fn every_rgb_value_gets_a_category() {
    let classifier = Classifier::standard();
    for r in (0..=255u8).step_by(51) {
        for g in (0..=255u8).step_by(51) {
            for b in (0..=255u8).step_by(51) {
                let found = classifier.classify_match(Pixel::new(r, g, b));
                assert!(found.distance.is_finite());
                assert!(Category::from_ordinal(found.category.ordinal()).is_some());
            }
        }
    }
}

#[test]
fn salient_magenta_beats_frequent_grey() {
    let mut perception = PerceptionAggregator::new(Classifier::standard());
    for _ in 0..3 {
        perception.add_sample(Pixel::new(0x9E, 0x9E, 0x9E), 100);
    }
    perception.add_sample(Pixel::new(0xFF, 0x00, 0xFF), 100);
    assert_eq!(perception.main_category(), Category::Magenta);
}

#[test]
fn fresh_aggregator_reports_black() {
    let perception = PerceptionAggregator::new(Classifier::standard());
    assert_eq!(perception.main_category(), Category::Black);
}

#[test]
fn decoding_edge_cases() {
    assert!(matches!(
        decode_categories("Q"),
        Err(PerceptionError::MalformedEncoding {
            reason: MalformedReason::InvalidDigit { found: 'Q', .. },
            ..
        })
    ));
    assert_eq!(decode_categories("F").unwrap(), vec![Category::Pink]);
    assert!(matches!(
        decode_brightness("A"),
        Err(PerceptionError::MalformedEncoding {
            reason: MalformedReason::InvalidLength { len: 1, width: 2 },
            ..
        })
    ));
    assert_eq!(decode_brightness("FF").unwrap(), vec![255]);
}

#[test]
fn category_list_serializes_for_ui() {
    let json = serde_json::to_value(Category::list()).unwrap();
    assert_eq!(json[0]["name"], "red");
    assert_eq!(json[0]["label"], "Red");
    assert_eq!(json[0]["example"], "#E57373");
    assert_eq!(json[15]["name"], "dark");
    assert_eq!(json.as_array().unwrap().len(), 16);
}

#[test]
fn categories_serialize_by_name() {
    assert_eq!(serde_json::to_string(&Category::White).unwrap(), "\"bright\"");
    let parsed: Category = serde_json::from_str("\"teal\"").unwrap();
    assert_eq!(parsed, Category::Teal);
    assert!(serde_json::from_str::<Category>("\"mauve\"").is_err());
}

#[test]
fn stored_record_serializes_as_flat_strings() {
    let mut perception = PerceptionAggregator::new(Classifier::standard());
    perception.add_sample(Pixel::new(0xFF, 0x00, 0xFF), 0x10);
    let stored = perception.finalize(Chroma(0xAB)).to_stored();

    let json = serde_json::to_string(&stored).unwrap();
    assert_eq!(
        json,
        r#"{"colors":"C","main_color":"C","luminance":"10","chroma":"AB"}"#
    );
    let back: StoredPerception = serde_json::from_str(&json).unwrap();
    assert_eq!(back.decode().unwrap().main_color(), Category::Magenta);
}
