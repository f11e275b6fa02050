// THEORY:
// The `PerceptionAggregator` is the stateful heart of the engine. One aggregator
// observes the stream of samples taken from a single image and builds up three
// parallel views of it:
//
// 1.  **Color sequence**: the category of every sample, in sample order. Order is
//     part of the result because it is persisted as a positional string.
// 2.  **Brightness profile**: the luminance byte of every sample, parallel to the
//     color sequence. Brightness is carried, never interpreted.
// 3.  **Weighted vote**: a 16-slot tally indexed by category ordinal. Each sample
//     adds its category's salience weight, so three grey samples (3 × 1) lose to
//     one magenta sample (1 × 5). The winner is the "main color".
//
// Ownership rules: an aggregator belongs to exactly one analysis task and has no
// internal locking. Work can be split by giving each task its own aggregator and
// combining them afterwards with `merge`. `finalize` consumes the aggregator, so
// a finished analysis can never receive another sample.

use crate::core_modules::category::{CATEGORY_COUNT, Category};
use crate::core_modules::classifier::Classifier;
use crate::core_modules::pixel::pixel::Pixel;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-sample brightness byte.
pub type Luminance = u8;

/// Overall color intensity of an image, computed upstream and passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Chroma(pub u8);

impl Chroma {
    pub fn value(self) -> u8 {
        self.0
    }

    /// Scales a 0.0..=1.0 intensity into a byte, clamping out-of-range input.
    pub fn from_fraction(fraction: f64) -> Self {
        Chroma((fraction.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

impl fmt::Display for Chroma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One observation handed over by an image sampler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sample {
    pub pixel: Pixel,
    pub luminance: Luminance,
}

impl Sample {
    pub fn new(pixel: impl Into<Pixel>, luminance: Luminance) -> Self {
        Self {
            pixel: pixel.into(),
            luminance,
        }
    }

    /// A sample whose brightness is the pixel's own Rec. 601 luma.
    pub fn from_pixel(pixel: impl Into<Pixel>) -> Self {
        let pixel = pixel.into();
        Self {
            luminance: pixel.luminance(),
            pixel,
        }
    }
}

/// Salience-weighted votes per category, indexed by ordinal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally([u64; CATEGORY_COUNT]);

impl Tally {
    pub fn record(&mut self, category: Category) {
        self.0[category.ordinal() as usize] += category.weight() as u64;
    }

    pub fn get(&self, category: Category) -> u64 {
        self.0[category.ordinal() as usize]
    }

    pub fn merge(&mut self, other: &Tally) {
        for (slot, votes) in self.0.iter_mut().zip(other.0.iter()) {
            *slot += votes;
        }
    }

    /// The category with the most votes. Ties go to the lowest ordinal, and an
    /// empty tally yields `Category::Black`.
    pub fn leader(&self) -> Category {
        let mut leader = Category::Black;
        let mut most = self.get(leader);
        for category in Category::BY_ORDINAL {
            let votes = self.get(category);
            if votes > most {
                leader = category;
                most = votes;
            }
        }
        leader
    }

    pub fn from_categories<'a>(categories: impl IntoIterator<Item = &'a Category>) -> Self {
        let mut tally = Tally::default();
        for category in categories {
            tally.record(*category);
        }
        tally
    }
}

/// Accumulates the samples of one image.
#[derive(Debug, Clone)]
pub struct PerceptionAggregator {
    classifier: Classifier,
    colors: Vec<Category>,
    luminance: Vec<Luminance>,
    tally: Tally,
}

impl PerceptionAggregator {
    pub fn new(classifier: Classifier) -> Self {
        Self::with_capacity(classifier, 0)
    }

    pub fn with_capacity(classifier: Classifier, capacity: usize) -> Self {
        Self {
            classifier,
            colors: Vec::with_capacity(capacity),
            luminance: Vec::with_capacity(capacity),
            tally: Tally::default(),
        }
    }

    /// Classifies `pixel`, records it and its brightness, and returns the category.
    pub fn add_sample(&mut self, pixel: impl Into<Pixel>, luminance: Luminance) -> Category {
        let category = self.classifier.classify(pixel);
        self.colors.push(category);
        self.luminance.push(luminance);
        self.tally.record(category);
        category
    }

    pub fn add(&mut self, sample: Sample) -> Category {
        self.add_sample(sample.pixel, sample.luminance)
    }

    /// Current main color. With no samples this is `Category::Black`; check
    /// `sample_count()` to tell that apart from a genuinely dark image.
    pub fn main_category(&self) -> Category {
        self.tally.leader()
    }

    pub fn sample_count(&self) -> usize {
        self.colors.len()
    }

    pub fn tally(&self, category: Category) -> u64 {
        self.tally.get(category)
    }

    pub fn colors(&self) -> &[Category] {
        &self.colors
    }

    pub fn luminance(&self) -> &[Luminance] {
        &self.luminance
    }

    /// Appends `other`'s samples after this aggregator's and adds its votes.
    pub fn merge(&mut self, other: PerceptionAggregator) {
        self.colors.extend(other.colors);
        self.luminance.extend(other.luminance);
        self.tally.merge(&other.tally);
    }

    /// Freezes the analysis.
    pub fn finalize(self, chroma: Chroma) -> ClassificationResult {
        ClassificationResult {
            main_color: self.tally.leader(),
            colors: self.colors,
            luminance: self.luminance,
            chroma,
            tally: self.tally,
        }
    }
}

impl Extend<Sample> for PerceptionAggregator {
    fn extend<T: IntoIterator<Item = Sample>>(&mut self, samples: T) {
        for sample in samples {
            self.add(sample);
        }
    }
}

/// The immutable outcome of analyzing one image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    colors: Vec<Category>,
    main_color: Category,
    luminance: Vec<Luminance>,
    chroma: Chroma,
    tally: Tally,
}

impl ClassificationResult {
    /// Rebuilds a result from stored parts. The tally is recomputed from `colors`;
    /// `main_color` is kept as given.
    pub fn from_parts(
        colors: Vec<Category>,
        main_color: Category,
        luminance: Vec<Luminance>,
        chroma: Chroma,
    ) -> Self {
        Self {
            tally: Tally::from_categories(&colors),
            colors,
            main_color,
            luminance,
            chroma,
        }
    }

    pub fn colors(&self) -> &[Category] {
        &self.colors
    }

    pub fn main_color(&self) -> Category {
        self.main_color
    }

    pub fn luminance(&self) -> &[Luminance] {
        &self.luminance
    }

    pub fn chroma(&self) -> Chroma {
        self.chroma
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    pub fn sample_count(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREY: Pixel = Pixel::new(0x9E, 0x9E, 0x9E);
    const MAGENTA: Pixel = Pixel::new(0xFF, 0x00, 0xFF);

    fn aggregator() -> PerceptionAggregator {
        PerceptionAggregator::new(Classifier::standard())
    }

    #[test]
    fn salience_outweighs_frequency() {
        let mut perception = aggregator();
        perception.add_sample(GREY, 10);
        perception.add_sample(GREY, 20);
        perception.add_sample(MAGENTA, 30);
        perception.add_sample(GREY, 40);

        assert_eq!(perception.tally(Category::Grey), 3);
        assert_eq!(perception.tally(Category::Magenta), 5);
        assert_eq!(perception.main_category(), Category::Magenta);
        assert_eq!(
            perception.colors(),
            &[Category::Grey, Category::Grey, Category::Magenta, Category::Grey]
        );
        assert_eq!(perception.luminance(), &[10, 20, 30, 40]);
    }

    #[test]
    fn empty_aggregator_defaults_to_black() {
        let perception = aggregator();
        assert_eq!(perception.main_category(), Category::Black);
        assert_eq!(perception.sample_count(), 0);

        let result = perception.finalize(Chroma::default());
        assert!(result.is_empty());
        assert_eq!(result.main_color(), Category::Black);
    }

    #[test]
    fn ties_go_to_the_lowest_ordinal() {
        // Blue (6) and Green (9) both weigh 3.
        let mut tally = Tally::default();
        tally.record(Category::Green);
        tally.record(Category::Blue);
        assert_eq!(tally.leader(), Category::Blue);

        // Grey twice (2) ties White once (2); Grey has the lower ordinal.
        let mut tally = Tally::default();
        tally.record(Category::White);
        tally.record(Category::Grey);
        tally.record(Category::Grey);
        assert_eq!(tally.leader(), Category::Grey);
    }

    #[test]
    fn merge_appends_in_order_and_sums_votes() {
        let mut first = aggregator();
        first.add_sample(GREY, 1);
        let mut second = aggregator();
        second.add_sample(MAGENTA, 2);
        second.add_sample(GREY, 3);

        first.merge(second);
        assert_eq!(first.colors(), &[Category::Grey, Category::Magenta, Category::Grey]);
        assert_eq!(first.luminance(), &[1, 2, 3]);
        assert_eq!(first.tally(Category::Grey), 2);
        assert_eq!(first.main_category(), Category::Magenta);
    }

    #[test]
    fn finalize_freezes_everything() {
        let mut perception = aggregator();
        perception.extend([Sample::new(MAGENTA, 200), Sample::from_pixel(Pixel::new(0, 0, 0))]);
        let result = perception.finalize(Chroma(42));

        assert_eq!(result.sample_count(), 2);
        assert_eq!(result.colors(), &[Category::Magenta, Category::Black]);
        assert_eq!(result.luminance(), &[200, 0]);
        assert_eq!(result.chroma(), Chroma(42));
        assert_eq!(result.main_color(), Category::Magenta);
        assert_eq!(result.tally().get(Category::Black), 2);
    }

    #[test]
    fn chroma_from_fraction_clamps() {
        assert_eq!(Chroma::from_fraction(-1.0), Chroma(0));
        assert_eq!(Chroma::from_fraction(0.5), Chroma(128));
        assert_eq!(Chroma::from_fraction(7.0), Chroma(255));
    }
}
