// THEORY (Single-Pixel Color Science):
// The `Pixel` module is the most fundamental unit of the perception engine. It is a
// "dumb" data container for one opaque 8-bit sRGB sample plus the handful of
// single-pixel transforms the classifier and the samplers need. Nothing in here
// knows about categories, palettes or other pixels.
//
// What lives here:
// - Raw channels (RGB). Samples and reference colors are always fully opaque, so
//   there is no alpha channel.
// - sRGB → linear light, via a 256-entry `OnceLock` LUT (a table lookup instead
//   of a `powf` per channel).
// - linear RGB → CIE XYZ (D65) → CIE L*a*b*. Lab is the perceptually uniform
//   space the classifier measures distances in: Euclidean distance between two
//   Lab points approximates how different the two colors look.
// - Rec. 601 luma as a 0..255 brightness byte, and max−min chroma. These are the
//   cheap heuristics an upstream sampler uses to fill in per-sample brightness
//   and the per-image chroma byte.

pub mod pixel {
    use serde::{Deserialize, Serialize};
    use std::fmt;
    use std::sync::OnceLock;

    pub type Channel = u8;
    pub type NormalizedChannel = f64;
    pub type Luma = f64;

    // D65 reference white in XYZ, Y normalised to 1.0.
    const WHITE_X: f64 = 0.95047;
    const WHITE_Y: f64 = 1.0;
    const WHITE_Z: f64 = 1.08883;

    // CIE constants for the Lab companding function: delta = 6/29.
    const LAB_DELTA: f64 = 6.0 / 29.0;

    static SRGB_TO_LINEAR_LUT: OnceLock<[NormalizedChannel; 256]> = OnceLock::new();

    /// A single opaque sRGB color sample.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
    }

    /// A point in CIE L*a*b* (D65). `l` is in 0..=100.
    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    pub struct Lab {
        pub l: f64,
        pub a: f64,
        pub b: f64,
    }

    impl Lab {
        /// Euclidean distance (CIE76 delta E).
        pub fn distance(&self, other: &Lab) -> f64 {
            let dl = self.l - other.l;
            let da = self.a - other.a;
            let db = self.b - other.b;
            (dl * dl + da * da + db * db).sqrt()
        }
    }

    impl Pixel {
        pub const fn new(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel { red, green, blue }
        }

        pub const fn channels(&self) -> [Channel; 3] {
            [self.red, self.green, self.blue]
        }

        #[inline]
        fn srgb_to_linear(srgb_value: Channel) -> NormalizedChannel {
            let table = SRGB_TO_LINEAR_LUT.get_or_init(|| {
                let mut table = [0.0f64; 256];
                for (i, slot) in table.iter_mut().enumerate() {
                    let srgb_normalized = i as NormalizedChannel / 255.0;
                    *slot = if srgb_normalized <= 0.04045 {
                        srgb_normalized / 12.92
                    } else {
                        ((srgb_normalized + 0.055) / 1.055).powf(2.4)
                    };
                }
                table
            });
            table[srgb_value as usize]
        }

        /// CIE XYZ (D65) from linearised channels.
        pub fn to_xyz(&self) -> (f64, f64, f64) {
            let r = Self::srgb_to_linear(self.red);
            let g = Self::srgb_to_linear(self.green);
            let b = Self::srgb_to_linear(self.blue);
            let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
            let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
            let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;
            (x, y, z)
        }

        /// CIE L*a*b* relative to the D65 white point.
        pub fn to_lab(&self) -> Lab {
            let (x, y, z) = self.to_xyz();
            let fx = lab_f(x / WHITE_X);
            let fy = lab_f(y / WHITE_Y);
            let fz = lab_f(z / WHITE_Z);
            Lab {
                l: 116.0 * fy - 16.0,
                a: 500.0 * (fx - fy),
                b: 200.0 * (fy - fz),
            }
        }

        /// Rec. 601 luma on the 0..255 channel scale.
        pub fn luma(&self) -> Luma {
            0.299 * self.red as f64 + 0.587 * self.green as f64 + 0.114 * self.blue as f64
        }

        /// Luma rounded into a brightness byte.
        pub fn luminance(&self) -> u8 {
            self.luma().round().clamp(0.0, 255.0) as u8
        }

        /// Chroma (C): max(R,G,B) - min(R,G,B) on normalised sRGB, 0.0..=1.0.
        pub fn chroma(&self) -> NormalizedChannel {
            let max = self.red.max(self.green).max(self.blue);
            let min = self.red.min(self.green).min(self.blue);
            (max - min) as NormalizedChannel / 255.0
        }

        /// `#RRGGBB`, uppercase.
        pub fn hex(&self) -> String {
            format!("#{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
        }
    }

    fn lab_f(t: f64) -> f64 {
        if t > LAB_DELTA * LAB_DELTA * LAB_DELTA {
            t.cbrt()
        } else {
            t / (3.0 * LAB_DELTA * LAB_DELTA) + 4.0 / 29.0
        }
    }

    impl fmt::Display for Pixel {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.hex())
        }
    }

    impl From<[Channel; 3]> for Pixel {
        fn from(rgb: [Channel; 3]) -> Self {
            Pixel::new(rgb[0], rgb[1], rgb[2])
        }
    }

    impl From<(Channel, Channel, Channel)> for Pixel {
        fn from((red, green, blue): (Channel, Channel, Channel)) -> Self {
            Pixel::new(red, green, blue)
        }
    }

    impl From<image::Rgb<Channel>> for Pixel {
        fn from(rgb: image::Rgb<Channel>) -> Self {
            Pixel::from(rgb.0)
        }
    }

    impl From<Pixel> for image::Rgb<Channel> {
        fn from(pixel: Pixel) -> Self {
            image::Rgb(pixel.channels())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn approx(a: f64, b: f64, tolerance: f64) -> bool {
            (a - b).abs() < tolerance
        }

        #[test]
        fn black_is_lab_origin() {
            let lab = Pixel::new(0, 0, 0).to_lab();
            assert!(approx(lab.l, 0.0, 1e-9));
            assert!(approx(lab.a, 0.0, 1e-9));
            assert!(approx(lab.b, 0.0, 1e-9));
        }

        #[test]
        fn white_is_full_lightness_and_neutral() {
            let lab = Pixel::new(255, 255, 255).to_lab();
            assert!(approx(lab.l, 100.0, 1e-3));
            assert!(approx(lab.a, 0.0, 1e-3));
            assert!(approx(lab.b, 0.0, 1e-3));
        }

        #[test]
        fn pure_red_matches_reference_lab() {
            // sRGB red is roughly L=53.24, a=80.09, b=67.20.
            let lab = Pixel::new(255, 0, 0).to_lab();
            assert!(approx(lab.l, 53.24, 0.05));
            assert!(approx(lab.a, 80.09, 0.05));
            assert!(approx(lab.b, 67.20, 0.05));
        }

        #[test]
        fn distance_is_symmetric_and_zero_on_self() {
            let a = Pixel::new(12, 200, 99).to_lab();
            let b = Pixel::new(240, 17, 3).to_lab();
            assert_eq!(a.distance(&a), 0.0);
            assert_eq!(a.distance(&b), b.distance(&a));
            assert!(a.distance(&b) > 0.0);
        }

        #[test]
        fn luminance_and_chroma_heuristics() {
            assert_eq!(Pixel::new(0, 0, 0).luminance(), 0);
            assert_eq!(Pixel::new(255, 255, 255).luminance(), 255);
            assert_eq!(Pixel::new(128, 128, 128).chroma(), 0.0);
            assert_eq!(Pixel::new(255, 0, 0).chroma(), 1.0);
        }

        #[test]
        fn hex_and_image_conversions() {
            let pixel = Pixel::from(image::Rgb([0xE5, 0x73, 0x73]));
            assert_eq!(pixel.hex(), "#E57373");
            assert_eq!(image::Rgb::from(pixel), image::Rgb([0xE5, 0x73, 0x73]));
            assert_eq!(Pixel::from((1, 2, 3)), Pixel::new(1, 2, 3));
        }
    }
}
