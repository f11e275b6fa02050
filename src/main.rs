// This binary stands in for the image sampler that normally feeds the library.
// It decodes each image, averages an N×N grid of regions into one sample per
// region, derives the chroma byte from the regions' mean chroma, and prints the
// stored record produced by the perception engine.

use anyhow::{Context, bail};
use color_perception::{
    Category, Chroma, ImageSamples, Palette, ParallelPipeline, Pixel, PipelineConfig, Sample,
};
use image::RgbImage;
use std::env;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_GRID: u32 = 3;

/// Averages `grid` × `grid` regions of the image, row by row.
fn sample_grid(image: &RgbImage, grid: u32) -> ImageSamples {
    let (width, height) = image.dimensions();
    let grid = grid.max(1).min(width.max(1)).min(height.max(1));
    let region_width = width / grid;
    let region_height = height / grid;
    let mut samples = Vec::with_capacity((grid * grid) as usize);
    let mut chroma_sum = 0.0;

    for region_index in 0..(grid * grid) {
        let region_x = region_index % grid;
        let region_y = region_index / grid;
        let (mut sum_r, mut sum_g, mut sum_b, mut count) = (0u64, 0u64, 0u64, 0u64);

        for y in (region_y * region_height)..((region_y + 1) * region_height) {
            for x in (region_x * region_width)..((region_x + 1) * region_width) {
                let [r, g, b] = image.get_pixel(x, y).0;
                sum_r += r as u64;
                sum_g += g as u64;
                sum_b += b as u64;
                count += 1;
            }
        }
        if count == 0 {
            continue;
        }

        let average = Pixel::new(
            (sum_r / count) as u8,
            (sum_g / count) as u8,
            (sum_b / count) as u8,
        );
        chroma_sum += average.chroma();
        samples.push(Sample::from_pixel(average));
    }

    let chroma = if samples.is_empty() {
        Chroma::default()
    } else {
        Chroma::from_fraction(chroma_sum / samples.len() as f64)
    };
    ImageSamples { samples, chroma }
}

fn parse_args() -> anyhow::Result<(u32, Vec<String>)> {
    let mut grid = DEFAULT_GRID;
    let mut paths = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--grid" {
            let value = args.next().context("--grid needs a value")?;
            grid = value.parse().with_context(|| format!("invalid grid size {value:?}"))?;
        } else {
            paths.push(arg);
        }
    }
    if paths.is_empty() {
        bail!("Usage: color_perception [--grid N] <image_path>...");
    }
    Ok((grid, paths))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "color_perception=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let (grid, paths) = parse_args()?;

    let mut images = Vec::with_capacity(paths.len());
    for path in &paths {
        let image = image::open(path)
            .with_context(|| format!("failed to open image {path}"))?
            .to_rgb8();
        images.push(sample_grid(&image, grid));
    }

    let pipeline = ParallelPipeline::new(Arc::new(Palette::standard()), PipelineConfig::default())?;
    let results = pipeline.analyze_batch(images).await?;

    for (path, result) in paths.iter().zip(&results) {
        let stored = result.to_stored();
        info!(path = %path, samples = result.sample_count(), "classified image");
        println!(
            "{path}: main={} ({}) colors={} luminance={} chroma={}",
            result.main_color().label(),
            stored.main_color,
            stored.colors,
            stored.luminance,
            stored.chroma,
        );
    }

    let legend: Vec<String> = Category::BY_ORDINAL
        .iter()
        .map(|category| format!("{:X}={}", category.ordinal(), category.name()))
        .collect();
    println!("legend: {}", legend.join(" "));

    pipeline.shutdown().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_regions_are_averaged_row_by_row() {
        let mut image = RgbImage::new(4, 2);
        for (x, _, pixel) in image.enumerate_pixels_mut() {
            *pixel = if x < 2 {
                image::Rgb([255, 0, 255])
            } else {
                image::Rgb([0, 0, 0])
            };
        }
        let sampled = sample_grid(&image, 2);
        let pixels: Vec<Pixel> = sampled.samples.iter().map(|s| s.pixel).collect();
        assert_eq!(
            pixels,
            vec![
                Pixel::new(255, 0, 255),
                Pixel::new(0, 0, 0),
                Pixel::new(255, 0, 255),
                Pixel::new(0, 0, 0),
            ]
        );
        assert_eq!(sampled.chroma, Chroma::from_fraction(0.5));
    }

    #[test]
    fn grid_is_clamped_to_image_size() {
        let image = RgbImage::from_pixel(1, 1, image::Rgb([10, 20, 30]));
        let sampled = sample_grid(&image, 8);
        assert_eq!(sampled.samples.len(), 1);
        assert_eq!(sampled.samples[0].pixel, Pixel::new(10, 20, 30));
    }
}
