// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metrics extractor — aspect ratio, darkness ratio, grayscale spread, side
// band white density and colour-pixel ratio for a single page image.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgb};
use imageproc::map::map_colors;
use spreadwerk_core::{ImageMetrics, PageMetrics, PageRef, Result, SpreadwerkError, Thresholds};
use tracing::{debug, instrument, warn};

use super::gray::GrayHistogram;
use crate::source::PageSource;

/// Measures page images against a fixed set of thresholds.
///
/// Extraction is a pure function of the pixel data: the same bytes and
/// thresholds always produce the same metrics.
///
/// ```ignore
/// let extractor = MetricsExtractor::default();
/// match extractor.measure(&bytes) {
///     PageMetrics::Measured(m) => println!("aspect {:.2}", m.aspect_ratio),
///     PageMetrics::Undecodable => println!("unreadable page"),
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MetricsExtractor {
    thresholds: Thresholds,
}

impl MetricsExtractor {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Decode encoded image bytes (JPEG, PNG, WebP, ...) and measure them.
    #[instrument(skip(self, data), fields(data_len = data.len()))]
    pub fn extract(&self, data: &[u8]) -> Result<ImageMetrics> {
        let image = image::load_from_memory(data)
            .map_err(|err| SpreadwerkError::Decode(err.to_string()))?;
        self.extract_dynamic(&image)
    }

    /// Measure an already decoded image.
    pub fn extract_dynamic(&self, image: &DynamicImage) -> Result<ImageMetrics> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(SpreadwerkError::EmptyImage { width, height });
        }

        let gray = to_gray(image);
        let whole = GrayHistogram::of(&gray);
        let (left, right) = self.side_bands(&gray);
        let white = self.thresholds.white_intensity;

        let metrics = ImageMetrics {
            width,
            height,
            aspect_ratio: width as f64 / height as f64,
            darkness_ratio: whole.fraction_below(self.thresholds.dark_intensity),
            gray_std_dev: whole.std_dev(),
            left_white_density: left.fraction_at_or_above(white),
            right_white_density: right.fraction_at_or_above(white),
            left_white_pixels: left.count_at_or_above(white),
            right_white_pixels: right.count_at_or_above(white),
            color_pixel_ratio: self.color_pixel_ratio(image),
        };
        debug!(?metrics, "Page measured");
        Ok(metrics)
    }

    /// Total form of [`extract`](Self::extract): decode failures become the
    /// `Undecodable` sentinel instead of an error.
    pub fn measure(&self, data: &[u8]) -> PageMetrics {
        match self.extract(data) {
            Ok(metrics) => PageMetrics::Measured(metrics),
            Err(err) => {
                warn!(error = %err, "Page could not be measured; treating as undecodable");
                PageMetrics::Undecodable
            }
        }
    }

    /// Total form of [`extract_dynamic`](Self::extract_dynamic).
    pub fn measure_dynamic(&self, image: &DynamicImage) -> PageMetrics {
        match self.extract_dynamic(image) {
            Ok(metrics) => PageMetrics::Measured(metrics),
            Err(err) => {
                warn!(error = %err, "Page could not be measured; treating as undecodable");
                PageMetrics::Undecodable
            }
        }
    }

    /// Fetch a page from `source` and measure it. A page that cannot be read
    /// is as unusable as one that cannot be decoded.
    #[instrument(skip(self, source), fields(page = %page))]
    pub fn measure_page<S>(&self, source: &S, page: &PageRef) -> PageMetrics
    where
        S: PageSource + ?Sized,
    {
        match source.load(page) {
            Ok(bytes) => self.measure(&bytes),
            Err(err) => {
                warn!(error = %err, "Page could not be loaded; treating as undecodable");
                PageMetrics::Undecodable
            }
        }
    }

    // -- Helpers --------------------------------------------------------------

    /// Histograms of the leftmost and rightmost vertical bands.
    fn side_bands(&self, gray: &GrayImage) -> (GrayHistogram, GrayHistogram) {
        let (width, height) = gray.dimensions();
        let band = band_width(width, self.thresholds.side_band_fraction);

        let left = imageops::crop_imm(gray, 0, 0, band, height).to_image();
        let right = imageops::crop_imm(gray, width - band, 0, band, height).to_image();

        (GrayHistogram::of(&left), GrayHistogram::of(&right))
    }

    /// Fraction of sampled pixels whose RGB channels differ visibly.
    ///
    /// The image is resampled onto a small square grid and only the first
    /// `color_sample_limit` pixels (row-major) are inspected. Grayscale
    /// sources never count as colour.
    fn color_pixel_ratio(&self, image: &DynamicImage) -> f64 {
        if !image.color().has_color() {
            return 0.0;
        }

        let grid = self.thresholds.color_sample_grid;
        let small = image.resize_exact(grid, grid, FilterType::Lanczos3).to_rgb8();

        let mut sampled = 0usize;
        let mut colored = 0usize;
        for pixel in small.pixels().take(self.thresholds.color_sample_limit) {
            sampled += 1;
            let [r, g, b] = pixel.0;
            let spread = r.abs_diff(g).max(g.abs_diff(b)).max(r.abs_diff(b));
            if spread > self.thresholds.color_channel_delta {
                colored += 1;
            }
        }

        if sampled == 0 {
            0.0
        } else {
            colored as f64 / sampled as f64
        }
    }
}

/// Grayscale view with BT.601 luma weights, rounded to nearest. Sources
/// without colour channels are converted directly.
fn to_gray(image: &DynamicImage) -> GrayImage {
    if !image.color().has_color() {
        return image.to_luma8();
    }
    map_colors(&image.to_rgb8(), |Rgb([r, g, b])| {
        let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
        Luma([((weighted + 500) / 1000) as u8])
    })
}

/// Band width in columns: `floor(width * fraction)`, never narrower than one
/// column nor wider than the image.
fn band_width(width: u32, fraction: f64) -> u32 {
    ((width as f64 * fraction).floor() as u32).clamp(1, width)
}

// -- Tests --------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;
    use crate::classify::PageClassifier;
    use image::{ImageFormat, RgbImage};
    use spreadwerk_core::PageClass;

    fn encode_png(image: &DynamicImage) -> Vec<u8> {
        let mut buffer = Vec::new();
        image
            .write_to(&mut std::io::Cursor::new(&mut buffer), ImageFormat::Png)
            .unwrap();
        buffer
    }

    fn measured(image: DynamicImage) -> ImageMetrics {
        MetricsExtractor::default().extract_dynamic(&image).unwrap()
    }

    #[test]
    fn aspect_ratio_is_width_over_height() {
        let m = measured(DynamicImage::ImageLuma8(GrayImage::from_pixel(300, 200, Luma([90]))));
        assert_eq!((m.width, m.height), (300, 200));
        assert!((m.aspect_ratio - 1.5).abs() < 1e-12);
    }

    #[test]
    fn darkness_ratio_counts_pixels_below_forty() {
        // 7 of 10 rows are black, the rest are just at the threshold.
        let gray = GrayImage::from_fn(10, 10, |_, y| if y < 7 { Luma([0]) } else { Luma([40]) });
        let m = measured(DynamicImage::ImageLuma8(gray));
        assert!((m.darkness_ratio - 0.7).abs() < 1e-12);
        assert!(m.gray_std_dev > 10.0);
    }

    #[test]
    fn solid_page_has_no_spread() {
        let m = measured(DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 70, Luma([128]))));
        assert_eq!(m.gray_std_dev, 0.0);
        assert_eq!(m.darkness_ratio, 0.0);
    }

    #[test]
    fn white_density_measured_per_side_band() {
        // 40 white columns on the left of a 100-wide page, mid gray elsewhere.
        let gray = GrayImage::from_fn(100, 20, |x, _| if x < 40 { Luma([255]) } else { Luma([100]) });
        let m = measured(DynamicImage::ImageLuma8(gray));
        assert_eq!(m.left_white_density, 1.0);
        assert_eq!(m.right_white_density, 0.0);
        // Band is 33 columns by 20 rows.
        assert_eq!(m.left_white_pixels, 660);
        assert_eq!(m.right_white_pixels, 0);
    }

    #[test]
    fn colour_pages_use_bt601_luma() {
        let pixel = |rgb| {
            let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1, 1, Rgb(rgb)));
            to_gray(&image).get_pixel(0, 0)[0]
        };
        assert_eq!(pixel([0, 255, 0]), 150);
        assert_eq!(pixel([150, 0, 0]), 45);
        assert_eq!(pixel([255, 255, 255]), 255);
        assert_eq!(pixel([0, 0, 0]), 0);
    }

    #[test]
    fn dark_red_page_is_not_a_black_filler() {
        // Red at 150 weighs 45 in BT.601 luma, above the dark cutoff.
        let rgb = RgbImage::from_fn(100, 150, |_, y| {
            if y < 105 {
                Rgb([150, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let m = measured(DynamicImage::ImageRgb8(rgb));
        assert_eq!(m.darkness_ratio, 0.0);
        assert_eq!(
            PageClassifier::default().classify(&PageMetrics::Measured(m)),
            PageClass::Normal
        );
    }

    #[test]
    fn band_width_is_floored_and_clamped() {
        assert_eq!(band_width(300, 0.25), 75);
        assert_eq!(band_width(301, 0.25), 75);
        assert_eq!(band_width(2, 0.33), 1);
        assert_eq!(band_width(1, 0.5), 1);
    }

    #[test]
    fn strongly_tinted_page_is_colour() {
        let rgb = RgbImage::from_pixel(120, 160, Rgb([200, 30, 30]));
        let m = measured(DynamicImage::ImageRgb8(rgb));
        assert!(m.color_pixel_ratio > 0.99);
    }

    #[test]
    fn neutral_and_faint_tints_are_not_colour() {
        let neutral = RgbImage::from_pixel(120, 160, Rgb([120, 120, 120]));
        assert_eq!(measured(DynamicImage::ImageRgb8(neutral)).color_pixel_ratio, 0.0);

        // Max channel difference 10 stays under the 15 threshold.
        let faint = RgbImage::from_pixel(120, 160, Rgb([120, 125, 130]));
        assert_eq!(measured(DynamicImage::ImageRgb8(faint)).color_pixel_ratio, 0.0);
    }

    #[test]
    fn grayscale_source_short_circuits_colour() {
        let gray = GrayImage::from_pixel(40, 40, Luma([200]));
        assert_eq!(measured(DynamicImage::ImageLuma8(gray)).color_pixel_ratio, 0.0);
    }

    #[test]
    fn colour_sampling_only_looks_at_leading_rows() {
        // Colour confined to the bottom half never reaches the first 1000
        // samples (the top ten rows of the 100x100 grid).
        let rgb = RgbImage::from_fn(100, 100, |_, y| {
            if y < 50 {
                Rgb([128, 128, 128])
            } else {
                Rgb([0, 200, 0])
            }
        });
        assert_eq!(measured(DynamicImage::ImageRgb8(rgb)).color_pixel_ratio, 0.0);
    }

    #[test]
    fn extracts_from_encoded_bytes() {
        let bytes = encode_png(&DynamicImage::ImageLuma8(GrayImage::from_pixel(
            30,
            20,
            Luma([10]),
        )));
        let m = MetricsExtractor::default().extract(&bytes).unwrap();
        assert_eq!((m.width, m.height), (30, 20));
        assert_eq!(m.darkness_ratio, 1.0);
    }

    #[test]
    fn garbage_bytes_are_undecodable() {
        let extractor = MetricsExtractor::default();
        assert!(matches!(
            extractor.extract(b"definitely not an image"),
            Err(SpreadwerkError::Decode(_))
        ));
        assert_eq!(extractor.measure(b"definitely not an image"), PageMetrics::Undecodable);
    }

    #[test]
    fn zero_sized_image_is_undecodable() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let extractor = MetricsExtractor::default();
        assert!(matches!(
            extractor.extract_dynamic(&empty),
            Err(SpreadwerkError::EmptyImage { .. })
        ));
        assert_eq!(extractor.measure_dynamic(&empty), PageMetrics::Undecodable);
    }

    #[test]
    fn missing_page_measures_as_undecodable() {
        let source = MemorySource::new();
        let page = PageRef::new("absent.png", 0);
        assert_eq!(
            MetricsExtractor::default().measure_page(&source, &page),
            PageMetrics::Undecodable
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let rgb = RgbImage::from_fn(64, 90, |x, y| Rgb([(x * 3) as u8, (y * 2) as u8, 77]));
        let bytes = encode_png(&DynamicImage::ImageRgb8(rgb));
        let extractor = MetricsExtractor::default();
        assert_eq!(extractor.extract(&bytes).unwrap(), extractor.extract(&bytes).unwrap());
    }
}
