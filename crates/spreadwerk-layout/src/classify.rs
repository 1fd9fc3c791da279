// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page classifier — threshold predicates over measured metrics.

use spreadwerk_core::{ColorClass, ImageMetrics, PageAnalysis, PageClass, PageMetrics, Thresholds};

/// Turns page metrics into categorical judgments.
#[derive(Debug, Clone, Default)]
pub struct PageClassifier {
    thresholds: Thresholds,
}

impl PageClassifier {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn is_double_spread(&self, m: &ImageMetrics) -> bool {
        m.aspect_ratio >= self.thresholds.spread_aspect_ratio
    }

    pub fn is_black_page(&self, m: &ImageMetrics) -> bool {
        m.darkness_ratio >= self.thresholds.black_page_ratio
    }

    pub fn is_solid_color_page(&self, m: &ImageMetrics) -> bool {
        m.gray_std_dev <= self.thresholds.solid_std_dev
    }

    pub fn is_filler(&self, m: &ImageMetrics) -> bool {
        self.is_black_page(m) || self.is_solid_color_page(m)
    }

    pub fn is_color_image(&self, m: &ImageMetrics) -> bool {
        m.color_pixel_ratio > self.thresholds.color_pixel_ratio
    }

    /// Pairing class of a page. Spread evidence wins over filler evidence.
    pub fn classify(&self, metrics: &PageMetrics) -> PageClass {
        match metrics {
            PageMetrics::Undecodable => PageClass::Undecodable,
            PageMetrics::Measured(m) if self.is_double_spread(m) => PageClass::DoubleSpread,
            PageMetrics::Measured(m) if self.is_filler(m) => PageClass::Filler,
            PageMetrics::Measured(_) => PageClass::Normal,
        }
    }

    /// Cover-path class. A page that could not be measured is never colour.
    pub fn color_class(&self, metrics: &PageMetrics) -> ColorClass {
        match metrics {
            PageMetrics::Measured(m) if self.is_color_image(m) => ColorClass::Color,
            _ => ColorClass::Monochrome,
        }
    }

    pub fn analyze(&self, metrics: PageMetrics) -> PageAnalysis {
        PageAnalysis {
            class: self.classify(&metrics),
            metrics,
        }
    }
}
