// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Histogram statistics over 8-bit grayscale images.

use image::GrayImage;
use imageproc::stats::histogram;

/// Intensity histogram of a grayscale region.
pub(crate) struct GrayHistogram {
    bins: [u32; 256],
    total: u64,
}

impl GrayHistogram {
    pub(crate) fn of(gray: &GrayImage) -> Self {
        let bins = histogram(gray).channels[0];
        let total = bins.iter().map(|&count| count as u64).sum();
        Self { bins, total }
    }

    /// Fraction of pixels strictly below `threshold`.
    pub(crate) fn fraction_below(&self, threshold: u8) -> f64 {
        self.fraction(|level| level < threshold as usize)
    }

    /// Fraction of pixels at or above `threshold`.
    pub(crate) fn fraction_at_or_above(&self, threshold: u8) -> f64 {
        self.fraction(|level| level >= threshold as usize)
    }

    /// Number of pixels at or above `threshold`.
    pub(crate) fn count_at_or_above(&self, threshold: u8) -> u64 {
        self.count(|level| level >= threshold as usize)
    }

    /// Population standard deviation of the intensities.
    pub(crate) fn std_dev(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let n = self.total as f64;
        let mean = self
            .bins
            .iter()
            .enumerate()
            .map(|(level, &count)| level as f64 * count as f64)
            .sum::<f64>()
            / n;
        let variance = self
            .bins
            .iter()
            .enumerate()
            .map(|(level, &count)| count as f64 * (level as f64 - mean).powi(2))
            .sum::<f64>()
            / n;
        variance.sqrt()
    }

    fn fraction(&self, include: impl Fn(usize) -> bool) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(include) as f64 / self.total as f64
    }

    fn count(&self, include: impl Fn(usize) -> bool) -> u64 {
        self.bins
            .iter()
            .enumerate()
            .filter(|(level, _)| include(*level))
            .map(|(_, &count)| count as u64)
            .sum()
    }
}
