// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Engine configuration. Every heuristic constant lives here with its default;
// partial JSON files are merged over the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpreadwerkError};

/// Heuristic thresholds used by metric extraction and classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Width/height ratio at or above which a page is a double spread.
    pub spread_aspect_ratio: f64,
    /// Grayscale intensity below which a pixel counts as dark (0-255).
    pub dark_intensity: u8,
    /// Fraction of dark pixels at or above which a page is a black page.
    pub black_page_ratio: f64,
    /// Grayscale standard deviation at or below which a page is a solid colour.
    pub solid_std_dev: f64,
    /// Grayscale intensity at or above which a pixel counts as white (0-255).
    pub white_intensity: u8,
    /// Width of each side band, as a fraction of the image width.
    pub side_band_fraction: f64,
    /// Minimum max-pairwise RGB channel difference for a "colour" pixel.
    pub color_channel_delta: u8,
    /// Fraction of colour pixels above which an image counts as colour.
    pub color_pixel_ratio: f64,
    /// Side of the square grid the image is resampled to before colour sampling.
    pub color_sample_grid: u32,
    /// Maximum number of resampled pixels inspected (row-major).
    pub color_sample_limit: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            spread_aspect_ratio: 1.35,
            dark_intensity: 40,
            black_page_ratio: 0.65,
            solid_std_dev: 4.0,
            white_intensity: 230,
            side_band_fraction: 0.33,
            color_channel_delta: 15,
            color_pixel_ratio: 0.05,
            color_sample_grid: 100,
            color_sample_limit: 1000,
        }
    }
}

impl Thresholds {
    /// Reject values that would make the heuristics meaningless.
    pub fn validate(&self) -> Result<()> {
        if !(self.spread_aspect_ratio > 0.0) {
            return Err(invalid("spread_aspect_ratio must be positive"));
        }
        if !(0.0..=1.0).contains(&self.black_page_ratio) {
            return Err(invalid("black_page_ratio must lie in [0, 1]"));
        }
        if !(self.solid_std_dev >= 0.0) {
            return Err(invalid("solid_std_dev must not be negative"));
        }
        if !(self.side_band_fraction > 0.0 && self.side_band_fraction <= 0.5) {
            return Err(invalid("side_band_fraction must lie in (0, 0.5]"));
        }
        if !(0.0..=1.0).contains(&self.color_pixel_ratio) {
            return Err(invalid("color_pixel_ratio must lie in [0, 1]"));
        }
        if self.color_sample_grid == 0 {
            return Err(invalid("color_sample_grid must be non-zero"));
        }
        if self.color_sample_limit == 0 {
            return Err(invalid("color_sample_limit must be non-zero"));
        }
        Ok(())
    }
}

/// Top-level layout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Heuristic thresholds.
    pub thresholds: Thresholds,
    /// Analyse page images to place spreads and fillers. When false, pages
    /// are paired strictly in twos without decoding anything.
    pub smart_pairing: bool,
    /// Size of the dedicated metric-extraction pool. `None` uses the shared
    /// pool, which is sized to the available cores.
    pub worker_threads: Option<usize>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            smart_pairing: true,
            worker_threads: None,
        }
    }
}

impl LayoutConfig {
    /// Parse a configuration from JSON, filling missing keys with defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<()> {
        if self.worker_threads == Some(0) {
            return Err(invalid("worker_threads must be at least 1"));
        }
        self.thresholds.validate()
    }
}

fn invalid(msg: &str) -> SpreadwerkError {
    SpreadwerkError::InvalidConfig(msg.to_string())
}
