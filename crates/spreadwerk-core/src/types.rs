// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Spreadwerk pairing engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};

/// A page of a chapter: its identifier and its position in the chapter's
/// natural-sort order.
///
/// The identifier is reference-counted, so groups and layouts share it with
/// the owning [`Chapter`] instead of copying it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageRef {
    pub id: Arc<str>,
    pub position: usize,
}

impl PageRef {
    pub fn new(id: impl Into<Arc<str>>, position: usize) -> Self {
        Self {
            id: id.into(),
            position,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl std::fmt::Display for PageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// An ordered chapter, as handed over by chapter enumeration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chapter {
    pages: Vec<PageRef>,
}

impl Chapter {
    /// Build a chapter from identifiers that are already naturally sorted.
    /// The order is taken as-is.
    pub fn from_sorted_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let pages = ids
            .into_iter()
            .enumerate()
            .map(|(position, id)| PageRef::new(id, position))
            .collect();
        Self { pages }
    }

    pub fn pages(&self) -> &[PageRef] {
        &self.pages
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn first(&self) -> Option<&PageRef> {
        self.pages.first()
    }
}

/// Scalar features measured on one decoded page image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageMetrics {
    pub width: u32,
    pub height: u32,
    pub aspect_ratio: f64,
    /// Fraction of grayscale pixels below the dark threshold.
    pub darkness_ratio: f64,
    /// Population standard deviation of grayscale intensities.
    pub gray_std_dev: f64,
    /// Fraction of white pixels in the leftmost band.
    pub left_white_density: f64,
    /// Fraction of white pixels in the rightmost band.
    pub right_white_density: f64,
    /// White pixels counted in the leftmost band.
    pub left_white_pixels: u64,
    /// White pixels counted in the rightmost band.
    pub right_white_pixels: u64,
    /// Fraction of sampled pixels with visible channel separation.
    pub color_pixel_ratio: f64,
}

/// Outcome of measuring a page: either real metrics or the undecodable
/// sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PageMetrics {
    Measured(ImageMetrics),
    Undecodable,
}

impl PageMetrics {
    pub fn measured(&self) -> Option<&ImageMetrics> {
        match self {
            Self::Measured(metrics) => Some(metrics),
            Self::Undecodable => None,
        }
    }

    pub fn is_undecodable(&self) -> bool {
        matches!(self, Self::Undecodable)
    }
}

/// Pairing-relevant category of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageClass {
    /// Ordinary single page; may be paired.
    Normal,
    /// Wide image holding two physical pages; always alone.
    DoubleSpread,
    /// Near-black or near-solid page; always alone.
    Filler,
    /// Could not be decoded. Pairs like `Normal`.
    Undecodable,
}

impl PageClass {
    /// Whether a page of this class must occupy a group of its own.
    pub fn stands_alone(self) -> bool {
        match self {
            Self::DoubleSpread | Self::Filler => true,
            Self::Normal | Self::Undecodable => false,
        }
    }
}

/// Cover-path category of a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorClass {
    Color,
    Monochrome,
}

/// Side of a page that carries the white gutter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

/// Metrics and class of one page, in chapter order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    pub metrics: PageMetrics,
    pub class: PageClass,
}

/// One viewing unit: a page shown alone or two pages shown side by side,
/// always in chapter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageGroup {
    Single(PageRef),
    Pair(PageRef, PageRef),
}

impl PageGroup {
    pub fn len(&self) -> usize {
        match self {
            Self::Single(_) => 1,
            Self::Pair(..) => 2,
        }
    }

    pub fn is_pair(&self) -> bool {
        matches!(self, Self::Pair(..))
    }

    pub fn pages(&self) -> impl Iterator<Item = &PageRef> {
        let (first, second) = match self {
            Self::Single(page) => (page, None),
            Self::Pair(left, right) => (left, Some(right)),
        };
        std::iter::once(first).chain(second)
    }

    pub fn ids(&self) -> Vec<&str> {
        self.pages().map(PageRef::id).collect()
    }
}

// Groups go to the presentation layer as plain arrays of page ids.
impl Serialize for PageGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.pages().map(PageRef::id))
    }
}
