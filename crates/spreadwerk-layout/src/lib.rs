// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// spreadwerk-layout — Page classification and two-up pairing for manga chapters.
//
// Measures page images (aspect ratio, darkness, grayscale spread, side-band
// whiteness, colour content), classifies them as normal pages, double spreads
// or fillers, works out whether the chapter must open on a single page, and
// partitions the chapter into one- and two-page viewing groups. Also picks a
// colour cover page for a series.

pub mod classify;
pub mod cover;
pub mod metrics;
pub mod parity;
pub mod pipeline;
pub mod sequence;
pub mod source;

// Re-export the primary entry points so callers can use `spreadwerk_layout::ChapterPairer` etc.
pub use classify::PageClassifier;
pub use cover::CoverSelector;
pub use metrics::MetricsExtractor;
pub use parity::{ParityDecision, ParityRule, resolve_parity};
pub use pipeline::{ChapterLayout, ChapterPairer};
pub use sequence::{sequence, sequential_groups};
pub use source::{DirectorySource, FileSource, MemorySource, PageSource};
