// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Parity resolver — decides whether the first page of a chapter must be shown
// on its own so that two-page spreads land on the correct side.
//
// Two tiers, terminal on first match:
//
// 1. The first double spread fixes parity directly: pages before it pair off
//    in twos, so an odd index needs a leading singleton.
// 2. Otherwise the page with the most lopsided white gutter votes. A page
//    whose left band is whiter sits on an odd slot, a right-leaning page on an
//    even slot, and the first page's placement is worked out backwards.
//
// With no signal at all the first page stands alone.

use serde::Serialize;
use spreadwerk_core::{ImageMetrics, PageAnalysis, PageClass, PageMetrics, Side};
use tracing::debug;

/// Which tier produced a parity decision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ParityRule {
    /// First double spread found at `index`.
    DoubleSpread { index: usize },
    /// Most confident side vote.
    SideVote {
        index: usize,
        side: Side,
        confidence: f64,
    },
    /// No spread and no usable vote.
    NoSignal,
}

/// Whether the chapter opens with a singleton group, and why.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParityDecision {
    pub stand_alone: bool,
    pub rule: ParityRule,
}

/// Per-page gutter vote. Only lives for the duration of one resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
struct SideVote {
    page_index: usize,
    side: Side,
    confidence: f64,
}

impl SideVote {
    /// Confidence is taken from raw white-pixel counts so that equal
    /// ratios compare equal.
    fn cast(page_index: usize, m: &ImageMetrics) -> Self {
        let (left, right) = (m.left_white_pixels, m.right_white_pixels);
        let side = if left > right { Side::Left } else { Side::Right };
        let total = left + right;
        let confidence = if total > 0 {
            (left.abs_diff(right) as f64 / total as f64).min(1.0)
        } else {
            0.0
        };
        Self {
            page_index,
            side,
            confidence,
        }
    }

    fn stand_alone(&self) -> bool {
        match self.side {
            Side::Left => self.page_index % 2 == 1,
            Side::Right => self.page_index % 2 == 0,
        }
    }
}

/// Resolve the opening parity of a chapter from its page analyses, given in
/// chapter order.
pub fn resolve_parity(pages: &[PageAnalysis]) -> ParityDecision {
    if let Some(index) = pages
        .iter()
        .position(|page| page.class == PageClass::DoubleSpread)
    {
        let decision = ParityDecision {
            stand_alone: index % 2 != 0,
            rule: ParityRule::DoubleSpread { index },
        };
        debug!(index, stand_alone = decision.stand_alone, "Parity fixed by double spread");
        return decision;
    }

    let mut best: Option<SideVote> = None;
    for (index, page) in pages.iter().enumerate() {
        // Fillers carry no gutter; undecodable pages carry a zero vote.
        let m = match (&page.class, &page.metrics) {
            (PageClass::Filler, _) | (_, PageMetrics::Undecodable) => continue,
            (_, PageMetrics::Measured(m)) => m,
        };
        let vote = SideVote::cast(index, m);
        if vote.confidence > best.map_or(0.0, |b| b.confidence) {
            best = Some(vote);
        }
    }

    match best {
        Some(vote) => {
            let decision = ParityDecision {
                stand_alone: vote.stand_alone(),
                rule: ParityRule::SideVote {
                    index: vote.page_index,
                    side: vote.side,
                    confidence: vote.confidence,
                },
            };
            debug!(
                index = vote.page_index,
                side = ?vote.side,
                confidence = vote.confidence,
                stand_alone = decision.stand_alone,
                "Parity inferred from side vote"
            );
            decision
        }
        None => {
            debug!("No parity signal; first page stands alone");
            ParityDecision {
                stand_alone: true,
                rule: ParityRule::NoSignal,
            }
        }
    }
}
