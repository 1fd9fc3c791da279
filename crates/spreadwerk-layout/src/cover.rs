// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Cover candidate selector — first colour page of a series' first chapter.

use spreadwerk_core::{ColorClass, PageMetrics, PageRef, Result, SpreadwerkError, Thresholds};
use tracing::{debug, info, instrument};

use crate::classify::PageClassifier;
use crate::metrics::MetricsExtractor;
use crate::source::PageSource;

/// Picks a representative cover page.
#[derive(Debug, Clone, Default)]
pub struct CoverSelector {
    extractor: MetricsExtractor,
    classifier: PageClassifier,
}

impl CoverSelector {
    pub fn new(thresholds: Thresholds) -> Self {
        Self {
            extractor: MetricsExtractor::new(thresholds.clone()),
            classifier: PageClassifier::new(thresholds),
        }
    }

    /// Return the first colour page of `pages`, measuring lazily and stopping
    /// at the first hit. Falls back to the first page when none is colour.
    /// `None` only for an empty page list.
    #[instrument(skip_all, fields(pages = pages.len()))]
    pub fn pick_cover<'a, S>(&self, pages: &'a [PageRef], source: &S) -> Option<&'a PageRef>
    where
        S: PageSource + ?Sized,
    {
        let chosen = pages.iter().find(|page| {
            let metrics = self.extractor.measure_page(source, page);
            self.classifier.color_class(&metrics) == ColorClass::Color
        });
        report(pages, chosen)
    }

    /// Same selection over metrics that were already measured, in page order.
    pub fn pick_cover_from_metrics<'a>(
        &self,
        pages: &'a [PageRef],
        metrics: &[PageMetrics],
    ) -> Result<Option<&'a PageRef>> {
        if pages.len() != metrics.len() {
            return Err(SpreadwerkError::LengthMismatch {
                pages: pages.len(),
                classes: metrics.len(),
            });
        }
        let chosen = pages
            .iter()
            .zip(metrics)
            .find(|(_, m)| self.classifier.color_class(m) == ColorClass::Color)
            .map(|(page, _)| page);
        Ok(report(pages, chosen))
    }
}

fn report<'a>(pages: &'a [PageRef], chosen: Option<&'a PageRef>) -> Option<&'a PageRef> {
    match chosen {
        Some(page) => {
            info!(page = %page, "Colour cover found");
            Some(page)
        }
        None => {
            let fallback = pages.first();
            if let Some(page) = fallback {
                debug!(page = %page, "No colour page; falling back to first page");
            }
            fallback
        }
    }
}
