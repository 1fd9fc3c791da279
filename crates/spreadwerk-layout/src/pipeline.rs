// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chapter pipeline — measure every page in parallel, gather in chapter order,
// classify, resolve parity and sequence the pages into viewing groups.

use std::sync::Arc;
use std::time::Duration;

use rayon::prelude::*;
use serde::Serialize;
use spreadwerk_core::{
    Chapter, LayoutConfig, PageAnalysis, PageClass, PageGroup, PageMetrics, Result,
    SpreadwerkError,
};
use tracing::{debug, info, instrument, warn};

use crate::classify::PageClassifier;
use crate::metrics::MetricsExtractor;
use crate::parity::{ParityDecision, resolve_parity};
use crate::sequence::{sequence, sequential_groups};
use crate::source::PageSource;

/// Result of laying out one chapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterLayout {
    /// Viewing groups in chapter order.
    pub groups: Vec<PageGroup>,
    /// Opening parity, absent when no analysis ran.
    pub parity: Option<ParityDecision>,
    /// Per-page metrics and class in chapter order; empty when no analysis ran.
    pub pages: Vec<PageAnalysis>,
}

impl ChapterLayout {
    fn empty() -> Self {
        Self {
            groups: Vec::new(),
            parity: None,
            pages: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.groups.iter().map(PageGroup::len).sum()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    pub fn classes(&self) -> Vec<PageClass> {
        self.pages.iter().map(|page| page.class).collect()
    }

    /// Groups as plain id lists, the shape the reader view consumes.
    pub fn id_groups(&self) -> Vec<Vec<&str>> {
        self.groups.iter().map(|group| group.ids()).collect()
    }
}

/// Runs the classification pipeline for whole chapters.
///
/// Holds no per-chapter state: every call measures from scratch, so an
/// abandoned or failed run leaves nothing behind to be reused by a retry.
/// Cloning is cheap and clones share the worker pool.
#[derive(Debug, Clone)]
pub struct ChapterPairer {
    config: LayoutConfig,
    extractor: MetricsExtractor,
    classifier: PageClassifier,
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl ChapterPairer {
    pub fn new(config: LayoutConfig) -> Result<Self> {
        config.validate()?;

        let pool = match config.worker_threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|index| format!("spreadwerk-measure-{index}"))
                    .build()
                    .map_err(|err| SpreadwerkError::WorkerPool(err.to_string()))?;
                debug!(threads, "Dedicated measurement pool built");
                Some(Arc::new(pool))
            }
            None => None,
        };

        Ok(Self {
            extractor: MetricsExtractor::new(config.thresholds.clone()),
            classifier: PageClassifier::new(config.thresholds.clone()),
            config,
            pool,
        })
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Measure every page of `chapter` concurrently. The result is in chapter
    /// order regardless of completion order.
    pub fn measure_chapter<S>(&self, chapter: &Chapter, source: &S) -> Vec<PageMetrics>
    where
        S: PageSource + ?Sized,
    {
        let measure = || {
            chapter
                .pages()
                .par_iter()
                .map(|page| self.extractor.measure_page(source, page))
                .collect::<Vec<_>>()
        };
        match &self.pool {
            Some(pool) => pool.install(measure),
            None => measure(),
        }
    }

    /// Measure and classify every page of `chapter`.
    pub fn analyze_chapter<S>(&self, chapter: &Chapter, source: &S) -> Vec<PageAnalysis>
    where
        S: PageSource + ?Sized,
    {
        self.measure_chapter(chapter, source)
            .into_iter()
            .map(|metrics| self.classifier.analyze(metrics))
            .collect()
    }

    /// Resolve parity and sequence a chapter whose pages were already analysed.
    pub fn layout_from_analyses(
        &self,
        chapter: &Chapter,
        analyses: Vec<PageAnalysis>,
    ) -> Result<ChapterLayout> {
        if analyses.len() != chapter.len() {
            return Err(SpreadwerkError::LengthMismatch {
                pages: chapter.len(),
                classes: analyses.len(),
            });
        }
        if chapter.is_empty() {
            return Ok(ChapterLayout::empty());
        }

        let classes: Vec<PageClass> = analyses.iter().map(|page| page.class).collect();
        let parity = resolve_parity(&analyses);
        let groups = sequence(chapter.pages(), &classes, parity.stand_alone)?;

        let undecodable = classes
            .iter()
            .filter(|class| **class == PageClass::Undecodable)
            .count();
        if undecodable > 0 {
            warn!(undecodable, "Chapter laid out with undecodable pages");
        }

        Ok(ChapterLayout {
            groups,
            parity: Some(parity),
            pages: analyses,
        })
    }

    /// Lay out one chapter: measure, classify, resolve parity, sequence.
    #[instrument(skip_all, fields(pages = chapter.len()))]
    pub fn pair_chapter<S>(&self, chapter: &Chapter, source: &S) -> Result<ChapterLayout>
    where
        S: PageSource + ?Sized,
    {
        if !self.config.smart_pairing {
            let layout = ChapterLayout {
                groups: sequential_groups(chapter.pages()),
                parity: None,
                pages: Vec::new(),
            };
            info!(groups = layout.group_count(), "Chapter paired sequentially");
            return Ok(layout);
        }

        let analyses = self.analyze_chapter(chapter, source);
        let layout = self.layout_from_analyses(chapter, analyses)?;
        info!(
            groups = layout.group_count(),
            stand_alone = ?layout.parity.map(|p| p.stand_alone),
            "Chapter paired"
        );
        Ok(layout)
    }

    /// Async front end for [`pair_chapter`](Self::pair_chapter). The chapter
    /// runs on the blocking thread pool; with a `deadline`, a run that takes
    /// longer is abandoned and reported as a timeout.
    pub async fn pair_chapter_async<S>(
        &self,
        chapter: Chapter,
        source: Arc<S>,
        deadline: Option<Duration>,
    ) -> Result<ChapterLayout>
    where
        S: PageSource + ?Sized + 'static,
    {
        let pairer = self.clone();
        let task =
            tokio::task::spawn_blocking(move || pairer.pair_chapter(&chapter, source.as_ref()));

        let joined = match deadline {
            Some(limit) => match tokio::time::timeout(limit, task).await {
                Ok(joined) => joined,
                Err(_) => {
                    warn!(?limit, "Chapter layout abandoned at deadline");
                    return Err(SpreadwerkError::Timeout(limit));
                }
            },
            None => task.await,
        };
        joined.map_err(|err| SpreadwerkError::Worker(err.to_string()))?
    }
}

impl Default for ChapterPairer {
    fn default() -> Self {
        Self {
            config: LayoutConfig::default(),
            extractor: MetricsExtractor::default(),
            classifier: PageClassifier::default(),
            pool: None,
        }
    }
}
