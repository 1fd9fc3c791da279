// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command implementations. Page ids are the file paths exactly as given.

use serde::Serialize;
use spreadwerk_core::{Chapter, LayoutConfig, PageAnalysis, Result};
use spreadwerk_layout::{ChapterPairer, CoverSelector, FileSource};
use tracing::info;

pub fn pair(config: LayoutConfig, pages: Vec<String>, json: bool) -> Result<()> {
    let chapter = Chapter::from_sorted_ids(pages);
    let layout = ChapterPairer::new(config)?.pair_chapter(&chapter, &FileSource)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&layout)?);
    } else {
        for group in layout.id_groups() {
            println!("{}", group.join("  |  "));
        }
    }
    info!(
        pages = layout.page_count(),
        groups = layout.group_count(),
        "Layout written"
    );
    Ok(())
}

pub fn cover(config: LayoutConfig, pages: Vec<String>) -> Result<()> {
    config.validate()?;
    let chapter = Chapter::from_sorted_ids(pages);
    let selector = CoverSelector::new(config.thresholds);
    if let Some(page) = selector.pick_cover(chapter.pages(), &FileSource) {
        println!("{page}");
    }
    Ok(())
}

#[derive(Serialize)]
struct PageReport<'a> {
    page: &'a str,
    #[serde(flatten)]
    analysis: &'a PageAnalysis,
}

pub fn metrics(config: LayoutConfig, pages: Vec<String>) -> Result<()> {
    let chapter = Chapter::from_sorted_ids(pages);
    let analyses = ChapterPairer::new(config)?.analyze_chapter(&chapter, &FileSource);

    let report: Vec<PageReport<'_>> = chapter
        .pages()
        .iter()
        .zip(&analyses)
        .map(|(page, analysis)| PageReport {
            page: page.id(),
            analysis,
        })
        .collect();
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
