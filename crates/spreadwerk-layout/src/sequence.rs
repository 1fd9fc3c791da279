// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pairing sequencer — partitions a chapter into singleton and two-up groups.

use spreadwerk_core::{PageClass, PageGroup, PageRef, Result, SpreadwerkError};

/// Partition `pages` into viewing groups.
///
/// Single left-to-right pass. Spreads and fillers are always alone; any other
/// page pairs with its successor when the successor may pair too. A page is
/// never revisited once placed. With `stand_alone` the first page opens the
/// chapter on its own.
///
/// Fails only when `classes` does not line up with `pages`.
pub fn sequence(
    pages: &[PageRef],
    classes: &[PageClass],
    stand_alone: bool,
) -> Result<Vec<PageGroup>> {
    if pages.len() != classes.len() {
        return Err(SpreadwerkError::LengthMismatch {
            pages: pages.len(),
            classes: classes.len(),
        });
    }

    let mut groups = Vec::with_capacity(pages.len().div_ceil(2) + 1);
    let mut i = 0;
    if stand_alone && !pages.is_empty() {
        groups.push(PageGroup::Single(pages[0].clone()));
        i = 1;
    }

    while i < pages.len() {
        let pairs_with_next = !classes[i].stands_alone()
            && classes.get(i + 1).is_some_and(|next| !next.stands_alone());

        if pairs_with_next {
            groups.push(PageGroup::Pair(pages[i].clone(), pages[i + 1].clone()));
            i += 2;
        } else {
            groups.push(PageGroup::Single(pages[i].clone()));
            i += 1;
        }
    }

    Ok(groups)
}

/// Plain two-by-two grouping, used when image analysis is switched off:
/// `[0, 1], [2, 3], ...` with a trailing single for odd lengths.
pub fn sequential_groups(pages: &[PageRef]) -> Vec<PageGroup> {
    let pairs = pages.chunks_exact(2);
    let trailing = pairs.remainder().first().cloned().map(PageGroup::Single);
    pairs
        .map(|pair| PageGroup::Pair(pair[0].clone(), pair[1].clone()))
        .chain(trailing)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use spreadwerk_core::Chapter;
    use spreadwerk_core::PageClass::{DoubleSpread as S, Filler as F, Normal as N, Undecodable as U};

    fn chapter(n: usize) -> Chapter {
        Chapter::from_sorted_ids((0..n).map(|i| format!("p{i}")))
    }

    fn ids(groups: &[PageGroup]) -> Vec<Vec<&str>> {
        groups.iter().map(|group| group.ids()).collect()
    }

    fn assert_partition(chapter: &Chapter, groups: &[PageGroup], classes: &[PageClass]) {
        let flat: Vec<&PageRef> = groups.iter().flat_map(|group| group.pages()).collect();
        let expected: Vec<&PageRef> = chapter.pages().iter().collect();
        assert_eq!(flat, expected);
        for group in groups {
            assert!((1..=2).contains(&group.len()));
            if group.is_pair() {
                for page in group.pages() {
                    assert!(!classes[page.position].stands_alone());
                }
            }
        }
    }

    #[test]
    fn mixed_chapter_scenario() {
        let chapter = Chapter::from_sorted_ids(["A", "B", "C", "D", "E", "F"]);
        let classes = [N, N, S, N, F, N];
        let groups = sequence(chapter.pages(), &classes, false).unwrap();
        assert_eq!(
            ids(&groups),
            vec![vec!["A", "B"], vec!["C"], vec!["D"], vec!["E"], vec!["F"]]
        );
        assert_partition(&chapter, &groups, &classes);
    }

    #[test]
    fn leading_singleton_shifts_pairs() {
        let chapter = chapter(5);
        let classes = [N; 5];
        let groups = sequence(chapter.pages(), &classes, true).unwrap();
        assert_eq!(ids(&groups), vec![vec!["p0"], vec!["p1", "p2"], vec!["p3", "p4"]]);
    }

    #[test]
    fn leading_singleton_applies_even_to_a_spread() {
        let chapter = chapter(3);
        let classes = [S, N, N];
        let groups = sequence(chapter.pages(), &classes, true).unwrap();
        assert_eq!(ids(&groups), vec![vec!["p0"], vec!["p1", "p2"]]);
    }

    #[test]
    fn undecodable_pages_pair_like_normal_ones() {
        let chapter = chapter(4);
        let classes = [U, N, N, U];
        let groups = sequence(chapter.pages(), &classes, false).unwrap();
        assert_eq!(ids(&groups), vec![vec!["p0", "p1"], vec!["p2", "p3"]]);
    }

    #[test]
    fn page_before_a_spread_or_filler_stays_alone() {
        let chapter = chapter(6);
        let classes = [N, S, N, F, F, N];
        let groups = sequence(chapter.pages(), &classes, false).unwrap();
        assert_eq!(
            ids(&groups),
            vec![vec!["p0"], vec!["p1"], vec!["p2"], vec!["p3"], vec!["p4"], vec!["p5"]]
        );
        assert_partition(&chapter, &groups, &classes);
    }

    #[test]
    fn empty_chapter_yields_no_groups() {
        assert!(sequence(&[], &[], false).unwrap().is_empty());
        assert!(sequence(&[], &[], true).unwrap().is_empty());
    }

    #[test]
    fn mismatched_lengths_fail_fast() {
        let chapter = chapter(3);
        let err = sequence(chapter.pages(), &[N, N], false).unwrap_err();
        assert!(matches!(err, SpreadwerkError::LengthMismatch { pages: 3, classes: 2 }));
    }

    #[test]
    fn partition_holds_for_every_small_class_sequence() {
        let kinds = [N, S, F, U];
        for len in 0..=6usize {
            let chapter = chapter(len);
            for code in 0..kinds.len().pow(len as u32) {
                let mut rest = code;
                let classes: Vec<PageClass> = (0..len)
                    .map(|_| {
                        let class = kinds[rest % kinds.len()];
                        rest /= kinds.len();
                        class
                    })
                    .collect();
                for stand_alone in [false, true] {
                    let groups = sequence(chapter.pages(), &classes, stand_alone).unwrap();
                    assert_partition(&chapter, &groups, &classes);
                }
            }
        }
    }

    #[test]
    fn sequential_grouping_pairs_in_twos() {
        let chapter = chapter(5);
        let groups = sequential_groups(chapter.pages());
        assert_eq!(
            ids(&groups),
            vec![vec!["p0", "p1"], vec!["p2", "p3"], vec!["p4"]]
        );
        assert!(sequential_groups(&[]).is_empty());
    }

    #[test]
    fn sequential_grouping_covers_every_length() {
        for n in 0..8 {
            let chapter = chapter(n);
            let groups = sequential_groups(chapter.pages());
            assert_eq!(groups.len(), n.div_ceil(2), "n = {n}");
            assert_eq!(groups.last().map(PageGroup::is_pair), (n > 0).then_some(n % 2 == 0));
            let flat: Vec<&str> = groups.iter().flat_map(|g| g.ids()).collect();
            let expected: Vec<&str> = chapter.pages().iter().map(|p| p.id()).collect();
            assert_eq!(flat, expected, "n = {n}");
        }
    }
}
