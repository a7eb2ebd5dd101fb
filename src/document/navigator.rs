//! Link traversal in document order.
//!
//! Locations are ordered by line, then by link index within the line. All
//! queries are stateless and return `None` when no link qualifies.

use super::types::{Line, LinkLoc};

/// Smallest link location strictly after `start`.
pub fn next_link(lines: &[Line], start: LinkLoc) -> Option<LinkLoc> {
    if let Some(line) = lines.get(start.line) {
        if start.link.saturating_add(1) < line.links().len() {
            return Some(LinkLoc::new(start.line, start.link + 1));
        }
    }
    lines
        .iter()
        .enumerate()
        .skip(start.line.saturating_add(1))
        .find(|(_, l)| !l.links().is_empty())
        .map(|(i, _)| LinkLoc::new(i, 0))
}

/// Largest link location strictly before `start`.
pub fn prev_link(lines: &[Line], start: LinkLoc) -> Option<LinkLoc> {
    if let Some(line) = lines.get(start.line) {
        let before = start.link.min(line.links().len());
        if before > 0 {
            return Some(LinkLoc::new(start.line, before - 1));
        }
    }
    let end = start.line.min(lines.len());
    lines[..end]
        .iter()
        .enumerate()
        .rev()
        .find(|(_, l)| !l.links().is_empty())
        .map(|(i, l)| LinkLoc::new(i, l.links().len() - 1))
}

/// First link on lines `lo..=hi`.
pub fn first_link(lines: &[Line], lo: usize, hi: usize) -> Option<LinkLoc> {
    window(lines, lo, hi)
        .find(|(_, l)| !l.links().is_empty())
        .map(|(i, _)| LinkLoc::new(i, 0))
}

/// Last link on lines `lo..=hi`.
pub fn last_link(lines: &[Line], lo: usize, hi: usize) -> Option<LinkLoc> {
    window(lines, lo, hi)
        .rev()
        .find(|(_, l)| !l.links().is_empty())
        .map(|(i, l)| LinkLoc::new(i, l.links().len() - 1))
}

fn window(lines: &[Line], lo: usize, hi: usize) -> impl DoubleEndedIterator<Item = (usize, &Line)> {
    let end = hi.saturating_add(1).min(lines.len());
    let start = lo.min(end);
    lines[start..end]
        .iter()
        .enumerate()
        .map(move |(i, l)| (start + i, l))
}

/// The link displayed at a column, including the wrapped tail of a link
/// from the previous line.
pub fn link_at(lines: &[Line], line: usize, col: usize) -> Option<LinkLoc> {
    let own = lines.get(line).and_then(|l| {
        l.links()
            .iter()
            .position(|link| link.span().contains(&col))
            .map(|i| LinkLoc::new(line, i))
    });
    own.or_else(|| {
        let prev = line.checked_sub(1)?;
        lines
            .get(prev)?
            .links()
            .iter()
            .position(|link| link.next.as_ref().is_some_and(|n| n.contains(&col)))
            .map(|i| LinkLoc::new(prev, i))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::types::{Link, LinkType};

    /// Lines with the given number of links each.
    fn lines_with(counts: &[usize]) -> Vec<Line> {
        counts
            .iter()
            .map(|&n| {
                let mut line = Line::plain("x".repeat(n * 2));
                line.set_links(
                    (0..n)
                        .map(|i| Link::new(i * 2, i * 2 + 1, LinkType::Man, "x(1)"))
                        .collect(),
                );
                line
            })
            .collect()
    }

    #[test]
    fn test_next_link_within_and_across_lines() {
        let lines = lines_with(&[2, 0, 0, 1]);
        assert_eq!(next_link(&lines, LinkLoc::new(0, 0)), Some(LinkLoc::new(0, 1)));
        assert_eq!(next_link(&lines, LinkLoc::new(0, 1)), Some(LinkLoc::new(3, 0)));
        assert_eq!(next_link(&lines, LinkLoc::new(3, 0)), None);
    }

    #[test]
    fn test_next_link_from_line_without_links() {
        let lines = lines_with(&[1, 0, 2]);
        assert_eq!(next_link(&lines, LinkLoc::new(1, 0)), Some(LinkLoc::new(2, 0)));
    }

    #[test]
    fn test_prev_link_within_and_across_lines() {
        let lines = lines_with(&[2, 0, 1]);
        assert_eq!(prev_link(&lines, LinkLoc::new(2, 0)), Some(LinkLoc::new(0, 1)));
        assert_eq!(prev_link(&lines, LinkLoc::new(0, 1)), Some(LinkLoc::new(0, 0)));
        assert_eq!(prev_link(&lines, LinkLoc::new(0, 0)), None);
    }

    #[test]
    fn test_prev_link_from_past_the_end() {
        let lines = lines_with(&[1, 3]);
        assert_eq!(prev_link(&lines, LinkLoc::new(1, 10)), Some(LinkLoc::new(1, 2)));
        assert_eq!(prev_link(&lines, LinkLoc::new(7, 0)), Some(LinkLoc::new(1, 2)));
    }

    #[test]
    fn test_first_and_last_in_window() {
        let lines = lines_with(&[1, 0, 3, 2, 0]);
        assert_eq!(first_link(&lines, 1, 3), Some(LinkLoc::new(2, 0)));
        assert_eq!(last_link(&lines, 1, 3), Some(LinkLoc::new(3, 1)));
        assert_eq!(last_link(&lines, 0, 2), Some(LinkLoc::new(2, 2)));
        assert_eq!(first_link(&lines, 4, 4), None);
        assert_eq!(last_link(&lines, 1, 1), None);
        assert_eq!(first_link(&lines, 3, 100), Some(LinkLoc::new(3, 0)));
    }

    #[test]
    fn test_empty_document_has_no_links() {
        assert_eq!(next_link(&[], LinkLoc::new(0, 0)), None);
        assert_eq!(prev_link(&[], LinkLoc::new(0, 0)), None);
        assert_eq!(first_link(&[], 0, 10), None);
    }

    #[test]
    fn test_link_at_columns_and_continuations() {
        let mut first = Line::plain("see sys-");
        first.set_links(vec![
            Link::new(4, 8, LinkType::Man, "systemctl(1)").continued(3..12),
        ]);
        let mut second = Line::plain("   temctl(1) and ls(1)");
        second.set_links(vec![Link::new(17, 22, LinkType::Man, "ls(1)")]);
        let lines = vec![first, second];

        assert_eq!(link_at(&lines, 0, 5), Some(LinkLoc::new(0, 0)));
        assert_eq!(link_at(&lines, 0, 2), None);
        assert_eq!(link_at(&lines, 1, 4), Some(LinkLoc::new(0, 0)));
        assert_eq!(link_at(&lines, 1, 18), Some(LinkLoc::new(1, 0)));
        assert_eq!(link_at(&lines, 1, 14), None);
        assert_eq!(link_at(&lines, 0, 100), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn all_locations(lines: &[Line]) -> Vec<LinkLoc> {
            lines
                .iter()
                .enumerate()
                .flat_map(|(i, l)| (0..l.links().len()).map(move |j| LinkLoc::new(i, j)))
                .collect()
        }

        proptest! {
            #[test]
            fn next_then_prev_round_trips(counts in prop::collection::vec(0usize..4, 0..12)) {
                let lines = lines_with(&counts);
                for loc in all_locations(&lines) {
                    if let Some(next) = next_link(&lines, loc) {
                        prop_assert!(next > loc);
                        prop_assert_eq!(prev_link(&lines, next), Some(loc));
                    }
                }
            }

            #[test]
            fn window_extremes_bound_every_link(
                counts in prop::collection::vec(0usize..4, 0..12),
                lo in 0usize..14,
                span in 0usize..14,
            ) {
                let lines = lines_with(&counts);
                let hi = lo + span;
                let inside: Vec<LinkLoc> = all_locations(&lines)
                    .into_iter()
                    .filter(|l| (lo..=hi).contains(&l.line))
                    .collect();
                let first = first_link(&lines, lo, hi);
                let last = last_link(&lines, lo, hi);
                prop_assert_eq!(first, inside.first().copied());
                prop_assert_eq!(last, inside.last().copied());
                for loc in &inside {
                    prop_assert!(first.is_some_and(|f| f <= *loc));
                    prop_assert!(last.is_some_and(|l| l >= *loc));
                }
            }
        }
    }
}
