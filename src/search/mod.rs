//! Substring search over decoded lines.
//!
//! Provides:
//! - All non-overlapping hits of a needle, in document order
//! - Case-insensitive matching with per-character folding
//! - Next/previous hit queries that always advance to another line

use serde::Serialize;

use crate::document::Line;

/// A hit: characters `start..end` of `line`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct SearchResult {
    pub line: usize,
    pub start: usize,
    pub end: usize,
}

impl SearchResult {
    pub const fn new(line: usize, start: usize, end: usize) -> Self {
        Self { line, start, end }
    }
}

/// Fold one character for case-insensitive comparison.
///
/// Characters whose lowercase form is longer than one character are kept
/// as is, so that offsets stay in characters of the original line.
fn fold(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => c,
    }
}

/// Find every occurrence of `needle`, scanning each line left to right and
/// resuming after each hit. An empty needle finds nothing.
pub fn search(needle: &str, lines: &[Line], case_sensitive: bool) -> Vec<SearchResult> {
    let prepare = |s: &str| -> Vec<char> {
        if case_sensitive {
            s.chars().collect()
        } else {
            s.chars().map(fold).collect()
        }
    };
    let needle = prepare(needle);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut results = Vec::new();
    for (index, line) in lines.iter().enumerate() {
        let hay = prepare(line.text());
        let mut pos = 0;
        while pos + needle.len() <= hay.len() {
            if hay[pos..pos + needle.len()] == needle[..] {
                results.push(SearchResult::new(index, pos, pos + needle.len()));
                pos += needle.len();
            } else {
                pos += 1;
            }
        }
    }
    tracing::debug!(hits = results.len(), case_sensitive, "searched document");
    results
}

/// Index of the first result on a line after `from`.
pub fn search_next(results: &[SearchResult], from: usize) -> Option<usize> {
    let idx = results.partition_point(|r| r.line <= from);
    (idx < results.len()).then_some(idx)
}

/// Index of the last result on a line before `from`.
pub fn search_prev(results: &[SearchResult], from: usize) -> Option<usize> {
    results.partition_point(|r| r.line < from).checked_sub(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<Line> {
        texts.iter().map(|t| Line::plain(*t)).collect()
    }

    #[test]
    fn test_search_finds_every_occurrence_on_a_line() {
        let doc = lines(&["See ls(1) for details."]);
        assert_eq!(
            search("ls", &doc, true),
            [SearchResult::new(0, 4, 6), SearchResult::new(0, 19, 21)]
        );
    }

    #[test]
    fn test_search_is_non_overlapping() {
        let doc = lines(&["aaaa"]);
        assert_eq!(
            search("aa", &doc, true),
            [SearchResult::new(0, 0, 2), SearchResult::new(0, 2, 4)]
        );
    }

    #[test]
    fn test_case_sensitivity() {
        let doc = lines(&["NAME", "name", "Name"]);
        assert_eq!(search("name", &doc, true).len(), 1);
        assert_eq!(search("name", &doc, false).len(), 3);
        assert_eq!(search("NAME", &doc, false).len(), 3);
    }

    #[test]
    fn test_offsets_are_characters() {
        let doc = lines(&["café CAFÉ"]);
        assert_eq!(
            search("é", &doc, false),
            [SearchResult::new(0, 3, 4), SearchResult::new(0, 8, 9)]
        );
    }

    #[test]
    fn test_empty_needle_finds_nothing() {
        assert!(search("", &lines(&["abc"]), true).is_empty());
    }

    #[test]
    fn test_next_and_prev_skip_the_origin_line() {
        let results = vec![
            SearchResult::new(1, 0, 1),
            SearchResult::new(3, 0, 1),
            SearchResult::new(3, 5, 6),
            SearchResult::new(7, 2, 3),
        ];
        assert_eq!(search_next(&results, 0), Some(0));
        assert_eq!(search_next(&results, 1), Some(1));
        assert_eq!(search_next(&results, 3), Some(3));
        assert_eq!(search_next(&results, 7), None);
        assert_eq!(search_prev(&results, 7), Some(2));
        assert_eq!(search_prev(&results, 3), Some(0));
        assert_eq!(search_prev(&results, 1), None);
        assert_eq!(search_next(&[], 0), None);
        assert_eq!(search_prev(&[], 5), None);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn results_are_sorted_and_disjoint(
                texts in prop::collection::vec("[abAB ]{0,20}", 0..10),
                needle in "[abAB]{1,3}",
                case_sensitive in any::<bool>(),
            ) {
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                let results = search(&needle, &lines(&refs), case_sensitive);
                for pair in results.windows(2) {
                    prop_assert!((pair[0].line, pair[0].start) < (pair[1].line, pair[1].start));
                    if pair[0].line == pair[1].line {
                        prop_assert!(pair[0].end <= pair[1].start);
                    }
                }
            }

            #[test]
            fn next_and_prev_never_stay_on_origin(
                texts in prop::collection::vec("[ab ]{0,10}", 0..10),
                from in 0usize..12,
            ) {
                let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
                let results = search("a", &lines(&refs), true);
                if let Some(i) = search_next(&results, from) {
                    prop_assert!(results[i].line > from);
                    prop_assert!(results[..i].iter().all(|r| r.line <= from));
                }
                if let Some(i) = search_prev(&results, from) {
                    prop_assert!(results[i].line < from);
                    prop_assert!(results[i + 1..].iter().all(|r| r.line >= from));
                }
            }
        }
    }
}
