//! Apropos and whatis results.
//!
//! Provides:
//! - Parsing of `apropos`/`whatis` output into [`ListingEntry`] values
//! - Exact identifier lookup and prefix/substring search
//! - Distinct section extraction for grouped rendering

use serde::Serialize;

use crate::error::{Error, Result};

/// Which listing tool to consult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingCommand {
    Apropos,
    Whatis,
}

impl ListingCommand {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Apropos => "apropos",
            Self::Whatis => "whatis",
        }
    }
}

/// One result line of apropos or whatis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    /// Manual page name
    pub page: String,
    /// Section, e.g. `1` or `3p`
    pub section: String,
    /// Combined `page(section)`
    pub ident: String,
    /// One-line description
    pub descr: String,
}

impl ListingEntry {
    pub fn new(
        page: impl Into<String>,
        section: impl Into<String>,
        descr: impl Into<String>,
    ) -> Self {
        let page = page.into();
        let section = section.into();
        let ident = format!("{page}({section})");
        Self {
            page,
            section,
            ident,
            descr: descr.into(),
        }
    }
}

/// Parse the standard output of apropos or whatis.
///
/// Accepts `name (sec) - descr`, `name(sec) - descr`, and comma-separated
/// name lists sharing one section (`a, b (1) - descr`), which produce one
/// entry per name. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`Error::Malformed`] for a non-blank line that has no
/// `name(section) - description` shape.
pub fn parse_listing(tool: ListingCommand, text: &str) -> Result<Vec<ListingEntry>> {
    let mut entries = Vec::new();
    for raw in text.lines() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        let malformed = || Error::Malformed {
            tool: tool.name(),
            detail: format!("unexpected line {line:?}"),
        };
        let (names, descr) = line.split_once(" - ").ok_or_else(malformed)?;
        let names = names.trim_end();
        let open = names.rfind('(').ok_or_else(malformed)?;
        let section = names[open + 1..]
            .strip_suffix(')')
            .filter(|s| !s.is_empty())
            .ok_or_else(malformed)?;
        let mut found = false;
        for page in names[..open].split(',').map(str::trim).filter(|p| !p.is_empty()) {
            entries.push(ListingEntry::new(page, section, descr.trim()));
            found = true;
        }
        if !found {
            return Err(malformed());
        }
    }
    tracing::debug!(tool = tool.name(), entries = entries.len(), "parsed listing");
    Ok(entries)
}

/// Whether some entry's identifier equals `needle`, ignoring case.
pub fn has(needle: &str, entries: &[ListingEntry]) -> bool {
    let needle = needle.to_lowercase();
    entries.iter().any(|e| e.ident.to_lowercase() == needle)
}

/// Index of the first entry after `pos` whose identifier contains
/// (`fullsub`) or starts with (`!fullsub`) `needle`, ignoring case.
///
/// With no `pos` the scan starts at the first entry.
pub fn search(
    needle: &str,
    entries: &[ListingEntry],
    pos: Option<usize>,
    fullsub: bool,
) -> Option<usize> {
    let needle = needle.to_lowercase();
    let skip = pos.map_or(0, |p| p.saturating_add(1));
    entries
        .iter()
        .enumerate()
        .skip(skip)
        .find(|(_, e)| {
            let ident = e.ident.to_lowercase();
            if fullsub {
                ident.contains(&needle)
            } else {
                ident.starts_with(&needle)
            }
        })
        .map(|(i, _)| i)
}

/// Distinct sections in first-seen order.
pub fn sections(entries: &[ListingEntry]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        if !out.iter().any(|s| *s == entry.section) {
            out.push(entry.section.clone());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(idents: &[(&str, &str)]) -> Vec<ListingEntry> {
        idents
            .iter()
            .map(|(page, section)| ListingEntry::new(*page, *section, "descr"))
            .collect()
    }

    #[test]
    fn test_new_builds_ident() {
        let e = ListingEntry::new("ls", "1", "list directory contents");
        assert_eq!(e.ident, "ls(1)");
    }

    #[test]
    fn test_parse_man_db_format() {
        let text = "ls (1)               - list directory contents\n\
                    lsblk (8)            - list block devices\n";
        let parsed = parse_listing(ListingCommand::Apropos, text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].page, "ls");
        assert_eq!(parsed[0].section, "1");
        assert_eq!(parsed[0].descr, "list directory contents");
        assert_eq!(parsed[1].ident, "lsblk(8)");
    }

    #[test]
    fn test_parse_mandoc_format_with_name_list() {
        let text = "gzip, gunzip, zcat(1) - compression/decompression tool";
        let parsed = parse_listing(ListingCommand::Whatis, text).unwrap();
        let idents: Vec<_> = parsed.iter().map(|e| e.ident.as_str()).collect();
        assert_eq!(idents, ["gzip(1)", "gunzip(1)", "zcat(1)"]);
    }

    #[test]
    fn test_parse_keeps_dashes_in_description() {
        let text = "git-log (1) - show commit logs - fast";
        let parsed = parse_listing(ListingCommand::Apropos, text).unwrap();
        assert_eq!(parsed[0].page, "git-log");
        assert_eq!(parsed[0].descr, "show commit logs - fast");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let err = parse_listing(ListingCommand::Apropos, "segmentation fault").unwrap_err();
        assert!(matches!(err, Error::Malformed { tool: "apropos", .. }));
        assert!(parse_listing(ListingCommand::Apropos, "ls () - nothing").is_err());
        assert!(parse_listing(ListingCommand::Apropos, "(1) - nameless").is_err());
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_listing(ListingCommand::Whatis, "\n\n").unwrap().is_empty());
    }

    #[test]
    fn test_has_is_exact_and_case_insensitive() {
        let list = entries(&[("ls", "1"), ("Intro", "3")]);
        assert!(has("ls(1)", &list));
        assert!(has("intro(3)", &list));
        assert!(!has("ls", &list));
        assert!(!has("ls(8)", &list));
    }

    #[test]
    fn test_search_prefix_starts_after_pos() {
        let list = entries(&[("ls", "1"), ("cat", "1"), ("ls", "8")]);
        assert_eq!(search("ls", &list, Some(0), false), Some(2));
        assert_eq!(search("LS", &list, Some(2), false), None);
        assert_eq!(search("ls", &list, None, false), Some(0));
    }

    #[test]
    fn test_search_substring() {
        let list = entries(&[("ls", "1"), ("cat", "1"), ("zcat", "1")]);
        assert_eq!(search("cat", &list, Some(0), false), Some(1));
        assert_eq!(search("cat", &list, Some(1), false), None);
        assert_eq!(search("cat", &list, Some(1), true), Some(2));
    }

    #[test]
    fn test_sections_first_seen_order() {
        let list = entries(&[("ls", "8"), ("cat", "1"), ("dd", "8"), ("x", "3p")]);
        assert_eq!(sections(&list), ["8", "1", "3p"]);
    }

    #[test]
    fn test_sections_are_case_sensitive() {
        let list = entries(&[("a", "n"), ("b", "N")]);
        assert_eq!(sections(&list), ["n", "N"]);
    }
}
