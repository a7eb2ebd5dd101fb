//! Builds complete documents from formatter output and listing entries.

use unicode_width::UnicodeWidthStr;

use super::decoder;
use super::links::{self, LinkOptions};
use super::types::{CharStyle, Document, DocumentKind, Line, LineBuilder, LinkType};
use crate::listing::ListingEntry;

/// Column where listing identifiers start.
pub const IDENT_COL: usize = 7;

/// Widest identifier that still shares a line with its description.
const MAX_TAG_WIDTH: usize = 24;

/// Narrowest description column used when the page is very narrow.
const MIN_DESCR_WIDTH: usize = 20;

/// Build a manual page from formatter output.
///
/// The formatter already emits the header and footer lines, so the output is
/// decoded and linked as is. Output without visible characters produces a
/// document carrying a "no manual entry" message.
pub fn man_page(raw: &str, title: &str, opts: &LinkOptions<'_>) -> Document {
    let mut lines = decoder::decode(raw);
    if lines.iter().all(|l| l.indent().is_none()) {
        tracing::debug!(title, "formatter produced no content");
        return Document::not_found(
            title,
            DocumentKind::ManualPage,
            format!("No manual entry for {title}"),
        );
    }
    links::detect_links(&mut lines, opts);
    tracing::debug!(title, lines = lines.len(), "assembled manual page");
    Document::new(title, DocumentKind::ManualPage, lines)
}

/// Header and footer fields of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingHeader {
    /// Shown at both edges, e.g. `APROPOS(1)`
    pub key: String,
    /// Centred in the header; also the document title
    pub title: String,
    /// Bottom left
    pub version: String,
    /// Bottom centre
    pub date: String,
}

/// Subheading text introducing one section of a listing.
pub fn section_heading(section: &str) -> String {
    format!("MANUAL PAGES IN SECTION {section}")
}

/// Render listing entries grouped by `sections`, wrapped to `width` columns.
///
/// Each entry becomes a tagged paragraph: its bold identifier at
/// [`IDENT_COL`] linking to the page, and the description at a column shared
/// by the whole listing. An identifier too wide for that column pushes its
/// description to the following line.
pub fn listing_page(
    entries: &[ListingEntry],
    sections: &[String],
    header: &ListingHeader,
    width: usize,
) -> Document {
    let kind = DocumentKind::Listing {
        sections: sections.to_vec(),
    };
    if entries.is_empty() {
        return Document::not_found(
            header.title.as_str(),
            kind,
            format!("{}: nothing appropriate", header.title),
        );
    }

    let longest = entries.iter().map(|e| e.ident.width()).max().unwrap_or(0);
    let descr_col = IDENT_COL + longest.min(MAX_TAG_WIDTH) + 2;
    let descr_width = width.saturating_sub(descr_col).max(MIN_DESCR_WIDTH);

    let mut lines = vec![
        three_columns(&header.key, &header.title, &header.key, width),
        Line::default(),
    ];
    for section in sections {
        lines.push(Line::styled(section_heading(section), CharStyle::Bold));
        for entry in entries.iter().filter(|e| e.section == *section) {
            push_entry(&mut lines, entry, descr_col, descr_width);
        }
        lines.push(Line::default());
    }
    lines.push(three_columns(&header.version, &header.date, &header.key, width));

    tracing::debug!(
        title = header.title,
        entries = entries.len(),
        sections = sections.len(),
        "assembled listing"
    );
    Document::new(header.title.as_str(), kind, lines)
}

fn push_entry(lines: &mut Vec<Line>, entry: &ListingEntry, descr_col: usize, descr_width: usize) {
    let mut wrapped = wrap_words(&entry.descr, descr_width).into_iter();

    let mut tag = LineBuilder::new();
    tag.pad_to(IDENT_COL)
        .push_link(&entry.ident, CharStyle::Bold, LinkType::Man, &entry.ident);
    let shares_line = tag.len() < descr_col;
    match wrapped.next() {
        Some(first) if shares_line => {
            tag.pad_to(descr_col).push(&first, CharStyle::Regular);
            lines.push(tag.finish());
        }
        Some(first) => {
            lines.push(tag.finish());
            let mut line = LineBuilder::new();
            line.pad_to(descr_col).push(&first, CharStyle::Regular);
            lines.push(line.finish());
        }
        None => lines.push(tag.finish()),
    }

    for rest in wrapped {
        let mut line = LineBuilder::new();
        line.pad_to(descr_col).push(&rest, CharStyle::Regular);
        lines.push(line.finish());
    }
}

/// Greedy word wrap by display width. Words wider than `width` get a line
/// of their own.
fn wrap_words(text: &str, width: usize) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.width() + 1 + word.width() > width {
            out.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

/// A line with `left` flush left, `centre` centred and `right` flush right.
fn three_columns(left: &str, centre: &str, right: &str, width: usize) -> Line {
    let (lw, cw, rw) = (left.width(), centre.width(), right.width());
    let mut b = LineBuilder::new();
    b.push(left, CharStyle::Regular);
    if lw + cw + rw + 2 > width {
        b.push(" ", CharStyle::Regular)
            .push(centre, CharStyle::Regular)
            .push(" ", CharStyle::Regular)
            .push(right, CharStyle::Regular);
        return b.finish();
    }
    let centre_at = ((width - cw) / 2).max(lw + 1);
    let gap = width.saturating_sub(centre_at + cw + rw).max(1);
    b.push(&" ".repeat(centre_at - lw), CharStyle::Regular)
        .push(centre, CharStyle::Regular)
        .push(&" ".repeat(gap), CharStyle::Regular)
        .push(right, CharStyle::Regular);
    b.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> ListingHeader {
        ListingHeader {
            key: "APROPOS(1)".into(),
            title: "apropos ls".into(),
            version: "manless 0.1.0".into(),
            date: "2026-10-14".into(),
        }
    }

    fn sample() -> (Vec<ListingEntry>, Vec<String>) {
        let entries = vec![
            ListingEntry::new("ls", "1", "list directory contents"),
            ListingEntry::new("lsblk", "8", "list block devices"),
            ListingEntry::new(
                "lsattr",
                "1",
                "list file attributes on a Linux second extended file system",
            ),
        ];
        let sections = crate::listing::sections(&entries);
        (entries, sections)
    }

    #[test]
    fn test_man_page_decodes_and_links() {
        let raw = "L\u{8}LS\u{8}S(1)    User Commands    LS(1)\n\nSee ls(1) for details.\n";
        let doc = man_page(raw, "ls", &LinkOptions::default());
        assert!(!doc.is_error());
        assert_eq!(doc.title(), "ls");
        assert_eq!(doc.line_count(), 3);
        assert!(doc.lines()[0].is_bold(0));
        let links = doc.lines()[2].links();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].target, "ls(1)");
    }

    #[test]
    fn test_man_page_without_content_is_not_found() {
        let doc = man_page("\n   \n", "foo(3)", &LinkOptions::default());
        assert!(doc.is_error());
        assert_eq!(doc.error(), Some("No manual entry for foo(3)"));
        assert_eq!(doc.line_count(), 0);
    }

    #[test]
    fn test_listing_layout() {
        let (entries, sections) = sample();
        let doc = listing_page(&entries, &sections, &header(), 80);
        let texts: Vec<&str> = doc.lines().iter().map(Line::text).collect();

        assert!(texts[0].starts_with("APROPOS(1)"));
        assert!(texts[0].ends_with("APROPOS(1)"));
        assert!(texts[0].contains("apropos ls"));
        assert_eq!(doc.lines()[0].len(), 80);
        assert!(texts[1].is_empty());
        assert_eq!(texts[2], "MANUAL PAGES IN SECTION 1");
        assert!(doc.lines()[2].is_bold(0));
        assert!(texts[3].starts_with("       ls(1)"));
        assert!(texts.contains(&"MANUAL PAGES IN SECTION 8"));
        assert!(texts.last().is_some_and(|t| t.starts_with("manless 0.1.0")));
        assert_eq!(doc.sections(), ["1", "8"]);
    }

    #[test]
    fn test_listing_identifiers_are_bold_links() {
        let (entries, sections) = sample();
        let doc = listing_page(&entries, &sections, &header(), 80);
        let line = &doc.lines()[3];
        assert_eq!(line.links().len(), 1);
        let link = &line.links()[0];
        assert_eq!(link.link_type, LinkType::Man);
        assert_eq!(link.target, "ls(1)");
        assert_eq!((link.start, link.end), (IDENT_COL, IDENT_COL + 5));
        assert!((link.start..link.end).all(|i| line.is_bold(i)));
    }

    #[test]
    fn test_listing_descriptions_share_a_column() {
        let (entries, sections) = sample();
        let doc = listing_page(&entries, &sections, &header(), 80);
        // longest identifier is "lsattr(1)"
        let col = IDENT_COL + 9 + 2;
        assert_eq!(doc.lines()[3].text().find("list directory"), Some(col));
        assert_eq!(doc.lines()[4].text().find("list file"), Some(col));
    }

    #[test]
    fn test_listing_wraps_long_descriptions() {
        let (entries, sections) = sample();
        let doc = listing_page(&entries, &sections, &header(), 40);
        let attr = doc
            .lines()
            .iter()
            .position(|l| l.text().contains("lsattr(1)"))
            .unwrap();
        let continuation = &doc.lines()[attr + 1];
        assert_eq!(continuation.indent(), Some(IDENT_COL + 11));
        assert!(doc.lines().iter().all(|l| l.trimmed_len() <= 40 || l.links().is_empty()));
    }

    #[test]
    fn test_long_identifier_moves_description_down() {
        let entries = vec![
            ListingEntry::new("ls", "1", "short"),
            ListingEntry::new("a_really_long_function_name", "3", "long one"),
        ];
        let sections = crate::listing::sections(&entries);
        let doc = listing_page(&entries, &sections, &header(), 80);
        let tag = doc
            .lines()
            .iter()
            .position(|l| l.text().contains("a_really_long_function_name(3)"))
            .unwrap();
        assert_eq!(doc.lines()[tag].trimmed_len(), IDENT_COL + 30);
        assert_eq!(doc.lines()[tag + 1].text().trim(), "long one");
    }

    #[test]
    fn test_empty_listing_is_not_found() {
        let doc = listing_page(&[], &[], &header(), 80);
        assert!(doc.is_error());
        assert_eq!(doc.error(), Some("apropos ls: nothing appropriate"));
    }

    #[test]
    fn test_three_columns_narrow_fallback() {
        let line = three_columns("LEFT", "CENTRE", "RIGHT", 10);
        assert_eq!(line.text(), "LEFT CENTRE RIGHT");
    }

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("a bb ccc dddd", 6), ["a bb", "ccc", "dddd"]);
        assert_eq!(wrap_words("unbreakable", 4), ["unbreakable"]);
        assert!(wrap_words("   ", 10).is_empty());
    }
}
