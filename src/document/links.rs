//! Link detection in decoded text.
//!
//! Matchers run in a fixed priority (manual page, URL, email, file, local
//! search). The leftmost match wins, ties go to the higher priority, and
//! scanning resumes after each claimed span, so links on a line never
//! overlap and are ordered by start.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{Line, Link, LinkType};
use crate::listing::{self, ListingEntry};

static RE_MAN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9_][A-Za-z0-9_.:@+-]*\([0-9][A-Za-z0-9]*\)")
        .expect("manual page pattern is valid")
});

static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"https?://[^\s<>"'{}|\\^`\[\]]+"#).expect("url pattern is valid")
});

static RE_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)+")
        .expect("email pattern is valid")
});

static RE_FILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?:^|[\s(\[<"'`,])((?:~|\.\.?)?/[A-Za-z0-9._+@%~-][A-Za-z0-9._+@%~/-]*)"#)
        .expect("file pattern is valid")
});

static RE_FLAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:^|[\s\[(,|])(--?[A-Za-z0-9][A-Za-z0-9_-]*)").expect("flag pattern is valid")
});

/// Knobs for [`detect_links`].
#[derive(Debug, Clone, Copy)]
pub struct LinkOptions<'a> {
    /// When set, manual page references absent from this index are not linked
    pub known_pages: Option<&'a [ListingEntry]>,
    /// Link option tokens (`-a`, `--all`) to their definition in the page
    pub local_search: bool,
}

impl Default for LinkOptions<'_> {
    fn default() -> Self {
        Self {
            known_pages: None,
            local_search: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Matcher {
    Man,
    Url,
    Email,
    File,
    Flag,
}

impl Matcher {
    const PRIORITY: [Self; 5] = [Self::Man, Self::Url, Self::Email, Self::File, Self::Flag];

    const fn link_type(self) -> LinkType {
        match self {
            Self::Man => LinkType::Man,
            Self::Url => LinkType::Http,
            Self::Email => LinkType::Email,
            Self::File => LinkType::File,
            Self::Flag => LinkType::LocalSearch,
        }
    }

    /// First acceptable match starting at or after byte `from`, as a byte range.
    fn find(self, text: &str, from: usize, opts: &LinkOptions<'_>) -> Option<(usize, usize)> {
        match self {
            Self::Man => RE_MAN
                .find_iter(&text[from..])
                .map(|m| (from + m.start(), from + m.end()))
                .find(|&(s, e)| {
                    opts.known_pages
                        .is_none_or(|pages| listing::has(&text[s..e], pages))
                }),
            Self::Url => RE_URL
                .find_at(text, from)
                .map(|m| (m.start(), m.start() + trim_url(m.as_str()).len())),
            Self::Email => RE_EMAIL
                .find_at(text, from)
                .map(|m| (m.start(), m.start() + m.as_str().trim_end_matches(['.', '-']).len())),
            Self::File => RE_FILE.captures_at(text, from).and_then(|c| c.get(1)).map(|m| {
                let trimmed = m.as_str().trim_end_matches(['.', ',', ';', ':']);
                (m.start(), m.start() + trimmed.len())
            }),
            Self::Flag => {
                if !opts.local_search {
                    return None;
                }
                // the first token of a line is where the option is defined
                let first_token = text.len() - text.trim_start().len();
                let mut at = from;
                while let Some(m) = RE_FLAG.captures_at(text, at).and_then(|c| c.get(1)) {
                    if m.start() != first_token {
                        return Some((m.start(), m.end()));
                    }
                    at = m.end();
                }
                None
            }
        }
    }
}

/// Strip trailing punctuation that ends a sentence rather than the URL.
fn trim_url(url: &str) -> &str {
    let mut url = url.trim_end_matches(['.', ',', ';', ':', '!', '?']);
    while url.ends_with(')') && url.matches(')').count() > url.matches('(').count() {
        url = url[..url.len() - 1].trim_end_matches(['.', ',', ';', ':', '!', '?']);
    }
    url
}

/// A match in character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Found {
    start: usize,
    end: usize,
    link_type: LinkType,
    target: String,
}

/// Scan `text` from character `from`, returning non-overlapping matches.
fn scan(text: &str, from: usize, opts: &LinkOptions<'_>) -> Vec<Found> {
    let offsets: Vec<usize> = text
        .char_indices()
        .map(|(b, _)| b)
        .chain(std::iter::once(text.len()))
        .collect();
    let to_char = |byte: usize| offsets.partition_point(|&b| b < byte);

    let mut found = Vec::new();
    let mut pos = offsets.get(from).copied().unwrap_or(text.len());
    while pos < text.len() {
        let best = Matcher::PRIORITY
            .iter()
            .filter_map(|m| m.find(text, pos, opts).map(|r| (r, *m)))
            .filter(|((s, e), _)| e > s)
            // min_by_key keeps the first minimum, so priority breaks ties
            .min_by_key(|((s, _), _)| *s);
        let Some(((start, end), matcher)) = best else {
            break;
        };
        found.push(Found {
            start: to_char(start),
            end: to_char(end),
            link_type: matcher.link_type(),
            target: text[start..end].to_string(),
        });
        pos = end;
    }
    found
}

/// First whitespace-delimited token of a line, as a character range.
fn head_token(line: &Line) -> Option<(usize, usize, String)> {
    let start = line.indent()?;
    let token: String = line
        .text()
        .chars()
        .skip(start)
        .take_while(|c| !c.is_whitespace())
        .collect();
    let len = token.chars().count();
    Some((start, start + len, token))
}

/// Whether the line's visible text ends in a wrap hyphen (`word-`).
fn ends_with_wrap_hyphen(text: &str) -> bool {
    let mut rev = text.trim_end().chars().rev();
    rev.next() == Some('-') && rev.next().is_some_and(char::is_alphanumeric)
}

/// Detect links on every line, replacing any links the lines already carry.
///
/// A line ending in `word-` whose successor starts with a lowercase or
/// non-letter token is scanned as if the two were joined. A capitalised head
/// starts new prose and is never joined. A match straddling the join becomes
/// a wrapped link: it ends at the line's visible end (hyphen included) and
/// continues over the consumed part of the next line, while its target omits
/// the hyphen. The next line is then scanned from after that continuation.
/// A link spans at most one line break.
pub fn detect_links(lines: &mut [Line], opts: &LinkOptions<'_>) {
    let mut skip = 0;
    for i in 0..lines.len() {
        let line = &lines[i];
        let trimmed_len = line.trimmed_len();
        let wrap = if ends_with_wrap_hyphen(line.text()) {
            lines
                .get(i + 1)
                .and_then(head_token)
                .filter(|(_, _, head)| !head.starts_with(char::is_uppercase))
        } else {
            None
        };

        let mut next_skip = 0;
        let mut links = Vec::new();
        if let Some((head_start, _, head)) = wrap {
            let boundary = trimmed_len - 1;
            let joined: String = line.text().chars().take(boundary).chain(head.chars()).collect();
            for f in scan(&joined, skip, opts) {
                if f.end <= boundary {
                    links.push(Link::new(f.start, f.end, f.link_type, f.target));
                } else if f.start < boundary {
                    let consumed = f.end - boundary;
                    next_skip = head_start + consumed;
                    links.push(
                        Link::new(f.start, trimmed_len, f.link_type, f.target)
                            .continued(head_start..next_skip),
                    );
                    break;
                } else {
                    break;
                }
            }
        } else {
            links.extend(
                scan(line.text(), skip, opts)
                    .into_iter()
                    .map(|f| Link::new(f.start, f.end, f.link_type, f.target)),
            );
        }

        tracing::trace!(line = i, links = links.len(), "detected links");
        lines[i].set_links(links);
        skip = next_skip;
    }
}
