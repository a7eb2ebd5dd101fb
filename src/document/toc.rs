//! Table of contents construction.
//!
//! Manual pages take their outline from structural markers (headings,
//! subheadings, tagged paragraphs) that a collaborator extracts from the
//! page source. Listings derive theirs from the section list.

use super::assembler::section_heading;
use super::types::{Line, TocEntry, TocKind};

/// One heading per listing section, matching the listing's subheadings.
pub fn from_sections(sections: &[String]) -> Vec<TocEntry> {
    sections
        .iter()
        .map(|s| TocEntry::new(TocKind::Heading, section_heading(s)))
        .collect()
}

/// Use collaborator markers verbatim, optionally dropping tagged paragraphs.
pub fn from_markers(markers: Vec<TocEntry>, tagged: bool) -> Vec<TocEntry> {
    if tagged {
        markers
    } else {
        markers
            .into_iter()
            .filter(|e| e.kind != TocKind::TaggedParagraph)
            .collect()
    }
}

/// Extract structural markers from man(7) or mdoc(7) source.
///
/// Recognises `.SH`/`.Sh` headings, `.SS`/`.Ss` subheadings, and `.TP`,
/// `.IP tag` and `.It` tagged paragraphs. A `.SH` or `.TP` without an
/// argument takes its text from the next text line.
pub fn markers_from_roff(source: &str) -> Vec<TocEntry> {
    let mut out = Vec::new();
    let mut pending: Option<TocKind> = None;

    for line in source.lines() {
        let Some(request) = line.strip_prefix('.').or_else(|| line.strip_prefix('\'')) else {
            if let Some(kind) = pending.take() {
                push_entry(&mut out, kind, &strip_escapes(line));
            }
            continue;
        };
        let request = request.trim_start();
        let (name, rest) = request
            .split_once(char::is_whitespace)
            .unwrap_or((request, ""));
        let args = parse_args(rest);

        let kind = match name {
            "SH" | "Sh" => TocKind::Heading,
            "SS" | "Ss" => TocKind::Subheading,
            "TP" => {
                pending = Some(TocKind::TaggedParagraph);
                continue;
            }
            "IP" => match args.first() {
                Some(tag) => {
                    push_entry(&mut out, TocKind::TaggedParagraph, &strip_escapes(tag));
                    continue;
                }
                None => continue,
            },
            "It" => {
                push_entry(&mut out, TocKind::TaggedParagraph, &mdoc_text(&args));
                continue;
            }
            // .TP tags are often set in a font macro: `.B \-a`
            "B" | "I" | "BR" | "BI" | "IR" | "IB" | "RB" | "RI" if pending.is_some() => {
                if let Some(kind) = pending.take() {
                    push_entry(&mut out, kind, &strip_escapes(&args.join("")));
                }
                continue;
            }
            _ => continue,
        };

        let text = if name.starts_with('S') && name.ends_with('h') {
            mdoc_text(&args)
        } else {
            strip_escapes(&args.join(" "))
        };
        if text.is_empty() {
            pending = Some(kind);
        } else {
            pending = None;
            push_entry(&mut out, kind, &text);
        }
    }
    tracing::debug!(entries = out.len(), "extracted toc markers");
    out
}

fn push_entry(out: &mut Vec<TocEntry>, kind: TocKind, text: &str) {
    let text = text.trim();
    if !text.is_empty() {
        out.push(TocEntry::new(kind, text));
    }
}

/// Split request arguments, honouring double quotes.
fn parse_args(rest: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut chars = rest.chars().peekable();
    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }
        let mut arg = String::new();
        if c == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                if c == '"' {
                    // "" inside a quoted argument is a literal quote
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        arg.push('"');
                        continue;
                    }
                    break;
                }
                arg.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                arg.push(c);
                chars.next();
            }
        }
        args.push(arg);
    }
    args
}

/// Render mdoc macro arguments as displayed text.
fn mdoc_text(args: &[String]) -> String {
    const CALLABLE: &[&str] = &[
        "Ar", "Cm", "Dv", "Em", "Er", "Ev", "Ic", "Li", "Nm", "Pa", "Sy", "Va", "Xo", "Xc", "Op",
        "Oo", "Oc", "Ql", "Dq", "Sq",
    ];
    let mut out = String::new();
    let mut glue = false;
    for arg in args {
        match arg.as_str() {
            "Ns" => glue = true,
            "Fl" => {
                if !glue && !out.is_empty() {
                    out.push(' ');
                }
                out.push('-');
                glue = true;
            }
            a if CALLABLE.contains(&a) => {}
            a => {
                if !glue && !out.is_empty() {
                    out.push(' ');
                }
                out.push_str(&strip_escapes(a));
                glue = false;
            }
        }
    }
    out
}

/// Remove font and other inline escapes, keeping the text they stand for.
fn strip_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('f') => match chars.next() {
                Some('(') => {
                    chars.next();
                    chars.next();
                }
                Some('[') => {
                    for c in chars.by_ref() {
                        if c == ']' {
                            break;
                        }
                    }
                }
                _ => {}
            },
            Some('(') => {
                let name: String = chars.by_ref().take(2).collect();
                out.push_str(special_char(&name));
            }
            Some('-') => out.push('-'),
            Some('e' | '\\') => out.push('\\'),
            Some(' ' | '~') => out.push(' '),
            Some('&' | '|' | '^' | ',' | '/' | '%') | None => {}
            Some(other) => out.push(other),
        }
    }
    out
}

fn special_char(name: &str) -> &'static str {
    match name {
        "em" | "en" | "mi" | "hy" => "-",
        "aq" => "'",
        "dq" | "lq" | "rq" => "\"",
        "rs" => "\\",
        _ => "",
    }
}

/// The line a table of contents entry points to.
///
/// Headings match only unindented lines; other kinds match at any
/// indentation.
pub fn entry_line(entry: &TocEntry, lines: &[Line]) -> Option<usize> {
    lines.iter().position(|line| {
        let Some(indent) = line.indent() else {
            return false;
        };
        if entry.kind == TocKind::Heading && indent != 0 {
            return false;
        }
        line.text().trim_start().starts_with(&entry.text)
    })
}
