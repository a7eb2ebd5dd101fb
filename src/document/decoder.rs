//! Overstrike and SGR attribute decoding.
//!
//! Formatters such as grotty emit emphasis in one of two ways:
//! - overstrike: `c BS c` is bold, `_ BS c` is underlined
//! - ANSI SGR escapes: `ESC[1m` bold, `ESC[3m` italic, `ESC[4m` underline
//!
//! Both are collapsed into plain text with one [`CharStyle`] per character.

use std::iter::Peekable;
use std::str::Chars;

use super::types::{CharStyle, Line};

const BACKSPACE: char = '\u{8}';
const ESCAPE: char = '\u{1b}';
const BELL: char = '\u{7}';
const TAB_WIDTH: usize = 8;

/// Decode a whole formatter output into lines.
pub fn decode(raw: &str) -> Vec<Line> {
    raw.lines().map(decode_line).collect()
}

/// Decode a single raw line.
///
/// Malformed sequences are dropped: a backspace with nothing before or after
/// it disappears and the previous character keeps its style.
pub fn decode_line(raw: &str) -> Line {
    if raw.is_empty() {
        return Line::default();
    }

    let mut text: Vec<char> = Vec::with_capacity(raw.len());
    let mut styles: Vec<CharStyle> = Vec::with_capacity(raw.len());
    let mut sgr = SgrState::default();
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            BACKSPACE => {
                let Some(&next) = chars.peek() else {
                    break;
                };
                if next.is_control() {
                    continue;
                }
                chars.next();
                match (text.last_mut(), styles.last_mut()) {
                    (Some(prev), Some(style)) => {
                        let (visible, overstruck) = overstrike(*prev, next);
                        *prev = visible;
                        *style = overstruck;
                    }
                    _ => {
                        text.push(next);
                        styles.push(sgr.style());
                    }
                }
            }
            ESCAPE => skip_escape(&mut chars, &mut sgr),
            '\t' => {
                let pad = TAB_WIDTH - text.len() % TAB_WIDTH;
                for _ in 0..pad {
                    text.push(' ');
                    styles.push(sgr.style());
                }
            }
            c if c.is_control() => {}
            c => {
                text.push(c);
                styles.push(sgr.style());
            }
        }
    }

    Line::new(text.into_iter().collect(), styles)
}

/// Resolve `prev BS next` into the visible character and its style.
fn overstrike(prev: char, next: char) -> (char, CharStyle) {
    if prev == next {
        (next, CharStyle::Bold)
    } else if prev == '_' {
        (next, CharStyle::Underline)
    } else if next == '_' {
        (prev, CharStyle::Underline)
    } else {
        // e.g. `+ BS o`, grotty's bullet
        (next, CharStyle::Bold)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SgrState {
    bold: bool,
    italic: bool,
    underline: bool,
}

impl SgrState {
    const fn style(self) -> CharStyle {
        if self.bold {
            CharStyle::Bold
        } else if self.italic {
            CharStyle::Italic
        } else if self.underline {
            CharStyle::Underline
        } else {
            CharStyle::Regular
        }
    }

    fn apply(&mut self, params: &str) {
        if params.is_empty() {
            *self = Self::default();
            return;
        }
        let mut codes = params
            .split(';')
            .map(|p| p.parse::<u16>().unwrap_or(0));
        while let Some(code) = codes.next() {
            match code {
                0 => *self = Self::default(),
                1 => self.bold = true,
                3 => self.italic = true,
                4 => self.underline = true,
                21 | 22 => self.bold = false,
                23 => self.italic = false,
                24 => self.underline = false,
                38 | 48 | 58 => match codes.next() {
                    Some(5) => {
                        codes.next();
                    }
                    Some(2) => {
                        codes.nth(2);
                    }
                    _ => {}
                },
                _ => {}
            }
        }
    }
}

/// Consume an escape sequence after `ESC`, applying it if it is SGR.
fn skip_escape(chars: &mut Peekable<Chars<'_>>, sgr: &mut SgrState) {
    match chars.next() {
        Some('[') => {
            let mut params = String::new();
            for c in chars.by_ref() {
                if ('\u{40}'..='\u{7e}').contains(&c) {
                    if c == 'm' {
                        sgr.apply(&params);
                    }
                    return;
                }
                params.push(c);
            }
        }
        Some(']') => {
            // OSC, terminated by BEL or ESC \
            while let Some(c) = chars.next() {
                if c == BELL {
                    return;
                }
                if c == ESCAPE {
                    if chars.peek() == Some(&'\\') {
                        chars.next();
                    }
                    return;
                }
            }
        }
        _ => {}
    }
}
