// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Text metrics and markup for the built-in Helvetica font.
//!
//! Labels may contain `^{..}` to raise a run of text, e.g. `2^{10}`.

/// Height above the baseline, as a fraction of the font size.
pub const ASCENT: f64 = 0.718;
/// Depth below the baseline, as a fraction of the font size.
pub const DESCENT: f64 = 0.207;

pub const SUPERSCRIPT_SCALE: f64 = 0.7;
pub const SUPERSCRIPT_RISE: f64 = 0.45;

// advance widths for ' ' ..= '~' in 1/1000 em
#[rustfmt::skip]
const WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

// advance widths for 0xA0 ..= 0xFF, which WinAnsi shares with Latin-1
#[rustfmt::skip]
const LATIN1_WIDTHS: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

const FALLBACK_WIDTH: u16 = 556;

/// Punctuation WinAnsi places in 0x80 ..= 0x9F, with its advance width.
fn win_ansi_extra(c: char) -> Option<(u8, u16)> {
    let mapped = match c {
        '\u{20AC}' => (0x80, 556),
        '\u{2026}' => (0x85, 1000),
        '\u{2018}' => (0x91, 222),
        '\u{2019}' => (0x92, 222),
        '\u{201C}' => (0x93, 333),
        '\u{201D}' => (0x94, 333),
        '\u{2022}' => (0x95, 350),
        '\u{2013}' => (0x96, 556),
        '\u{2014}' => (0x97, 1000),
        '\u{2122}' => (0x99, 1000),
        _ => return None,
    };
    Some(mapped)
}

/// The WinAnsi byte for `c`, if the font can show it.
pub fn byte(c: char) -> Option<u8> {
    match c {
        ' '..='~' | '\u{A0}'..='\u{FF}' => Some(c as u8),
        _ => win_ansi_extra(c).map(|(b, _)| b),
    }
}

/// Whether every character of `text` has a glyph in the font.
pub fn is_encodable(text: &str) -> bool {
    text.chars().all(|c| byte(c).is_some())
}

/// A run of text drawn with one size and baseline.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Span<'a> {
    pub text: &'a str,
    pub superscript: bool,
}

impl<'a> Span<'a> {
    fn plain(text: &'a str) -> Self {
        Self {
            text,
            superscript: false,
        }
    }

    fn superscript(text: &'a str) -> Self {
        Self {
            text,
            superscript: true,
        }
    }

    /// Font size of this span for a label of `size`.
    pub fn size(&self, size: f64) -> f64 {
        if self.superscript {
            size * SUPERSCRIPT_SCALE
        } else {
            size
        }
    }

    /// Baseline shift of this span for a label of `size`.
    pub fn rise(&self, size: f64) -> f64 {
        if self.superscript {
            size * SUPERSCRIPT_RISE
        } else {
            0.0
        }
    }
}

/// Splits `text` into plain and superscript runs. An unterminated `^{` is
/// kept as literal text.
pub fn spans(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("^{") {
        let inner = &rest[start + 2..];
        let len = match inner.find('}') {
            Some(len) => len,
            None => break,
        };
        if start > 0 {
            spans.push(Span::plain(&rest[..start]));
        }
        if len > 0 {
            spans.push(Span::superscript(&inner[..len]));
        }
        rest = &inner[len + 1..];
    }

    if !rest.is_empty() {
        spans.push(Span::plain(rest));
    }

    spans
}

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => WIDTHS[c as usize - ' ' as usize],
        '\u{A0}'..='\u{FF}' => LATIN1_WIDTHS[c as usize - 0xA0],
        _ => win_ansi_extra(c).map_or(FALLBACK_WIDTH, |(_, w)| w),
    }
}

fn run_width(text: &str, size: f64) -> f64 {
    text.chars().map(|c| char_width(c) as f64).sum::<f64>() * size / 1000.0
}

/// Advance width of `text`, markup applied, at font `size`.
pub fn width(text: &str, size: f64) -> f64 {
    spans(text)
        .iter()
        .map(|span| run_width(span.text, span.size(size)))
        .sum()
}

/// Bytes for a PDF string in WinAnsi encoding; characters without a
/// glyph become `?`.
pub fn encode(text: &str) -> Vec<u8> {
    text.chars().map(|c| byte(c).unwrap_or(b'?')).collect()
}
