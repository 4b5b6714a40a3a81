//! Run realignment
//!
//! A paragraph's text is rewritten as one string, then cut back into the
//! original runs. Rules insert and swap characters, so the cut points come
//! from an offset map built by walking both strings side by side.

use super::run::{concat, Run};
use crate::glyphs::{
    is_dash, is_inserted, is_quote_like, is_space_like, COPYRIGHT, ELLIPSIS, PILCROW, REGISTERED,
    TRADEMARK,
};
use crate::processor::LanguageProcessor;
use log::trace;

/// Maps each character index of an original string to a character index
/// of its rewritten form. Non-decreasing, with `map[0] == 0` and
/// `map[len(original)] == len(rewritten)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetMap {
    map: Vec<usize>,
    rewritten_len: usize,
}

impl OffsetMap {
    /// Greedy forward alignment of `original` against `rewritten`.
    ///
    /// On a mismatch the scan tries, in order: a known one-for-one
    /// substitution, a character the rules insert, dropping spaces that
    /// collapsed in front of the next matching glyph, a one-character
    /// deletion or insertion that resynchronizes the cursors, and finally
    /// drops the original character.
    pub fn build(original: &str, rewritten: &str) -> Self {
        let o: Vec<char> = original.chars().collect();
        let r: Vec<char> = rewritten.chars().collect();
        let (n, m) = (o.len(), r.len());

        let mut map = vec![0; n + 1];
        let (mut i, mut j) = (0, 0);

        while i < n {
            if j >= m {
                map[i] = m;
                i += 1;
                continue;
            }

            let (a, b) = (o[i], r[j]);
            if a == b || substitutes(a, b) {
                map[i] = j;
                i += 1;
                j += 1;
            } else if is_inserted(b) {
                j += 1;
            } else if is_space_like(a)
                && next_visible(&o[i + 1..]).is_some_and(|c| c == b || substitutes(c, b))
            {
                // Collapsed spacing before a glyph the rules swapped in
                map[i] = j;
                i += 1;
            } else if o.get(i + 1) == Some(&b) {
                map[i] = j;
                i += 1;
            } else if r.get(j + 1) == Some(&a) {
                j += 1;
            } else {
                map[i] = j;
                i += 1;
            }
        }

        map[0] = 0;
        map[n] = m;

        Self {
            map,
            rewritten_len: m,
        }
    }

    /// Rewritten index for original index `i`, clamped to the rewritten length
    pub fn get(&self, i: usize) -> usize {
        self.map.get(i).copied().unwrap_or(self.rewritten_len)
    }

    /// Number of entries: original length plus one
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.map
    }
}

/// First character that is not space-like
fn next_visible(chars: &[char]) -> Option<char> {
    chars.iter().copied().find(|&c| !is_space_like(c))
}

/// Character swaps the rule tables make without changing length
fn substitutes(original: char, rewritten: char) -> bool {
    match original {
        '\n' | '\r' => rewritten == PILCROW,
        '.' => rewritten == ELLIPSIS,
        '(' => matches!(rewritten, COPYRIGHT | REGISTERED | TRADEMARK),
        c if is_dash(c) => is_dash(rewritten),
        c if is_quote_like(c) => is_quote_like(rewritten),
        c if is_space_like(c) => is_space_like(rewritten),
        _ => false,
    }
}

/// Count of leading whitespace characters to remove from `text`.
///
/// Zero when the text is blank, or when the first visible character is a
/// dash and `preserve_dash` is set.
fn leading_whitespace(text: &str, preserve_dash: bool) -> usize {
    let mut count = 0;
    for c in text.chars() {
        if c.is_whitespace() {
            count += 1;
        } else if preserve_dash && is_dash(c) {
            return 0;
        } else {
            return count;
        }
    }
    0
}

/// String form of [`strip_leading_whitespace`]
pub fn trim_leading_whitespace(text: &str, preserve_dash: bool) -> &str {
    let count = leading_whitespace(text, preserve_dash);
    let start = text
        .char_indices()
        .nth(count)
        .map_or(text.len(), |(byte, _)| byte);
    &text[start..]
}

/// Strip the paragraph's leading whitespace, which may span several runs.
///
/// Returns whether anything was removed.
pub fn strip_leading_whitespace(runs: &mut [Run], preserve_dash: bool) -> bool {
    let mut remaining = leading_whitespace(&concat(runs), preserve_dash);
    if remaining == 0 {
        return false;
    }

    for run in runs.iter_mut() {
        if remaining == 0 {
            break;
        }
        let (taken, byte) = match run.text.char_indices().nth(remaining) {
            Some((byte, _)) => (remaining, byte),
            None => (run.text.chars().count(), run.text.len()),
        };
        run.text.drain(..byte);
        remaining -= taken;
    }
    true
}

/// Rewrite a paragraph and redistribute the result over its runs,
/// keeping a leading dialogue dash in place
pub fn realign_runs(runs: &[Run], processor: &LanguageProcessor) -> Vec<Run> {
    realign_runs_with(runs, processor, true)
}

/// Rewrite a paragraph and redistribute the result over its runs.
///
/// The output has as many runs as the input, each with its original
/// formatting, and their concatenation is the rewritten paragraph.
pub fn realign_runs_with(
    runs: &[Run],
    processor: &LanguageProcessor,
    preserve_leading_dash: bool,
) -> Vec<Run> {
    if concat(runs).trim().is_empty() {
        trace!("skipping blank paragraph with {} runs", runs.len());
        return runs.to_vec();
    }

    let mut runs = runs.to_vec();
    strip_leading_whitespace(&mut runs, preserve_leading_dash);

    let original = concat(&runs);
    let processed = processor.process(&original);
    let rewritten = trim_leading_whitespace(&processed, preserve_leading_dash);

    let map = OffsetMap::build(&original, rewritten);
    let bounds: Vec<usize> = rewritten
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(rewritten.len()))
        .collect();

    let mut start = 0;
    runs.into_iter()
        .map(|run| {
            let end = start + run.text.chars().count();
            let text = rewritten[bounds[map.get(start)]..bounds[map.get(end)]].to_string();
            start = end;
            Run {
                preserve_whitespace: run.preserve_whitespace || text.contains(' '),
                text,
                formatting: run.formatting,
            }
        })
        .collect()
}
