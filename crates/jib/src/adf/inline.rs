//! Inline span tokenizer.
//!
//! Scans a single line left to right with one combined pattern and emits
//! an ordered sequence of [`TextRun`]s. Alternation order is the
//! tie-break for ambiguous text: link, code, bold, strikethrough,
//! italic. Matches never nest or overlap; a span's inner text is taken
//! verbatim.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use super::{Mark, TextRun};

// Group numbers: 1/2 link label+href, 3 code, 4/5 bold, 6 strike, 7/8 italic.
fn inline_pattern() -> &'static Regex {
    static INLINE: OnceLock<Regex> = OnceLock::new();
    INLINE.get_or_init(|| {
        Regex::new(
            r"\[([^\]]*)\]\(([^)]*)\)|`([^`]*)`|\*\*(.*?)\*\*|__(.*?)__|~~(.*?)~~|\*([^*]+)\*|_([^_]+)_",
        )
        .expect("inline pattern is valid")
    })
}

/// Tokenize one line of markup into text runs.
///
/// Never fails: unmatched text becomes plain runs, and a line with no
/// matches at all (unbalanced delimiters included) comes back as a
/// single plain run, unchanged.
#[must_use]
pub fn tokenize(line: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut scanned_to = 0;

    for caps in inline_pattern().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > scanned_to {
            runs.push(TextRun::plain(&line[scanned_to..whole.start()]));
        }
        runs.push(matched_run(&caps));
        scanned_to = whole.end();
    }

    if scanned_to < line.len() {
        runs.push(TextRun::plain(&line[scanned_to..]));
    }
    if runs.is_empty() {
        runs.push(TextRun::plain(line));
    }
    runs
}

fn matched_run(caps: &Captures<'_>) -> TextRun {
    if let Some(label) = caps.get(1) {
        let href = caps.get(2).map_or("", |m| m.as_str());
        TextRun::marked(label.as_str(), Mark::link(href))
    } else if let Some(code) = caps.get(3) {
        TextRun::marked(code.as_str(), Mark::Code)
    } else if let Some(bold) = caps.get(4).or_else(|| caps.get(5)) {
        TextRun::marked(bold.as_str(), Mark::Strong)
    } else if let Some(strike) = caps.get(6) {
        TextRun::marked(strike.as_str(), Mark::Strike)
    } else if let Some(em) = caps.get(7).or_else(|| caps.get(8)) {
        TextRun::marked(em.as_str(), Mark::Em)
    } else {
        // Every alternative carries a group, so this arm is unreachable;
        // falling back to plain text keeps the contract of never failing.
        TextRun::plain(caps.get(0).map_or("", |m| m.as_str()))
    }
}
