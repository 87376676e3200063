use crate::matching::match_trigger_with_aliases;
use crate::models::{Settings, Snippet};

pub const KEY_SPACE: &str = " ";
pub const KEY_ENTER: &str = "Enter";

/// The token touching the caret and its character range in the text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordAtCaret {
    pub word: String,
    pub range: (usize, usize),
}

/// A resolved expansion: which snippet, what it replaces, and the new text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion<'a> {
    pub snippet: &'a Snippet,
    pub range: (usize, usize),
    pub text: String,
    /// Caret position after the inserted body.
    pub caret: usize,
}

/// Whether `key` should fire an expansion under the current settings.
/// With no expansion key configured, Space and Enter both do.
pub fn should_auto_expand(settings: &Settings, key: &str) -> bool {
    if !settings.enabled {
        return false;
    }
    if settings.expansion_key.is_empty() {
        return key == KEY_SPACE || key == KEY_ENTER;
    }
    key == settings.expansion_key
}

/// Walk back from `start` to the previous whitespace. Indices are in
/// characters and clamped into the text.
pub fn word_before_index(text: &str, start: usize, end: usize) -> WordAtCaret {
    let chars: Vec<char> = text.chars().collect();
    let start = start.min(chars.len());
    let end = end.min(chars.len());

    let word_start = chars[..start]
        .iter()
        .rposition(|c| c.is_whitespace())
        .map(|i| i + 1)
        .unwrap_or(0);
    let word = if end > word_start {
        chars[word_start..end].iter().collect()
    } else {
        String::new()
    };

    WordAtCaret {
        word,
        range: (word_start, end),
    }
}

/// Splice `replacement` over the character range `range`.
pub fn replace_range(text: &str, range: (usize, usize), replacement: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let start = range.0.min(chars.len());
    let end = range.1.clamp(start, chars.len());

    let mut out = String::with_capacity(text.len() + replacement.len());
    out.extend(&chars[..start]);
    out.push_str(replacement);
    out.extend(&chars[end..]);
    out
}

/// Process a key press at `caret` to check for a trigger expansion.
pub fn process_expansion<'a>(
    text: &str,
    caret: usize,
    key: &str,
    snippets: &'a [Snippet],
    settings: &Settings,
) -> Option<Expansion<'a>> {
    if !should_auto_expand(settings, key) {
        return None;
    }

    let WordAtCaret { word, range } = word_before_index(text, caret, caret);
    if word.is_empty() {
        return None;
    }

    let snippet = match_trigger_with_aliases(&word, snippets, &settings.trigger_prefix)?;
    let text = replace_range(text, range, &snippet.body);
    Some(Expansion {
        snippet,
        range,
        text,
        caret: range.0 + snippet.body.chars().count(),
    })
}
