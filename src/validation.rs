use crate::models::{Settings, Snippet};
use serde::Serialize;
use std::fmt;

/// Two triggers where typing the shorter one is also the start of the longer.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OverlapWarning {
    pub shorter: String,
    pub longer: String,
}

impl fmt::Display for OverlapWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Trigger overlap: \"{}\" is a prefix of \"{}\"",
            self.shorter, self.longer
        )
    }
}

/// Report every pair of triggers where one is a string prefix of another.
///
/// Triggers are sorted first, so a prefix always sorts before the triggers it
/// starts. All pairs are checked, not only neighbours, since a short trigger
/// can start many longer ones.
pub fn detect_overlap_warnings(snippets: &[Snippet]) -> Vec<OverlapWarning> {
    let mut triggers: Vec<&str> = snippets.iter().map(|s| s.trigger.as_str()).collect();
    triggers.sort_unstable();

    let mut warnings = Vec::new();
    for (i, a) in triggers.iter().enumerate() {
        for b in &triggers[i + 1..] {
            if b.starts_with(*a) {
                warnings.push(OverlapWarning {
                    shorter: a.to_string(),
                    longer: b.to_string(),
                });
            }
        }
    }
    warnings
}

/// A snippet is save-worthy when the trigger has content past the prefix and
/// description and body are both non-blank.
pub fn can_save_snippet(trigger: &str, prefix: &str, description: &str, body: &str) -> bool {
    let has_trigger = trigger.trim().chars().count() > prefix.chars().count();
    has_trigger && !description.trim().is_empty() && !body.trim().is_empty()
}

/// Trim and prefix-qualify a user-entered trigger. Blank input stays empty.
pub fn normalize_trigger(raw: &str, prefix: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.starts_with(prefix) {
        return trimmed.to_string();
    }
    format!("{}{}", prefix, trimmed)
}

pub fn count_chars(text: &str) -> usize {
    text.chars().count()
}

/// Advisory only; nothing refuses an oversized body.
pub fn exceeds_char_limit(body: &str, settings: &Settings) -> bool {
    count_chars(body) > settings.char_limit
}
