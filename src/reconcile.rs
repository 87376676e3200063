//! Deterministic merging of imported or externally changed collections.

use crate::models::{Settings, SettingsPatch, Snippet};
use crate::validation::normalize_trigger;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashSet;

/// Outcome of merging an incoming snippet list by trigger.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct MergeResult {
    pub merged: Vec<Snippet>,
    pub added: usize,
    pub updated: usize,
}

/// Merge `incoming` into `existing`, keyed by trigger.
///
/// The map is seeded from `existing`; a trigger repeated there keeps its first
/// position but the last record's value. An incoming record with a known
/// trigger is merged over the current one and counts as updated, otherwise it
/// is appended and counts as added.
pub fn merge_snippets_by_trigger(existing: &[Snippet], incoming: &[Snippet]) -> MergeResult {
    let mut by_trigger: IndexMap<&str, Snippet> = IndexMap::with_capacity(existing.len());
    for snippet in existing {
        by_trigger.insert(snippet.trigger.as_str(), snippet.clone());
    }

    let mut added = 0;
    let mut updated = 0;
    for snippet in incoming {
        match by_trigger.get_mut(snippet.trigger.as_str()) {
            Some(current) => {
                *current = current.merged_with(snippet);
                updated += 1;
            }
            None => {
                by_trigger.insert(snippet.trigger.as_str(), snippet.clone());
                added += 1;
            }
        }
    }

    MergeResult {
        merged: by_trigger.into_values().collect(),
        added,
        updated,
    }
}

/// One-level overwrite of every field `incoming` carries.
pub fn merge_settings_shallow(existing: &Settings, incoming: Option<&SettingsPatch>) -> Settings {
    let mut merged = existing.clone();
    if let Some(patch) = incoming {
        merged.apply(patch);
    }
    merged
}

/// Move every trigger from `old_prefix` to `new_prefix`.
///
/// Triggers carrying the old prefix have it swapped, the rest of the trigger
/// kept verbatim. Triggers carrying neither prefix are normalized against the
/// new one: `"  #c"` becomes `"#c"`, not `"##c"`, and a blank trigger stays
/// blank.
pub fn retarget_triggers(snippets: &[Snippet], old_prefix: &str, new_prefix: &str) -> Vec<Snippet> {
    if old_prefix == new_prefix {
        return snippets.to_vec();
    }
    snippets
        .iter()
        .map(|s| {
            let trigger = if let Some(rest) = s.trigger.strip_prefix(old_prefix) {
                format!("{}{}", new_prefix, rest)
            } else if !s.trigger.starts_with(new_prefix) {
                normalize_trigger(&s.trigger, new_prefix)
            } else {
                s.trigger.clone()
            };
            Snippet {
                trigger,
                ..s.clone()
            }
        })
        .collect()
}

/// Anything carrying a stable identifier.
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Snippet {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Keep the first occurrence of each id, in order.
pub fn dedupe_by_id<T: Identified + Clone>(list: &[T]) -> Vec<T> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(list.len());
    list.iter()
        .filter(|item| seen.insert(item.id()))
        .cloned()
        .collect()
}
