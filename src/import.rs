//! Import and export payloads.
//!
//! Imports accept two spellings of each key: the canonical `snippets` and
//! `settings`, and the legacy storage keys. Either shape is normalized here
//! into [`IncomingSnippet`]s and a [`SettingsPatch`] before anything is merged.

use crate::config::{IMPORT_FILENAME, SETTINGS_KEY, SNIPPETS_KEY};
use crate::error::{BlurtError, Result};
use crate::models::{Settings, SettingsPatch, Snippet};
use crate::reconcile::{merge_settings_shallow, merge_snippets_by_trigger};
use crate::storage::{SettingsStore, SnippetStore};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

const CANONICAL_SNIPPETS_KEY: &str = "snippets";
const CANONICAL_SETTINGS_KEY: &str = "settings";

/// The whole of both stores, as written to an export file.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExportPayload {
    pub snippets: Vec<Snippet>,
    pub settings: Settings,
}

/// One imported snippet record. Only the trigger is required; fields left
/// out fall back to the stored snippet with the same trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingSnippet {
    pub id: Option<String>,
    pub trigger: String,
    pub description: Option<String>,
    pub body: Option<String>,
}

impl IncomingSnippet {
    fn from_record(record: &Value) -> Option<Self> {
        let text = |key: &str| record.get(key).and_then(Value::as_str).map(str::to_string);
        Some(Self {
            trigger: text("trigger")?,
            id: text("id"),
            description: text("description"),
            body: text("body"),
        })
    }

    /// Fill the missing fields from `current`. Without a current snippet the
    /// record needs a body and gets a fresh id when it has none.
    pub fn resolve(
        &self,
        current: Option<&Snippet>,
        next_id: &mut impl FnMut() -> String,
    ) -> Option<Snippet> {
        match current {
            Some(current) => Some(Snippet {
                id: self.id.clone().unwrap_or_else(|| current.id.clone()),
                trigger: self.trigger.clone(),
                description: self
                    .description
                    .clone()
                    .or_else(|| current.description.clone()),
                body: self.body.clone().unwrap_or_else(|| current.body.clone()),
            }),
            None => {
                let body = self.body.clone()?;
                let id = self.id.clone().unwrap_or_else(|| next_id());
                Some(Snippet::new(id, self.trigger.clone(), self.description.clone(), body))
            }
        }
    }
}

/// An import, normalized to one canonical shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportPayload {
    pub snippets: Option<Vec<IncomingSnippet>>,
    pub settings: Option<SettingsPatch>,
    /// Snippet records skipped for lacking a trigger.
    pub dropped: usize,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImportSummary {
    pub added: usize,
    pub updated: usize,
    /// New triggers that arrived without a body.
    pub skipped: usize,
    pub settings_applied: bool,
}

pub fn is_valid_import_filename(name: &str) -> bool {
    name == IMPORT_FILENAME
}

impl ImportPayload {
    /// Normalize a parsed document. The canonical snippet key is used when it
    /// holds an array, else the legacy key; the canonical settings key is used
    /// when present and non-null, else the legacy key.
    pub fn from_value(value: &Value) -> Self {
        let records = value
            .get(CANONICAL_SNIPPETS_KEY)
            .and_then(Value::as_array)
            .or_else(|| value.get(SNIPPETS_KEY).and_then(Value::as_array));

        let mut dropped = 0;
        let snippets = records.map(|records| {
            records
                .iter()
                .filter_map(|record| {
                    let snippet = IncomingSnippet::from_record(record);
                    if snippet.is_none() {
                        dropped += 1;
                    }
                    snippet
                })
                .collect::<Vec<_>>()
        });
        if dropped > 0 {
            warn!(dropped, "skipped imported snippets without a trigger");
        }

        let settings = value
            .get(CANONICAL_SETTINGS_KEY)
            .filter(|v| !v.is_null())
            .or_else(|| value.get(SETTINGS_KEY).filter(|v| !v.is_null()))
            .and_then(|raw| match serde_json::from_value::<SettingsPatch>(raw.clone()) {
                Ok(patch) => Some(patch),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable imported settings");
                    None
                }
            });

        Self {
            snippets,
            settings,
            dropped,
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Ok(Self::from_value(&value))
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_none() && self.settings.is_none()
    }
}

/// Resolve incoming records against `existing`, in order. A record sees the
/// snippets resolved before it, so a later record for the same new trigger
/// may omit the body.
fn resolve_incoming(
    existing: &[Snippet],
    incoming: &[IncomingSnippet],
    next_id: &mut impl FnMut() -> String,
) -> (Vec<Snippet>, usize) {
    let mut known: HashMap<String, Snippet> = existing
        .iter()
        .map(|s| (s.trigger.clone(), s.clone()))
        .collect();
    let mut resolved = Vec::with_capacity(incoming.len());
    let mut skipped = 0;
    for record in incoming {
        match record.resolve(known.get(&record.trigger), &mut *next_id) {
            Some(snippet) => {
                known.insert(snippet.trigger.clone(), snippet.clone());
                resolved.push(snippet);
            }
            None => skipped += 1,
        }
    }
    (resolved, skipped)
}

/// Read an import file after checking its name.
pub fn read_import_file(path: &Path) -> Result<ImportPayload> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !is_valid_import_filename(&name) {
        return Err(BlurtError::InvalidImportFilename {
            expected: IMPORT_FILENAME.to_string(),
            found: name,
        });
    }
    let content = fs::read_to_string(path)?;
    ImportPayload::from_json(&content)
}

/// Merge snippets by trigger and shallow-merge settings, persisting both.
/// New snippets without an id take one from `next_id`.
pub fn apply_import<S>(
    store: &S,
    payload: &ImportPayload,
    mut next_id: impl FnMut() -> String,
) -> Result<ImportSummary>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    let mut summary = ImportSummary::default();

    if let Some(incoming) = &payload.snippets {
        let existing = store.load_snippets()?;
        let (resolved, skipped) = resolve_incoming(&existing, incoming, &mut next_id);
        if skipped > 0 {
            warn!(skipped, "skipped new imported snippets without a body");
        }
        let result = merge_snippets_by_trigger(&existing, &resolved);
        store.save_snippets(&result.merged)?;
        summary.added = result.added;
        summary.updated = result.updated;
        summary.skipped = skipped;
    }

    if let Some(patch) = &payload.settings {
        let existing = store.load_settings()?;
        let merged = merge_settings_shallow(&existing, Some(patch));
        store.save_settings(&merged)?;
        summary.settings_applied = true;
    }

    info!(
        added = summary.added,
        updated = summary.updated,
        settings = summary.settings_applied,
        "import applied"
    );
    Ok(summary)
}

pub fn export<S>(store: &S) -> Result<ExportPayload>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    Ok(ExportPayload {
        snippets: store.load_snippets()?,
        settings: store.load_settings()?,
    })
}

/// Write the export into `dir` under the one name imports accept.
pub fn write_export_file<S>(store: &S, dir: &Path) -> Result<PathBuf>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    let payload = export(store)?;
    let path = dir.join(IMPORT_FILENAME);
    fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
    info!(path = %path.display(), snippets = payload.snippets.len(), "exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn counter() -> impl FnMut() -> String {
        let mut n = 0;
        move || {
            n += 1;
            format!("gen-{}", n)
        }
    }

    #[test]
    fn canonical_keys_win_over_legacy() {
        let value = json!({
            "snippets": [{"id": "1", "trigger": "/a", "body": "x"}],
            "blurt_snippets": [{"id": "2", "trigger": "/b", "body": "y"}],
            "settings": {"enabled": false},
            "blurt_settings": {"theme": "light"},
        });
        let payload = ImportPayload::from_value(&value);
        let snippets = payload.snippets.unwrap();
        assert_eq!(snippets.len(), 1);
        assert_eq!(snippets[0].trigger, "/a");
        let settings = payload.settings.unwrap();
        assert_eq!(settings.enabled, Some(false));
        assert_eq!(settings.theme, None);
    }

    #[test]
    fn legacy_keys_are_accepted() {
        let value = json!({
            "blurt_snippets": [{"id": "2", "trigger": "/b", "body": "y"}],
            "blurt_settings": {"triggerPrefix": "#"},
        });
        let payload = ImportPayload::from_value(&value);
        assert_eq!(payload.snippets.unwrap()[0].id.as_deref(), Some("2"));
        assert_eq!(payload.settings.unwrap().trigger_prefix.as_deref(), Some("#"));
    }

    #[test]
    fn non_array_canonical_snippets_fall_back_to_legacy() {
        let value = json!({
            "snippets": "oops",
            "blurt_snippets": [{"id": "2", "trigger": "/b", "body": "y"}],
        });
        let payload = ImportPayload::from_value(&value);
        assert_eq!(payload.snippets.unwrap().len(), 1);
    }

    #[test]
    fn records_keep_only_the_fields_they_carry() {
        let value = json!({
            "snippets": [
                {"trigger": "/a", "body": "x", "description": "A"},
                {"id": "9", "body": "no trigger"},
                {"id": "8", "trigger": "/c"},
            ],
        });
        let payload = ImportPayload::from_value(&value);
        let snippets = payload.snippets.unwrap();
        assert_eq!(snippets.len(), 2);
        assert_eq!(snippets[0].id, None);
        assert_eq!(snippets[0].description.as_deref(), Some("A"));
        assert_eq!(snippets[1].body, None);
        assert_eq!(payload.dropped, 1);
    }

    #[test]
    fn resolve_falls_back_to_current_snippet() {
        let current = Snippet::new("orig", "/a", Some("A".into()), "old");
        let incoming = IncomingSnippet {
            trigger: "/a".into(),
            description: Some("New".into()),
            ..Default::default()
        };
        let resolved = incoming.resolve(Some(&current), &mut counter()).unwrap();
        assert_eq!(resolved, Snippet::new("orig", "/a", Some("New".into()), "old"));
    }

    #[test]
    fn resolve_new_snippet_needs_body_and_gets_id() {
        let mut next_id = counter();
        let bare = IncomingSnippet {
            trigger: "/n".into(),
            ..Default::default()
        };
        assert_eq!(bare.resolve(None, &mut next_id), None);

        let with_body = IncomingSnippet {
            body: Some("text".into()),
            ..bare
        };
        let resolved = with_body.resolve(None, &mut next_id).unwrap();
        assert_eq!(resolved.id, "gen-1");
        assert_eq!(resolved.body, "text");
    }

    #[test]
    fn later_records_see_earlier_ones() {
        let incoming = vec![
            IncomingSnippet {
                trigger: "/n".into(),
                body: Some("first".into()),
                ..Default::default()
            },
            IncomingSnippet {
                trigger: "/n".into(),
                description: Some("D".into()),
                ..Default::default()
            },
        ];
        let (resolved, skipped) = resolve_incoming(&[], &incoming, &mut counter());
        assert_eq!(skipped, 0);
        assert_eq!(resolved[1].id, "gen-1");
        assert_eq!(resolved[1].body, "first");
    }

    #[test]
    fn unrelated_documents_import_nothing() {
        let payload = ImportPayload::from_json("[1, 2, 3]").unwrap();
        assert!(payload.is_empty());
        assert!(ImportPayload::from_json("{not json").is_err());
    }

    #[test]
    fn filename_must_match_exactly() {
        assert!(is_valid_import_filename("blurt.snippets.json"));
        assert!(!is_valid_import_filename("blurt.snippets (1).json"));
        let err = read_import_file(Path::new("/tmp/other.json")).unwrap_err();
        assert!(matches!(err, BlurtError::InvalidImportFilename { .. }));
    }
}
