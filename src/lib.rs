//! Blurt - snippet triggers, aliases and autocomplete.
//!
//! The engine modules (`aliases`, `matching`, `validation`, `reconcile`,
//! `sites`, `placement`, `expansion`) are pure functions over snapshots the
//! caller passes in. `storage`, `import` and `cache` are the collaborators
//! that persist those snapshots and keep them fresh.

pub mod aliases;
pub mod cache;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod expansion;
pub mod import;
pub mod matching;
pub mod models;
pub mod placement;
pub mod reconcile;
pub mod sites;
pub mod storage;
pub mod validation;

// Re-export
pub use aliases::{acronym_from_trigger, aliases_for_trigger};
pub use cache::LiveState;
pub use cli::{Blurt, Commands};
pub use commands::handle_command;
pub use error::{BlurtError, Result};
pub use expansion::{process_expansion, should_auto_expand, word_before_index, Expansion};
pub use import::{
    apply_import, export, ExportPayload, ImportPayload, ImportSummary, IncomingSnippet,
};
pub use matching::{
    autocomplete_suggestions, filter_suggestions, match_trigger_pure, match_trigger_with_aliases,
    search_snippets, should_show_all_for_query,
};
pub use models::{AutocompletePosition, Placement, Settings, SettingsPatch, Snippet, Theme};
pub use placement::{compute_next_focus_index, desired_placement_auto, resolve_placement};
pub use reconcile::{
    dedupe_by_id, merge_settings_shallow, merge_snippets_by_trigger, retarget_triggers,
    MergeResult,
};
pub use sites::{is_autocomplete_enabled_on_site, is_site_enabled_for_settings};
pub use storage::{JsonFileStore, SettingsStore, SnippetStore, StoreChange};
pub use validation::{can_save_snippet, detect_overlap_warnings, normalize_trigger, OverlapWarning};
