use crate::config::{DEFAULT_CHAR_LIMIT, DEFAULT_MAX_ITEMS, DEFAULT_PREFIX};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A stored text snippet. `id` is the identity; `trigger` is the match key and
/// may repeat across entries.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Snippet {
    pub id: String,
    pub trigger: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub body: String,
}

impl Snippet {
    pub fn new(
        id: impl Into<String>,
        trigger: impl Into<String>,
        description: Option<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            trigger: trigger.into(),
            description,
            body: body.into(),
        }
    }

    /// Shallow merge where every field `incoming` defines wins, id included.
    /// A missing description keeps the current one.
    pub fn merged_with(&self, incoming: &Snippet) -> Snippet {
        Snippet {
            id: incoming.id.clone(),
            trigger: incoming.trigger.clone(),
            description: incoming
                .description
                .clone()
                .or_else(|| self.description.clone()),
            body: incoming.body.clone(),
        }
    }

    pub fn description_or_empty(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    #[default]
    Dark,
    System,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum AutocompletePosition {
    #[default]
    Auto,
    Top,
    Bottom,
}

/// Where the suggestion panel sits relative to the caret.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Top,
    Bottom,
}

/// The single settings record. Fields missing from a stored document fall back
/// to [`Settings::default`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub enabled: bool,
    pub theme: Theme,
    pub trigger_prefix: String,
    /// Empty means expand on Space/Enter.
    pub expansion_key: String,
    pub char_limit: usize,
    pub autocomplete_enabled: bool,
    pub autocomplete_position: AutocompletePosition,
    pub autocomplete_max_items: usize,
    pub allowlist: Vec<String>,
    pub blocklist: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: Theme::Dark,
            trigger_prefix: DEFAULT_PREFIX.to_string(),
            expansion_key: String::new(),
            char_limit: DEFAULT_CHAR_LIMIT,
            autocomplete_enabled: true,
            autocomplete_position: AutocompletePosition::Auto,
            autocomplete_max_items: DEFAULT_MAX_ITEMS,
            allowlist: Vec::new(),
            blocklist: Vec::new(),
        }
    }
}

impl Settings {
    /// Suggestion cap with `0` read as unset.
    pub fn effective_max_items(&self) -> usize {
        match self.autocomplete_max_items {
            0 => DEFAULT_MAX_ITEMS,
            n => n,
        }
    }

    /// Overwrite every field the patch carries. One level only.
    pub fn apply(&mut self, patch: &SettingsPatch) {
        if let Some(enabled) = patch.enabled {
            self.enabled = enabled;
        }
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(prefix) = &patch.trigger_prefix {
            self.trigger_prefix = prefix.clone();
        }
        if let Some(key) = &patch.expansion_key {
            self.expansion_key = key.clone();
        }
        if let Some(limit) = patch.char_limit {
            self.char_limit = limit;
        }
        if let Some(enabled) = patch.autocomplete_enabled {
            self.autocomplete_enabled = enabled;
        }
        if let Some(position) = patch.autocomplete_position {
            self.autocomplete_position = position;
        }
        if let Some(max) = patch.autocomplete_max_items {
            self.autocomplete_max_items = max;
        }
        if let Some(allow) = &patch.allowlist {
            self.allowlist = allow.clone();
        }
        if let Some(block) = &patch.blocklist {
            self.blocklist = block.clone();
        }
    }
}

/// A partial settings update, as carried by imports and the settings form.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<Theme>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trigger_prefix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expansion_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_limit: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete_position: Option<AutocompletePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autocomplete_max_items: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocklist: Option<Vec<String>>,
}

impl SettingsPatch {
    pub fn is_empty(&self) -> bool {
        *self == SettingsPatch::default()
    }

    /// Bring form-entered values into range: an empty prefix becomes the
    /// default, the item cap is held to `1..=20`.
    pub fn sanitized(mut self) -> Self {
        if let Some(prefix) = &self.trigger_prefix {
            if prefix.trim().is_empty() {
                self.trigger_prefix = Some(DEFAULT_PREFIX.to_string());
            }
        }
        if let Some(max) = self.autocomplete_max_items {
            self.autocomplete_max_items =
                Some(max.clamp(1, crate::config::MAX_ITEMS_CEILING));
        }
        self.allowlist = self.allowlist.map(clean_host_list);
        self.blocklist = self.blocklist.map(clean_host_list);
        self
    }
}

/// Split host list entries on newlines/commas, trim, drop empties.
pub fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == '\n' || c == ',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn clean_host_list(list: Vec<String>) -> Vec<String> {
    list.iter().flat_map(|entry| parse_host_list(entry)).collect()
}
