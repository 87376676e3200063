use crate::config::{
    ensure_config_dir, get_local_db_path, get_sync_db_path, SETTINGS_KEY, SNIPPETS_KEY,
};
use crate::error::{BlurtError, Result};
use crate::models::{Settings, Snippet};
use crate::reconcile::{dedupe_by_id, retarget_triggers};
use crate::validation::{can_save_snippet, detect_overlap_warnings, normalize_trigger};
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info, warn};

/// Reads and replaces the whole snippet list.
pub trait SnippetStore {
    fn load_snippets(&self) -> Result<Vec<Snippet>>;
    fn save_snippets(&self, snippets: &[Snippet]) -> Result<()>;
}

/// Reads the settings record, defaulted, and replaces it whole.
pub trait SettingsStore {
    fn load_settings(&self) -> Result<Settings>;
    fn save_settings(&self, settings: &Settings) -> Result<()>;
}

/// A write that went through, with the value before and after.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreChange {
    Snippets {
        before: Vec<Snippet>,
        after: Vec<Snippet>,
    },
    Settings {
        before: Settings,
        after: Settings,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub type ChangeCallback = Box<dyn Fn(&StoreChange) + Send + Sync>;

/// Change notification for stores.
pub trait ChangeNotifier {
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId;
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

/// JSON documents on disk: a local tier that is read and written, and an
/// optional sync tier that only seeds keys the local tier lacks.
pub struct JsonFileStore {
    local_path: PathBuf,
    sync_path: Option<PathBuf>,
    subscribers: Mutex<Vec<(SubscriptionId, ChangeCallback)>>,
    next_subscription: AtomicU64,
}

impl JsonFileStore {
    pub fn new(local_path: impl Into<PathBuf>, sync_path: Option<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            sync_path,
            subscribers: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Both tiers inside `dir`, under their default file names.
    pub fn in_dir(dir: &Path) -> Result<Self> {
        let dir = ensure_config_dir(dir)?;
        Ok(Self::new(
            get_local_db_path(&dir),
            Some(get_sync_db_path(&dir)),
        ))
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    fn read_doc(path: &Path) -> Result<Map<String, Value>> {
        if !path.exists() {
            return Ok(Map::new());
        }
        let content = fs::read_to_string(path)?;

        // Handle empty store file
        if content.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(BlurtError::Other(format!(
                "store document at {} is not a JSON object",
                path.display()
            ))),
        }
    }

    fn write_doc(path: &Path, doc: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                ensure_config_dir(parent)?;
            }
        }
        let serialized = serde_json::to_string_pretty(doc)?;
        fs::write(path, serialized)?;
        Ok(())
    }

    /// Local wins; keys missing locally are copied over from the sync tier.
    fn ensure_local_from_sync(&self, keys: &[&str]) -> Result<Map<String, Value>> {
        let mut local = Self::read_doc(&self.local_path)?;
        let missing: Vec<&str> = keys
            .iter()
            .copied()
            .filter(|k| !local.contains_key(*k))
            .collect();
        if missing.is_empty() {
            return Ok(local);
        }
        let Some(sync_path) = &self.sync_path else {
            return Ok(local);
        };

        let sync = Self::read_doc(sync_path)?;
        let mut copied = 0;
        for key in missing {
            if let Some(value) = sync.get(key) {
                local.insert(key.to_string(), value.clone());
                copied += 1;
            }
        }
        if copied > 0 {
            debug!(copied, "seeded local store from sync tier");
            Self::write_doc(&self.local_path, &local)?;
        }
        Ok(local)
    }

    fn get(&self, key: &str) -> Result<Option<Value>> {
        let doc = self.ensure_local_from_sync(&[key])?;
        Ok(doc.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<Option<Value>> {
        let mut doc = Self::read_doc(&self.local_path)?;
        let before = doc.insert(key.to_string(), value);
        Self::write_doc(&self.local_path, &doc)?;
        Ok(before)
    }

    // Callbacks run under the subscriber lock and must not (un)subscribe.
    fn notify(&self, change: StoreChange) {
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        for (_, callback) in subscribers.iter() {
            callback(&change);
        }
    }

    /// Write the demo snippets and default settings when neither tier has
    /// them yet. Returns whether anything was written.
    pub fn seed_defaults(&self) -> Result<bool> {
        let doc = self.ensure_local_from_sync(&[SNIPPETS_KEY, SETTINGS_KEY])?;
        let mut seeded = false;
        if !doc.get(SNIPPETS_KEY).is_some_and(Value::is_array) {
            self.save_snippets(&seed_snippets())?;
            seeded = true;
        }
        if !doc.get(SETTINGS_KEY).is_some_and(|v| !v.is_null()) {
            self.save_settings(&Settings::default())?;
            seeded = true;
        }
        if seeded {
            info!(path = %self.local_path.display(), "seeded store with defaults");
        }
        Ok(seeded)
    }
}

fn snippets_from_value(value: Option<Value>) -> Result<Vec<Snippet>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(v) => Ok(serde_json::from_value(v)?),
    }
}

fn settings_from_value(value: Option<Value>) -> Result<Settings> {
    match value {
        None | Some(Value::Null) => Ok(Settings::default()),
        Some(v) => Ok(serde_json::from_value(v)?),
    }
}

impl SnippetStore for JsonFileStore {
    fn load_snippets(&self) -> Result<Vec<Snippet>> {
        let snippets = snippets_from_value(self.get(SNIPPETS_KEY)?)?;
        debug!(count = snippets.len(), "loaded snippets");
        Ok(snippets)
    }

    fn save_snippets(&self, snippets: &[Snippet]) -> Result<()> {
        let before = self.set(SNIPPETS_KEY, serde_json::to_value(snippets)?)?;
        // an unreadable previous value reports as empty
        let before = snippets_from_value(before).unwrap_or_default();
        self.notify(StoreChange::Snippets {
            before,
            after: snippets.to_vec(),
        });
        Ok(())
    }
}

impl SettingsStore for JsonFileStore {
    fn load_settings(&self) -> Result<Settings> {
        settings_from_value(self.get(SETTINGS_KEY)?)
    }

    fn save_settings(&self, settings: &Settings) -> Result<()> {
        let before = self.set(SETTINGS_KEY, serde_json::to_value(settings)?)?;
        let before = settings_from_value(before).unwrap_or_default();
        self.notify(StoreChange::Settings {
            before,
            after: settings.clone(),
        });
        Ok(())
    }
}

impl ChangeNotifier for JsonFileStore {
    fn subscribe(&self, callback: ChangeCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, callback));
        id
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(sid, _)| *sid != id);
        subscribers.len() != before
    }
}

pub fn new_snippet_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn seed_snippets() -> Vec<Snippet> {
    vec![
        Snippet::new(
            new_snippet_id(),
            "/sig",
            Some("Signature of Zog the Diplomat (Alpha Centauri)".to_string()),
            "Best regards,\nZog of Centauri\nAmbassador to the Solar Council\nInterstellar Comms: 7-ALPHA-ZOG\nPS: Please ignore abductions - purely scientific",
        ),
        Snippet::new(
            new_snippet_id(),
            "/addr",
            Some("Martian shipping address (Olympus Mons)".to_string()),
            "Alien Bazaar\nCrate #42, Sector Red Dunes\nOlympus Mons Ridge, Mars\nSolar System 3, Milky Way\nAttn: Kindly avoid atmosphere entry at dawn",
        ),
    ]
}

fn log_overlaps(snippets: &[Snippet], trigger: &str) {
    for warning in detect_overlap_warnings(snippets)
        .into_iter()
        .filter(|w| w.shorter == trigger || w.longer == trigger)
    {
        warn!("{}", warning);
    }
}

/// Add a new snippet
pub fn add_snippet<S>(store: &S, trigger: &str, description: &str, body: &str) -> Result<Snippet>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    let prefix = store.load_settings()?.trigger_prefix;
    let trigger = normalize_trigger(trigger, &prefix);
    if !can_save_snippet(&trigger, &prefix, description, body) {
        return Err(BlurtError::InvalidSnippet(
            "a trigger past the prefix, a description and a body are all required".to_string(),
        ));
    }

    let mut snippets = store.load_snippets()?;
    let entry = Snippet::new(
        new_snippet_id(),
        trigger.clone(),
        Some(description.trim().to_string()),
        body,
    );
    snippets.push(entry.clone());
    store.save_snippets(&snippets)?;
    log_overlaps(&snippets, &trigger);
    Ok(entry)
}

/// Fields to change on an existing snippet; `None` keeps the current value.
#[derive(Debug, Clone, Default)]
pub struct SnippetEdit {
    pub trigger: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

/// Update an existing snippet, matched by id or exact trigger
pub fn update_snippet<S>(store: &S, key: &str, edit: SnippetEdit) -> Result<Snippet>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    let prefix = store.load_settings()?.trigger_prefix;
    let mut snippets = store.load_snippets()?;
    let entry = snippets
        .iter_mut()
        .find(|s| s.id == key || s.trigger == key)
        .ok_or_else(|| BlurtError::SnippetNotFound(key.to_string()))?;

    let trigger = edit
        .trigger
        .map(|t| normalize_trigger(&t, &prefix))
        .unwrap_or_else(|| entry.trigger.clone());
    let description = edit
        .description
        .map(|d| d.trim().to_string())
        .or_else(|| entry.description.clone());
    let body = edit.body.unwrap_or_else(|| entry.body.clone());
    if !can_save_snippet(&trigger, &prefix, description.as_deref().unwrap_or(""), &body) {
        return Err(BlurtError::InvalidSnippet(format!(
            "edit would leave '{}' without a trigger, description or body",
            key
        )));
    }

    entry.trigger = trigger.clone();
    entry.description = description;
    entry.body = body;
    let updated = entry.clone();

    store.save_snippets(&snippets)?;
    log_overlaps(&snippets, &trigger);
    Ok(updated)
}

/// Delete every snippet whose id or trigger equals `key`
pub fn delete_snippet<S>(store: &S, key: &str) -> Result<usize>
where
    S: SnippetStore + ?Sized,
{
    let mut snippets = store.load_snippets()?;
    let before = snippets.len();
    snippets.retain(|s| s.id != key && s.trigger != key);
    let removed = before - snippets.len();
    if removed == 0 {
        return Err(BlurtError::SnippetNotFound(key.to_string()));
    }
    store.save_snippets(&snippets)?;
    Ok(removed)
}

/// Change the global prefix and move every trigger over to it. Returns how
/// many triggers changed.
pub fn set_trigger_prefix<S>(store: &S, new_prefix: &str) -> Result<usize>
where
    S: SnippetStore + SettingsStore + ?Sized,
{
    let mut settings = store.load_settings()?;
    if settings.trigger_prefix == new_prefix {
        return Ok(0);
    }

    let snippets = store.load_snippets()?;
    let retargeted = retarget_triggers(&snippets, &settings.trigger_prefix, new_prefix);
    let changed = snippets
        .iter()
        .zip(&retargeted)
        .filter(|(a, b)| a.trigger != b.trigger)
        .count();
    store.save_snippets(&retargeted)?;

    info!(
        from = %settings.trigger_prefix,
        to = %new_prefix,
        changed,
        "retargeted triggers"
    );
    settings.trigger_prefix = new_prefix.to_string();
    store.save_settings(&settings)?;
    Ok(changed)
}

/// Drop later entries that repeat an id. Returns how many were removed.
pub fn heal_duplicates<S>(store: &S) -> Result<usize>
where
    S: SnippetStore + ?Sized,
{
    let snippets = store.load_snippets()?;
    let deduped = dedupe_by_id(&snippets);
    let removed = snippets.len() - deduped.len();
    if removed > 0 {
        warn!(removed, "removed snippets with duplicate ids");
        store.save_snippets(&deduped)?;
    }
    Ok(removed)
}
