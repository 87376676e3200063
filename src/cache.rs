//! In-memory snapshot of both stores for the layer that calls the engine.
//!
//! The engine functions stay stateless; this is where a long-lived caller
//! keeps the latest snippets and settings, refreshed from store change
//! callbacks instead of re-reading on every keystroke.

use crate::error::Result;
use crate::expansion::{process_expansion, Expansion};
use crate::matching::autocomplete_suggestions;
use crate::models::{Settings, Snippet};
use crate::sites::{is_autocomplete_enabled_on_site, is_site_enabled_for_settings};
use crate::storage::{ChangeNotifier, SettingsStore, SnippetStore, StoreChange, SubscriptionId};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LiveState {
    pub snippets: Vec<Snippet>,
    pub settings: Settings,
}

impl LiveState {
    pub fn load<S>(store: &S) -> Result<Self>
    where
        S: SnippetStore + SettingsStore + ?Sized,
    {
        Ok(Self {
            snippets: store.load_snippets()?,
            settings: store.load_settings()?,
        })
    }

    /// Take the after-snapshot of whichever half changed.
    pub fn apply(&mut self, change: &StoreChange) {
        match change {
            StoreChange::Snippets { after, .. } => {
                debug!(count = after.len(), "live snippets refreshed");
                self.snippets = after.clone();
            }
            StoreChange::Settings { after, .. } => {
                debug!("live settings refreshed");
                self.settings = after.clone();
            }
        }
    }

    /// Load a shared snapshot and keep it fresh through a store subscription.
    ///
    /// The subscription takes the write lock while the store notifies, so
    /// drop any read guard before writing through the store on the same
    /// thread or the write deadlocks.
    pub fn shared<S>(store: &S) -> Result<(Arc<RwLock<LiveState>>, SubscriptionId)>
    where
        S: SnippetStore + SettingsStore + ChangeNotifier + ?Sized,
    {
        let state = Arc::new(RwLock::new(Self::load(store)?));
        let handle = Arc::clone(&state);
        let id = store.subscribe(Box::new(move |change| {
            handle
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .apply(change);
        }));
        Ok((state, id))
    }

    /// Autocomplete candidates for `term` typed on `host`, honouring the
    /// global switches, site lists and item cap.
    pub fn suggest(&self, term: &str, host: &str) -> Vec<&Snippet> {
        if !is_autocomplete_enabled_on_site(host, &self.settings) {
            return Vec::new();
        }
        autocomplete_suggestions(
            term,
            &self.snippets,
            &self.settings.trigger_prefix,
            self.settings.effective_max_items(),
        )
    }

    /// Expansion for a key press at `caret` on `host`, if any.
    pub fn expand(&self, text: &str, caret: usize, key: &str, host: &str) -> Option<Expansion<'_>> {
        if !is_site_enabled_for_settings(host, &self.settings) {
            return None;
        }
        process_expansion(text, caret, key, &self.snippets, &self.settings)
    }
}
