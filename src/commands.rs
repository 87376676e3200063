use crate::cache::LiveState;
use crate::cli::Commands;
use crate::config::get_config_dir;
use crate::error::Result;
use crate::expansion::process_expansion;
use crate::import::{apply_import, read_import_file, write_export_file};
use crate::matching::{autocomplete_suggestions, search_snippets};
use crate::models::{parse_host_list, SettingsPatch, Snippet};
use crate::sites::{is_autocomplete_enabled_on_site, is_site_enabled_for_settings, normalize_host};
use crate::storage::{
    add_snippet, delete_snippet, heal_duplicates, new_snippet_id, set_trigger_prefix,
    update_snippet, JsonFileStore, SettingsStore, SnippetEdit, SnippetStore,
};
use crate::validation::{detect_overlap_warnings, exceeds_char_limit};
use std::path::PathBuf;

fn print_snippet(snippet: &Snippet) {
    let first_line = snippet.body.lines().next().unwrap_or("");
    println!(
        "{:<16} {:<32} {}",
        snippet.trigger,
        snippet.description_or_empty(),
        first_line
    );
}

pub fn handle_command(dir: Option<PathBuf>, command: Option<Commands>) -> Result<()> {
    let dir = dir.unwrap_or_else(get_config_dir);
    let store = JsonFileStore::in_dir(&dir)?;
    store.seed_defaults()?;

    match command {
        Some(command) => handle_subcommand(&store, command),
        None => list(&store, None), // Default: list snippets when no command provided
    }
}

fn handle_subcommand(store: &JsonFileStore, command: Commands) -> Result<()> {
    match command {
        Commands::Add {
            trigger,
            description,
            body,
        } => {
            let entry = add_snippet(store, &trigger, &description, &body)?;
            if exceeds_char_limit(&entry.body, &store.load_settings()?) {
                println!("Note: body is over the character limit");
            }
            println!("Snippet {} added successfully", entry.trigger);
            Ok(())
        }
        Commands::Update {
            key,
            trigger,
            description,
            body,
        } => {
            let edit = SnippetEdit {
                trigger,
                description,
                body,
            };
            update_snippet(store, &key, edit)
                .map(|entry| println!("Snippet {} updated successfully", entry.trigger))
        }
        Commands::Delete { key } => delete_snippet(store, &key)
            .map(|removed| println!("Deleted {} snippet(s)", removed)),
        Commands::List { query } => list(store, query.as_deref()),
        Commands::Expand {
            text,
            caret,
            key,
            host,
        } => handle_expand(store, &text, caret, &key, host.as_deref()),
        Commands::Suggest { term, host, max } => handle_suggest(store, &term, host.as_deref(), max),
        Commands::Overlaps => {
            let warnings = detect_overlap_warnings(&store.load_snippets()?);
            if warnings.is_empty() {
                println!("No overlapping triggers");
            }
            for warning in warnings {
                println!("{}", warning);
            }
            Ok(())
        }
        Commands::Prefix { prefix } => {
            let prefix = match prefix.trim() {
                "" => crate::config::DEFAULT_PREFIX.to_string(),
                trimmed => trimmed.to_string(),
            };
            let changed = set_trigger_prefix(store, &prefix)?;
            println!("Prefix set to '{}', {} trigger(s) retargeted", prefix, changed);
            Ok(())
        }
        Commands::Site { host } => {
            let settings = store.load_settings()?;
            println!(
                "{}: expansion {}, autocomplete {}",
                normalize_host(&host),
                on_off(settings.enabled && is_site_enabled_for_settings(&host, &settings)),
                on_off(is_autocomplete_enabled_on_site(&host, &settings))
            );
            Ok(())
        }
        Commands::Settings {
            enabled,
            theme,
            expansion_key,
            char_limit,
            autocomplete,
            position,
            max_items,
            allow,
            block,
        } => {
            let patch = SettingsPatch {
                enabled,
                theme,
                trigger_prefix: None,
                expansion_key,
                char_limit,
                autocomplete_enabled: autocomplete,
                autocomplete_position: position,
                autocomplete_max_items: max_items,
                allowlist: allow.as_deref().map(parse_host_list),
                blocklist: block.as_deref().map(parse_host_list),
            }
            .sanitized();

            let mut settings = store.load_settings()?;
            if !patch.is_empty() {
                settings.apply(&patch);
                store.save_settings(&settings)?;
            }
            println!("{}", serde_json::to_string_pretty(&settings)?);
            Ok(())
        }
        Commands::Import { file } => {
            let payload = read_import_file(&file)?;
            let summary = apply_import(store, &payload, new_snippet_id)?;
            println!(
                "Imported (added {}, updated {}, skipped {})",
                summary.added, summary.updated, summary.skipped
            );
            Ok(())
        }
        Commands::Export { out } => {
            let path = write_export_file(store, &out)?;
            println!("Exported to {}", path.display());
            Ok(())
        }
        Commands::Dedupe => heal_duplicates(store)
            .map(|removed| println!("Removed {} duplicate snippet(s)", removed)),
    }
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn list(store: &JsonFileStore, query: Option<&str>) -> Result<()> {
    let snippets = store.load_snippets()?;
    let settings = store.load_settings()?;
    let shown = search_snippets(query.unwrap_or(""), &snippets, &settings.trigger_prefix);
    if shown.is_empty() {
        println!("No snippets found");
    }
    for snippet in shown {
        print_snippet(snippet);
    }
    Ok(())
}

fn handle_expand(
    store: &JsonFileStore,
    text: &str,
    caret: Option<usize>,
    key: &str,
    host: Option<&str>,
) -> Result<()> {
    let caret = caret.unwrap_or_else(|| text.chars().count());
    let expanded = match host {
        Some(host) => {
            let live = LiveState::load(store)?;
            live.expand(text, caret, key, host).map(|e| e.text)
        }
        None => {
            let snippets = store.load_snippets()?;
            let settings = store.load_settings()?;
            process_expansion(text, caret, key, &snippets, &settings).map(|e| e.text)
        }
    };
    match expanded {
        Some(text) => println!("{}", text),
        None => println!("No expansion"),
    }
    Ok(())
}

fn handle_suggest(
    store: &JsonFileStore,
    term: &str,
    host: Option<&str>,
    max: Option<usize>,
) -> Result<()> {
    let mut live = LiveState::load(store)?;
    if let Some(max) = max {
        live.settings.autocomplete_max_items = max.max(1);
    }
    let suggestions = match host {
        Some(host) => live.suggest(term, host),
        None => autocomplete_suggestions(
            term,
            &live.snippets,
            &live.settings.trigger_prefix,
            live.settings.effective_max_items(),
        ),
    };
    if suggestions.is_empty() {
        println!("No suggestions");
    }
    for snippet in suggestions {
        print_snippet(snippet);
    }
    Ok(())
}
