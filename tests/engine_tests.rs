//! End-to-end checks of the pure engine surface.

use blurt::placement::estimated_panel_height;
use blurt::{
    aliases_for_trigger, autocomplete_suggestions, can_save_snippet, dedupe_by_id,
    desired_placement_auto, detect_overlap_warnings, filter_suggestions,
    is_autocomplete_enabled_on_site, is_site_enabled_for_settings, match_trigger_with_aliases,
    merge_settings_shallow, merge_snippets_by_trigger, normalize_trigger, process_expansion,
    resolve_placement, retarget_triggers, AutocompletePosition, Placement, Settings,
    SettingsPatch, Snippet,
};

fn snip(id: &str, trigger: &str) -> Snippet {
    Snippet::new(id, trigger, Some(format!("{} description", trigger)), "body")
}

fn ids(list: &[&Snippet]) -> Vec<String> {
    list.iter().map(|s| s.id.clone()).collect()
}

#[test]
fn test_alias_and_longest_match() {
    let holes = vec![snip("1", "/rabbit-holes")];
    assert_eq!(match_trigger_with_aliases("/rh", &holes, "/").unwrap().id, "1");

    let addr = vec![snip("1", "/a"), snip("2", "/addr")];
    assert_eq!(match_trigger_with_aliases("/addr", &addr, "/").unwrap().id, "2");
    assert_eq!(match_trigger_with_aliases("/a", &addr, "/").unwrap().id, "1");
}

#[test]
fn test_suggestions_for_letter_digit_and_fuzzy() {
    let list = vec![snip("3", "/L-Think2")];
    assert_eq!(ids(&autocomplete_suggestions("/L2", &list, "/", 8)), vec!["3"]);
    assert_eq!(ids(&autocomplete_suggestions("/lt", &list, "/", 8)), vec!["3"]);
    assert!(filter_suggestions("/L2", &list, "/", 8).is_empty());
}

#[test]
fn test_suggestions_keep_collection_order() {
    let list = vec![snip("1", "/zeta-a"), snip("2", "/za"), snip("3", "/zz")];
    // "/za" is a trigger start for 2, an acronym for 1 and not in 3
    assert_eq!(ids(&autocomplete_suggestions("/za", &list, "/", 8)), vec!["1", "2"]);
}

#[test]
fn test_aliases_are_derived_not_stored() {
    let snippet = snip("1", "/rabbit-holes");
    let json = serde_json::to_string(&snippet).unwrap();
    assert!(!json.contains("rh"));
    assert_eq!(aliases_for_trigger(&snippet.trigger, "/"), vec!["rh", "/rh"]);
}

#[test]
fn test_overlap_warnings() {
    let warnings = detect_overlap_warnings(&[snip("1", "/a"), snip("2", "/ab")]);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].to_string().contains("/a"));
    assert!(warnings[0].to_string().contains("/ab"));
    assert!(detect_overlap_warnings(&[snip("1", "/foo"), snip("2", "/bar")]).is_empty());
}

#[test]
fn test_merge_counts() {
    let incoming = vec![snip("1", "/a"), snip("2", "/b")];
    let first = merge_snippets_by_trigger(&[], &incoming);
    assert_eq!((first.added, first.updated), (2, 0));

    let after_delete: Vec<Snippet> = Vec::new();
    let again = merge_snippets_by_trigger(&after_delete, &incoming);
    assert_eq!((again.added, again.updated), (2, 0));

    let existing = vec![Snippet::new("1", "/a", Some("old".into()), "old body")];
    let incoming = vec![
        Snippet::new("7", "/a", Some("new".into()), "new body"),
        snip("8", "/c"),
    ];
    let result = merge_snippets_by_trigger(&existing, &incoming);
    assert_eq!((result.added, result.updated), (1, 1));
    assert_eq!(result.merged[0].body, "new body");
    assert_eq!(result.merged[0].description.as_deref(), Some("new"));
}

#[test]
fn test_settings_merge_and_retarget() {
    let settings = Settings::default();
    let patch = SettingsPatch {
        trigger_prefix: Some(";".into()),
        ..Default::default()
    };
    let merged = merge_settings_shallow(&settings, Some(&patch));
    assert_eq!(merged.trigger_prefix, ";");
    assert_eq!(merged.char_limit, settings.char_limit);

    let list = vec![snip("1", "/a"), snip("2", "b")];
    let out = retarget_triggers(&list, "/", "#");
    assert_eq!(out[0].trigger, "#a");
    assert_eq!(out[1].trigger, "#b");
}

#[test]
fn test_dedupe_keeps_first() {
    let list = vec![
        Snippet::new("1", "/a", None, "first"),
        Snippet::new("1", "/a", None, "second"),
        Snippet::new("2", "/b", None, "x"),
    ];
    let out = dedupe_by_id(&list);
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].body, "first");
    assert_eq!(out[1].id, "2");
}

#[test]
fn test_site_gating() {
    let blocked = Settings {
        blocklist: vec!["example.com".into()],
        ..Default::default()
    };
    assert!(!is_site_enabled_for_settings("example.com", &blocked));
    assert!(!is_site_enabled_for_settings("www.example.com", &blocked));

    let allowed = Settings {
        allowlist: vec!["good.com".into()],
        ..Default::default()
    };
    assert!(is_site_enabled_for_settings("good.com", &allowed));
    assert!(!is_site_enabled_for_settings("other.com", &allowed));

    let both = Settings {
        allowlist: vec!["good.com".into()],
        blocklist: vec!["good.com".into()],
        ..Default::default()
    };
    assert!(!is_site_enabled_for_settings("good.com", &both));
    assert!(!is_autocomplete_enabled_on_site("good.com", &both));
}

#[test]
fn test_placement() {
    assert_eq!(desired_placement_auto(20.0, 40.0), Placement::Top);
    assert_eq!(desired_placement_auto(60.0, 40.0), Placement::Bottom);
    assert_eq!(desired_placement_auto(48.0, 40.0), Placement::Bottom);
    assert_eq!(
        resolve_placement(AutocompletePosition::Auto, 100.0, estimated_panel_height(0.0)),
        Placement::Top
    );
}

#[test]
fn test_normalize_and_save_gate() {
    let prefix = "/";
    let trigger = normalize_trigger("  sig ", prefix);
    assert_eq!(trigger, "/sig");
    assert!(can_save_snippet(&trigger, prefix, "Signature", "Regards"));
    assert!(!can_save_snippet(&normalize_trigger("", prefix), prefix, "d", "b"));
}

#[test]
fn test_expansion_after_prefix_change() {
    let settings = Settings {
        trigger_prefix: "#".into(),
        ..Default::default()
    };
    let list = retarget_triggers(&[Snippet::new("1", "/sig", None, "Regards")], "/", "#");
    let expansion = process_expansion("hi #sig", 7, "Enter", &list, &settings).unwrap();
    assert_eq!(expansion.text, "hi Regards");
    assert!(process_expansion("hi /sig", 7, "Enter", &list, &settings).is_none());
}
