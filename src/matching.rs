//! Trigger lookup for expansion and candidate retrieval for autocomplete.
//!
//! Every function here is a pure function of its arguments. Callers pass the
//! current snippet snapshot and prefix on each call.

use crate::aliases::{alias_matches, strip_prefix};
use crate::models::Snippet;

/// Snippets ordered by descending trigger length; ties keep collection order.
fn longest_first(snippets: &[Snippet]) -> Vec<&Snippet> {
    let mut sorted: Vec<&Snippet> = snippets.iter().collect();
    sorted.sort_by(|a, b| b.trigger.chars().count().cmp(&a.trigger.chars().count()));
    sorted
}

/// Lower-cased ASCII letters and digits only.
fn alphanumeric_lower(s: &str) -> String {
    s.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// True when every character of `query` appears in `candidate` in order.
/// An empty query never matches.
fn is_subsequence(query: &str, candidate: &str) -> bool {
    if query.is_empty() {
        return false;
    }
    let mut wanted = query.chars().peekable();
    for c in candidate.chars() {
        if wanted.peek() == Some(&c) {
            wanted.next();
        }
    }
    wanted.peek().is_none()
}

/// Resolve a typed token to the snippet it should expand into.
///
/// Exact trigger matches (case-insensitive) win, longest trigger first.
/// Only when none exists and the token carries the prefix are aliases
/// consulted, again scanning longest triggers first.
pub fn match_trigger_with_aliases<'a>(
    word: &str,
    snippets: &'a [Snippet],
    prefix: &str,
) -> Option<&'a Snippet> {
    let trimmed = word.trim();
    if trimmed.is_empty() {
        return None;
    }
    let token = trimmed.to_lowercase();
    let sorted = longest_first(snippets);

    if let Some(exact) = sorted.iter().find(|s| s.trigger.to_lowercase() == token) {
        return Some(*exact);
    }
    if !trimmed.starts_with(prefix) {
        return None;
    }
    sorted
        .into_iter()
        .find(|s| alias_matches(&s.trigger, prefix, &token))
}

/// Case-sensitive exact trigger lookup without aliases. The token must carry
/// the prefix.
pub fn match_trigger_pure<'a>(
    word: &str,
    snippets: &'a [Snippet],
    prefix: &str,
) -> Option<&'a Snippet> {
    let token = word.trim();
    if token.is_empty() || !token.starts_with(prefix) {
        return None;
    }
    longest_first(snippets)
        .into_iter()
        .find(|s| s.trigger == token)
}

/// Autocomplete candidates for `term`, in collection order, capped at
/// `max(1, max)`.
///
/// A snippet is included when its trigger starts with the term, when one of
/// its aliases equals the term, or when the term's letters and digits form a
/// subsequence of the trigger's.
pub fn autocomplete_suggestions<'a>(
    term: &str,
    snippets: &'a [Snippet],
    prefix: &str,
    max: usize,
) -> Vec<&'a Snippet> {
    let trimmed = term.trim();
    if trimmed.is_empty() || !trimmed.starts_with(prefix) {
        return Vec::new();
    }
    let query = trimmed.to_lowercase();
    let query_norm = alphanumeric_lower(strip_prefix(trimmed, prefix));

    snippets
        .iter()
        .filter(|s| {
            s.trigger.to_lowercase().starts_with(&query)
                || alias_matches(&s.trigger, prefix, &query)
                || is_subsequence(
                    &query_norm,
                    &alphanumeric_lower(strip_prefix(&s.trigger, prefix)),
                )
        })
        .take(max.max(1))
        .collect()
}

/// Plain case-insensitive trigger-prefix filter, for callers that want no
/// alias or fuzzy logic.
pub fn filter_suggestions<'a>(
    term: &str,
    snippets: &'a [Snippet],
    prefix: &str,
    max: usize,
) -> Vec<&'a Snippet> {
    let query = term.trim();
    if query.is_empty() || !query.starts_with(prefix) {
        return Vec::new();
    }
    let query = query.to_lowercase();
    snippets
        .iter()
        .filter(|s| s.trigger.to_lowercase().starts_with(&query))
        .take(max.max(1))
        .collect()
}

/// A bare prefix or an empty query lists everything.
pub fn should_show_all_for_query(query: &str, prefix: &str) -> bool {
    let q = query.trim();
    q.is_empty() || q == prefix
}

/// Filter used by list views: trigger or description containing the query,
/// or anything the autocomplete rules accept. Unbounded.
pub fn search_snippets<'a>(query: &str, snippets: &'a [Snippet], prefix: &str) -> Vec<&'a Snippet> {
    if should_show_all_for_query(query, prefix) {
        return snippets.iter().collect();
    }
    let q = query.trim().to_lowercase();
    let fuzzy = autocomplete_suggestions(query, snippets, prefix, snippets.len());
    snippets
        .iter()
        .filter(|s| {
            s.trigger.to_lowercase().contains(&q)
                || s.description_or_empty().to_lowercase().contains(&q)
                || fuzzy.iter().any(|f| std::ptr::eq(*f, *s))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(id: &str, trigger: &str) -> Snippet {
        Snippet::new(id, trigger, None, "x")
    }

    fn ids(list: &[&Snippet]) -> Vec<String> {
        list.iter().map(|s| s.id.clone()).collect()
    }

    #[test]
    fn alias_path_resolves_acronym() {
        let list = vec![s("1", "/rabbit-holes"), s("3", "/L-Think2")];
        assert_eq!(match_trigger_with_aliases("/rh", &list, "/").map(|m| m.id.as_str()), Some("1"));
        assert_eq!(match_trigger_with_aliases("/L2", &list, "/").map(|m| m.id.as_str()), Some("3"));
    }

    #[test]
    fn exact_match_prefers_longest_trigger() {
        let list = vec![s("1", "/a"), s("2", "/addr")];
        let found = match_trigger_with_aliases("/addr", &list, "/").unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn exact_match_is_case_insensitive_and_beats_aliases() {
        // "/rh" is an alias of /rabbit-holes but also an exact trigger
        let list = vec![s("1", "/rabbit-holes"), s("2", "/RH")];
        let found = match_trigger_with_aliases("/rh", &list, "/").unwrap();
        assert_eq!(found.id, "2");
    }

    #[test]
    fn duplicate_triggers_resolve_to_first_encountered() {
        let list = vec![s("1", "/sig"), s("2", "/sig")];
        let found = match_trigger_with_aliases("/sig", &list, "/").unwrap();
        assert_eq!(found.id, "1");
    }

    #[test]
    fn aliases_need_the_prefix() {
        let list = vec![s("1", "/rabbit-holes")];
        assert!(match_trigger_with_aliases("rh", &list, "/").is_none());
        assert!(match_trigger_with_aliases("   ", &list, "/").is_none());
        assert!(match_trigger_with_aliases("/zz", &list, "/").is_none());
    }

    #[test]
    fn pure_match_requires_prefix_and_prefers_longest_exact() {
        let list = vec![s("1", "/a"), s("2", "/addr"), s("3", "/ab")];
        assert!(match_trigger_pure("a", &list, "/").is_none());
        assert_eq!(match_trigger_pure("/a", &list, "/").unwrap().id, "1");
        assert_eq!(match_trigger_pure("/addr", &list, "/").unwrap().id, "2");
    }

    #[test]
    fn suggestions_cover_prefix_alias_and_subsequence() {
        let list = vec![s("1", "/rabbit-holes"), s("2", "/roadmap"), s("3", "/L-Think2")];
        assert!(ids(&autocomplete_suggestions("/rh", &list, "/", 8)).contains(&"1".to_string()));
        assert!(ids(&autocomplete_suggestions("/L2", &list, "/", 8)).contains(&"3".to_string()));
        assert!(ids(&autocomplete_suggestions("/lt", &list, "/", 8)).contains(&"3".to_string()));
        assert_eq!(ids(&autocomplete_suggestions("/road", &list, "/", 8)), vec!["2"]);
    }

    #[test]
    fn suggestions_short_circuit_and_clamp() {
        let list = vec![s("1", "/a"), s("2", "/ab"), s("3", "/abc")];
        assert!(autocomplete_suggestions("", &list, "/", 8).is_empty());
        assert!(autocomplete_suggestions("a", &list, "/", 8).is_empty());
        assert_eq!(autocomplete_suggestions("/a", &list, "/", 0).len(), 1);
        assert_eq!(ids(&autocomplete_suggestions("/a", &list, "/", 2)), vec!["1", "2"]);
    }

    #[test]
    fn bare_prefix_matches_by_trigger_start_only() {
        // the normalized query is empty, so the subsequence rule stays out
        let list = vec![s("1", "/a"), s("2", "#b")];
        assert_eq!(ids(&autocomplete_suggestions("/", &list, "/", 8)), vec!["1"]);
    }

    #[test]
    fn filter_suggestions_is_plain_prefix() {
        let list = vec![s("1", "/a"), s("2", "/ab"), s("3", "/b")];
        assert_eq!(filter_suggestions("/a", &list, "/", 1).len(), 1);
        assert_eq!(ids(&filter_suggestions("/a", &list, "/", 10)), vec!["1", "2"]);
        assert!(filter_suggestions("a", &list, "/", 10).is_empty());
        assert!(filter_suggestions("/rh", &[s("4", "/rabbit-holes")], "/", 10).is_empty());
    }

    #[test]
    fn show_all_for_empty_or_bare_prefix() {
        assert!(should_show_all_for_query("/", "/"));
        assert!(should_show_all_for_query("  ", "/"));
        assert!(!should_show_all_for_query("/a", "/"));
    }

    #[test]
    fn search_matches_description_text() {
        let list = vec![
            Snippet::new("1", "/sig", Some("Email signature".into()), "x"),
            Snippet::new("2", "/addr", Some("Shipping address".into()), "y"),
        ];
        assert_eq!(ids(&search_snippets("signature", &list, "/")), vec!["1"]);
        assert_eq!(ids(&search_snippets("/", &list, "/")), vec!["1", "2"]);
        assert_eq!(ids(&search_snippets("/ad", &list, "/")), vec!["2"]);
    }

    #[test]
    fn subsequence_rejects_out_of_order() {
        assert!(is_subsequence("lt", "lthink2"));
        assert!(!is_subsequence("tl", "lthink"));
        assert!(!is_subsequence("", "anything"));
    }
}
