//! Per-site enablement via allow and block lists.

use crate::models::Settings;

/// Lower-case and drop a leading `www.`.
pub fn normalize_host(host: &str) -> String {
    let lower = host.trim().to_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_string(),
        None => lower,
    }
}

fn listed(list: &[String], host: &str) -> bool {
    list.iter().any(|entry| normalize_host(entry) == host)
}

/// The blocklist always wins. A non-empty allowlist admits only its hosts;
/// an empty one admits everything not blocked.
pub fn is_site_enabled_for_settings(host: &str, settings: &Settings) -> bool {
    let host = normalize_host(host);
    if listed(&settings.blocklist, &host) {
        return false;
    }
    if !settings.allowlist.is_empty() {
        return listed(&settings.allowlist, &host);
    }
    true
}

pub fn is_autocomplete_enabled_on_site(host: &str, settings: &Settings) -> bool {
    settings.enabled && settings.autocomplete_enabled && is_site_enabled_for_settings(host, settings)
}
