//! Shorthand forms derived from a trigger.
//!
//! A trigger such as `/rabbit-holes` can also be reached through its acronym
//! (`rh`, `/rh`), and a trigger ending in digits such as `/L-Think2` through
//! its first letter plus that digit run (`l2`, `/l2`). Aliases are computed on
//! demand and never stored.

/// Strip `prefix` from the front of `trigger` when it is there.
pub(crate) fn strip_prefix<'a>(trigger: &'a str, prefix: &str) -> &'a str {
    trigger.strip_prefix(prefix).unwrap_or(trigger)
}

/// Maximal runs of ASCII letters and digits.
pub(crate) fn words(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
}

/// Digits at the very end of `raw`, ignoring trailing whitespace.
fn trailing_digits(raw: &str) -> &str {
    let trimmed = raw.trim_end();
    let start = trimmed
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_ascii_digit())
        .last()
        .map(|(i, _)| i)
        .unwrap_or(trimmed.len());
    &trimmed[start..]
}

/// First character of every word in the trigger body, lower-cased.
pub fn acronym_from_trigger(trigger: &str, prefix: &str) -> String {
    words(strip_prefix(trigger, prefix))
        .filter_map(|w| w.chars().next())
        .collect::<String>()
        .to_lowercase()
}

/// The alias set for `trigger`: acronym and letter+trailing-digits, each bare
/// and prefix-qualified. Empty forms are skipped and duplicates collapse while
/// keeping first-seen order.
pub fn aliases_for_trigger(trigger: &str, prefix: &str) -> Vec<String> {
    let raw = strip_prefix(trigger, prefix);
    let acronym = acronym_from_trigger(trigger, prefix);

    let first_letter = words(raw)
        .next()
        .and_then(|w| w.chars().next())
        .map(|c| c.to_ascii_lowercase());
    let digits = trailing_digits(raw);
    let letter_number = match first_letter {
        Some(c) if !digits.is_empty() => format!("{}{}", c, digits),
        _ => String::new(),
    };

    let mut out: Vec<String> = Vec::with_capacity(4);
    let mut push = |alias: String| {
        if !out.contains(&alias) {
            out.push(alias);
        }
    };
    if !acronym.is_empty() {
        let prefixed = format!("{}{}", prefix, acronym);
        push(acronym);
        push(prefixed);
    }
    if !letter_number.is_empty() {
        let prefixed = format!("{}{}", prefix, letter_number);
        push(letter_number);
        push(prefixed);
    }
    out
}

/// Case-insensitive membership test against the alias set.
pub(crate) fn alias_matches(trigger: &str, prefix: &str, token_lower: &str) -> bool {
    aliases_for_trigger(trigger, prefix)
        .iter()
        .any(|alias| alias.to_lowercase() == token_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acronym_takes_first_letter_of_each_word() {
        assert_eq!(acronym_from_trigger("/rabbit-holes", "/"), "rh");
        assert_eq!(acronym_from_trigger("/L-Think2", "/"), "lt");
        assert_eq!(acronym_from_trigger("/my_long trigger.name", "/"), "mltn");
    }

    #[test]
    fn acronym_is_empty_without_words() {
        assert_eq!(acronym_from_trigger("/", "/"), "");
        assert_eq!(acronym_from_trigger("/--", "/"), "");
    }

    #[test]
    fn acronym_without_prefix_present() {
        assert_eq!(acronym_from_trigger("rabbit-holes", "/"), "rh");
    }

    #[test]
    fn aliases_for_plain_words() {
        assert_eq!(aliases_for_trigger("/rabbit-holes", "/"), vec!["rh", "/rh"]);
    }

    #[test]
    fn aliases_include_letter_and_trailing_digits() {
        assert_eq!(
            aliases_for_trigger("/L-Think2", "/"),
            vec!["lt", "/lt", "l2", "/l2"]
        );
    }

    #[test]
    fn aliases_collapse_duplicates() {
        // acronym "t2" and letter+digits "t2" coincide
        assert_eq!(aliases_for_trigger("/t-2", "/"), vec!["t2", "/t2"]);
    }

    #[test]
    fn trailing_digits_ignores_trailing_whitespace() {
        assert_eq!(trailing_digits("think 42  "), "42");
        assert_eq!(trailing_digits("think"), "");
        assert_eq!(trailing_digits("4x"), "");
    }

    #[test]
    fn alias_match_is_case_insensitive() {
        assert!(alias_matches("/L-Think2", "/", "/l2"));
        assert!(!alias_matches("/L-Think2", "/", "/x"));
    }
}
