//! Tag entity vocabulary and human-readable tag formatting for diagnostics.

use std::collections::BTreeMap;

/// Known tag entities in canonical order.
///
/// Diagnostics walk this list back to front, so the subject comes first and
/// the description last.
pub const ENTITIES: &[&str] = &["desc", "echo", "run", "dir", "acq", "task", "ses", "sub"];

/// Long display name for a short entity name. Unknown names map to themselves.
pub fn entity_longname(entity: &str) -> &str {
    match entity {
        "sub" => "subject",
        "ses" => "session",
        "acq" => "acquisition",
        "dir" => "direction",
        "desc" => "description",
        other => other,
    }
}

/// Format tags as `name: "value"` pairs joined by `", "`.
///
/// Known entities are listed first in reversed [`ENTITIES`] order, followed by
/// any other tag names in lexical order.
pub fn format_tags<I, K, V>(tags: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut remaining: BTreeMap<String, String> = tags
        .into_iter()
        .map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string()))
        .collect();

    let mut parts = Vec::with_capacity(remaining.len());

    for entity in ENTITIES.iter().rev() {
        if let Some(value) = remaining.remove(*entity) {
            parts.push(format!("{}: \"{}\"", entity_longname(entity), value));
        }
    }
    for (name, value) in &remaining {
        parts.push(format!("{}: \"{}\"", name, value));
    }

    parts.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_entities_use_reversed_order_and_long_names() {
        let s = format_tags([("task", "rest"), ("sub", "01"), ("dir", "AP")]);
        assert_eq!(s, r#"subject: "01", task: "rest", direction: "AP""#);
    }

    #[test]
    fn unknown_tags_follow_in_lexical_order() {
        let s = format_tags([("site", "A"), ("ses", "2"), ("scanner", "x")]);
        assert_eq!(s, r#"session: "2", scanner: "x", site: "A""#);
    }

    #[test]
    fn empty_tags_format_to_empty_string() {
        let tags: Vec<(&str, &str)> = Vec::new();
        assert_eq!(format_tags(tags), "");
    }

    #[test]
    fn longname_passthrough() {
        assert_eq!(entity_longname("task"), "task");
        assert_eq!(entity_longname("acq"), "acquisition");
    }
}
