//! Scenario tag helpers
//!
//! Tags arrive from the runner without the leading `@`, but feature authors
//! write them with it, so both spellings are accepted everywhere.

fn normalize(tag: &str) -> &str {
    tag.trim().trim_start_matches('@')
}

/// Values of `@name:value` tags, in declaration order.
pub fn tag_values<S: AsRef<str>>(tags: &[S], name: &str) -> Vec<String> {
    let name = normalize(name);
    tags.iter()
        .filter_map(|tag| {
            let (key, value) = normalize(tag.as_ref()).split_once(':')?;
            (key == name && !value.is_empty()).then(|| value.to_string())
        })
        .collect()
}

pub fn has_tag<S: AsRef<str>>(tags: &[S], name: &str) -> bool {
    let name = normalize(name);
    tags.iter().any(|tag| normalize(tag.as_ref()) == name)
}

pub fn has_any_tag<S: AsRef<str>, N: AsRef<str>>(tags: &[S], names: &[N]) -> bool {
    names.iter().any(|name| has_tag(tags, name.as_ref()))
}

pub fn has_all_tags<S: AsRef<str>, N: AsRef<str>>(tags: &[S], names: &[N]) -> bool {
    names.iter().all(|name| has_tag(tags, name.as_ref()))
}

/// Run-time filter: `@skip` never runs; otherwise an empty `include` admits
/// everything and a non-empty one admits scenarios carrying any listed tag.
pub fn admits<S: AsRef<str>, N: AsRef<str>>(tags: &[S], include: &[N]) -> bool {
    if has_tag(tags, "skip") {
        return false;
    }
    include.is_empty() || has_any_tag(tags, include)
}
