//! Tag component sanitization and image tag derivation
//!
//! Image tags double as a cache key: an unchanged tool set must always map
//! to the same tag, and every detected name/version must become a legal tag
//! segment first.

use crate::detect::ToolSpec;
use std::collections::HashSet;

/// Cleans a tool name or version for use as a label or tag segment.
///
/// Lower-cases and trims the input, passes alphanumerics and `.` through,
/// collapses each run of `+ @ : / _ -` into a single `-` and drops every
/// other character. The result never starts or ends with `-`, and
/// `sanitize(sanitize(x)) == sanitize(x)`.
pub fn sanitize(value: &str) -> String {
    let value = value.trim().to_lowercase();
    let mut result = String::with_capacity(value.len());
    let mut last_hyphen = false;

    for c in value.chars() {
        if c.is_alphanumeric() || c == '.' {
            result.push(c);
            last_hyphen = false;
        } else if matches!(c, '+' | '@' | ':' | '/' | '_' | '-') {
            if !last_hyphen {
                result.push('-');
                last_hyphen = true;
            }
        }
    }

    result.trim_matches('-').to_string()
}

/// Derives the image tag for a detected tool set.
///
/// Specs are sorted by sanitized name and deduplicated by sanitized name
/// (first discovery wins); each survivor contributes a `name-version`
/// segment, with `latest` standing in for versions that sanitize away.
/// Falls back to `<repository>:latest` when nothing usable remains.
pub fn build_tag(specs: &[ToolSpec], repository: &str) -> String {
    let mut entries: Vec<(String, &ToolSpec)> = specs
        .iter()
        .map(|spec| (sanitize(&spec.name), spec))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut seen = HashSet::new();
    let mut parts = Vec::new();

    for (name, spec) in entries {
        if name.is_empty() || !seen.insert(name.clone()) {
            continue;
        }
        let mut version = sanitize(&spec.version);
        if version.is_empty() {
            version = "latest".to_string();
        }
        parts.push(format!("{}-{}", name, version));
    }

    if parts.is_empty() {
        return format!("{}:latest", repository);
    }

    format!("{}:{}", repository, parts.join("-"))
}
