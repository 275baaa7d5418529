//! `mise.toml` manifest source
//!
//! Only the `[tools]` section matters, so instead of a full TOML parse this
//! is a line-oriented scan that tolerates malformed files: a bad line costs
//! that line, never the whole manifest. Section tracking enters on the
//! literal `[tools]` header and leaves on any other bracketed header.

use super::DetectorState;
use crate::detect::ToolSpec;
use anyhow::Result;
use std::path::Path;

const MISE_TOML: &str = "mise.toml";

pub(crate) fn scan(dir: &Path, state: &mut DetectorState) -> Result<()> {
    let path = dir.join(MISE_TOML);
    if !path.exists() {
        return Ok(());
    }

    state.copy_file(dir, MISE_TOML)?;
    let content = String::from_utf8_lossy(&state.files.last().expect("just pushed").content)
        .into_owned();

    for (name, version) in parse_tools(&content) {
        if state.is_seen(&name) {
            continue;
        }
        state.record(ToolSpec::new(&name, &version));
    }

    Ok(())
}

/// Extracts `key = value` pairs from the `[tools]` section.
///
/// Keys and values are trimmed of whitespace and surrounding quote
/// characters; empty keys or values are discarded.
pub(crate) fn parse_tools(content: &str) -> Vec<(String, String)> {
    let mut tools = Vec::new();
    let mut in_tools = false;

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with("[tools]") {
            in_tools = true;
            continue;
        } else if line.starts_with('[') {
            in_tools = false;
            continue;
        }

        if in_tools {
            if let Some((key, value)) = line.split_once('=') {
                let key = trim_quoted(key);
                let value = trim_quoted(value);
                if !key.is_empty() && !value.is_empty() {
                    tools.push((key.to_string(), value.to_string()));
                }
            }
        }
    }

    tools
}

fn trim_quoted(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}
