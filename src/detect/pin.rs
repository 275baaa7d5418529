//! `.tool-versions` pin file source (asdf/mise)
//!
//! One tool per line, `name version` separated by whitespace. Comment and
//! blank lines are skipped, as is any line without at least two fields.

use super::DetectorState;
use crate::detect::ToolSpec;
use anyhow::Result;
use std::path::Path;

const TOOL_VERSIONS: &str = ".tool-versions";

pub(crate) fn scan(dir: &Path, state: &mut DetectorState) -> Result<()> {
    let path = dir.join(TOOL_VERSIONS);
    if !path.exists() {
        return Ok(());
    }

    state.copy_file(dir, TOOL_VERSIONS)?;
    let content = String::from_utf8_lossy(&state.files.last().expect("just pushed").content)
        .into_owned();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        if let (Some(name), Some(version)) = (parts.next(), parts.next()) {
            state.record(ToolSpec::new(name, version));
        }
    }

    Ok(())
}
