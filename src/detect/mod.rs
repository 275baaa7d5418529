//! Toolchain detection from conventional marker files
//!
//! Detection runs an ordered, short-circuiting set of sources over one shared
//! accumulator: the `.tool-versions` pin file, the `mise.toml` manifest, a
//! static table of per-ecosystem marker files, and finally the mandatory
//! injections (the runtime tool and the agent package itself). A tool name
//! claimed by an earlier source is skipped by every later one.
//!
//! Malformed lines in marker files are skipped silently; an unreadable file
//! or directory is fatal.

pub mod idiomatic;
pub mod manifest;
pub mod pin;

use crate::config::AgentboxConfig;
use anyhow::{bail, Context, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A detected `(tool, version)` pair requiring installation in the image.
///
/// The name is lower-cased on construction; both fields are sanitized later,
/// at label and tag emission time.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub version: String,
}

impl ToolSpec {
    pub fn new(name: &str, version: &str) -> Self {
        Self {
            name: name.to_lowercase(),
            version: version.to_string(),
        }
    }
}

/// A marker file that must be embedded verbatim into the build context.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path on the host
    pub path: PathBuf,
    /// Relative path inside the build context
    pub rel_path: String,
    /// Raw file bytes
    pub content: Vec<u8>,
}

impl SourceFile {
    fn read(path: PathBuf, rel_path: &str) -> Result<Self> {
        let content = std::fs::read(&path)
            .with_context(|| format!("failed to read marker file {}", path.display()))?;
        Ok(Self {
            path,
            rel_path: rel_path.to_string(),
            content,
        })
    }
}

/// Everything detection produced: tool specs in discovery order plus the
/// marker files to copy into the build context. Consumed once by the
/// generator, never mutated afterwards.
#[derive(Debug, Default)]
pub struct BuildContext {
    pub specs: Vec<ToolSpec>,
    pub files: Vec<SourceFile>,
}

/// Shared accumulator threaded through the detection sources.
#[derive(Debug, Default)]
pub(crate) struct DetectorState {
    specs: Vec<ToolSpec>,
    files: Vec<SourceFile>,
    seen: HashSet<String>,
}

impl DetectorState {
    /// True if a previous source already claimed this tool name.
    pub(crate) fn is_seen(&self, name: &str) -> bool {
        self.seen.contains(&name.to_lowercase())
    }

    /// Records a spec and marks its name as claimed.
    pub(crate) fn record(&mut self, spec: ToolSpec) {
        debug!("detected tool {} {}", spec.name, spec.version);
        self.seen.insert(spec.name.clone());
        self.specs.push(spec);
    }

    /// Adds a marker file to the copy list.
    pub(crate) fn copy_file(&mut self, dir: &Path, rel_path: &str) -> Result<()> {
        let file = SourceFile::read(dir.join(rel_path), rel_path)?;
        self.files.push(file);
        Ok(())
    }
}

/// Scans `dir` for tool marker files.
///
/// Returns the detected tool specs in discovery order together with the
/// marker files that must be copied into the build context. The result always
/// contains at least the runtime tool and the agent package, injected at
/// `latest` when no marker claimed them.
///
/// # Errors
///
/// Fails when `dir` is not a readable directory or a present marker file
/// cannot be read. Malformed marker content is not an error.
pub fn detect(dir: &Path, config: &AgentboxConfig) -> Result<BuildContext> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }

    let mut state = DetectorState::default();

    pin::scan(dir, &mut state)?;
    manifest::scan(dir, &mut state)?;
    idiomatic::scan(dir, &mut state)?;

    // The agent package is installed through the runtime's package manager,
    // so the runtime must be present even when no marker asked for it.
    if !state.is_seen(&config.runtime_tool) {
        state.record(ToolSpec::new(&config.runtime_tool, "latest"));
    }
    if !state.is_seen(&config.agent_package) {
        state.record(ToolSpec::new(&config.agent_package, "latest"));
    }

    debug!(
        "detection finished: {} tools, {} files to copy",
        state.specs.len(),
        state.files.len()
    );

    Ok(BuildContext {
        specs: state.specs,
        files: state.files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn test_config() -> AgentboxConfig {
        AgentboxConfig::default()
    }

    #[test]
    fn test_empty_directory_yields_injected_specs_only() {
        let dir = TempDir::new().unwrap();

        let context = detect(dir.path(), &test_config()).unwrap();

        assert_eq!(
            context.specs,
            vec![
                ToolSpec::new("node", "latest"),
                ToolSpec::new("npm:opencode-ai", "latest"),
            ]
        );
        assert!(context.files.is_empty());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let gone = dir.path().join("nope");

        assert!(detect(&gone, &test_config()).is_err());
    }

    #[test]
    fn test_pin_file_claims_tools_before_injection() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".tool-versions"),
            "python 3.11.4\nnode 20.5.0\n",
        )
        .unwrap();

        let context = detect(dir.path(), &test_config()).unwrap();

        assert_eq!(
            context.specs,
            vec![
                ToolSpec::new("python", "3.11.4"),
                ToolSpec::new("node", "20.5.0"),
                ToolSpec::new("npm:opencode-ai", "latest"),
            ]
        );
        assert_eq!(context.files.len(), 1);
        assert_eq!(context.files[0].rel_path, ".tool-versions");
    }

    #[test]
    fn test_pin_file_wins_over_idiomatic_marker() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".tool-versions"), "ruby 3.3.0\n").unwrap();
        fs::write(dir.path().join(".ruby-version"), "3.2.1\n").unwrap();

        let context = detect(dir.path(), &test_config()).unwrap();

        let rubies: Vec<_> = context.specs.iter().filter(|s| s.name == "ruby").collect();
        assert_eq!(rubies.len(), 1);
        assert_eq!(rubies[0].version, "3.3.0");
        // .ruby-version lost the race, so it is not copied either
        assert_eq!(context.files.len(), 1);
    }

    #[test]
    fn test_manifest_skips_names_claimed_by_pin_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".tool-versions"), "ruby 3.3.0\n").unwrap();
        fs::write(dir.path().join("mise.toml"), "[tools]\nruby = \"3.1.0\"\n").unwrap();

        let context = detect(dir.path(), &test_config()).unwrap();

        let rubies: Vec<_> = context.specs.iter().filter(|s| s.name == "ruby").collect();
        assert_eq!(rubies.len(), 1);
        assert_eq!(rubies[0].version, "3.3.0");
        // both files travel into the build context regardless
        let rel_paths: Vec<_> = context.files.iter().map(|f| f.rel_path.as_str()).collect();
        assert_eq!(rel_paths, vec![".tool-versions", "mise.toml"]);
    }

    #[test]
    fn test_discovery_order_is_preserved() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("mise.toml"), "[tools]\ngo = \"1.22\"\n").unwrap();
        fs::write(dir.path().join(".ruby-version"), "3.2.1\n").unwrap();

        let context = detect(dir.path(), &test_config()).unwrap();

        let names: Vec<_> = context.specs.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["go", "ruby", "node", "npm:opencode-ai"]);
    }

    #[test]
    fn test_tool_spec_lowercases_name() {
        let spec = ToolSpec::new("Node", "20");
        assert_eq!(spec.name, "node");
        assert_eq!(spec.version, "20");
    }
}
