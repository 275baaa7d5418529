//! Per-ecosystem single-tool marker files
//!
//! A static table maps each logical tool to an ordered list of candidate
//! filenames with an extraction strategy per file shape. New ecosystems are
//! added by extending the table, not by new control flow. For each tool not
//! already claimed, candidates are tried in order and the first existing file
//! with a usable version wins.

use super::DetectorState;
use crate::detect::ToolSpec;
use anyhow::{Context, Result};
use std::path::Path;

/// How to pull a version out of a candidate file.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ExtractStrategy {
    /// First non-blank line, trimmed (`.nvmrc`, `.ruby-version`, ...)
    FirstLine,
    /// First line starting with the prefix; the next whitespace-delimited
    /// token, stripped of quotes (`Gemfile`: `ruby "3.3.0"`)
    PrefixedToken(&'static str),
    /// First line starting with the `key=` prefix; the remainder is the
    /// version (`.sdkmanrc`: `java=21.0.2-tem`)
    PrefixedKeyValue(&'static str),
}

pub(crate) struct MarkerCandidate {
    pub filename: &'static str,
    pub strategy: ExtractStrategy,
}

pub(crate) struct ToolMarker {
    pub tool: &'static str,
    pub candidates: &'static [MarkerCandidate],
}

macro_rules! candidate {
    ($filename:expr) => {
        MarkerCandidate {
            filename: $filename,
            strategy: ExtractStrategy::FirstLine,
        }
    };
    ($filename:expr, $strategy:expr) => {
        MarkerCandidate {
            filename: $filename,
            strategy: $strategy,
        }
    };
}

/// Candidate order within a tool is significant: the more specific pin file
/// is always listed before the dependency manifest.
pub(crate) const MARKERS: &[ToolMarker] = &[
    ToolMarker {
        tool: "node",
        candidates: &[candidate!(".nvmrc"), candidate!(".node-version")],
    },
    ToolMarker {
        tool: "python",
        candidates: &[candidate!(".python-version"), candidate!(".python-versions")],
    },
    ToolMarker {
        tool: "ruby",
        candidates: &[
            candidate!(".ruby-version"),
            candidate!("Gemfile", ExtractStrategy::PrefixedToken("ruby ")),
        ],
    },
    ToolMarker {
        tool: "go",
        candidates: &[candidate!(".go-version")],
    },
    ToolMarker {
        tool: "java",
        candidates: &[
            candidate!(".java-version"),
            candidate!(".sdkmanrc", ExtractStrategy::PrefixedKeyValue("java=")),
        ],
    },
    ToolMarker {
        tool: "crystal",
        candidates: &[candidate!(".crystal-version")],
    },
    ToolMarker {
        tool: "elixir",
        candidates: &[candidate!(".exenv-version")],
    },
    ToolMarker {
        tool: "yarn",
        candidates: &[candidate!(".yvmrc")],
    },
];

pub(crate) fn scan(dir: &Path, state: &mut DetectorState) -> Result<()> {
    for marker in MARKERS {
        if state.is_seen(marker.tool) {
            continue;
        }

        for candidate in marker.candidates {
            let path = dir.join(candidate.filename);
            if !path.exists() {
                continue;
            }

            let bytes = std::fs::read(&path)
                .with_context(|| format!("failed to read marker file {}", path.display()))?;
            let content = String::from_utf8_lossy(&bytes);

            if let Some(version) = extract(candidate.strategy, &content) {
                state.record(ToolSpec::new(marker.tool, &version));
                state.copy_file(dir, candidate.filename)?;
                break;
            }
        }
    }

    Ok(())
}

fn extract(strategy: ExtractStrategy, content: &str) -> Option<String> {
    match strategy {
        ExtractStrategy::FirstLine => content
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string),
        ExtractStrategy::PrefixedToken(prefix) => content
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with(prefix))
            .find_map(|line| {
                line.split_whitespace()
                    .nth(1)
                    .map(|token| token.trim_matches(|c| c == '"' || c == '\'').to_string())
            }),
        ExtractStrategy::PrefixedKeyValue(prefix) => content
            .lines()
            .map(str::trim)
            .filter(|line| line.starts_with(prefix))
            .find_map(|line| line.split_once('=').map(|(_, value)| value.to_string())),
    }
    .filter(|version| !version.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn scan_dir(dir: &TempDir) -> DetectorState {
        let mut state = DetectorState::default();
        scan(dir.path(), &mut state).unwrap();
        state
    }

    #[test]
    fn test_first_line_marker() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".ruby-version"), "3.2.1\n").unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("ruby", "3.2.1")]);
        assert_eq!(state.files[0].rel_path, ".ruby-version");
    }

    #[test]
    fn test_first_line_skips_leading_blanks() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".nvmrc"), "\n\n20.5.0\n").unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("node", "20.5.0")]);
    }

    #[test]
    fn test_gemfile_ruby_directive() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Gemfile"),
            "source \"https://rubygems.org\"\nruby \"3.3.0\"\ngem \"rails\"\n",
        )
        .unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("ruby", "3.3.0")]);
        assert_eq!(state.files[0].rel_path, "Gemfile");
    }

    #[test]
    fn test_ruby_version_file_beats_gemfile() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".ruby-version"), "3.2.1\n").unwrap();
        fs::write(dir.path().join("Gemfile"), "ruby \"3.3.0\"\n").unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("ruby", "3.2.1")]);
        assert_eq!(state.files.len(), 1);
        assert_eq!(state.files[0].rel_path, ".ruby-version");
    }

    #[test]
    fn test_sdkmanrc_key_value() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".sdkmanrc"), "java=21.0.2-tem\n").unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("java", "21.0.2-tem")]);
    }

    #[test]
    fn test_gemfile_without_ruby_directive_yields_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Gemfile"), "gem \"rails\"\n").unwrap();

        let state = scan_dir(&dir);

        assert!(state.specs.is_empty());
        assert!(state.files.is_empty());
    }

    #[test]
    fn test_empty_marker_file_yields_nothing() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".go-version"), "\n").unwrap();

        let state = scan_dir(&dir);

        assert!(state.specs.is_empty());
    }

    #[test]
    fn test_non_utf8_marker_is_decoded_lossily() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".nvmrc"), b"20.5.0\n\xff\xfe\n").unwrap();

        let state = scan_dir(&dir);

        assert_eq!(state.specs, vec![ToolSpec::new("node", "20.5.0")]);
    }

    #[test]
    fn test_seen_tool_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".nvmrc"), "20.5.0\n").unwrap();

        let mut state = DetectorState::default();
        state.record(ToolSpec::new("node", "18.0.0"));
        scan(dir.path(), &mut state).unwrap();

        assert_eq!(state.specs, vec![ToolSpec::new("node", "18.0.0")]);
        assert!(state.files.is_empty());
    }

    #[test]
    fn test_extract_strategies() {
        assert_eq!(
            extract(ExtractStrategy::FirstLine, "  3.12.0  \n"),
            Some("3.12.0".to_string())
        );
        assert_eq!(
            extract(ExtractStrategy::PrefixedToken("ruby "), "ruby '3.3.0'\n"),
            Some("3.3.0".to_string())
        );
        assert_eq!(
            extract(ExtractStrategy::PrefixedKeyValue("java="), "java=17\n"),
            Some("17".to_string())
        );
        assert_eq!(extract(ExtractStrategy::FirstLine, "\n\n"), None);
        assert_eq!(
            extract(ExtractStrategy::PrefixedToken("ruby "), "gem \"rails\"\n"),
            None
        );
    }
}
