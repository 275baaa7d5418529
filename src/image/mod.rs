//! Image descriptor generation
//!
//! Turns a detected tool set into an immutable [`ImageDescriptor`]: the
//! Dockerfile text plus the canonical image tag. Generation is a pure
//! function of its inputs; identical inputs always yield byte-identical
//! output, which Docker's layer cache depends on.

pub mod dockerfile;
pub mod tag;

use crate::config::AgentboxConfig;
use crate::detect::{SourceFile, ToolSpec};
use serde::Serialize;

/// Entrypoint script baked into every generated image. With no arguments it
/// drops into an interactive login shell; otherwise it runs the argument
/// vector as a shell command line.
pub const AGENT_ENTRYPOINT: &str = r#"#!/bin/bash
if [ $# -eq 0 ]; then
  exec /bin/bash --login -i
else
  exec /bin/bash --login -c "$*"
fi
"#;

/// Path of the entrypoint script inside the build context.
pub const ENTRYPOINT_CONTEXT_PATH: &str = "assets/agent-entrypoint.sh";

/// The complete build description for one detected tool set.
#[derive(Debug, Clone, Serialize)]
pub struct ImageDescriptor {
    /// Dockerfile text fed verbatim to the image build
    pub dockerfile: String,
    /// Canonical image tag derived from the tool set
    pub tag: String,
}

/// Generates the image descriptor for a detected tool set.
pub fn generate(
    specs: &[ToolSpec],
    files: &[SourceFile],
    config: &AgentboxConfig,
) -> ImageDescriptor {
    ImageDescriptor {
        dockerfile: dockerfile::render(specs, files, config),
        tag: tag::build_tag(specs, &config.image_repository),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entrypoint_script_shape() {
        assert!(AGENT_ENTRYPOINT.starts_with("#!/bin/bash\n"));
        assert!(AGENT_ENTRYPOINT.contains("exec /bin/bash --login -i"));
        assert!(AGENT_ENTRYPOINT.contains("exec /bin/bash --login -c \"$*\""));
        assert!(AGENT_ENTRYPOINT.ends_with("fi\n"));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let config = AgentboxConfig::default();
        let specs = vec![
            ToolSpec::new("ruby", "3.2.1"),
            ToolSpec::new("node", "latest"),
        ];

        let first = generate(&specs, &[], &config);
        let second = generate(&specs, &[], &config);

        assert_eq!(first.dockerfile, second.dockerfile);
        assert_eq!(first.tag, second.tag);
    }

    #[test]
    fn test_descriptor_serializes_to_json() {
        let config = AgentboxConfig::default();
        let descriptor = generate(&[ToolSpec::new("node", "20")], &[], &config);

        let json = serde_json::to_value(&descriptor).unwrap();
        assert!(json["dockerfile"].as_str().unwrap().contains("FROM"));
        assert!(json["tag"].as_str().unwrap().contains(':'));
    }
}
