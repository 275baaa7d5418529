//! Output formatting for the dockerfile subcommand
//!
//! Text output is the raw Dockerfile; JSON output wraps the descriptor
//! together with the detected tool specs for machine consumption.

use crate::detect::ToolSpec;
use crate::image::ImageDescriptor;
use anyhow::{Context, Result};
use serde::Serialize;

/// Output format enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Raw Dockerfile text
    Text,
    /// JSON document with tag, Dockerfile, and tool specs
    Json,
}

#[derive(Serialize)]
struct DescriptorDocument<'a> {
    tag: &'a str,
    tools: &'a [ToolSpec],
    dockerfile: &'a str,
}

/// Output formatter for generated descriptors
pub struct OutputFormatter {
    format: OutputFormat,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats a descriptor according to the configured format
    pub fn format(&self, descriptor: &ImageDescriptor, specs: &[ToolSpec]) -> Result<String> {
        match self.format {
            OutputFormat::Text => Ok(descriptor.dockerfile.clone()),
            OutputFormat::Json => {
                let document = DescriptorDocument {
                    tag: &descriptor.tag,
                    tools: specs,
                    dockerfile: &descriptor.dockerfile,
                };
                serde_json::to_string_pretty(&document)
                    .context("failed to serialize descriptor to JSON")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ImageDescriptor {
        ImageDescriptor {
            dockerfile: "FROM debian:12-slim\n".to_string(),
            tag: "agentbox/agent:node-latest".to_string(),
        }
    }

    #[test]
    fn test_text_format_is_raw_dockerfile() {
        let formatter = OutputFormatter::new(OutputFormat::Text);
        let output = formatter.format(&descriptor(), &[]).unwrap();
        assert_eq!(output, "FROM debian:12-slim\n");
    }

    #[test]
    fn test_json_format_includes_tag_tools_and_dockerfile() {
        let formatter = OutputFormatter::new(OutputFormat::Json);
        let specs = vec![ToolSpec::new("node", "latest")];
        let output = formatter.format(&descriptor(), &specs).unwrap();

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["tag"], "agentbox/agent:node-latest");
        assert_eq!(value["tools"][0]["name"], "node");
        assert_eq!(value["tools"][0]["version"], "latest");
        assert!(value["dockerfile"].as_str().unwrap().contains("FROM"));
    }
}
