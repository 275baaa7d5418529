//! Configuration management for agentbox
//!
//! All tunable constants of the pipeline live here and are loaded from
//! environment variables with compiled defaults. The detection and generation
//! core never reads the environment itself; it receives this struct as an
//! explicit parameter.
//!
//! # Environment Variables
//!
//! - `AGENTBOX_IMAGE_REPOSITORY`: image repository for generated tags -
//!   default: "agentbox/agent"
//! - `AGENTBOX_LABEL_NAMESPACE`: prefix for per-tool image labels - default:
//!   "dev.agentbox"
//! - `AGENTBOX_AGENT_PACKAGE`: mise package identifier of the agent itself -
//!   default: "npm:opencode-ai"
//! - `AGENTBOX_AGENT_COMMAND`: command handed to the container entrypoint -
//!   default: "opencode"
//! - `AGENTBOX_RUNTIME_TOOL`: runtime tool injected when no marker claims it -
//!   default: "node"
//! - `AGENTBOX_MOUNT_POINT`: project mount point inside the container -
//!   default: "/workdir"
//! - `AGENTBOX_LOG_LEVEL`: logging level - default: "info"

use std::env;
use std::fmt;
use thiserror::Error;

/// Default values for configuration
const DEFAULT_IMAGE_REPOSITORY: &str = "agentbox/agent";
const DEFAULT_LABEL_NAMESPACE: &str = "dev.agentbox";
const DEFAULT_AGENT_PACKAGE: &str = "npm:opencode-ai";
const DEFAULT_AGENT_COMMAND: &str = "opencode";
const DEFAULT_RUNTIME_TOOL: &str = "node";
const DEFAULT_MOUNT_POINT: &str = "/workdir";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(String),
}

/// Main configuration structure for agentbox
///
/// Constructed via `Default::default()`, which reads `AGENTBOX_*` environment
/// variables and falls back to compiled defaults for anything unset.
#[derive(Debug, Clone)]
pub struct AgentboxConfig {
    /// Image repository used as the tag prefix
    pub image_repository: String,

    /// Namespace prefix for the per-tool image labels
    pub label_namespace: String,

    /// mise package identifier injected when the agent was not detected
    pub agent_package: String,

    /// Command handed to the container entrypoint when none is given
    pub agent_command: String,

    /// Runtime tool injected when absent (the agent package needs it)
    pub runtime_tool: String,

    /// Where the project directory is mounted inside the container
    pub mount_point: String,

    /// Logging level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for AgentboxConfig {
    fn default() -> Self {
        let image_repository = env::var("AGENTBOX_IMAGE_REPOSITORY")
            .unwrap_or_else(|_| DEFAULT_IMAGE_REPOSITORY.to_string());

        let label_namespace = env::var("AGENTBOX_LABEL_NAMESPACE")
            .unwrap_or_else(|_| DEFAULT_LABEL_NAMESPACE.to_string());

        let agent_package =
            env::var("AGENTBOX_AGENT_PACKAGE").unwrap_or_else(|_| DEFAULT_AGENT_PACKAGE.to_string());

        let agent_command =
            env::var("AGENTBOX_AGENT_COMMAND").unwrap_or_else(|_| DEFAULT_AGENT_COMMAND.to_string());

        let runtime_tool =
            env::var("AGENTBOX_RUNTIME_TOOL").unwrap_or_else(|_| DEFAULT_RUNTIME_TOOL.to_string());

        let mount_point =
            env::var("AGENTBOX_MOUNT_POINT").unwrap_or_else(|_| DEFAULT_MOUNT_POINT.to_string());

        let log_level = env::var("AGENTBOX_LOG_LEVEL")
            .unwrap_or_else(|_| DEFAULT_LOG_LEVEL.to_string())
            .to_lowercase();

        Self {
            image_repository,
            label_namespace,
            agent_package,
            agent_command,
            runtime_tool,
            mount_point,
            log_level,
        }
    }
}

impl AgentboxConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if any value is empty, the mount point is not
    /// absolute, or the log level is unknown.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.image_repository.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Image repository must not be empty".to_string(),
            ));
        }
        if self.label_namespace.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Label namespace must not be empty".to_string(),
            ));
        }
        if self.agent_package.trim().is_empty() {
            return Err(ConfigError::ValidationFailed(
                "Agent package must not be empty".to_string(),
            ));
        }
        if !self.mount_point.starts_with('/') {
            return Err(ConfigError::ValidationFailed(format!(
                "Mount point must be an absolute container path, got: {}",
                self.mount_point
            )));
        }

        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::ValidationFailed(format!(
                    "Invalid log level: {}. Valid options: trace, debug, info, warn, error",
                    self.log_level
                )))
            }
        }

        Ok(())
    }
}

impl fmt::Display for AgentboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Agentbox Configuration:")?;
        writeln!(f, "  Image Repository: {}", self.image_repository)?;
        writeln!(f, "  Label Namespace: {}", self.label_namespace)?;
        writeln!(f, "  Agent Package: {}", self.agent_package)?;
        writeln!(f, "  Agent Command: {}", self.agent_command)?;
        writeln!(f, "  Runtime Tool: {}", self.runtime_tool)?;
        writeln!(f, "  Mount Point: {}", self.mount_point)?;
        writeln!(f, "  Log Level: {}", self.log_level)?;
        Ok(())
    }
}
