//! agentbox - run an AI coding agent in a container that matches your project
//!
//! This library detects the toolchain a project declares through conventional
//! version marker files (`.tool-versions`, `mise.toml`, `.nvmrc`,
//! `.ruby-version`, `Gemfile`, ...) and synthesizes a container image
//! description that installs exactly that toolchain via the mise version
//! manager.
//!
//! # Core Concepts
//!
//! - **Detection**: an ordered, short-circuiting scan of marker files that
//!   yields `(tool, version)` pairs plus the files that must travel into the
//!   build context
//! - **Generation**: a pure function from the detected tool set to a
//!   Dockerfile and a deterministic, human-readable image tag
//! - **Plumbing**: thin Docker integration that builds the image when its tag
//!   is missing and launches the agent container with the project mounted
//!
//! # Example Usage
//!
//! ```no_run
//! use agentbox::{detect, generate, AgentboxConfig};
//! use std::path::Path;
//!
//! fn describe(dir: &Path) -> anyhow::Result<()> {
//!     let config = AgentboxConfig::default();
//!     let context = detect(dir, &config)?;
//!     let descriptor = generate(&context.specs, &context.files, &config);
//!
//!     println!("{}", descriptor.tag);
//!     println!("{}", descriptor.dockerfile);
//!     Ok(())
//! }
//! ```
//!
//! # Project Structure
//!
//! - [`detect`]: marker file scanning and tool spec extraction
//! - [`image`]: Dockerfile generation, tag derivation, sanitization
//! - [`docker`]: image build/run plumbing over the Docker daemon

// Public modules
pub mod cli;
pub mod config;
pub mod detect;
pub mod docker;
pub mod image;

// Re-export key types for convenient access
pub use config::{AgentboxConfig, ConfigError};
pub use detect::{detect, BuildContext, SourceFile, ToolSpec};
pub use image::tag::{build_tag, sanitize};
pub use image::{generate, ImageDescriptor};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_name_is_agentbox() {
        assert_eq!(NAME, "agentbox");
    }
}
