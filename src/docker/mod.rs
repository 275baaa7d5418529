//! Docker plumbing: image existence check, build, and container launch
//!
//! Everything here is a thin shell around the container runtime. The daemon
//! API (via bollard) handles the existence probe and the image build from the
//! in-memory context; the interactive agent session shells out to
//! `docker run` because it needs the caller's TTY.

pub mod context;

pub use context::build_context_tar;

use crate::config::AgentboxConfig;
use crate::detect::SourceFile;
use crate::image::ImageDescriptor;
use anyhow::{bail, Context, Result};
use bollard::image::BuildImageOptions;
use bollard::Docker;
use futures_util::StreamExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

/// Host directories passed through to the agent user's home when present.
const AGENT_PASSTHROUGH_DIRS: &[&str] = &[".config/opencode", ".local/share/opencode"];

/// Connects to the local Docker daemon.
pub fn connect() -> Result<Docker> {
    Docker::connect_with_local_defaults().context("failed to connect to Docker daemon")
}

/// Checks whether an image with this tag already exists locally.
pub async fn image_exists(docker: &Docker, tag: &str) -> Result<bool> {
    match docker.inspect_image(tag).await {
        Ok(_) => Ok(true),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => Ok(false),
        Err(e) => Err(e).context("failed to query Docker for image"),
    }
}

/// Builds the image from the generated descriptor and marker files.
///
/// The daemon's build output is logged line by line at debug level; an error
/// chunk in the stream aborts the build.
pub async fn build_image(
    docker: &Docker,
    descriptor: &ImageDescriptor,
    files: &[SourceFile],
) -> Result<()> {
    info!("Building image {}", descriptor.tag);

    let tar = build_context_tar(descriptor, files)?;

    let options = BuildImageOptions {
        dockerfile: "Dockerfile".to_string(),
        t: descriptor.tag.clone(),
        rm: true,
        forcerm: true,
        pull: true,
        ..Default::default()
    };

    let mut stream = docker.build_image(options, None, Some(bollard::body_full(tar.into())));

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("docker build stream failed")?;
        if let Some(msg) = chunk.stream {
            let msg = msg.trim();
            if !msg.is_empty() {
                debug!("{}", msg);
            }
        }
        if let Some(error) = chunk.error {
            bail!("docker build failed: {}", error);
        }
    }

    info!("Built {}", descriptor.tag);
    Ok(())
}

/// A host path bind-mounted into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindMount {
    pub source: PathBuf,
    pub target: String,
    pub readonly: bool,
}

impl BindMount {
    pub fn new(source: impl Into<PathBuf>, target: &str) -> Self {
        Self {
            source: source.into(),
            target: target.to_string(),
            readonly: false,
        }
    }

    fn to_args(&self) -> Vec<String> {
        let readonly = if self.readonly { ",readonly" } else { "" };
        vec![
            "--mount".to_string(),
            format!(
                "type=bind,src={},dst={}{}",
                self.source.display(),
                self.target,
                readonly
            ),
        ]
    }
}

/// Computes the bind mounts for an agent session: the project directory at
/// the configured mount point, plus any agent passthrough directory that
/// exists under `home`.
pub fn session_mounts(cwd: &Path, home: Option<&Path>, config: &AgentboxConfig) -> Vec<BindMount> {
    let mut mounts = vec![BindMount::new(cwd, &config.mount_point)];

    if let Some(home) = home {
        for rel in AGENT_PASSTHROUGH_DIRS {
            let source = home.join(rel);
            if source.exists() {
                mounts.push(BindMount::new(source, &format!("/home/agent/{}", rel)));
            }
        }
    }

    mounts
}

/// Assembles the `docker run` argument vector for an agent session. The
/// agent command always leads; extra `agent_args` follow it so the
/// entrypoint receives one command line.
pub fn session_command(
    tag: &str,
    mounts: &[BindMount],
    agent_args: &[String],
    config: &AgentboxConfig,
) -> Vec<String> {
    let mut argv: Vec<String> = ["run", "--rm", "-it"].map(String::from).to_vec();
    for mount in mounts {
        argv.extend(mount.to_args());
    }
    argv.push(tag.to_string());
    argv.push(config.agent_command.clone());
    argv.extend(agent_args.iter().cloned());
    argv
}

/// Launches the interactive agent container and waits for it to exit.
///
/// Returns the container's exit code. The container is removed on exit; no
/// state survives the session except through the bind mounts.
pub fn run_container(
    tag: &str,
    cwd: &Path,
    agent_args: &[String],
    config: &AgentboxConfig,
) -> Result<i32> {
    let cwd = cwd
        .canonicalize()
        .with_context(|| format!("failed to resolve project directory {}", cwd.display()))?;
    let mounts = session_mounts(&cwd, dirs::home_dir().as_deref(), config);

    let mut command = Command::new("docker");
    command.args(session_command(tag, &mounts, agent_args, config));

    debug!("Running: {:?}", command);
    let status = command.status().context("failed to launch docker run")?;
    debug!("Container exited with {:?}", status.code());

    Ok(status.code().unwrap_or(1))
}
