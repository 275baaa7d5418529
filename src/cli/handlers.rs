//! Command handlers
//!
//! Each handler owns the full lifecycle of one subcommand and returns a
//! process exit code; errors are logged here, never propagated to main.

use super::commands::{DockerfileArgs, RunArgs, TagArgs};
use super::output::OutputFormatter;
use crate::config::AgentboxConfig;
use crate::detect::detect;
use crate::image::generate;
use crate::{docker, BuildContext};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::{error, info};

fn resolve_dir(path: &Option<PathBuf>) -> Result<PathBuf> {
    match path {
        Some(path) => Ok(path.clone()),
        None => std::env::current_dir().context("failed to resolve current directory"),
    }
}

fn detect_in(path: &Option<PathBuf>, config: &AgentboxConfig) -> Result<(PathBuf, BuildContext)> {
    let dir = resolve_dir(path)?;
    let context = detect(&dir, config)?;
    Ok((dir, context))
}

/// Full pipeline: detect, generate, build when missing, run the agent.
pub async fn handle_run(args: &RunArgs, config: &AgentboxConfig) -> i32 {
    match run_pipeline(args, config).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

async fn run_pipeline(args: &RunArgs, config: &AgentboxConfig) -> Result<i32> {
    let (dir, context) = detect_in(&args.path, config)?;
    let descriptor = generate(&context.specs, &context.files, config);
    info!("Target image: {}", descriptor.tag);

    let client = docker::connect()?;

    let needs_build = args.rebuild || !docker::image_exists(&client, &descriptor.tag).await?;
    if needs_build {
        docker::build_image(&client, &descriptor, &context.files).await?;
    } else {
        info!("Using existing image {}", descriptor.tag);
    }

    docker::run_container(&descriptor.tag, &dir, &args.agent_args, config)
}

/// Detection and generation only; prints the Dockerfile or JSON descriptor.
pub fn handle_dockerfile(args: &DockerfileArgs, config: &AgentboxConfig) -> i32 {
    let result = detect_in(&args.path, config).and_then(|(_, context)| {
        let descriptor = generate(&context.specs, &context.files, config);
        OutputFormatter::new(args.format.into()).format(&descriptor, &context.specs)
    });

    match result {
        Ok(output) => {
            println!("{}", output);
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}

/// Prints only the derived image tag.
pub fn handle_tag(args: &TagArgs, config: &AgentboxConfig) -> i32 {
    match detect_in(&args.path, config) {
        Ok((_, context)) => {
            println!(
                "{}",
                crate::image::tag::build_tag(&context.specs, &config.image_repository)
            );
            0
        }
        Err(e) => {
            error!("{:#}", e);
            1
        }
    }
}
