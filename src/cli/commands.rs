use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Containerized toolchain launcher for AI coding agents
#[derive(Parser, Debug)]
#[command(
    name = "agentbox",
    about = "Run an AI coding agent in a container matching your project's toolchain",
    version,
    long_about = "agentbox scans a project for conventional version marker files \
                  (.tool-versions, mise.toml, .nvmrc, .ruby-version, ...), builds a \
                  container image installing exactly that toolchain, and launches the \
                  agent inside it with the project mounted."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Increase verbosity")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Build the image if needed and launch the agent container",
        long_about = "Detects the project toolchain, builds the matching image unless it \
                      already exists, and runs the agent with the project mounted.\n\n\
                      Examples:\n  \
                      agentbox run\n  \
                      agentbox run /path/to/project\n  \
                      agentbox run --rebuild\n  \
                      agentbox run --agent-arg run --agent-arg 'fix the tests'"
    )]
    Run(RunArgs),

    #[command(
        about = "Print the generated Dockerfile without touching Docker",
        long_about = "Runs detection and generation only and prints the result.\n\n\
                      Examples:\n  \
                      agentbox dockerfile\n  \
                      agentbox dockerfile /path/to/project --format json"
    )]
    Dockerfile(DockerfileArgs),

    #[command(about = "Print the derived image tag for a project")]
    Tag(TagArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(long, help = "Force rebuilding the image even if its tag exists")]
    pub rebuild: bool,

    #[arg(
        long = "agent-arg",
        value_name = "ARG",
        help = "Argument passed to the agent (repeatable)"
    )]
    pub agent_args: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct DockerfileArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "text",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct TagArgs {
    #[arg(
        value_name = "PATH",
        help = "Path to the project (defaults to current directory)"
    )]
    pub path: Option<PathBuf>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Text,
    Json,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Text => super::output::OutputFormat::Text,
            OutputFormatArg::Json => super::output::OutputFormat::Json,
        }
    }
}
