pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{CliArgs, Commands, DockerfileArgs, RunArgs, TagArgs};
pub use output::{OutputFormat, OutputFormatter};
