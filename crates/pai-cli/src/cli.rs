use clap::{Parser, Subcommand, ValueEnum};
use pai_sdk::{parse_assignment, KeyValueEdit};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "pai-job")]
#[command(about = "Validate, normalize and edit job protocol documents")]
pub struct Cli {
    /// Portal config file (YAML or JSON).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Log filter, e.g. `debug` or `pai_sdk=trace`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    Validate(ValidateCommand),
    Render(RenderCommand),
    Update(UpdateCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Debug, Clone, clap::Args)]
pub struct ValidateCommand {
    #[arg(long)]
    pub file: PathBuf,
}

#[derive(Debug, Clone, clap::Args)]
pub struct RenderCommand {
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, clap::Args)]
pub struct UpdateCommand {
    #[arg(long)]
    pub file: PathBuf,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub retry: Option<u32>,
    #[arg(long)]
    pub virtual_cluster: Option<String>,
    /// Parameter edit, `KEY=VALUE`; an empty value removes the key.
    #[arg(long = "param", value_parser = parse_assignment)]
    pub params: Vec<KeyValueEdit>,
    /// Secret edit, `KEY=VALUE`; an empty value removes the key.
    #[arg(long = "secret", value_parser = parse_assignment)]
    pub secrets: Vec<KeyValueEdit>,
    /// Reject the result unless it passes schema validation.
    #[arg(long, default_value_t = false)]
    pub check: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
    pub format: OutputFormat,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;
