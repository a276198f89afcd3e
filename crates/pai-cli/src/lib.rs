mod cli;
mod config;
mod run;

pub use cli::{Cli, Commands, OutputFormat, RenderCommand, UpdateCommand, ValidateCommand};
pub use config::{
    load_portal_config, validate_portal_config, PortalConfig, PortalConfigError, PortalDefaults,
};
pub use run::{execute_render, execute_update, execute_validate, CliError};
