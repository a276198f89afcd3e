use clap::Parser;
use pai_cli::{execute_render, execute_update, execute_validate, load_portal_config, Cli, Commands};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    let config = match cli.config.as_deref().map(load_portal_config).transpose() {
        Ok(config) => config.unwrap_or_default(),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(2);
        }
    };
    init_logging(cli.log_level.as_deref().or(config.log_level.as_deref()));

    let result = match &cli.command {
        Commands::Validate(command) => execute_validate(command),
        Commands::Render(command) => execute_render(command),
        Commands::Update(command) => execute_update(command, &config),
    };

    match result {
        Ok(output) => {
            println!("{}", output.trim_end());
        }
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    }
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|level| EnvFilter::try_new(level).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
