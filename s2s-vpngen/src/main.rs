use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod generate_cmd;
mod path_guard;
mod profiles_cmd;
mod request;
mod validate_cmd;

use cli::{Cli, Command};

const REQUEST_TEMPLATE: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/lab-request.toml"
));

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Generate(args) => generate_cmd::run_generate(args),
        Command::Validate(args) => validate_cmd::run_validate(args, cli.verbose > 0),
        Command::Profiles(args) => profiles_cmd::run_profiles(args),
        Command::Template => {
            print!("{REQUEST_TEMPLATE}");
            Ok(())
        }
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
