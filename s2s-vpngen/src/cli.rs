use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "s2s-vpngen")]
#[command(about = "Derive site-to-site IPsec configuration for FortiGate and Palo Alto pairs")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(clap::Subcommand, Debug)]
pub enum Command {
    /// Build the configuration document from a request file.
    Generate(GenerateArgs),
    /// Check a request file and report every problem without writing output.
    Validate(ValidateArgs),
    /// List the built-in crypto profiles.
    Profiles(ProfilesArgs),
    /// Print an example request file.
    Template,
}

#[derive(clap::Args, Debug)]
pub struct RequestArgs {
    /// Request file (flat TOML table of field = value).
    pub file: PathBuf,
    /// Override one request field, e.g. --set vpn_profile=high_security.
    #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, String)>,
    /// Policy override file. Defaults to the embedded policy.
    #[arg(long)]
    pub policy_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub request: RequestArgs,
    #[arg(long, value_enum, default_value_t = DocumentFormat::Yaml)]
    pub format: DocumentFormat,
    /// Write the document here instead of stdout.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub request: RequestArgs,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Parser, Debug)]
pub struct ProfilesArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected FIELD=VALUE, got '{raw}'"))?;
    let field = field.trim();
    if field.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((field.to_string(), value.to_string()))
}
