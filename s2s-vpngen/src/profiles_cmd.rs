use anyhow::Result;
use s2s_vpngen::catalog::catalog;
use s2s_vpngen::report::render_profiles;

use crate::cli::{OutputFormat, ProfilesArgs};

pub fn run_profiles(args: ProfilesArgs) -> Result<()> {
    match args.format {
        OutputFormat::Text => println!("{}", render_profiles(catalog())),
        OutputFormat::Json => {
            let profiles: Vec<_> = catalog().iter().collect();
            println!("{}", serde_json::to_string_pretty(&profiles)?);
        }
    }
    Ok(())
}
