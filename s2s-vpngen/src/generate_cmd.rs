use std::fs;

use anyhow::{Context, Result};
use s2s_vpngen::builder::build_document;
use s2s_vpngen::policy::load_policy_with_source;
use s2s_vpngen::render::{to_json, to_yaml};
use s2s_vpngen::report::render_summary;
use tracing::info;

use crate::cli::{DocumentFormat, GenerateArgs};
use crate::path_guard::ensure_output_not_input;
use crate::request::load_request;

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let request = &args.request;
    let fields = load_request(&request.file, &request.set)?;
    let (policy, policy_source) = load_policy_with_source(request.policy_file.as_deref())?;
    info!(policy = %policy_source, fields = fields.len(), "building document");

    let doc = build_document(&fields, &policy)
        .with_context(|| format!("cannot build VPN from {}", request.file.display()))?;

    let rendered = match args.format {
        DocumentFormat::Yaml => to_yaml(&doc)?,
        DocumentFormat::Json => to_json(&doc)?,
    };

    match &args.output {
        Some(out_path) => {
            let mut inputs = vec![request.file.as_path()];
            if let Some(policy_file) = request.policy_file.as_deref() {
                inputs.push(policy_file);
            }
            ensure_output_not_input(out_path, &inputs)?;
            fs::write(out_path, rendered)
                .with_context(|| format!("failed to write output {}", out_path.display()))?;
            info!(path = %out_path.display(), "document written");
            eprintln!("{}", render_summary(&doc));
        }
        None => print!("{rendered}"),
    }
    Ok(())
}
