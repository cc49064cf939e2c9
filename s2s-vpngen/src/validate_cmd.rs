use anyhow::{bail, Result};
use s2s_vpngen::builder::build_document;
use s2s_vpngen::policy::load_policy_with_source;
use s2s_vpngen::report::{render_check_text, CheckReport};

use crate::cli::{OutputFormat, ValidateArgs};
use crate::request::load_request;

pub fn run_validate(args: ValidateArgs, verbose: bool) -> Result<()> {
    let request = &args.request;
    let fields = load_request(&request.file, &request.set)?;
    let (policy, policy_source) = load_policy_with_source(request.policy_file.as_deref())?;

    let result = build_document(&fields, &policy);
    let report = CheckReport::from_result(&result, &policy_source);

    match args.format {
        OutputFormat::Text => println!("{}", render_check_text(&report, verbose)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    if !report.ok {
        bail!("validate failed: {} issue(s)", report.issues.len());
    }
    Ok(())
}
