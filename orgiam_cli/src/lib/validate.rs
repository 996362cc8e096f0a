//! Validate a policy file without touching anything remote

use std::path::Path;

use anyhow::{bail, Result};
use colored::Colorize;

use orgiam_gcp::policy::validate_iam_policy;

use crate::project::read_policy_file;

pub(crate) fn validate<P: AsRef<Path>>(policy_file: P) -> Result<()> {
    let policy_data = read_policy_file(&policy_file)?;
    let (warnings, errors) = validate_iam_policy(&policy_data, "policy_data");
    for warning in &warnings {
        println!("{}: {}", "warning".yellow(), warning);
    }
    if !errors.is_empty() {
        for error in &errors {
            println!("{}", textwrap::indent(error, "  ").red());
        }
        bail!("{} is not a valid policy", policy_file.as_ref().display());
    }
    println!(
        "{} is a valid policy",
        policy_file.as_ref().display().to_string().green()
    );
    Ok(())
}
