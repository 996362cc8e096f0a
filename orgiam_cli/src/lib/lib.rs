//! Full CLI library for orgiam
//!

#![deny(missing_docs)]

mod apply;
mod cmd;
mod destroy;
mod plan;
mod project;
mod refresh;
#[cfg(test)]
mod testing;
mod validate;

use anyhow::Result;
use clap::Parser;

use orgiam_core::logging::{self, debug};

use cmd::{OrgIamArgs, OrgIamCommand};
use project::Project;

/// Main CLI entrypoint.
pub async fn cli() -> Result<()> {
    let args = OrgIamArgs::parse();
    logging::setup(args.log_level);
    debug!("running {:?}", args.command);

    match &args.command {
        OrgIamCommand::Validate { policy_file } => validate::validate(policy_file)?,
        OrgIamCommand::Plan => plan::print_plan(&args, &Project::load(&args.config)?).await?,
        OrgIamCommand::Apply => apply::apply(&args, &Project::load(&args.config)?).await?,
        OrgIamCommand::Refresh => refresh::refresh(&args, &Project::load(&args.config)?).await?,
        OrgIamCommand::Destroy => destroy::destroy(&args, &Project::load(&args.config)?).await?,
    }

    Ok(())
}
