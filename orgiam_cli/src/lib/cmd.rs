//! Commands for orgiam CLI
//!

use std::path::PathBuf;

use clap::{self, Parser, Subcommand};

use orgiam_core::logging::LevelFilter;

/// orgiam: keep your organization's IAM policy in code
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
pub(crate) struct OrgIamArgs {
    #[clap(subcommand)]
    pub(crate) command: OrgIamCommand,
    #[clap(global = true, short = 'v', long)]
    pub(crate) log_level: Option<LevelFilter>,
    /// Path to the project config
    #[clap(global = true, short, long, default_value = "orgiam_config.yaml")]
    pub(crate) config: PathBuf,
    /// Path to the credentials file (defaults to ~/.orgiam/credentials.yaml)
    #[clap(global = true, long)]
    pub(crate) credentials: Option<PathBuf>,
    /// Credentials profile to use
    #[clap(global = true, long, default_value = "default")]
    pub(crate) profile: String,
}

#[derive(Subcommand, Debug, Clone)]
pub(crate) enum OrgIamCommand {
    /// Check that a policy file is a valid IAM policy document
    Validate {
        /// JSON policy file
        policy_file: PathBuf,
    },
    /// Compare the configuration with the recorded state
    Plan,
    /// Create or update every configured policy
    Apply,
    /// Re-read every recorded policy from the remote side
    Refresh,
    /// Clear the bindings of every recorded policy
    Destroy,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn args_are_well_formed() {
        OrgIamArgs::command().debug_assert();
    }

    #[test]
    fn global_flags_apply_to_subcommands() {
        let args = OrgIamArgs::parse_from([
            "orgiam",
            "apply",
            "--profile",
            "prod",
            "-c",
            "infra/orgiam_config.yaml",
        ]);
        assert!(matches!(args.command, OrgIamCommand::Apply));
        assert_eq!(args.profile, "prod");
        assert_eq!(args.config, PathBuf::from("infra/orgiam_config.yaml"));
    }
}
