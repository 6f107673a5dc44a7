//! Command-line surface.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Inspect and change revdash dashboard settings.
#[derive(Debug, Parser)]
#[command(name = "revdashctl", version, about)]
pub struct Cli {
    /// Configuration file.
    #[arg(long, short, default_value = "revdash.toml", global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the current appearance settings.
    Show,
    /// Change one appearance setting, e.g. `set fontSize large`.
    Set {
        /// Setting name (`displayMode`, `font-size`, `compact_mode`, ...).
        field: String,
        value: String,
    },
    /// Restore the default appearance and forget the stored copy.
    Reset,
    /// Print the document root as the settings would render it.
    Render {
        /// Flip the system colour-scheme signal before rendering.
        #[arg(long)]
        prefers_dark: Option<bool>,
    },
    /// Account profile and preference pages.
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Marketplace connection.
    Marketplace(MarketplaceArgs),
}

#[derive(Debug, Subcommand)]
pub enum ProfileCommand {
    /// Print the profile and preference sub-objects.
    Show,
    /// Print plan usage.
    Usage,
    /// Print the most recent activity entries.
    Activity {
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Export account data as JSON.
    Export {
        /// Write to this file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Import account data previously exported.
    Import { file: PathBuf },
}

#[derive(Debug, Args)]
pub struct MarketplaceArgs {
    #[arg(long, default_value = "demo-seller")]
    pub seller_id: String,

    #[arg(long, env = "REVDASH_MARKETPLACE_TOKEN", default_value = "demo-token-0000", hide_env_values = true)]
    pub token: String,

    #[command(subcommand)]
    pub command: MarketplaceCommand,
}

#[derive(Debug, Subcommand)]
pub enum MarketplaceCommand {
    /// Print the connection record.
    Status,
    /// Log in and open the data connection.
    Connect,
    /// Connect, then close the connection again.
    Disconnect,
    /// Connect and probe the connection.
    Test,
    /// Connect and pull fresh figures.
    Sync,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn should_have_consistent_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn should_parse_set_command() {
        let cli = Cli::try_parse_from(["revdashctl", "set", "fontSize", "large"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Set { ref field, ref value } if field == "fontSize" && value == "large"
        ));
        assert_eq!(cli.config, PathBuf::from("revdash.toml"));
    }

    #[test]
    fn should_parse_render_flag() {
        let cli =
            Cli::try_parse_from(["revdashctl", "render", "--prefers-dark", "true"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Render {
                prefers_dark: Some(true)
            }
        ));
    }

    #[test]
    fn should_parse_nested_marketplace_command() {
        let cli = Cli::try_parse_from([
            "revdashctl",
            "--config",
            "other.toml",
            "marketplace",
            "--seller-id",
            "acme",
            "sync",
        ])
        .unwrap();
        let Command::Marketplace(args) = cli.command else {
            panic!("expected marketplace command");
        };
        assert_eq!(args.seller_id, "acme");
        assert!(matches!(args.command, MarketplaceCommand::Sync));
        assert_eq!(cli.config, PathBuf::from("other.toml"));
    }

    #[test]
    fn should_reject_missing_set_value() {
        assert!(Cli::try_parse_from(["revdashctl", "set", "fontSize"]).is_err());
    }
}
