//! Catalog CLI - drive a runtime's resource catalog from the terminal.
//!
//! Lists resources, shows the dashboards that currently render, and renames
//! or deletes project files through the same coordination path an editor
//! would use. Notifications raised along the way are printed to stderr.

mod commands;

use anyhow::Result;
use catalog_core::{NetworkConfig, SyncConfig};
use clap::{Parser, Subcommand};
use tracing::{debug, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "catalog-cli")]
#[command(about = "Inspect and edit a runtime's resource catalog")]
struct Args {
    /// Base URL of the runtime
    #[arg(long, default_value = NetworkConfig::DEFAULT_RUNTIME_URL)]
    runtime_url: String,

    /// Instance to operate on
    #[arg(short, long, default_value = "default")]
    instance: String,

    /// Clear the destination's optimistic name when a rename fails
    #[arg(long)]
    rollback: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List resources in the catalog
    List {
        /// Only list resources of this kind (e.g. "model", "metrics_view")
        #[arg(short, long)]
        kind: Option<String>,

        /// Print the raw records as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show dashboards with a valid spec, plus custom dashboards
    Dashboards,
    /// Rename a project file
    Rename { from: String, to: String },
    /// Delete a project file or folder
    Delete {
        path: String,

        /// Delete non-empty folders
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so listings on stdout stay pipeable
    let log_level = if args.debug { Level::DEBUG } else { Level::WARN };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = SyncConfig::new()
        .with_runtime_url(args.runtime_url)
        .with_instance_id(args.instance)
        .with_rollback_optimistic_names(args.rollback);
    debug!("Using runtime {} ({})", config.runtime_url, config.instance_id);

    commands::run(config, args.command).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rename() {
        let args = Args::try_parse_from([
            "catalog-cli",
            "--instance",
            "proj",
            "rename",
            "/models/a.sql",
            "/models/b.sql",
        ])
        .unwrap();
        assert_eq!(args.instance, "proj");
        assert_eq!(args.runtime_url, NetworkConfig::DEFAULT_RUNTIME_URL);
        assert!(matches!(
            args.command,
            Command::Rename { ref from, ref to } if from == "/models/a.sql" && to == "/models/b.sql"
        ));
    }

    #[test]
    fn test_parse_delete_force() {
        let args = Args::try_parse_from(["catalog-cli", "delete", "--force", "/models"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Delete { ref path, force: true } if path == "/models"
        ));
    }

    #[test]
    fn test_rollback_is_opt_in() {
        let args = Args::try_parse_from(["catalog-cli", "delete", "/models"]).unwrap();
        assert!(!args.rollback);
        let args =
            Args::try_parse_from(["catalog-cli", "--rollback", "rename", "/a.sql", "/b.sql"]).unwrap();
        assert!(args.rollback);
    }

    #[test]
    fn test_rename_requires_both_paths() {
        assert!(Args::try_parse_from(["catalog-cli", "rename", "/models/a.sql"]).is_err());
    }
}
