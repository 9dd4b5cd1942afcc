//! Subcommand implementations.

use crate::Command;
use anyhow::{bail, Context, Result};
use catalog_core::selectors::{all_measures, valid_visualizations};
use catalog_core::{
    ActionOutcome, CatalogClient, CatalogContext, Notification, NotificationLevel, ResourceKind,
    SyncConfig,
};
use tokio::sync::broadcast;
use tracing::info;

pub(crate) async fn run(config: SyncConfig, command: Command) -> Result<()> {
    let ctx = CatalogContext::builder(config)
        .build()
        .context("Failed to set up catalog context")?;
    let mut notifications = ctx.notifications().subscribe();

    let outcome = match command {
        Command::List { kind, json } => return list(&ctx, kind.as_deref(), json).await,
        Command::Dashboards => return dashboards(&ctx).await,
        Command::Rename { from, to } => {
            // Bind current file names so the coordinator can judge folder moves
            ctx.refresh().await.context("Failed to load catalog")?;
            ctx.rename(&from, &to).await
        }
        Command::Delete { path, force } => ctx.delete(&path, force).await,
    };

    print_notifications(&mut notifications);
    match outcome {
        ActionOutcome::Completed => {
            info!("Done");
            Ok(())
        }
        ActionOutcome::Failed { message } => bail!(message),
    }
}

async fn list(ctx: &CatalogContext, kind: Option<&str>, json: bool) -> Result<()> {
    let kind = kind.map(ResourceKind::parse);
    let response = ctx
        .client()
        .list_resources(ctx.instance_id(), kind.as_ref())
        .await
        .context("Failed to list resources")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response.resources)?);
        return Ok(());
    }

    for resource in &response.resources {
        let status = match resource.errors() {
            Some(error) => format!("error: {}", error),
            None => "ok".to_string(),
        };
        println!(
            "{:<28} {:<32} {:<40} {}",
            resource.kind(),
            resource.name(),
            resource.meta.file_paths.join(","),
            status
        );
    }
    Ok(())
}

async fn dashboards(ctx: &CatalogContext) -> Result<()> {
    let snapshot = ctx.refresh().await.context("Failed to load catalog")?;
    for resource in valid_visualizations(&snapshot.resources) {
        let measures = all_measures(resource.valid_spec()).len();
        if resource.has_dashboard() {
            println!("{} (custom)", resource.name());
        } else {
            println!("{} ({} measures)", resource.name(), measures);
        }
    }
    Ok(())
}

fn print_notifications(rx: &mut broadcast::Receiver<Notification>) {
    while let Ok(notification) = rx.try_recv() {
        let label = match notification.level {
            NotificationLevel::Info => "info",
            NotificationLevel::Warning => "warning",
            NotificationLevel::Error => "error",
        };
        eprintln!("[{}] {}", label, notification.message);
        if let Some(detail) = &notification.detail {
            eprintln!("    {}", detail);
        }
    }
}
