//! One-shot synchronization command handler

use std::sync::Arc;

use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_sync(config: Config) -> anyhow::Result<()> {
    let shared = Arc::new(SharedState::new(config).await?);

    println!("Fetching catalog from {}...", shared.catalog.shows_url());
    let report = shared.synchronizer.synchronize().await?;

    let elapsed = report.finished_at - report.started_at;
    println!("✓ Sync finished in {}ms", elapsed.num_milliseconds());
    println!("  Fetched:   {}", report.fetched);
    println!("  Inserted:  {}", report.inserted);
    println!("  Skipped:   {}", report.skipped);
    println!(
        "  Created:   {} genre(s), {} network(s), {} country(ies)",
        report.genres_created, report.networks_created, report.countries_created
    );

    Ok(())
}
