//! List shows command handler

use crate::config::Config;
use crate::db::Store;

pub async fn cmd_list_shows(config: &Config) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;
    let shows = store.list_shows().await?;

    if shows.is_empty() {
        println!("No shows stored yet.");
        println!();
        println!("Fetch the catalog with: showsync sync");
        return Ok(());
    }

    println!("Shows ({} total)", shows.len());
    println!("{:-<70}", "");

    for show in shows {
        let network = show
            .network
            .as_ref()
            .map_or_else(|| "-".to_string(), |n| n.name.clone());
        let rating = show
            .rating
            .and_then(|r| r.average)
            .map_or_else(|| "-".to_string(), |a| format!("{a:.1}"));

        println!("{:>6}  {}", show.id, show.name);
        println!(
            "        Network: {} | Rating: {} | Genres: {}",
            network,
            rating,
            show.genre_names().join(", ")
        );
    }

    Ok(())
}
