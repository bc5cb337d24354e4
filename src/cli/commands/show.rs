use crate::config::Config;
use crate::db::Store;

pub async fn cmd_show_info(config: &Config, id: i32) -> anyhow::Result<()> {
    let store = Store::new(&config.general.database_path).await?;

    let Some(show) = store.get_show(id).await? else {
        println!("Show with ID {id} not found.");
        return Ok(());
    };

    println!("Show Info");
    println!("{:-<60}", "");
    println!("Name:     {}", show.name);
    println!("ID:       {}", show.id);
    println!("Language: {}", show.language.as_deref().unwrap_or("-"));
    println!("Genres:   {}", show.genre_names().join(", "));

    if let Some(network) = &show.network {
        let country = network
            .country
            .as_ref()
            .map(|c| format!(" ({}, {})", c.name, c.timezone))
            .unwrap_or_default();
        println!("Network:  {}{}", network.name, country);
    }

    if let Some(average) = show.rating.and_then(|r| r.average) {
        println!("Rating:   {average:.1}");
    }

    if let Some(ext) = &show.externals {
        println!();
        println!("External IDs");
        if let Some(imdb) = &ext.imdb {
            println!("  IMDb:    {imdb}");
        }
        if let Some(tvrage) = ext.tvrage {
            println!("  TVRage:  {tvrage}");
        }
        if let Some(thetvdb) = ext.thetvdb {
            println!("  TheTVDB: {thetvdb}");
        }
    }

    Ok(())
}
