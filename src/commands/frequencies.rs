use anyhow::{Context, Result};
use chrono::Local;
use tracing::{info, warn};

use aerodata::Config;
use aerodata::archive::SourceArchive;
use aerodata::cycle::{current_cycle, subscription_url};
use aerodata::lookup::lookup_frequencies;
use aerodata::pull::{fetch_bytes, http_client};

pub async fn handle_frequencies(config: &Config, airports: &[String]) -> Result<()> {
    let parsers = config.parsers()?;
    let client = http_client(config)?;

    let cycle = current_cycle(Local::now().date_naive(), config.cycle_anchor);
    let url = subscription_url(&config.nasr_base_url, cycle);
    info!("Looking up {} airport(s) in NASR cycle {}", airports.len(), cycle);

    let bytes = fetch_bytes(&client, &url, config.max_retries)
        .await
        .context("Downloading NASR subscription")?;
    let mut archive = SourceArchive::new(&bytes)?;

    for airport in airports {
        match lookup_frequencies(&mut archive, airport, &parsers) {
            Ok(found) => println!("{}", found),
            Err(e) => warn!("Lookup for {} failed: {:#}", airport, e),
        }
    }
    Ok(())
}
