use anyhow::{Context, Result};
use chrono::Local;
use tracing::info;

use aerodata::Config;
use aerodata::cycle::{current_cycle, format_cycle_date, subscription_url};
use aerodata::dataset::{
    ObstacleScan, Parsers, assemble, parse_dof_archive, parse_nasr_archive, recover_source,
};
use aerodata::faa::FacilityMap;
use aerodata::pull::{discover_dof_zip_url, fetch_bytes, http_client};
use aerodata::store::{JsonFileStore, persist};

async fn pull_facilities(
    client: &reqwest::Client,
    config: &Config,
    url: &str,
    parsers: &Parsers,
) -> Result<FacilityMap> {
    let bytes = fetch_bytes(client, url, config.max_retries)
        .await
        .context("Downloading NASR subscription")?;
    parse_nasr_archive(&bytes, parsers)
}

async fn pull_obstacles(
    client: &reqwest::Client,
    config: &Config,
    parsers: &Parsers,
) -> Result<ObstacleScan> {
    let url = discover_dof_zip_url(client, config).await?;
    let bytes = fetch_bytes(client, &url, config.max_retries)
        .await
        .context("Downloading obstacle archive")?;
    parse_dof_archive(&bytes, parsers)
}

pub async fn handle_update(config: &Config) -> Result<()> {
    info!("Starting update");
    let parsers = config.parsers()?;
    let client = http_client(config)?;
    let store = JsonFileStore::new(&config.output_dir)?;

    let cycle = current_cycle(Local::now().date_naive(), config.cycle_anchor);
    let nasr_url = subscription_url(&config.nasr_base_url, cycle);
    info!("NASR cycle {} ({})", cycle, nasr_url);

    let facilities = recover_source(
        "NASR",
        pull_facilities(&client, config, &nasr_url, &parsers).await,
    );
    let scan = recover_source("DOF", pull_obstacles(&client, config, &parsers).await);

    let dataset = assemble(facilities, scan, format_cycle_date(cycle));
    let metadata = persist(&dataset, &store)?;

    info!(
        "Update complete: {} airports, {} obstacles (DOF {}, NASR {}) in {:?}",
        metadata.apt_count,
        metadata.obs_count,
        metadata.dof_date,
        metadata.apt_date,
        store.dir()
    );
    Ok(())
}
