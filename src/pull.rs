//! HTTP fetch of the two FAA archives.

use anyhow::{Context, Result, anyhow};
use bytes::Bytes;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::Config;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// Quoted `...dof...zip` path anywhere in the raw page
static DOF_ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)["']([^"']*dof[^"']*\.zip)["']"#).unwrap());

pub fn http_client(config: &Config) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}

/// GET `url`, retrying failed requests and non-success statuses with
/// exponential backoff (1, 2, 4... seconds).
pub async fn download_with_retry(
    client: &reqwest::Client,
    url: &str,
    max_retries: u32,
) -> Result<reqwest::Response> {
    let max_retries = max_retries.max(1);
    let mut last_error = None;

    for attempt in 1..=max_retries {
        match client.get(url).send().await {
            Ok(response) => {
                if response.status().is_success() {
                    return Ok(response);
                }
                let status = response.status();
                last_error = Some(anyhow!("HTTP error: {} for URL: {}", status, url));
                if attempt < max_retries {
                    warn!(
                        "HTTP error {} for URL: {}, retrying (attempt {}/{})",
                        status, url, attempt, max_retries
                    );
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
                }
            }
            Err(e) => {
                last_error = Some(anyhow!("Request failed for URL {}: {}", url, e));
                if attempt < max_retries {
                    warn!(
                        "Request failed for URL: {}, retrying (attempt {}/{}): {}",
                        url, attempt, max_retries, e
                    );
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempt - 1))).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or_else(|| anyhow!("All retry attempts failed for URL: {}", url)))
}

pub async fn fetch_bytes(client: &reqwest::Client, url: &str, max_retries: u32) -> Result<Bytes> {
    info!("Downloading {}", url);
    let response = download_with_retry(client, url, max_retries).await?;
    let body = response
        .bytes()
        .await
        .with_context(|| format!("Reading body of {}", url))?;
    info!("Downloaded {} bytes from {}", body.len(), url);
    Ok(body)
}

fn is_dof_zip(href: &str) -> bool {
    let href = href.to_ascii_lowercase();
    href.contains("dof") && href.ends_with(".zip")
}

fn absolutize(href: &str, origin: &str) -> Option<String> {
    if let Ok(url) = Url::parse(href) {
        return Some(url.to_string());
    }
    Url::parse(origin)
        .and_then(|base| base.join(href))
        .ok()
        .map(|url| url.to_string())
}

/// Locate the obstacle archive link on the landing page.
///
/// Anchors are tried first; if none match, any quoted `.zip` path naming
/// `dof` in the raw markup is accepted. Relative links are resolved against
/// `origin`.
pub fn find_dof_zip_link(html: &str, origin: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let from_anchor = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(str::trim)
        .find(|href| is_dof_zip(href))
        .map(str::to_string);

    let href = from_anchor.or_else(|| {
        DOF_ZIP_RE
            .captures(html)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })?;

    absolutize(&href, origin)
}

/// Fetch the landing page and return the absolute archive URL.
pub async fn discover_dof_zip_url(client: &reqwest::Client, config: &Config) -> Result<String> {
    let page = fetch_bytes(client, &config.dof_page_url, config.max_retries)
        .await
        .context("Fetching obstacle landing page")?;
    let html = String::from_utf8_lossy(&page);

    let url = find_dof_zip_link(&html, &config.faa_origin)
        .ok_or_else(|| anyhow!("No DOF archive link on {}", config.dof_page_url))?;
    info!("Found DOF archive at {}", url);
    Ok(url)
}
