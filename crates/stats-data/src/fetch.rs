//! Download of the caniuse usage dataset into the data directory.

use std::path::Path;
use std::time::Duration;

use stats_core::error::{Result, StatsError};
use tracing::info;

use crate::reader::{region_file, GLOBAL_DATA_FILE};

/// Raw file root of the caniuse repository.
pub const CANIUSE_URL_BASE: &str = "https://github.com/Fyrd/caniuse/raw/main/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP fetcher for the global and per-region dataset files.
pub struct Downloader {
    client: reqwest::blocking::Client,
    url_base: String,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        Self::with_base(CANIUSE_URL_BASE)
    }

    /// Fetch from a different root, e.g. a mirror. A trailing `/` is added
    /// when missing.
    pub fn with_base(url_base: &str) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StatsError::Other(e.into()))?;
        let mut url_base = url_base.to_string();
        if !url_base.ends_with('/') {
            url_base.push('/');
        }
        Ok(Self { client, url_base })
    }

    pub fn global_url(&self) -> String {
        format!("{}fulldata-json/data-2.0.json", self.url_base)
    }

    pub fn region_url(&self, region: &str) -> String {
        format!("{}region-usage-json/{}.json", self.url_base, region)
    }

    /// Download the global file and one file per region into `data_dir`,
    /// creating the directory if needed.
    pub fn download_all(&self, data_dir: &Path, regions: &[String]) -> Result<()> {
        std::fs::create_dir_all(data_dir)?;

        let body = self.fetch_text(&self.global_url())?;
        std::fs::write(data_dir.join(GLOBAL_DATA_FILE), body)?;

        for region in regions {
            let body = self.fetch_text(&self.region_url(region))?;
            std::fs::write(region_file(data_dir, region), body)?;
        }

        info!(
            "Downloaded dataset for {} regions into {}",
            regions.len(),
            data_dir.display()
        );
        Ok(())
    }

    fn fetch_text(&self, url: &str) -> Result<String> {
        info!("Fetching {}", url);
        let download_err = |e: reqwest::Error| StatsError::Download {
            url: url.to_string(),
            message: e.to_string(),
        };
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(download_err)?
            .error_for_status()
            .map_err(download_err)?;
        resp.text().map_err(download_err)
    }
}
