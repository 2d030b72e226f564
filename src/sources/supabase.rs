use crate::normalizer::RawRecord;
use crate::sources::json::parse_rows;
use crate::sources::traits::RecordSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

const TABLE: &str = "properties";

/// Reads the `properties` table through Supabase's REST endpoint.
pub struct SupabaseSource {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SupabaseSource {
    /// Create a source for the project at `base_url` (e.g. `https://xyz.supabase.co`)
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    /// Newest listings first, as the site shows them.
    pub fn table_url(&self) -> String {
        format!(
            "{}/rest/v1/{}?select=*&order=updated_at.desc",
            self.base_url, TABLE
        )
    }
}

#[async_trait]
impl RecordSource for SupabaseSource {
    async fn fetch(&self) -> Result<Vec<RawRecord>> {
        let url = self.table_url();
        info!("Fetching properties from Supabase");
        debug!("Fetching URL: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await
            .context("Failed to fetch properties")?;

        if !response.status().is_success() {
            warn!("Supabase returned status: {}", response.status());
            anyhow::bail!("Failed to fetch properties: {}", response.status());
        }

        let rows: Value = response
            .json()
            .await
            .context("Failed to read response body")?;
        let records = parse_rows(rows)?;

        info!("Fetched {} rows from Supabase", records.len());
        Ok(records)
    }

    fn source_name(&self) -> &'static str {
        "Supabase"
    }
}
