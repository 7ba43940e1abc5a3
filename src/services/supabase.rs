use crate::models::Candidate;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when reading candidates from Supabase
#[derive(Debug, Error)]
pub enum SupabaseError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Unauthorized: invalid service key")]
    Unauthorized,

    #[error("Supabase is not configured: {0}")]
    NotConfigured(String),
}

/// Supabase REST client
///
/// Reads candidate rows through the PostgREST interface of a hosted project.
pub struct SupabaseClient {
    base_url: String,
    api_key: String,
    table: String,
    client: Client,
}

impl SupabaseClient {
    /// Create a new Supabase client
    pub fn new(
        base_url: String,
        api_key: String,
        table: String,
        timeout_secs: u64,
    ) -> Result<Self, SupabaseError> {
        if base_url.trim().is_empty() {
            return Err(SupabaseError::NotConfigured("supabase_url is empty".to_string()));
        }
        if api_key.trim().is_empty() {
            return Err(SupabaseError::NotConfigured("supabase_key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            table,
            client,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetch every candidate row
    pub async fn get_all_candidates(&self) -> Result<Vec<Candidate>, SupabaseError> {
        let url = format!(
            "{}/rest/v1/{}?select=*",
            self.base_url.trim_end_matches('/'),
            self.table
        );

        tracing::debug!("Fetching candidates from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => {}
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(SupabaseError::Unauthorized);
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                return Err(SupabaseError::ApiError(format!(
                    "Failed to fetch {}: {} {}",
                    self.table, status, body
                )));
            }
        }

        let candidates: Vec<Candidate> = response.json().await?;
        tracing::debug!("Fetched {} candidates from {}", candidates.len(), self.table);

        Ok(candidates)
    }
}
