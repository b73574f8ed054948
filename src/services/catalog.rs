use crate::config::CatalogSettings;
use crate::models::Candidate;
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while loading the candidate catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Catalog endpoint returned {0}")]
    Status(reqwest::StatusCode),
}

/// Read-only set of reference players, loaded once at startup
///
/// Iteration order is document order and is what the matcher uses to
/// break ties.
#[derive(Debug, Clone, Default)]
pub struct CandidateCatalog {
    candidates: Vec<Candidate>,
}

impl CandidateCatalog {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        let mut seen = HashSet::new();
        for candidate in &candidates {
            if !seen.insert(candidate.id.as_str()) {
                tracing::warn!("Duplicate candidate id in catalog: {}", candidate.id);
            }
        }
        Self { candidates }
    }

    /// Parse a JSON array of candidates
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let candidates: Vec<Candidate> = serde_json::from_str(json)?;
        Ok(Self::new(candidates))
    }

    /// Load the catalog from a local JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    /// Download the catalog document from a remote URL
    pub async fn fetch(url: &str, timeout_secs: u64) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        tracing::debug!("Fetching candidate catalog from: {}", url);

        let response = client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status(response.status()));
        }

        let candidates: Vec<Candidate> = response.json().await?;
        Ok(Self::new(candidates))
    }

    /// Load from the configured URL if present, otherwise from the configured file
    pub async fn load(settings: &CatalogSettings) -> Result<Self, CatalogError> {
        let catalog = match &settings.url {
            Some(url) => Self::fetch(url, settings.timeout_secs).await?,
            None => Self::from_path(&settings.path)?,
        };

        tracing::info!("Loaded {} candidates into the catalog", catalog.len());
        Ok(catalog)
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
