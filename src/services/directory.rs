use async_trait::async_trait;
use thiserror::Error;

use crate::models::OrganisationCandidate;

/// Errors that can occur when reading the organisation directory
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed data: {0}")]
    Seed(#[from] toml::de::Error),
}

/// Read-only source of organisation profiles
///
/// Whether this hits a live store or a static seed set is a deployment
/// choice; the recommender only ever sees this trait.
#[async_trait]
pub trait OrganisationDirectory: Send + Sync {
    async fn list_all_organisations(&self) -> Result<Vec<OrganisationCandidate>, DirectoryError>;

    /// Short label used in logs
    fn name(&self) -> &str;
}
