use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::models::OrganisationCandidate;
use crate::services::directory::{DirectoryError, OrganisationDirectory};

/// Organisation directory backed by an Appwrite collection
///
/// Reads the organisation-profile documents and keeps only the fields the
/// recommender needs. Documents that fail to deserialize are skipped.
pub struct AppwriteDirectory {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    collection_id: String,
    page_size: u32,
    client: Client,
}

impl AppwriteDirectory {
    /// Create a new Appwrite directory client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collection_id: String,
        page_size: u32,
    ) -> Result<Self, DirectoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            collection_id,
            page_size,
            client,
        })
    }

    fn documents_url(&self) -> String {
        let limit = format!("limit({})", self.page_size);

        format!(
            "{}/databases/{}/collections/{}/documents?queries[]={}",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            self.collection_id,
            urlencoding::encode(&limit)
        )
    }
}

#[async_trait]
impl OrganisationDirectory for AppwriteDirectory {
    async fn list_all_organisations(&self) -> Result<Vec<OrganisationCandidate>, DirectoryError> {
        let url = self.documents_url();

        tracing::debug!("Fetching organisation profiles from: {}", url);

        let response = self
            .client
            .get(&url)
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Failed to list organisation profiles: {} - {}", status, body);
            return Err(DirectoryError::ApiError(format!(
                "Failed to list organisation profiles: {}",
                status
            )));
        }

        let json: Value = response.json().await?;

        let total = json
            .get("total")
            .and_then(|t| t.as_u64())
            .unwrap_or(0);

        let documents = json
            .get("documents")
            .and_then(|d| d.as_array())
            .ok_or_else(|| DirectoryError::InvalidResponse("Missing documents array".into()))?;

        let organisations: Vec<OrganisationCandidate> = documents
            .iter()
            .filter_map(|doc| {
                let data = doc.get("data").unwrap_or(doc);
                match serde_json::from_value(data.clone()) {
                    Ok(org) => Some(org),
                    Err(e) => {
                        tracing::debug!("Skipping malformed organisation document: {}", e);
                        None
                    }
                }
            })
            .collect();

        tracing::debug!("Loaded {} organisation profiles (total: {})", organisations.len(), total);

        Ok(organisations)
    }

    fn name(&self) -> &str {
        "appwrite"
    }
}
