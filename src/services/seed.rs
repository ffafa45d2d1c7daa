use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use crate::models::OrganisationCandidate;
use crate::services::directory::{DirectoryError, OrganisationDirectory};

const BUILTIN_SEED: &str = include_str!("../../config/organisations.toml");

#[derive(Debug, Deserialize)]
struct SeedFile {
    #[serde(default)]
    organisations: Vec<OrganisationCandidate>,
}

/// Static organisation set held in memory
#[derive(Debug, Clone, Default)]
pub struct SeedDirectory {
    organisations: Vec<OrganisationCandidate>,
}

impl SeedDirectory {
    pub fn new(organisations: Vec<OrganisationCandidate>) -> Self {
        Self { organisations }
    }

    /// The seed set shipped with the service
    pub fn builtin() -> Result<Self, DirectoryError> {
        Self::from_toml_str(BUILTIN_SEED)
    }

    pub fn from_toml_str(source: &str) -> Result<Self, DirectoryError> {
        let file: SeedFile = toml::from_str(source)?;
        Ok(Self::new(file.organisations))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DirectoryError> {
        let source = std::fs::read_to_string(path.as_ref())?;
        let directory = Self::from_toml_str(&source)?;

        tracing::info!(
            "Loaded {} seed organisations from {}",
            directory.organisations.len(),
            path.as_ref().display()
        );

        Ok(directory)
    }

    pub fn len(&self) -> usize {
        self.organisations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.organisations.is_empty()
    }
}

#[async_trait]
impl OrganisationDirectory for SeedDirectory {
    async fn list_all_organisations(&self) -> Result<Vec<OrganisationCandidate>, DirectoryError> {
        Ok(self.organisations.clone())
    }

    fn name(&self) -> &str {
        "seed"
    }
}
