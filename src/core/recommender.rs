use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::core::keyword::rank_by_keywords;
use crate::core::prompt::{build_prompt, parse_ranked_ids, resolve_ids, ModelRanking, SYSTEM_PROMPT};
use crate::models::{ListingQuery, OrganisationCandidate, Recommendation, Strategy};
use crate::services::{GenerationError, GenerationOptions, OrganisationDirectory, TextGenerator};

/// Maximum number of organisations suggested per listing
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Reasons the language-model strategy did not produce a shortlist
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("language model not configured")]
    Unavailable,

    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("malformed model output: {0}")]
    MalformedOutput(String),

    #[error("model returned no known organisation ids")]
    NoResolvableIds,
}

/// Tunables for the recommender
#[derive(Debug, Clone)]
pub struct RecommenderOptions {
    pub limit: usize,
    pub temperature: f32,
    /// Upper bound on the whole generation call
    pub generation_timeout: Duration,
}

impl Default for RecommenderOptions {
    fn default() -> Self {
        Self {
            limit: MAX_RECOMMENDATIONS,
            temperature: 0.1,
            generation_timeout: Duration::from_secs(15),
        }
    }
}

/// Listing-to-organisation recommendation engine
///
/// Tries the language-model strategy once and falls back to keyword overlap
/// on any failure. `recommend` is total: every failure ends in a shortlist,
/// possibly empty.
#[derive(Clone)]
pub struct Recommender {
    directory: Arc<dyn OrganisationDirectory>,
    generator: Arc<dyn TextGenerator>,
    options: RecommenderOptions,
}

impl Recommender {
    pub fn new(
        directory: Arc<dyn OrganisationDirectory>,
        generator: Arc<dyn TextGenerator>,
        options: RecommenderOptions,
    ) -> Self {
        let options = RecommenderOptions {
            limit: options.limit.min(MAX_RECOMMENDATIONS),
            ..options
        };

        Self {
            directory,
            generator,
            options,
        }
    }

    pub fn language_model_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Suggest up to three organisations for a listing
    pub async fn recommend(&self, listing: &ListingQuery) -> Recommendation {
        let pool = match self.directory.list_all_organisations().await {
            Ok(pool) => pool,
            Err(e) => {
                tracing::error!(
                    "Failed to list organisations from {} directory, returning no suggestions: {}",
                    self.directory.name(),
                    e
                );
                Vec::new()
            }
        };

        tracing::debug!("Ranking {} candidate organisations", pool.len());

        if pool.is_empty() {
            return Recommendation {
                organisations: Vec::new(),
                strategy: Strategy::Keyword,
                fallback_reason: Some("no candidate organisations".to_string()),
            };
        }

        match self.rank_with_model(listing, &pool).await {
            Ok(organisations) => {
                tracing::info!(
                    "Language model suggested {} organisations: {:?}",
                    organisations.len(),
                    organisations.iter().map(|o| &o.id).collect::<Vec<_>>()
                );
                Recommendation {
                    organisations,
                    strategy: Strategy::LanguageModel,
                    fallback_reason: None,
                }
            }
            Err(e) => {
                match &e {
                    StrategyError::Unavailable => {
                        tracing::info!("Language model not configured, using keyword matching")
                    }
                    other => tracing::warn!("Falling back to keyword matching: {}", other),
                }

                let organisations = self.rank_with_keywords(listing, &pool);
                Recommendation {
                    organisations,
                    strategy: Strategy::Keyword,
                    fallback_reason: Some(e.to_string()),
                }
            }
        }
    }

    /// Deterministic keyword ranking over an already fetched pool
    pub fn rank_with_keywords(
        &self,
        listing: &ListingQuery,
        pool: &[OrganisationCandidate],
    ) -> Vec<OrganisationCandidate> {
        rank_by_keywords(listing, pool, self.options.limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Single-attempt language-model ranking over an already fetched pool
    pub async fn rank_with_model(
        &self,
        listing: &ListingQuery,
        pool: &[OrganisationCandidate],
    ) -> Result<Vec<OrganisationCandidate>, StrategyError> {
        if !self.generator.is_configured() {
            return Err(StrategyError::Unavailable);
        }

        let prompt = build_prompt(listing, pool);
        let options = GenerationOptions {
            temperature: self.options.temperature,
            system_prompt: Some(SYSTEM_PROMPT.to_string()),
        };

        let timeout = self.options.generation_timeout;
        let raw = match tokio::time::timeout(timeout, self.generator.generate(&prompt, &options)).await {
            Ok(Ok(raw)) => raw,
            Ok(Err(GenerationError::NotConfigured)) => return Err(StrategyError::Unavailable),
            Ok(Err(e)) => return Err(e.into()),
            Err(_) => return Err(StrategyError::Timeout(timeout)),
        };

        let ids = match parse_ranked_ids(&raw) {
            ModelRanking::Parsed(ids) => ids,
            ModelRanking::ParseFailure(reason) => {
                tracing::debug!("Unparseable model response: {}", raw);
                return Err(StrategyError::MalformedOutput(reason));
            }
        };

        let resolved = resolve_ids(&ids, pool, self.options.limit);
        if resolved.is_empty() {
            return Err(StrategyError::NoResolvableIds);
        }

        Ok(resolved.into_iter().cloned().collect())
    }
}
