//! E-Waste Match - organisation recommendations for donated e-waste listings
//!
//! Given a newly created listing, the recommender ranks organisation profiles
//! by relevance and returns a short list of matches. Ranking is delegated to a
//! language model when one is configured and falls back to deterministic
//! keyword overlap whenever that is unavailable or fails.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Recommender, RecommenderOptions, rank_by_keywords, MAX_RECOMMENDATIONS};
pub use models::{ListingQuery, OrganisationCandidate, Recommendation, Strategy, RecommendRequest, RecommendResponse};
pub use services::{OrganisationDirectory, TextGenerator};
