// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{ListingQuery, OrganisationCandidate, ScoredCandidate, Strategy, Recommendation};
pub use requests::RecommendRequest;
pub use responses::{RecommendResponse, HealthResponse, ErrorResponse};
