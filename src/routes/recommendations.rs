use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::core::Recommender;
use crate::models::{ErrorResponse, HealthResponse, ListingQuery, RecommendRequest, RecommendResponse};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub recommender: Recommender,
}

/// Configure all recommendation-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/recommendations", web::post().to(recommend));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        language_model: state.recommender.language_model_configured(),
    })
}

/// Recommend organisations for a listing
///
/// POST /api/v1/recommendations
///
/// Request body:
/// ```json
/// {
///   "listingId": "string",
///   "title": "string",
///   "description": "string",
///   "tags": ["string"]
/// }
/// ```
///
/// Always answers 200 once the request is valid; an empty `organisations`
/// list means there is nothing to suggest.
async fn recommend(
    state: web::Data<AppState>,
    req: web::Json<RecommendRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for recommendation request: {:?}", errors);
        return HttpResponse::BadRequest().json(ErrorResponse {
            error: "Validation failed".to_string(),
            message: errors.to_string(),
            status_code: 400,
        });
    }

    let request_id = uuid::Uuid::new_v4().to_string();
    let req = req.into_inner();
    let listing_id = req.listing_id.clone().unwrap_or_else(|| "-".to_string());
    let listing = ListingQuery::from(req);

    tracing::info!(
        request_id = %request_id,
        listing_id = %listing_id,
        "Recommending organisations for listing: {}",
        listing.title
    );

    let recommendation = state.recommender.recommend(&listing).await;

    tracing::info!(
        request_id = %request_id,
        strategy = ?recommendation.strategy,
        "Returning {} suggestions for listing {}",
        recommendation.organisations.len(),
        listing_id
    );

    HttpResponse::Ok().json(RecommendResponse {
        request_id,
        organisations: recommendation.organisations,
        strategy: recommendation.strategy,
        fallback_reason: recommendation.fallback_reason,
    })
}
