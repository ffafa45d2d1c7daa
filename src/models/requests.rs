use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::ListingQuery;

/// Request for organisation suggestions on a newly created listing
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RecommendRequest {
    #[serde(alias = "listing_id", rename = "listingId", default)]
    pub listing_id: Option<String>,
    #[validate(length(min = 1))]
    pub title: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<RecommendRequest> for ListingQuery {
    fn from(req: RecommendRequest) -> Self {
        ListingQuery {
            title: req.title,
            description: req.description,
            tags: req.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title_rejected() {
        let req: RecommendRequest =
            serde_json::from_str(r#"{"title": "", "description": "working"}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_into_listing_query() {
        let req: RecommendRequest = serde_json::from_str(
            r#"{"listingId": "l1", "title": "Old Laptop", "description": "still works", "tags": ["electronics"]}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.listing_id.as_deref(), Some("l1"));

        let listing: ListingQuery = req.into();
        assert_eq!(listing.title, "Old Laptop");
        assert_eq!(listing.tags, vec!["electronics"]);
    }
}
