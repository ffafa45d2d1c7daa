use serde::{Deserialize, Serialize};

/// Searchable text of a freshly created listing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingQuery {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ListingQuery {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: Vec::new(),
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Organisation profile eligible for a match suggestion
///
/// Document stores hand out the identifier under different keys, so `$id`
/// and `_id` are accepted alongside `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganisationCandidate {
    #[serde(alias = "$id", alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub needs: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl OrganisationCandidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            needs: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_needs<I, S>(mut self, needs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.needs = needs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }
}

/// Candidate paired with its keyword score, only alive during one ranking pass
#[derive(Debug, Clone, Copy)]
pub struct ScoredCandidate<'a> {
    pub candidate: &'a OrganisationCandidate,
    pub score: usize,
}

/// Which ranking strategy produced a shortlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    LanguageModel,
    Keyword,
}

/// Ranked shortlist returned by the recommender
#[derive(Debug, Clone)]
pub struct Recommendation {
    pub organisations: Vec<OrganisationCandidate>,
    pub strategy: Strategy,
    /// Why the language-model strategy was not used, if it was not
    pub fallback_reason: Option<String>,
}

impl Recommendation {
    pub fn ids(&self) -> Vec<&str> {
        self.organisations.iter().map(|o| o.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.organisations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_accepts_document_ids() {
        let appwrite: OrganisationCandidate = serde_json::from_str(
            r#"{"$id": "org_1", "name": "ReBoot", "description": "Laptops"}"#,
        )
        .unwrap();
        assert_eq!(appwrite.id, "org_1");
        assert!(appwrite.needs.is_empty());

        let mongo: OrganisationCandidate = serde_json::from_str(
            r#"{"_id": "org_2", "name": "Green", "needs": ["phones"], "tags": ["recycling"]}"#,
        )
        .unwrap();
        assert_eq!(mongo.id, "org_2");
        assert_eq!(mongo.description, "");
        assert_eq!(mongo.needs, vec!["phones"]);
    }

    #[test]
    fn test_listing_tags_default_empty() {
        let listing: ListingQuery =
            serde_json::from_str(r#"{"title": "Old TV", "description": "CRT"}"#).unwrap();
        assert!(listing.tags.is_empty());
    }

    #[test]
    fn test_strategy_serialization() {
        let json = serde_json::to_string(&Strategy::LanguageModel).unwrap();
        assert_eq!(json, "\"language_model\"");
    }
}
