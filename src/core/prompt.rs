use std::collections::HashSet;

use serde_json::Value;

use crate::models::{ListingQuery, OrganisationCandidate};

/// System message sent alongside every ranking prompt
pub const SYSTEM_PROMPT: &str = "You are a helpful matching assistant that outputs only JSON.";

/// Outcome of reading a model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelRanking {
    /// Candidate ids in the order the model ranked them
    Parsed(Vec<String>),
    ParseFailure(String),
}

/// Build the ranking prompt for a listing and the full candidate pool
pub fn build_prompt(listing: &ListingQuery, pool: &[OrganisationCandidate]) -> String {
    let tags = if listing.tags.is_empty() {
        "None".to_string()
    } else {
        listing.tags.join(", ")
    };

    let organisations = pool
        .iter()
        .map(|org| {
            let needs = if org.needs.is_empty() {
                "General e-waste".to_string()
            } else {
                org.needs.join(", ")
            };
            format!(
                "ID: {}\nName: {}\nDescription: {}\nNeeds: {}\n",
                org.id, org.name, org.description, needs
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert at matching e-waste donors with the right NGOs.

Listing Details:
Title: {title}
Description: {description}
Tags: {tags}

Available NGOs:
{organisations}
Task:
Identify the top 3 NGOs that are the best match for this listing.
Consider the NGO's specific needs and their description.

Return ONLY a valid JSON array of the top 3 NGO IDs, ordered by relevance.
Example: ["org_id_1", "org_id_2", "org_id_3"]"#,
        title = listing.title,
        description = listing.description,
        tags = tags,
        organisations = organisations,
    )
}

/// Read the ranked id list out of a raw model response
///
/// Models like to wrap JSON in prose, so the span from the first `[` to the
/// last `]` is parsed; without such a span the whole text is tried. Array
/// elements that are not strings are skipped.
pub fn parse_ranked_ids(raw: &str) -> ModelRanking {
    let json = match (raw.find('['), raw.rfind(']')) {
        (Some(start), Some(end)) if start < end => &raw[start..=end],
        _ => raw.trim(),
    };

    match serde_json::from_str::<Value>(json) {
        Ok(Value::Array(items)) => ModelRanking::Parsed(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(id) => Some(id),
                    _ => None,
                })
                .collect(),
        ),
        Ok(other) => ModelRanking::ParseFailure(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        )),
        Err(e) => ModelRanking::ParseFailure(format!("invalid JSON: {}", e)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Map model ids back onto the pool, in model order
///
/// Unknown ids are dropped, an id requested twice is returned once, and the
/// result is cut at `limit`.
pub fn resolve_ids<'a>(
    ids: &[String],
    pool: &'a [OrganisationCandidate],
    limit: usize,
) -> Vec<&'a OrganisationCandidate> {
    let mut seen = HashSet::new();
    let mut resolved = Vec::new();

    for id in ids {
        if resolved.len() >= limit {
            break;
        }
        let Some(org) = pool.iter().find(|org| &org.id == id) else {
            tracing::debug!("Model returned unknown organisation id: {}", id);
            continue;
        };
        if seen.insert(org.id.as_str()) {
            resolved.push(org);
        }
    }

    resolved
}
