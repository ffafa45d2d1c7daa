use crate::core::text::{candidate_corpus, search_terms};
use crate::models::{ListingQuery, OrganisationCandidate, ScoredCandidate};

/// Score every candidate against the search terms
///
/// The score is the number of terms found as a substring of the candidate's
/// corpus, so "laptop" matches inside "laptops". Output keeps pool order.
pub fn score_candidates<'a>(
    terms: &[String],
    pool: &'a [OrganisationCandidate],
) -> Vec<ScoredCandidate<'a>> {
    pool.iter()
        .map(|candidate| {
            let corpus = candidate_corpus(candidate);
            let score = terms
                .iter()
                .filter(|term| corpus.contains(term.as_str()))
                .count();

            ScoredCandidate { candidate, score }
        })
        .collect()
}

/// Rank the pool by keyword overlap with the listing
///
/// Deterministic and infallible. Ties keep their pool order because
/// `sort_by` is stable.
pub fn rank_by_keywords<'a>(
    listing: &ListingQuery,
    pool: &'a [OrganisationCandidate],
    limit: usize,
) -> Vec<&'a OrganisationCandidate> {
    let terms = search_terms(listing);
    let mut scored = score_candidates(&terms, pool);

    scored.sort_by(|a, b| b.score.cmp(&a.score));

    tracing::debug!(
        terms = terms.len(),
        candidates = pool.len(),
        top_score = scored.first().map(|s| s.score).unwrap_or(0),
        "Keyword ranking complete"
    );

    scored
        .into_iter()
        .take(limit)
        .map(|s| s.candidate)
        .collect()
}
