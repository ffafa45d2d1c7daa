use crate::models::{ListingQuery, OrganisationCandidate};

/// Terms of this many characters or fewer are treated as stop words
pub const MIN_TERM_CHARS: usize = 2;

/// Build the search terms for a listing
///
/// Title and description are lower-cased and split on whitespace; each tag
/// is lower-cased and kept whole. Short terms are dropped. Order and
/// repetitions are preserved, since every occurrence counts towards a score.
pub fn search_terms(listing: &ListingQuery) -> Vec<String> {
    let title = listing.title.to_lowercase();
    let description = listing.description.to_lowercase();

    title
        .split_whitespace()
        .chain(description.split_whitespace())
        .map(str::to_owned)
        .chain(listing.tags.iter().map(|tag| tag.to_lowercase()))
        .filter(|term| term.chars().count() > MIN_TERM_CHARS)
        .collect()
}

/// Lower-cased searchable text of an organisation
#[inline]
pub fn candidate_corpus(candidate: &OrganisationCandidate) -> String {
    std::iter::once(candidate.name.as_str())
        .chain(std::iter::once(candidate.description.as_str()))
        .chain(candidate.needs.iter().map(String::as_str))
        .chain(candidate.tags.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
