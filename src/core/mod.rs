// Core algorithm exports
pub mod keyword;
pub mod prompt;
pub mod recommender;
pub mod text;

pub use keyword::{rank_by_keywords, score_candidates};
pub use prompt::{build_prompt, parse_ranked_ids, resolve_ids, ModelRanking};
pub use recommender::{Recommender, RecommenderOptions, StrategyError, MAX_RECOMMENDATIONS};
pub use text::{candidate_corpus, search_terms};
