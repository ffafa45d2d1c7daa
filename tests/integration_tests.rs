// Integration tests for the recommendation engine and its HTTP collaborators

use async_trait::async_trait;
use ewaste_match::core::{Recommender, RecommenderOptions};
use ewaste_match::models::{ListingQuery, OrganisationCandidate, Strategy};
use ewaste_match::services::{
    AppwriteDirectory, GenerationError, GenerationOptions, OpenAiClient, OrganisationDirectory,
    SeedDirectory, TextGenerator,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Text generator returning a fixed response and counting calls
struct FakeGenerator {
    configured: bool,
    response: Result<&'static str, ()>,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeGenerator {
    fn replying(response: &'static str) -> Self {
        Self {
            configured: true,
            response: Ok(response),
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            response: Err(()),
            ..Self::replying("")
        }
    }

    fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::replying(r#"["org_5"]"#)
        }
    }

    fn slow(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::replying(r#"["org_5"]"#)
        }
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn generate(
        &self,
        _prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(options.temperature <= 0.2, "ranking should use a low temperature");

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match self.response {
            Ok(text) => Ok(text.to_string()),
            Err(()) => Err(GenerationError::ApiError {
                status: 503,
                body: "overloaded".to_string(),
            }),
        }
    }
}

fn create_test_pool() -> Vec<OrganisationCandidate> {
    vec![
        OrganisationCandidate::new("org_1", "Textile Trust", "We collect textiles"),
        OrganisationCandidate::new("org_2", "ReBoot", "We refurbish laptops for schools")
            .with_needs(["laptops", "chargers"]),
        OrganisationCandidate::new("org_3", "Screen Savers", "Monitors for community centres")
            .with_tags(["monitor", "dell"]),
        OrganisationCandidate::new("org_4", "Phone Aid", "Mobile phones for refugees"),
        OrganisationCandidate::new("org_5", "Green Circuit", "Electronics recycling")
            .with_tags(["electronics"]),
    ]
}

fn create_recommender(generator: Arc<FakeGenerator>) -> Recommender {
    create_recommender_with_pool(generator, create_test_pool())
}

fn create_recommender_with_pool(
    generator: Arc<FakeGenerator>,
    pool: Vec<OrganisationCandidate>,
) -> Recommender {
    Recommender::new(
        Arc::new(SeedDirectory::new(pool)),
        generator,
        RecommenderOptions {
            generation_timeout: Duration::from_millis(200),
            ..Default::default()
        },
    )
}

fn laptop_listing() -> ListingQuery {
    ListingQuery::new("Old Laptop", "still works").with_tags(["electronics"])
}

#[tokio::test]
async fn test_no_credential_matches_keyword_strategy() {
    let generator = Arc::new(FakeGenerator::unconfigured());
    let engine = create_recommender(generator.clone());
    let listing = laptop_listing();

    let result = engine.recommend(&listing).await;
    let keyword_only = engine.rank_with_keywords(&listing, &create_test_pool());

    assert_eq!(result.strategy, Strategy::Keyword);
    assert_eq!(result.organisations, keyword_only);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_model_ranking_used_when_valid() {
    let generator = Arc::new(FakeGenerator::replying(
        "Here are the best matches: [\"org_5\", \"org_2\", \"org_3\"]",
    ));
    let engine = create_recommender(generator.clone());

    let result = engine.recommend(&laptop_listing()).await;

    assert_eq!(result.strategy, Strategy::LanguageModel);
    assert_eq!(result.ids(), vec!["org_5", "org_2", "org_3"]);
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_malformed_model_output_falls_back() {
    let generator = Arc::new(FakeGenerator::replying("Sure! [\"org_1\""));
    let engine = create_recommender(generator.clone());
    let listing = laptop_listing();

    let result = engine.recommend(&listing).await;

    assert_eq!(result.strategy, Strategy::Keyword);
    assert_eq!(result.organisations, engine.rank_with_keywords(&listing, &create_test_pool()));
    assert!(result.fallback_reason.unwrap().contains("malformed"));
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_unknown_ids_dropped_from_model_output() {
    let generator = Arc::new(FakeGenerator::replying(r#"["org_9","org_2","org_9"]"#));
    let engine = create_recommender(generator);

    let result = engine.recommend(&laptop_listing()).await;

    assert_eq!(result.strategy, Strategy::LanguageModel);
    assert_eq!(result.ids(), vec!["org_2"]);
}

#[tokio::test]
async fn test_model_output_truncated_and_deduplicated() {
    let generator = Arc::new(FakeGenerator::replying(
        r#"["org_1","org_1","org_2","org_3","org_4","org_5"]"#,
    ));
    let engine = create_recommender(generator);

    let result = engine.recommend(&laptop_listing()).await;

    assert_eq!(result.ids(), vec!["org_1", "org_2", "org_3"]);
}

#[tokio::test]
async fn test_service_failure_falls_back_once() {
    let generator = Arc::new(FakeGenerator::failing());
    let engine = create_recommender(generator.clone());

    let result = engine.recommend(&laptop_listing()).await;

    assert_eq!(result.strategy, Strategy::Keyword);
    assert_eq!(result.ids()[0], "org_2");
    assert_eq!(generator.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_slow_model_times_out_to_keywords() {
    let generator = Arc::new(FakeGenerator::slow(Duration::from_secs(10)));
    let engine = create_recommender(generator);

    let result = engine.recommend(&laptop_listing()).await;

    assert_eq!(result.strategy, Strategy::Keyword);
    assert!(result.fallback_reason.unwrap().contains("timed out"));
}

#[tokio::test]
async fn test_empty_pool_yields_empty_result() {
    let generator = Arc::new(FakeGenerator::replying(r#"["org_1"]"#));
    let engine = create_recommender_with_pool(generator.clone(), Vec::new());

    let result = engine.recommend(&laptop_listing()).await;

    assert!(result.is_empty());
    assert_eq!(generator.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_output_bounded_by_small_pool() {
    let pool = create_test_pool().into_iter().take(2).collect::<Vec<_>>();
    let engine = create_recommender_with_pool(Arc::new(FakeGenerator::unconfigured()), pool);

    let result = engine.recommend(&ListingQuery::new("", "")).await;

    assert_eq!(result.ids(), vec!["org_1", "org_2"]);
}

#[tokio::test]
async fn test_openai_client_against_mock_server() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/chat/completions")
        .match_header("authorization", "Bearer sk-test")
        .match_body(mockito::Matcher::PartialJsonString(
            r#"{"model": "gpt-3.5-turbo"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "[\"org_3\", \"org_1\"]"}}]}"#,
        )
        .create_async()
        .await;

    let client = OpenAiClient::new(
        server.url(),
        Some("sk-test".to_string()),
        "gpt-3.5-turbo".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    let engine = Recommender::new(
        Arc::new(SeedDirectory::new(create_test_pool())),
        Arc::new(client),
        RecommenderOptions::default(),
    );
    let result = engine.recommend(&laptop_listing()).await;

    mock.assert_async().await;
    assert_eq!(result.strategy, Strategy::LanguageModel);
    assert_eq!(result.ids(), vec!["org_3", "org_1"]);
}

#[tokio::test]
async fn test_openai_error_status() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(500)
        .with_body("internal error")
        .create_async()
        .await;

    let client = OpenAiClient::new(
        server.url(),
        Some("sk-test".to_string()),
        "gpt-3.5-turbo".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    let result = client.generate("prompt", &GenerationOptions::default()).await;

    assert!(matches!(result, Err(GenerationError::ApiError { status: 500, .. })));
}

#[tokio::test]
async fn test_openai_empty_choices() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"choices": []}"#)
        .create_async()
        .await;

    let client = OpenAiClient::new(
        server.url(),
        Some("sk-test".to_string()),
        "gpt-3.5-turbo".to_string(),
        Duration::from_secs(5),
    )
    .unwrap();

    let result = client.generate("prompt", &GenerationOptions::default()).await;

    assert!(matches!(result, Err(GenerationError::EmptyResponse)));
}

#[tokio::test]
async fn test_appwrite_directory_lists_documents() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/databases/db/collections/orgs/documents".to_string()),
        )
        .match_header("x-appwrite-key", "key")
        .match_header("x-appwrite-project", "project")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "total": 3,
                "documents": [
                    {"$id": "org_1", "name": "ReBoot", "description": "Laptops", "needs": ["laptops"], "tags": []},
                    {"$id": "broken"},
                    {"$id": "org_2", "name": "Green", "description": "Recycling"}
                ]
            }"#,
        )
        .create_async()
        .await;

    let directory = AppwriteDirectory::new(
        server.url(),
        "key".to_string(),
        "project".to_string(),
        "db".to_string(),
        "orgs".to_string(),
        100,
    )
    .unwrap();

    let organisations = directory.list_all_organisations().await.unwrap();

    mock.assert_async().await;
    assert_eq!(organisations.len(), 2);
    assert_eq!(organisations[0].id, "org_1");
    assert_eq!(organisations[0].needs, vec!["laptops"]);
    assert_eq!(organisations[1].id, "org_2");
}

#[tokio::test]
async fn test_appwrite_failure_yields_empty_recommendation() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock(
            "GET",
            mockito::Matcher::Regex(r"^/databases/db/collections/orgs/documents".to_string()),
        )
        .with_status(401)
        .create_async()
        .await;

    let directory = AppwriteDirectory::new(
        server.url(),
        "bad".to_string(),
        "project".to_string(),
        "db".to_string(),
        "orgs".to_string(),
        100,
    )
    .unwrap();

    let engine = Recommender::new(
        Arc::new(directory),
        Arc::new(FakeGenerator::replying(r#"["org_1"]"#)),
        RecommenderOptions::default(),
    );

    let result = engine.recommend(&laptop_listing()).await;

    assert!(result.is_empty());
}
