//! API Integration Tests
//!
//! Each test spawns its own server on the in-memory backend, so nothing
//! external is required. The `postgres_` tests additionally run against
//! PostgreSQL when DATABASE_URL is set and skip otherwise.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use futures::future::join_all;
use integration_tests::{
    assert_error, assert_json, assert_status, fixtures::*, TestServer,
};
use reqwest::StatusCode;
use uuid::Uuid;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_health_ready() {
    let server = TestServer::start().await.expect("Failed to start server");

    let response = server.get("/health/ready").await.unwrap();
    let body: serde_json::Value = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["storage"], "healthy");
}

#[tokio::test]
async fn test_request_id_header() {
    let server = TestServer::start().await.unwrap();

    let response = server.get_as("/api/codes", "alice").await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_rate_limited_requests_get_error_body() {
    let server = TestServer::start_with(&[
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "1"),
        ("RATE_LIMIT_BURST", "1"),
    ])
    .await
    .unwrap();

    let mut last = None;
    for _ in 0..3 {
        last = Some(server.get_as("/api/user/stats", "alice").await.unwrap());
    }
    let response = last.unwrap();
    assert!(response.headers().contains_key("retry-after"));

    let body = assert_error(response, StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "Other");

    // Health checks sit outside the limiter
    let response = server.get("/health").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Identity Tests
// ============================================================================

#[tokio::test]
async fn test_missing_user_id() {
    let server = TestServer::start().await.unwrap();

    let response = server.get("/api/user/stats").await.unwrap();
    let body = assert_error(response, StatusCode::UNAUTHORIZED, "MISSING_USER_ID")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "Other");
}

#[tokio::test]
async fn test_blank_user_id() {
    let server = TestServer::start().await.unwrap();

    let response = server.get_as("/api/user/stats", "   ").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_USER_ID")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_oversized_user_id() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .get_as("/api/user/stats", &"u".repeat(200))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_USER_ID")
        .await
        .unwrap();
}

// ============================================================================
// Post Tests
// ============================================================================

#[tokio::test]
async fn test_post_round_trip() {
    let server = TestServer::start().await.unwrap();
    let content = unique_code();

    let response = server.post_code("alice", &content).await.unwrap();
    let posted: CodeItem = assert_json(response, StatusCode::CREATED).await.unwrap();

    assert_eq!(posted.content, content);
    assert_eq!(posted.remaining_uses, 10);
    assert!(posted.is_own_code);
    assert!(!posted.already_used);
    assert!(posted.created_at > 0);

    // Visible immediately, flagged per viewer
    let for_owner = server.list("alice").await.unwrap();
    let mine = for_owner.iter().find(|c| c.id == posted.id).unwrap();
    assert!(mine.is_own_code);

    let for_other = server.list("bob").await.unwrap();
    let theirs = for_other.iter().find(|c| c.id == posted.id).unwrap();
    assert!(!theirs.is_own_code);
    assert_eq!(theirs.remaining_uses, 10);
}

#[tokio::test]
async fn test_post_validation_errors() {
    let server = TestServer::start().await.unwrap();

    let response = server.post_code("alice", "hello there").await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST, "BAD_FORMAT")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "BadFormat");

    let long = format!("{} {}", unique_code(), "x".repeat(60));
    let response = server.post_code("alice", &long).await.unwrap();
    let body = assert_error(response, StatusCode::BAD_REQUEST, "TOO_LONG")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "TooLong");

    let response = server.post_code("alice", "").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "BAD_FORMAT")
        .await
        .unwrap();

    // Rejected posts do not use up quota
    let response = server.get_as("/api/user/stats", "alice").await.unwrap();
    let stats: Stats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.today_post_count, 0);
}

#[tokio::test]
async fn test_post_malformed_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .post_as("/api/codes", "alice", &serde_json::json!({ "text": "AB1234 x:/Y" }))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_BODY")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_duplicate_core_code() {
    let server = TestServer::start().await.unwrap();
    let code = unique_code();

    let response = server.post_code("alice", &code).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();

    // Same core code wrapped in other text, by someone else
    let response = server
        .post_code("bob", &format!("grab it {code} fast"))
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::CONFLICT, "DUPLICATE")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "Duplicate");
}

#[tokio::test]
async fn test_full_match_mode() {
    let server = TestServer::start_with(&[("CODE_MATCH_MODE", "full")])
        .await
        .unwrap();

    let response = server
        .post_code("alice", &format!("code: {}", unique_code()))
        .await
        .unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "BAD_FORMAT")
        .await
        .unwrap();

    let response = server.post_code("alice", &unique_code()).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

// ============================================================================
// Claim Tests
// ============================================================================

#[tokio::test]
async fn test_worked_example() {
    let server = TestServer::start().await.unwrap();

    // Five posts succeed, the sixth hits the daily limit
    let mut codes = Vec::new();
    for _ in 0..5 {
        codes.push(server.post_unique("alice").await.unwrap());
    }
    let response = server.post_code("alice", &unique_code()).await.unwrap();
    let body = assert_error(response, StatusCode::TOO_MANY_REQUESTS, "POST_LIMIT_REACHED")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "PostLimitReached");

    // Three claims succeed, the fourth hits the daily limit
    for code in &codes[..3] {
        let response = server.claim("bob", &code.id).await.unwrap();
        let claimed: CodeItem = assert_json(response, StatusCode::OK).await.unwrap();
        assert_eq!(claimed.remaining_uses, 9);
        assert!(claimed.already_used);
        assert!(!claimed.is_own_code);
    }
    let response = server.claim("bob", &codes[3].id).await.unwrap();
    let body = assert_error(response, StatusCode::TOO_MANY_REQUESTS, "DAILY_LIMIT_REACHED")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "DailyLimitReached");

    let response = server.get_as("/api/user/stats", "bob").await.unwrap();
    let stats: Stats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.today_claim_count, 3);
    assert_eq!(stats.today_post_count, 0);
    assert_eq!(stats.claim_limit, 3);
    assert_eq!(stats.post_limit, 5);

    let response = server.get_as("/api/user/stats", "alice").await.unwrap();
    let stats: Stats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.today_post_count, 5);

    // Listing shows which codes bob already used
    let listed = server.list("bob").await.unwrap();
    let used: Vec<_> = listed.iter().filter(|c| c.already_used).collect();
    assert_eq!(used.len(), 3);
}

#[tokio::test]
async fn test_claim_own_code() {
    let server = TestServer::start().await.unwrap();
    let code = server.post_unique("alice").await.unwrap();

    let response = server.claim("alice", &code.id).await.unwrap();
    let body = assert_error(response, StatusCode::FORBIDDEN, "OWN_CODE")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "OwnCode");
}

#[tokio::test]
async fn test_claim_twice() {
    let server = TestServer::start().await.unwrap();
    let code = server.post_unique("alice").await.unwrap();

    let response = server.claim("bob", &code.id).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.claim("bob", &code.id).await.unwrap();
    let body = assert_error(response, StatusCode::CONFLICT, "ALREADY_CLAIMED")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "AlreadyClaimed");

    // The failed attempt did not count
    let response = server.get_as("/api/user/stats", "bob").await.unwrap();
    let stats: Stats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.today_claim_count, 1);
}

#[tokio::test]
async fn test_claim_unknown_code() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .claim("bob", &Uuid::new_v4().to_string())
        .await
        .unwrap();
    let body = assert_error(response, StatusCode::NOT_FOUND, "NOT_FOUND")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "NotFound");

    let response = server.claim("bob", "not-a-code-id").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_PATH_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_exhausted_code_leaves_listing() {
    let server = TestServer::start_with(&[("INITIAL_USES", "1")])
        .await
        .unwrap();
    let code = server.post_unique("alice").await.unwrap();
    assert_eq!(code.remaining_uses, 1);

    let response = server.claim("bob", &code.id).await.unwrap();
    let claimed: CodeItem = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(claimed.remaining_uses, 0);

    assert!(server
        .list("carol")
        .await
        .unwrap()
        .iter()
        .all(|c| c.id != code.id));

    let response = server.claim("carol", &code.id).await.unwrap();
    let body = assert_error(response, StatusCode::CONFLICT, "EXHAUSTED")
        .await
        .unwrap();
    assert_eq!(body.error.kind, "Exhausted");

    // The core code is free to post again once the old one is used up
    let response = server.post_code("dave", &code.content).await.unwrap();
    assert_status(response, StatusCode::CREATED).await.unwrap();
}

#[tokio::test]
async fn test_concurrent_claims() {
    let server = TestServer::start_with(&[("INITIAL_USES", "5")])
        .await
        .unwrap();
    let code = server.post_unique("alice").await.unwrap();

    let attempts = (0..20).map(|n| {
        let server = &server;
        let id = code.id.clone();
        async move {
            server
                .claim(&format!("claimer-{n}"), &id)
                .await
                .unwrap()
                .status()
        }
    });
    let statuses = join_all(attempts).await;

    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    let conflicts = statuses
        .iter()
        .filter(|s| **s == StatusCode::CONFLICT)
        .count();
    assert_eq!(ok, 5);
    assert_eq!(conflicts, 15);

    // Uses never go below zero
    let response = server.claim("late", &code.id).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "EXHAUSTED")
        .await
        .unwrap();
}

// ============================================================================
// Listing Tests
// ============================================================================

#[tokio::test]
async fn test_list_limit() {
    let server = TestServer::start().await.unwrap();
    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(server.post_unique("alice").await.unwrap().id);
    }

    let response = server.get_as("/api/codes?limit=2", "bob").await.unwrap();
    let listed: Vec<CodeItem> = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(listed.len(), 2);
    assert!(listed.iter().all(|c| ids[1..].contains(&c.id)));

    let response = server.get_as("/api/codes?limit=0", "bob").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();

    let response = server.get_as("/api/codes?limit=101", "bob").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();

    let response = server.get_as("/api/codes?limit=many", "bob").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "INVALID_QUERY_PARAMETER")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_limit_uses_configured_cap() {
    let server = TestServer::start_with(&[("MAX_LIST_LIMIT", "200")])
        .await
        .unwrap();

    let response = server.get_as("/api/codes?limit=150", "bob").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = server.get_as("/api/codes?limit=201", "bob").await.unwrap();
    assert_error(response, StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_listing_reflects_claims() {
    let server = TestServer::start().await.unwrap();
    let code = server.post_unique("alice").await.unwrap();

    // Warm the shared listing cache
    server.list("bob").await.unwrap();

    let response = server.claim("bob", &code.id).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let listed = server.list("carol").await.unwrap();
    let seen = listed.iter().find(|c| c.id == code.id).unwrap();
    assert_eq!(seen.remaining_uses, 9);
    assert!(!seen.already_used);
}

// ============================================================================
// PostgreSQL
// ============================================================================

#[tokio::test]
async fn postgres_claim_flow() {
    let Some(server) = TestServer::start_postgres().await.unwrap() else {
        return;
    };
    let owner = unique_user();
    let claimant = unique_user();

    let response = server.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let code = server.post_unique(&owner).await.unwrap();
    assert_eq!(code.remaining_uses, 10);

    let response = server.claim(&owner, &code.id).await.unwrap();
    assert_error(response, StatusCode::FORBIDDEN, "OWN_CODE")
        .await
        .unwrap();

    let response = server.claim(&claimant, &code.id).await.unwrap();
    let claimed: CodeItem = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(claimed.remaining_uses, 9);

    let response = server.claim(&claimant, &code.id).await.unwrap();
    assert_error(response, StatusCode::CONFLICT, "ALREADY_CLAIMED")
        .await
        .unwrap();

    let response = server
        .post_code(&unique_user(), &code.content)
        .await
        .unwrap();
    assert_error(response, StatusCode::CONFLICT, "DUPLICATE")
        .await
        .unwrap();

    let response = server.get_as("/api/user/stats", &claimant).await.unwrap();
    let stats: Stats = assert_json(response, StatusCode::OK).await.unwrap();
    assert_eq!(stats.today_claim_count, 1);
}

#[tokio::test]
async fn postgres_concurrent_claims() {
    let Some(server) = TestServer::start_postgres().await.unwrap() else {
        return;
    };
    let code = server.post_unique(&unique_user()).await.unwrap();

    let claimers: Vec<String> = (0..15).map(|_| unique_user()).collect();
    let attempts = claimers.iter().map(|user| {
        let server = &server;
        let id = code.id.clone();
        async move { server.claim(user, &id).await.unwrap().status() }
    });
    let statuses = join_all(attempts).await;

    let ok = statuses.iter().filter(|s| **s == StatusCode::OK).count();
    assert_eq!(ok, 10);
    assert!(statuses
        .iter()
        .filter(|s| **s != StatusCode::OK)
        .all(|s| *s == StatusCode::CONFLICT));
}
