//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and making HTTP requests
//! as a given board user.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use codeboard_api::{create_app, create_app_state};
use codeboard_common::AppConfig;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::{CodeItem, CreateCodeRequest, ErrorBody};

/// Identity header understood by the board
pub const USER_HEADER: &str = "x-user-id";

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on the in-memory backend
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config(&[])?).await
    }

    /// Start a server on the in-memory backend with extra variables
    pub async fn start_with(overrides: &[(&str, &str)]) -> Result<Self> {
        Self::start_with_config(test_config(overrides)?).await
    }

    /// Start a server on PostgreSQL, or `None` when DATABASE_URL is unset
    pub async fn start_postgres() -> Result<Option<Self>> {
        dotenvy::dotenv().ok();
        let Ok(url) = std::env::var("DATABASE_URL") else {
            eprintln!("Skipping test: DATABASE_URL not set");
            return Ok(None);
        };

        let config = test_config(&[("STORAGE_BACKEND", "postgres"), ("DATABASE_URL", &url)])?;
        Ok(Some(Self::start_with_config(config).await?))
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_app_state(config).await?;
        let app = create_app(state)?;

        // Port 0 lets the OS pick a free port
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request without identity
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a GET request as `user`
    pub async fn get_as(&self, path: &str, user: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .get(&url)
            .header(USER_HEADER, user)
            .send()
            .await?)
    }

    /// Make a POST request with JSON body as `user`
    pub async fn post_as<T: Serialize>(&self, path: &str, user: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header(USER_HEADER, user)
            .json(body)
            .send()
            .await?)
    }

    /// Make a bodiless POST request as `user`
    pub async fn post_empty_as(&self, path: &str, user: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self
            .client
            .post(&url)
            .header(USER_HEADER, user)
            .send()
            .await?)
    }

    // === Board shortcuts ===

    pub async fn post_code(&self, user: &str, content: &str) -> Result<Response> {
        self.post_as("/api/codes", user, &CreateCodeRequest::new(content))
            .await
    }

    /// Post a fresh unique code and return it
    pub async fn post_unique(&self, user: &str) -> Result<CodeItem> {
        let response = self
            .post_as("/api/codes", user, &CreateCodeRequest::unique())
            .await?;
        assert_json(response, StatusCode::CREATED).await
    }

    pub async fn claim(&self, user: &str, code_id: &str) -> Result<Response> {
        self.post_empty_as(&format!("/api/codes/{code_id}/claim"), user)
            .await
    }

    pub async fn list(&self, user: &str) -> Result<Vec<CodeItem>> {
        assert_json(self.get_as("/api/codes", user).await?, StatusCode::OK).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// In-memory configuration with a rate limit tests never hit
pub fn test_config(overrides: &[(&str, &str)]) -> Result<AppConfig> {
    let mut vars: HashMap<String, String> = [
        ("API_HOST", "127.0.0.1"),
        ("API_PORT", "0"),
        ("STORAGE_BACKEND", "memory"),
        ("RATE_LIMIT_REQUESTS_PER_SECOND", "10000"),
        ("RATE_LIMIT_BURST", "10000"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    AppConfig::from_lookup(|key| vars.get(key).cloned())
        .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(())
}

/// Assert an error response and return its detail
pub async fn assert_error(
    response: Response,
    expected_status: StatusCode,
    expected_code: &str,
) -> Result<ErrorBody> {
    let body: ErrorBody = assert_json(response, expected_status).await?;
    if body.error.code != expected_code {
        anyhow::bail!(
            "Expected error code {expected_code}, got {} ({})",
            body.error.code,
            body.error.message
        );
    }
    Ok(body)
}
