//! GitHub REST API client.
//!
//! Fetches repository metadata for the document generator and runs
//! repository searches built by `proposalgen_core::SearchQuery`. Requests
//! are one-shot: no retries, caching, or ranking of our own.

mod search;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};
use url::Url;

use proposalgen_core::ProjectModel;
use proposalgen_shared::{
    ApiError, GitHubConfig, ProposalGenError, Result, ValidationError, resolve_token,
};

pub use search::SearchParams;

/// Media type requested from the API.
const ACCEPT_GITHUB_V3: &str = "application/vnd.github.v3+json";

/// User-Agent string (the API rejects requests without one).
const USER_AGENT: &str = concat!("proposalgen/", env!("CARGO_PKG_VERSION"));

/// Default API endpoint.
const DEFAULT_API_URL: &str = "https://api.github.com";

/// Default timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Client options
// ---------------------------------------------------------------------------

/// Connection settings for [`GitHubClient`].
#[derive(Debug, Clone)]
pub struct GitHubOptions {
    /// API root, e.g. `https://api.github.com`.
    pub base_url: Url,
    /// Personal access token; `None` for anonymous access.
    pub token: Option<String>,
    /// Timeout for HTTP requests in seconds.
    pub timeout_secs: u64,
}

impl Default for GitHubOptions {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL"),
            token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GitHubOptions {
    /// Resolve options from the `[github]` config section and its token env var.
    pub fn from_config(config: &GitHubConfig) -> Result<Self> {
        Ok(Self {
            base_url: config.base_url()?,
            token: resolve_token(config),
            timeout_secs: config.timeout_secs,
        })
    }
}

// ---------------------------------------------------------------------------
// GitHubClient
// ---------------------------------------------------------------------------

/// Thin async wrapper over the endpoints the generator needs.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    client: Client,
    base_url: String,
}

impl GitHubClient {
    /// Build a client with auth and accept headers preset.
    pub fn new(opts: &GitHubOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_GITHUB_V3));

        if let Some(token) = &opts.token {
            let mut value = HeaderValue::from_str(&format!("token {token}"))
                .map_err(|e| ProposalGenError::config(format!("invalid API token: {e}")))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(Duration::from_secs(opts.timeout_secs))
            .build()
            .map_err(|e| ApiError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: opts.base_url.as_str().trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the raw repository object for `owner/repo`.
    ///
    /// Identifiers without a `/` are rejected before any request is made.
    #[instrument(skip(self))]
    pub async fn fetch_repository(&self, repo: &str) -> Result<Map<String, Value>> {
        let repo = repo.trim();
        if !repo.contains('/') {
            return Err(ValidationError::RepoId {
                value: repo.to_string(),
            }
            .into());
        }

        let url = format!("{}/repos/{repo}", self.base_url);
        info!(%url, "fetching repository");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = check_status(response, Some(repo)).await?;
        let data = response
            .json::<Map<String, Value>>()
            .await
            .map_err(|e| ProposalGenError::parse(format!("{url}: invalid JSON body: {e}")))?;

        debug!(keys = data.len(), "repository payload received");
        Ok(data)
    }

    /// Fetch and model a repository in one step.
    pub async fn fetch_project(&self, repo: &str) -> Result<ProjectModel> {
        let data = self.fetch_repository(repo).await?;
        ProjectModel::from_api_response(data)
    }

    /// Whether `owner/repo` can be fetched. Any failure counts as absent.
    pub async fn repository_exists(&self, repo: &str) -> bool {
        match self.fetch_repository(repo).await {
            Ok(_) => true,
            Err(e) => {
                debug!(repo, error = %e, "repository not reachable");
                false
            }
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a non-success status to the matching [`ApiError`].
///
/// `not_found` names the repository to report on 404; without it a 404 is
/// treated like any other failure status.
pub(crate) async fn check_status(
    response: Response,
    not_found: Option<&str>,
) -> std::result::Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!(%status, url = %response.url(), "API request failed");

    match (status, not_found) {
        (StatusCode::NOT_FOUND, Some(repo)) => Err(ApiError::NotFound {
            repo: repo.to_string(),
        }),
        (StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS, _) => Err(ApiError::RateLimited),
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::Other {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, token: Option<&str>) -> GitHubClient {
        let opts = GitHubOptions {
            base_url: Url::parse(&server.uri()).unwrap(),
            token: token.map(String::from),
            timeout_secs: 5,
        };
        GitHubClient::new(&opts).unwrap()
    }

    fn repo_fixture() -> String {
        std::fs::read_to_string("../../../fixtures/json/repository.fixture.json")
            .expect("read repository fixture")
    }

    #[test]
    fn default_options_point_at_public_api() {
        let opts = GitHubOptions::default();
        assert_eq!(opts.base_url.as_str(), "https://api.github.com/");
        assert!(opts.token.is_none());
        assert_eq!(opts.timeout_secs, 30);
    }

    #[test]
    fn options_from_config() {
        let config = GitHubConfig {
            api_url: "https://ghe.example.com/api/v3/".into(),
            token_env: "PG_TEST_NONEXISTENT_TOKEN_67890".into(),
            timeout_secs: 7,
        };
        let opts = GitHubOptions::from_config(&config).unwrap();
        let client = GitHubClient::new(&opts).unwrap();
        assert_eq!(
            client.endpoint("/repos/a/b"),
            "https://ghe.example.com/api/v3/repos/a/b"
        );
        assert!(opts.token.is_none());
        assert_eq!(opts.timeout_secs, 7);
    }

    #[tokio::test]
    async fn fetch_repository_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/facebook/react"))
            .and(header("accept", ACCEPT_GITHUB_V3))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(repo_fixture(), "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let data = client.fetch_repository("facebook/react").await.unwrap();
        assert_eq!(data["name"], "react");
        assert_eq!(data["language"], "JavaScript");

        let project = ProjectModel::from_api_response(data).unwrap();
        assert_eq!(project.full_name, "facebook/react");
    }

    #[tokio::test]
    async fn token_sent_as_authorization_header() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/user/test-repo"))
            .and(header("authorization", "token secret-123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "test-repo",
                "full_name": "user/test-repo",
                "stargazers_count": 100,
                "forks_count": 20
            })))
            .mount(&server)
            .await;

        let client = client_for(&server, Some("secret-123"));
        let project = client.fetch_project("user/test-repo").await.unwrap();
        assert_eq!(project.star_count, 100);
        assert_eq!(project.fork_count, 20);
    }

    #[tokio::test]
    async fn invalid_identifier_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_repository("invalid-format").await.unwrap_err();
        assert!(matches!(
            err,
            ProposalGenError::Validation(ValidationError::RepoId { .. })
        ));
        assert!(!client.repository_exists("invalid-format").await);
    }

    #[tokio::test]
    async fn not_found_maps_to_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/user/nonexistent-repo"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client
            .fetch_repository("user/nonexistent-repo")
            .await
            .unwrap_err();
        match err {
            ProposalGenError::Api(ApiError::NotFound { repo }) => {
                assert_eq!(repo, "user/nonexistent-repo");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
        assert!(!client.repository_exists("user/nonexistent-repo").await);
    }

    #[tokio::test]
    async fn forbidden_maps_to_rate_limited() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/user/test-repo"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_repository("user/test-repo").await.unwrap_err();
        assert!(matches!(err, ProposalGenError::Api(ApiError::RateLimited)));
        assert!(err.to_string().contains("rate limit"));
    }

    #[tokio::test]
    async fn other_status_keeps_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/user/test-repo"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        let err = client.fetch_repository("user/test-repo").await.unwrap_err();
        match err {
            ProposalGenError::Api(ApiError::Other { status, body }) => {
                assert_eq!(status, 502);
                assert_eq!(body, "bad gateway");
            }
            other => panic!("expected Other, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn unreachable_host_is_network_error() {
        let opts = GitHubOptions {
            // Port 9 (discard) on loopback refuses connections.
            base_url: Url::parse("http://127.0.0.1:9").unwrap(),
            token: None,
            timeout_secs: 2,
        };
        let client = GitHubClient::new(&opts).unwrap();
        let err = client.fetch_repository("user/test-repo").await.unwrap_err();
        assert!(matches!(err, ProposalGenError::Api(ApiError::Network(_))));
    }
}
