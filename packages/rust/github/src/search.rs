//! Repository search endpoint (`GET /search/repositories`).

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument, warn};

use proposalgen_core::{ProjectModel, SearchQuery};
use proposalgen_shared::{ApiError, ProposalGenError, Result, SearchConfig};

use crate::{GitHubClient, check_status};

/// Sorting and paging for a search request.
#[derive(Debug, Clone)]
pub struct SearchParams {
    /// Sort key, e.g. `stars`.
    pub sort: String,
    /// `asc` or `desc`.
    pub order: String,
    /// Maximum results returned.
    pub per_page: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self::from(&SearchConfig::default())
    }
}

impl From<&SearchConfig> for SearchParams {
    fn from(config: &SearchConfig) -> Self {
        Self {
            sort: config.sort.clone(),
            order: config.order.clone(),
            per_page: config.per_page,
        }
    }
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    total_count: u64,
    #[serde(default)]
    items: Vec<Map<String, Value>>,
}

impl GitHubClient {
    /// Run a repository search and model each hit.
    ///
    /// Ranking is the API's own. Items that fail to model are skipped.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn search_repositories(
        &self,
        query: &SearchQuery,
        params: &SearchParams,
    ) -> Result<Vec<ProjectModel>> {
        let url = self.endpoint("search/repositories");
        let q = query.to_string();
        let per_page = params.per_page.to_string();

        info!(%url, "searching repositories");

        let response = self
            .http()
            .get(&url)
            .query(&[
                ("q", q.as_str()),
                ("sort", params.sort.as_str()),
                ("order", params.order.as_str()),
                ("per_page", per_page.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let response = check_status(response, None).await?;
        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| ProposalGenError::parse(format!("{url}: invalid search response: {e}")))?;

        let projects: Vec<ProjectModel> = body
            .items
            .into_iter()
            .take(params.per_page as usize)
            .filter_map(|item| match ProjectModel::from_api_response(item) {
                Ok(project) => Some(project),
                Err(e) => {
                    warn!(error = %e, "skipping malformed search result");
                    None
                }
            })
            .collect();

        debug!(
            total = body.total_count,
            returned = projects.len(),
            "search complete"
        );
        Ok(projects)
    }
}
