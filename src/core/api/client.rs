use std::collections::HashSet;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::core::api::endpoint::normalize_base_url;
use crate::core::api::error::ApiError;
use crate::core::models::alert::{AlertThreshold, AmountRequest};
use crate::core::models::budget::{Budget, BudgetSummary};
use crate::core::models::cost::CostEntry;
use crate::core::models::optimization::{GenerateResult, Optimization, OptimizationSummary};

pub const DEFAULT_SKIP: u32 = 0;
pub const DEFAULT_LIMIT: u32 = 100;

/// Typed client for the Cloud Cost Insight REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        action: &'static str,
    ) -> Result<reqwest::Response, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|source| ApiError::Transport { action, source })?;
        debug!(action, status = response.status().as_u16(), "api response");
        Ok(response)
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
        action: &'static str,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::RequestFailed {
                action,
                status: status.as_u16(),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Transport { action, source })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        action: &'static str,
    ) -> Result<T, ApiError> {
        let response = self.send(self.http.get(self.url(path)), action).await?;
        Self::decode(response, action).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&AmountRequest>,
        action: &'static str,
    ) -> Result<T, ApiError> {
        let mut request = self.http.post(self.url(path));
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = self.send(request, action).await?;
        Self::decode(response, action).await
    }

    /// `GET /costs/?skip=&limit=`
    pub async fn fetch_costs(&self, skip: u32, limit: u32) -> Result<Vec<CostEntry>, ApiError> {
        let action = "fetch costs";
        let request = self
            .http
            .get(self.url("/costs/"))
            .query(&[("skip", skip), ("limit", limit)]);
        let response = self.send(request, action).await?;
        Self::decode(response, action).await
    }

    /// Page through `/costs/` until the server returns a short page.
    ///
    /// Also stops when a full page carries only ids already seen (a server
    /// that ignores `skip`) or when `skip` would overflow.
    pub async fn fetch_all_costs(&self, page_size: u32) -> Result<Vec<CostEntry>, ApiError> {
        let page_size = page_size.max(1);
        let mut all = Vec::new();
        let mut seen: HashSet<i64> = HashSet::new();
        let mut skip = 0u32;
        loop {
            let page = self.fetch_costs(skip, page_size).await?;
            let count = page.len();
            let fresh: Vec<CostEntry> = page.into_iter().filter(|c| seen.insert(c.id)).collect();
            if count > 0 && fresh.is_empty() {
                warn!(skip, "cost page repeated earlier entries, stopping pagination");
                break;
            }
            all.extend(fresh);
            if count < page_size as usize {
                break;
            }
            skip = match skip.checked_add(page_size) {
                Some(next) => next,
                None => break,
            };
        }
        debug!(entries = all.len(), "fetched all cost pages");
        Ok(all)
    }

    /// `GET /alerts/`. A 404 means no threshold is configured yet and yields
    /// [`AlertThreshold::unset`] instead of an error.
    pub async fn fetch_alert_threshold(&self) -> Result<AlertThreshold, ApiError> {
        let action = "fetch alert threshold";
        let response = self.send(self.http.get(self.url("/alerts/")), action).await?;
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            debug!("no alert threshold configured");
            return Ok(AlertThreshold::unset());
        }
        Self::decode(response, action).await
    }

    /// `POST /alerts/`
    pub async fn set_alert_threshold(&self, amount: f64) -> Result<AlertThreshold, ApiError> {
        self.post_json(
            "/alerts/",
            Some(&AmountRequest { amount }),
            "set alert threshold",
        )
        .await
    }

    /// `GET /budget/`
    pub async fn fetch_budget(&self) -> Result<BudgetSummary, ApiError> {
        self.get_json("/budget/", "fetch budget").await
    }

    /// `POST /budget/`
    pub async fn set_budget(&self, amount: f64) -> Result<Budget, ApiError> {
        self.post_json("/budget/", Some(&AmountRequest { amount }), "set budget")
            .await
    }

    /// `GET /optimization/`
    pub async fn fetch_optimizations(&self) -> Result<OptimizationSummary, ApiError> {
        self.get_json("/optimization/", "fetch optimizations").await
    }

    /// `POST /optimization/{id}/apply`
    pub async fn apply_optimization(&self, id: i64) -> Result<Optimization, ApiError> {
        self.post_json(
            &format!("/optimization/{}/apply", id),
            None,
            "apply optimization",
        )
        .await
    }

    /// `POST /optimization/{id}/ignore`
    pub async fn ignore_optimization(&self, id: i64) -> Result<Optimization, ApiError> {
        self.post_json(
            &format!("/optimization/{}/ignore", id),
            None,
            "ignore optimization",
        )
        .await
    }

    /// `POST /optimization/generate`
    pub async fn generate_optimizations(&self) -> Result<GenerateResult, ApiError> {
        self.post_json("/optimization/generate", None, "generate optimizations")
            .await
    }
}
