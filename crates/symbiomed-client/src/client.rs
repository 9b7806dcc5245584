use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use symbiomed_core::{
    DualCodeRequest, DualCodeValidation, LookupResult, MappingView, ProblemListEntry,
    SearchResult, SearchScope, TerminologySystem, TranslateOutcome, TranslateRequest,
    ValidateCodeRequest, ValidateCodeResult, decode_expansion, merge_system_results,
};

use crate::error::{ClientError, Result};

pub const DEFAULT_BASE_URL: &str = "https://symbiomed.onrender.com";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Overall request timeout. `None` leaves it to the transport default.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Client for the SymbioMed FHIR terminology API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct TerminologyClient {
    http: reqwest::Client,
    base_url: String,
}

impl TerminologyClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ClientError::Transport)?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn fhir_url(&self, path: &str) -> String {
        format!("{}/fhir/{}", self.base_url, path)
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        tracing::debug!(%method, url, "terminology request");
        self.http
            .request(method, url)
            .header("Accept", "application/fhir+json, application/json")
    }

    async fn get_json<Q: Serialize + ?Sized>(&self, path: &str, query: &Q) -> Result<Value> {
        let url = self.fhir_url(path);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .query(query)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        handle_response(resp).await
    }

    async fn post_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value> {
        let url = self.fhir_url(path);
        let resp = self
            .request(reqwest::Method::POST, &url)
            .json(body)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        handle_response(resp).await
    }

    /// `ValueSet/$expand` filtered by `filter`
    pub async fn expand(&self, value_set_url: &str, filter: &str) -> Result<Vec<SearchResult>> {
        let body = self
            .get_json(
                "ValueSet/$expand",
                &[("url", value_set_url), ("filter", filter)],
            )
            .await?;
        Ok(decode_expansion(&body))
    }

    /// Search one system; results are tagged with that system
    pub async fn search_system(
        &self,
        system: TerminologySystem,
        term: &str,
    ) -> Result<Vec<SearchResult>> {
        let results = self.expand(&system.value_set_url(), term).await?;
        Ok(results.into_iter().map(|r| r.tagged(system)).collect())
    }

    /// Search every system in `scope` concurrently and merge the results.
    ///
    /// A blank term returns no results without contacting the server. With
    /// several systems, individual failures are dropped silently and only a
    /// failure of all of them is reported. A single-system scope reports the
    /// underlying error directly.
    pub async fn search(
        &self,
        scope: SearchScope,
        term: &str,
        cap: Option<usize>,
    ) -> Result<Vec<SearchResult>> {
        let term = term.trim();
        if term.is_empty() {
            return Ok(Vec::new());
        }

        let cap = cap.unwrap_or(usize::MAX);
        if let SearchScope::One(system) = scope {
            let mut results = self.search_system(system, term).await?;
            results.truncate(cap);
            return Ok(results);
        }

        let systems = scope.systems();
        let outcomes = join_all(systems.iter().map(|&system| async move {
            (system, self.expand(&system.value_set_url(), term).await)
        }))
        .await;

        Ok(merge_system_results(outcomes, cap)?)
    }

    /// `CodeSystem/$lookup`
    pub async fn lookup(&self, system_url: &str, code: &str) -> Result<LookupResult> {
        let body = self
            .get_json("CodeSystem/$lookup", &[("system", system_url), ("code", code)])
            .await?;
        Ok(LookupResult::from_json(&body))
    }

    /// `ConceptMap/$translate`; any non-2xx status is an error
    pub async fn translate(&self, request: &TranslateRequest) -> Result<TranslateOutcome> {
        let body = self
            .get_json("ConceptMap/$translate", &request.query_pairs())
            .await?;
        Ok(TranslateOutcome::from_json(&body))
    }

    /// `ConceptMap/$translate` reduced to what the mapping screen shows.
    ///
    /// Never fails: transport and status errors become [`MappingView::Error`].
    pub async fn translate_view(&self, request: &TranslateRequest) -> MappingView {
        let url = self.fhir_url("ConceptMap/$translate");
        let resp = match self
            .request(reqwest::Method::GET, &url)
            .query(&request.query_pairs())
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return MappingView::from_error(ClientError::Transport(e).to_string()),
        };

        let status = resp.status().as_u16();
        if !resp.status().is_success() {
            tracing::warn!(status, code = %request.code, "translate returned an error status");
            return MappingView::from_response(status, None);
        }
        let body = match resp.text().await {
            Ok(body) => body,
            Err(e) => return MappingView::from_error(ClientError::Transport(e).to_string()),
        };
        let json = serde_json::from_str::<Value>(&body).ok();
        MappingView::from_response(status, json.as_ref())
    }

    /// `ValueSet/$validate-code` with query parameters
    pub async fn validate_code_get(
        &self,
        request: &ValidateCodeRequest,
    ) -> Result<ValidateCodeResult> {
        let body = self
            .get_json("ValueSet/$validate-code", &request.query_pairs())
            .await?;
        Ok(ValidateCodeResult::from_json(&body))
    }

    /// `ValueSet/$validate-code` with a JSON body
    pub async fn validate_code_post(
        &self,
        request: &ValidateCodeRequest,
    ) -> Result<ValidateCodeResult> {
        let body = self.post_json("ValueSet/$validate-code", request).await?;
        Ok(ValidateCodeResult::from_json(&body))
    }

    pub async fn get_bundle(&self) -> Result<Value> {
        self.get_json("bundle", &[] as &[(&str, &str)]).await
    }

    /// Upload a Bundle given as raw JSON text.
    ///
    /// The text is parsed locally first; malformed JSON never reaches the
    /// server.
    pub async fn upload_bundle(&self, raw: &str) -> Result<Value> {
        let bundle: Value = serde_json::from_str(raw).map_err(ClientError::InvalidJson)?;
        self.post_json("bundle/upload", &bundle).await
    }

    /// Create a Condition from a problem-list entry; returns the created resource
    pub async fn ingest_problem_list(&self, entry: &ProblemListEntry) -> Result<Value> {
        entry.validate()?;
        self.post_json("ingest/problem-list", entry).await
    }

    pub async fn validate_dual_code(&self, request: &DualCodeRequest) -> Result<DualCodeValidation> {
        request.validate()?;
        let body = self.post_json("validate/dual-code", request).await?;
        Ok(DualCodeValidation::from_json(body))
    }

    /// `GET /health`; returns the status code and raw body
    pub async fn health(&self) -> Result<(u16, String)> {
        let url = format!("{}/health", self.base_url);
        let resp = self
            .request(reqwest::Method::GET, &url)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(ClientError::Transport)?;
        Ok((status, body))
    }
}

async fn handle_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();

    if !status.is_success() {
        // The status is the error; an unreadable body only loses the detail
        let body = resp.text().await.unwrap_or_default();
        return Err(ClientError::status(status.as_u16(), error_message(status, &body)));
    }

    let body = resp.text().await.map_err(ClientError::Transport)?;

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&body).map_err(ClientError::Decode)
}

/// Prefer OperationOutcome diagnostics, then the raw body, then the reason phrase
fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body)
        && json.get("resourceType").and_then(|v| v.as_str()) == Some("OperationOutcome")
        && let Some(issues) = json.get("issue").and_then(|v| v.as_array())
    {
        let msgs: Vec<&str> = issues
            .iter()
            .filter_map(|i| i.get("diagnostics").and_then(|d| d.as_str()))
            .collect();
        if !msgs.is_empty() {
            return msgs.join("; ");
        }
    }

    if !body.trim().is_empty() {
        return body.trim().to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_trimmed() {
        let client = TerminologyClient::new(ClientConfig::new("http://localhost:8080/")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(
            client.fhir_url("ValueSet/$expand"),
            "http://localhost:8080/fhir/ValueSet/$expand"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = TerminologyClient::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_message_prefers_operation_outcome() {
        let body = r#"{"resourceType":"OperationOutcome","issue":[{"diagnostics":"Unknown code"},{"diagnostics":"Try again"}]}"#;
        assert_eq!(
            error_message(reqwest::StatusCode::BAD_REQUEST, body),
            "Unknown code; Try again"
        );
        assert_eq!(
            error_message(reqwest::StatusCode::SERVICE_UNAVAILABLE, ""),
            "Service Unavailable"
        );
        assert_eq!(error_message(reqwest::StatusCode::BAD_GATEWAY, " upstream down "), "upstream down");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.timeout.is_none());
        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Some(Duration::from_secs(5)));
    }
}
