//! REST client for the filter-options service.

use std::time::Duration;

use futures_util::FutureExt;
use futures_util::future::{self, BoxFuture};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{StatusCode, Url};
use ucu_model::{FilterOptions, OptionScope};

use super::source::OptionsSource;
use super::wire::FilterOptionsResponse;
use crate::auth::TokenProvider;
use crate::error::LoadError;

/// Path of the options endpoint below the API base URL.
pub const FILTER_OPTIONS_PATH: &str = "/api/analytics/filter-options";

/// User agent string for API requests.
const USER_AGENT_VALUE: &str = concat!("ucu-filters/", env!("CARGO_PKG_VERSION"));

/// Fetches option lists over HTTP with a bearer token.
#[derive(Debug, Clone)]
pub struct HttpOptionsSource<T> {
    client: reqwest::Client,
    endpoint: Url,
    tokens: T,
}

impl<T: TokenProvider> HttpOptionsSource<T> {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Arguments
    /// * `base_url` - API root, e.g. `https://analytics.example.ac.ug`
    /// * `tokens` - supplies the bearer token for each request
    /// * `timeout` - overall request timeout
    pub fn new(base_url: &str, tokens: T, timeout: Duration) -> Result<Self, LoadError> {
        let endpoint = format!("{}{FILTER_OPTIONS_PATH}", base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&endpoint)
            .map_err(|e| LoadError::Network(format!("invalid API base URL '{base_url}': {e}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| LoadError::Network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint,
            tokens,
        })
    }

    /// Full request URL for `scope`.
    pub fn url_for(&self, scope: &OptionScope) -> Url {
        let mut url = self.endpoint.clone();
        let pairs = scope.query_pairs();
        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }
        url
    }
}

impl<T: TokenProvider> OptionsSource for HttpOptionsSource<T> {
    fn fetch(&self, scope: &OptionScope) -> BoxFuture<'static, Result<FilterOptions, LoadError>> {
        let Some(token) = self.tokens.token() else {
            return future::ready(Err(LoadError::MissingToken)).boxed();
        };

        let url = self.url_for(scope);
        tracing::debug!("Fetching filter options from {}", url);
        let request = self.client.get(url).bearer_auth(token);

        async move {
            let response = request
                .send()
                .await
                .map_err(|e| LoadError::Network(e.to_string()))?;
            handle_response(response).await
        }
        .boxed()
    }
}

/// Checks the status and decodes the body.
async fn handle_response(response: reqwest::Response) -> Result<FilterOptions, LoadError> {
    let status = response.status();

    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(LoadError::Unauthorized {
            status: status.as_u16(),
        });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(LoadError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| LoadError::Network(e.to_string()))?;
    let decoded: FilterOptionsResponse =
        serde_json::from_slice(&bytes).map_err(|e| LoadError::Decode(e.to_string()))?;

    Ok(decoded.into_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use ucu_model::FilterValue;

    fn source() -> HttpOptionsSource<StaticToken> {
        HttpOptionsSource::new(
            "https://analytics.example.ac.ug/",
            StaticToken::new("secret"),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_root_scope_has_no_query() {
        let url = source().url_for(&OptionScope::root());
        assert_eq!(
            url.as_str(),
            "https://analytics.example.ac.ug/api/analytics/filter-options"
        );
    }

    #[test]
    fn test_scope_becomes_query_parameters() {
        let scope = OptionScope {
            faculty_id: Some(FilterValue::from(3)),
            department_id: Some(FilterValue::from(14)),
        };
        let url = source().url_for(&scope);
        assert_eq!(url.query(), Some("faculty_id=3&department_id=14"));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpOptionsSource::new("not a url", StaticToken::none(), Duration::from_secs(1));
        assert!(matches!(result, Err(LoadError::Network(_))));
    }

    #[tokio::test]
    async fn test_missing_token_fails_without_request() {
        let source = HttpOptionsSource::new(
            "http://127.0.0.1:9",
            StaticToken::none(),
            Duration::from_secs(1),
        )
        .unwrap();
        let result = source.fetch(&OptionScope::root()).await;
        assert_eq!(result, Err(LoadError::MissingToken));
    }
}
