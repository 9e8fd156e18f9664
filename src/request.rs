use std::time::Duration;

use log::error;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

use crate::account::{AccountName, Region};
use crate::error::AuthError;

const API_CONFIG_PATH: &str = "api/credentials/spotify_api_config";
const ACCOUNT_PATH: &str = "api/credentials/spotify";
const CONFIG_TIMEOUT: Duration = Duration::from_secs(10);

/// Spotify API client credentials as held by the Spotizerr server.
///
/// The server's JSON is kept as-is: any value that is not null, `false`, zero
/// or empty counts as set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub client_id: Option<Value>,
    #[serde(default)]
    pub client_secret: Option<Value>,
}

impl ApiConfig {
    pub fn new(client_id: &str, client_secret: &str) -> ApiConfig {
        ApiConfig {
            client_id: Some(Value::from(client_id)),
            client_secret: Some(Value::from(client_secret)),
        }
    }

    pub fn is_configured(&self) -> bool {
        let set = |v: &Option<Value>| v.as_ref().is_some_and(is_set);
        set(&self.client_id) && set(&self.client_secret)
    }
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Body of the account registration call.
#[derive(Debug, Serialize)]
pub struct Registration<'a> {
    pub region: &'a str,
    pub blob_content: &'a serde_json::Value,
}

#[derive(thiserror::Error, Debug)]
pub enum RequestError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: Url,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered with {status}")]
    Status {
        url: Url,
        status: StatusCode,
        body: String,
    },

    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: Url,
        #[source]
        source: serde_json::Error,
    },
}

impl RequestError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            RequestError::Transport { source, .. } => source.status(),
            RequestError::Decode { .. } => None,
        }
    }

    /// Logs the status and body of the failed response, if there was one.
    /// JSON bodies are pretty-printed, anything else is logged verbatim.
    pub fn log_details(&self) {
        if let Some(status) = self.status() {
            error!("Response status: {}", status.as_u16());
        }
        if let RequestError::Status { body, .. } = self {
            match serde_json::from_str::<serde_json::Value>(body) {
                Ok(json) => error!(
                    "Response body: {}",
                    serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.clone())
                ),
                Err(_) => error!("Response body: {body}"),
            }
        }
    }
}

type Result<T> = std::result::Result<T, RequestError>;

/// Client for the parts of the Spotizerr HTTP API this tool needs.
#[derive(Debug, Clone)]
pub struct SpotizerrClient {
    http: reqwest::Client,
    base_url: Url,
}

impl SpotizerrClient {
    pub fn new(base_url: &str) -> std::result::Result<SpotizerrClient, AuthError> {
        let base_url = Url::parse(base_url).map_err(|source| AuthError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AuthError::InvalidBaseUrl {
                url: base_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            });
        }

        Ok(SpotizerrClient {
            http: reqwest::Client::new(),
            base_url,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn api_config_url(&self) -> Url {
        self.endpoint(API_CONFIG_PATH.split('/'))
    }

    pub fn account_url(&self, account: &AccountName) -> Url {
        self.endpoint(ACCOUNT_PATH.split('/').chain([account.as_str()]))
    }

    pub async fn api_config(&self) -> Result<ApiConfig> {
        let url = self.api_config_url();
        let response = send(
            self.http.get(url.clone()).timeout(CONFIG_TIMEOUT),
            &url,
        )
        .await?;
        // Only 4xx and 5xx count as failures when reading the configuration.
        let response = error_for_status(response, &url, |status| status.as_u16() < 400).await?;
        let text = response
            .text()
            .await
            .map_err(|source| RequestError::Transport {
                url: url.clone(),
                source,
            })?;

        serde_json::from_str(&text).map_err(|source| RequestError::Decode { url, source })
    }

    pub async fn put_api_config(&self, config: &ApiConfig) -> Result<()> {
        let url = self.api_config_url();
        let response = send(
            self.http
                .put(url.clone())
                .timeout(CONFIG_TIMEOUT)
                .json(config),
            &url,
        )
        .await?;
        error_for_status(response, &url, StatusCode::is_success).await?;
        Ok(())
    }

    /// Registers or replaces the account. Returns the response body.
    pub async fn register_account(
        &self,
        account: &AccountName,
        region: &Region,
        blob: &serde_json::Value,
    ) -> Result<String> {
        let url = self.account_url(account);
        let registration = Registration {
            region: region.as_str(),
            blob_content: blob,
        };
        let response = send(self.http.post(url.clone()).json(&registration), &url).await?;
        let response = error_for_status(response, &url, StatusCode::is_success).await?;

        response
            .text()
            .await
            .map_err(|source| RequestError::Transport { url, source })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

async fn send(request: RequestBuilder, url: &Url) -> Result<Response> {
    request.send().await.map_err(|source| RequestError::Transport {
        url: url.clone(),
        source,
    })
}

async fn error_for_status(
    response: Response,
    url: &Url,
    accept: fn(&StatusCode) -> bool,
) -> Result<Response> {
    let status = response.status();
    if accept(&status) {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RequestError::Status {
        url: url.clone(),
        status,
        body,
    })
}
