//! Shared HTTP plumbing for the upstream API clients

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};

use crate::config::HttpConfig;
use crate::error::Error;
use crate::Result;

/// Build a reqwest client from HTTP settings
pub(crate) fn build_client(config: &HttpConfig) -> Result<Client> {
    Client::builder()
        .timeout(config.timeout)
        .user_agent(config.user_agent.clone())
        .build()
        .map_err(Error::from)
}

/// Issue a GET and return the response regardless of status
pub(crate) async fn get(client: &Client, url: &str) -> Result<Response> {
    debug!("GET {}", redact(url));
    let resp = client.get(url).send().await.map_err(strip_url)?;
    trace!("GET {} -> {}", redact(url), resp.status());
    Ok(resp)
}

/// Decode a JSON body, mapping non-2xx statuses to `UpstreamStatus`
pub(crate) async fn read_json<T: DeserializeOwned>(resp: Response, url: &str) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        return Err(Error::UpstreamStatus {
            status: status.as_u16(),
            url: redact(url),
        });
    }

    let body = resp.bytes().await.map_err(strip_url)?;
    Ok(serde_json::from_slice(&body)?)
}

pub(crate) async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T> {
    let resp = get(client, url).await?;
    read_json(resp, url).await
}

/// reqwest errors render the full request URL, query string included
fn strip_url(error: reqwest::Error) -> Error {
    Error::Http(error.without_url())
}

/// Append a query parameter, respecting an existing query string
pub(crate) fn append_query(url: &str, key: &str, value: &str) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{}{}{}={}", url, separator, key, urlencoding::encode(value))
}

/// Drop the query string so credentials never reach logs or errors
pub(crate) fn redact(url: &str) -> String {
    match url.find('?') {
        Some(idx) => url[..idx].to_string(),
        None => url.to_string(),
    }
}
