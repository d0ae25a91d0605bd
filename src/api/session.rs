use super::{
    client::TableauClient,
    http_client::{self, SESSION_COOKIE},
};
use crate::error::{Error, Result};
use reqwest::{
    header::{self, HeaderMap},
    Method,
};
use serde_json::Value;
use tracing::warn;

/// The result of a conflict-tolerant write.
#[derive(Debug, Clone, PartialEq)]
pub enum PostOutcome<T> {
    Created(T),
    /// The server answered 409: the resource is already there.
    AlreadyExists,
}

impl<T> PostOutcome<T> {
    pub fn created(self) -> Option<T> {
        match self {
            PostOutcome::Created(value) => Some(value),
            PostOutcome::AlreadyExists => None,
        }
    }
}

/// A signed-in session scoped to a single site.
///
/// Obtained from `TableauClient::sign_in`. Every site-specific endpoint
/// lives on this type, so they cannot be called without a token and site id.
#[derive(Debug)]
pub struct Session {
    pub(crate) client: TableauClient,
    pub(crate) token: String,
    pub(crate) site_id: String,
    pub(crate) site_url: String,
    pub(crate) user_id: Option<String>,
    pub(crate) auth_headers: HeaderMap,
}

impl Session {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    /// The normalized `contentUrl` we signed in to. Empty for the default site.
    pub fn site_url(&self) -> &str {
        &self.site_url
    }

    /// The signed-in user's id, if the server told us.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn client(&self) -> &TableauClient {
        &self.client
    }

    /// `/sites/{site_id}` followed by `suffix`.
    pub(crate) fn site_route(&self, suffix: &str) -> String {
        format!("/sites/{}{}", self.site_id, suffix)
    }

    pub async fn get(&self, route: &str) -> Result<Value> {
        self.get_with_query(route, &[]).await
    }

    pub async fn get_with_query(&self, route: &str, query: &[(&str, String)]) -> Result<Value> {
        let mut request = self
            .client
            .http
            .get(self.client.url(route))
            .headers(self.auth_headers.clone());
        if !query.is_empty() {
            request = request.query(query);
        }
        http_client::execute_json(request, &Method::GET, route).await
    }

    /// POSTs `payload` as JSON, then lets the server settle.
    ///
    /// The settle pause only happens after a successful write.
    pub async fn post(&self, route: &str, payload: &Value) -> Result<Value> {
        let posted_contents = serde_json::to_string(payload)?;
        let request = self
            .client
            .http
            .post(self.client.url(route))
            .headers(self.auth_headers.clone())
            .body(posted_contents);

        let response = http_client::execute_json(request, &Method::POST, route).await?;
        self.client.settle_policy.settle().await;
        Ok(response)
    }

    /// Like `post`, but a 409 ("already exists") is reported instead of raised.
    /// `label` names the resource in the log line.
    pub async fn handled_post(
        &self,
        route: &str,
        payload: &Value,
        label: &str,
    ) -> Result<PostOutcome<Value>> {
        match self.post(route, payload).await {
            Ok(response) => Ok(PostOutcome::Created(response)),
            Err(error) if error.is_conflict() => {
                warn!(route, label, "post: {label} already exists");
                Ok(PostOutcome::AlreadyExists)
            }
            Err(error) => Err(error),
        }
    }

    /// Fetches an absolute URL using the legacy session cookie rather than the
    /// auth header. Useful for the non-REST web endpoints.
    pub async fn get_url(&self, url: &str) -> Result<reqwest::Response> {
        let response = self
            .client
            .http
            .get(url)
            .header(header::COOKIE, format!("{SESSION_COOKIE}={}", self.token))
            .send()
            .await
            .map_err(Error::Reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                method: Method::GET.to_string(),
                route: url.to_string(),
                status,
                body,
            });
        }
        Ok(response)
    }
}
