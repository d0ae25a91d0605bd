use crate::error::{Error, Result};
use reqwest::{
    header::{self, HeaderMap, HeaderValue},
    Method, RequestBuilder,
};
use serde_json::Value;
use tracing::debug;

/// The header Tableau Server reads the session token from.
pub const AUTH_HEADER: &str = "X-Tableau-Auth";

/// The cookie used by the legacy (non-REST) web endpoints.
pub const SESSION_COOKIE: &str = "workgroup_session_id";

/// Headers sent with every request: we always speak JSON.
pub fn base_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers
}

/// Base headers plus our session token.
pub fn auth_headers(token: &str) -> Result<HeaderMap> {
    let mut token_value = HeaderValue::from_str(token).map_err(|_| Error::InvalidToken)?;
    token_value.set_sensitive(true);

    let mut headers = base_headers();
    headers.insert(AUTH_HEADER, token_value);
    Ok(headers)
}

/// Sends the given request and parses its body as JSON.
///
/// Any non-2xx status becomes `Error::Http` carrying the response body.
/// Some endpoints (signing out, for one) answer with no content at all;
/// those come back as `Value::Null`.
pub async fn execute_json(request: RequestBuilder, method: &Method, route: &str) -> Result<Value> {
    debug!(%method, route, "sending request");
    let response = request.send().await.map_err(Error::Reqwest)?;

    let status = response.status();
    let body = response.text().await.map_err(Error::Reqwest)?;
    if !status.is_success() {
        return Err(Error::Http {
            method: method.to_string(),
            route: route.to_string(),
            status,
            body,
        });
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&body).map_err(Error::Parse)
}
