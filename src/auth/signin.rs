use crate::{
    api::{
        auth_headers, base_headers, execute_json,
        records::{self, SignInResponse},
        Session, TableauClient,
    },
    error::Result,
};
use reqwest::Method;
use serde_json::json;
use tracing::info;

const SIGN_IN_ROUTE: &str = "/auth/signin";
const SIGN_OUT_ROUTE: &str = "/auth/signout";

/// Converts a site name into the URL-safe `contentUrl` form Tableau expects.
pub fn normalize_site_url(site_url: &str) -> String {
    site_url.replace(' ', "")
}

impl TableauClient {
    /// Signs in to the given site, producing a `Session` for it.
    ///
    /// An empty `site_url` signs in to the server's default site.
    pub async fn sign_in(&self, site_url: &str) -> Result<Session> {
        let site_url = normalize_site_url(site_url);
        let payload = json!({
            "credentials": {
                "name": self.credentials.username,
                "password": self.credentials.password,
                "site": {
                    "contentUrl": site_url,
                }
            }
        });

        // Signing in is the one request made without a token.
        let request = self
            .http
            .post(self.url(SIGN_IN_ROUTE))
            .headers(base_headers())
            .body(serde_json::to_string(&payload)?);
        let response: SignInResponse =
            records::extract(execute_json(request, &Method::POST, SIGN_IN_ROUTE).await?)?;

        let credentials = response.credentials;
        let auth_headers = auth_headers(&credentials.token)?;
        // The server's spelling of the slug wins over ours.
        let site_url = credentials.site.content_url.unwrap_or(site_url);
        info!(
            site_url = %site_url,
            site_id = %credentials.site.id,
            "sign in successful"
        );

        Ok(Session {
            client: self.clone(),
            token: credentials.token,
            site_id: credentials.site.id,
            site_url,
            user_id: credentials.user.map(|user| user.id),
            auth_headers,
        })
    }
}

impl Session {
    /// Signs out, invalidating the token server-side.
    ///
    /// If the server rejects the request, the error is returned and the
    /// session is dropped all the same.
    pub async fn sign_out(self) -> Result<TableauClient> {
        let request = self
            .client
            .http
            .post(self.client.url(SIGN_OUT_ROUTE))
            .headers(self.auth_headers.clone())
            .body(Vec::new());
        execute_json(request, &Method::POST, SIGN_OUT_ROUTE).await?;

        info!(site_url = %self.site_url, "sign out successful");
        Ok(self.client)
    }

    /// Signs out and then signs in to another site.
    ///
    /// This is two requests, not one: if signing in fails, no session remains
    /// and the caller has to start again from the `TableauClient`.
    pub async fn switch_site(self, site_url: &str) -> Result<Session> {
        let client = self.sign_out().await?;
        client.sign_in(site_url).await
    }
}
