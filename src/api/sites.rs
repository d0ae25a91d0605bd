use super::session::Session;
use crate::{auth::normalize_site_url, error::Result};
use serde_json::Value;

impl Session {
    /// Looks up a site by its URL slug, or the current site when `site_url`
    /// is `None` or empty.
    pub async fn query_site(&self, site_url: Option<&str>) -> Result<Value> {
        match site_url {
            Some(site_url) if !site_url.is_empty() => {
                let route = format!("/sites/{}", normalize_site_url(site_url));
                self.get_with_query(&route, &[("key", "contentUrl".to_string())])
                    .await
            }
            _ => self.get(&self.site_route("")).await,
        }
    }

    pub async fn query_sites(&self) -> Result<Value> {
        self.get("/sites").await
    }

    /// Lists the views on the current site, optionally with usage statistics.
    pub async fn query_views(&self, include_usage_stats: bool) -> Result<Value> {
        self.get_with_query(
            &self.site_route("/views"),
            &[("includeUsageStatistics", include_usage_stats.to_string())],
        )
        .await
    }
}
