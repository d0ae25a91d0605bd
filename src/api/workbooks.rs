use super::{page::Page, session::Session};
use crate::error::Result;
use serde_json::Value;

impl Session {
    pub async fn query_workbooks(&self, page: Page) -> Result<Value> {
        self.get_with_query(&self.site_route("/workbooks"), &page.query())
            .await
    }

    /// Lists the data source connections of a single workbook.
    pub async fn query_workbook_connections(&self, workbook_id: &str) -> Result<Value> {
        self.get(&self.site_route(&format!("/workbooks/{workbook_id}/connections")))
            .await
    }
}
