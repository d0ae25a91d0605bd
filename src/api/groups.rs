use super::session::{PostOutcome, Session};
use crate::error::Result;
use serde_json::{json, Value};

impl Session {
    pub async fn query_groups(&self) -> Result<Value> {
        self.get(&self.site_route("/groups")).await
    }

    /// Creates a local group. An existing group is not an error.
    pub async fn create_group(&self, group_name: &str) -> Result<PostOutcome<Value>> {
        let payload = json!({
            "group": {"name": group_name}
        });
        self.handled_post(&self.site_route("/groups"), &payload, group_name)
            .await
    }

    /// Adds a user to a group. Existing membership is not an error.
    pub async fn add_user_to_group(
        &self,
        user_id: &str,
        group_id: &str,
    ) -> Result<PostOutcome<Value>> {
        let payload = json!({
            "user": {"id": user_id}
        });
        self.handled_post(
            &self.site_route(&format!("/groups/{group_id}/users")),
            &payload,
            user_id,
        )
        .await
    }
}
