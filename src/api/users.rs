use super::{
    page::Page,
    records::{self, UsersResponse},
    session::{PostOutcome, Session},
};
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{collections::HashMap, fmt, str::FromStr};

/// The role a user holds on a site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SiteRole {
    #[default]
    Interactor,
    Publisher,
    SiteAdministrator,
    Unlicensed,
    UnlicensedWithPublish,
    Viewer,
    ViewerWithPublish,
}

impl SiteRole {
    pub const ALL: [SiteRole; 7] = [
        SiteRole::Interactor,
        SiteRole::Publisher,
        SiteRole::SiteAdministrator,
        SiteRole::Unlicensed,
        SiteRole::UnlicensedWithPublish,
        SiteRole::Viewer,
        SiteRole::ViewerWithPublish,
    ];

    /// The literal the server expects in `siteRole`.
    pub fn as_str(&self) -> &'static str {
        match self {
            SiteRole::Interactor => "Interactor",
            SiteRole::Publisher => "Publisher",
            SiteRole::SiteAdministrator => "SiteAdministrator",
            SiteRole::Unlicensed => "Unlicensed",
            SiteRole::UnlicensedWithPublish => "UnlicensedWithPublish",
            SiteRole::Viewer => "Viewer",
            SiteRole::ViewerWithPublish => "ViewerWithPublish",
        }
    }
}

impl fmt::Display for SiteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SiteRole {
    type Err = String;

    /// Case-insensitive, so `viewer` works on the command line.
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        SiteRole::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| format!("unknown site role: {value}"))
    }
}

impl Session {
    pub async fn query_users(&self, page: Page) -> Result<Value> {
        self.get_with_query(&self.site_route("/users"), &page.query())
            .await
    }

    /// Lists users and reduces them to a lowercased name -> id table.
    pub async fn user_lookup_table(&self, page: Page) -> Result<HashMap<String, String>> {
        let response: UsersResponse = records::extract(self.query_users(page).await?)?;
        Ok(response
            .users
            .user
            .into_iter()
            .map(|user| (user.name.to_lowercase(), user.id))
            .collect())
    }

    pub async fn query_user(&self, user_id: &str) -> Result<Value> {
        self.get(&self.site_route(&format!("/users/{user_id}")))
            .await
    }

    /// Adds a user to the current site. An existing user is not an error.
    pub async fn add_user_to_site(
        &self,
        user_name: &str,
        site_role: SiteRole,
    ) -> Result<PostOutcome<Value>> {
        let payload = json!({
            "user": {
                "name": user_name,
                "siteRole": site_role.as_str(),
            }
        });
        self.handled_post(&self.site_route("/users"), &payload, user_name)
            .await
    }
}
