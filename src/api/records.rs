//! Typed views over the few fields we read out of otherwise opaque responses.
//!
//! Tableau wraps every collection twice, e.g. `{"users": {"user": [...]}}`,
//! and an empty collection may come back as `{"users": {}}`.

use crate::error::Result;
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::Value;

pub(crate) fn extract<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Anything with an id and a name: users, groups, projects, data sources.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct NamedRecord {
    pub id: String,
    pub name: String,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct IdRecord {
    pub id: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct UsersResponse {
    pub users: UserCollection,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct UserCollection {
    #[serde(default)]
    pub user: Vec<NamedRecord>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct GroupsResponse {
    pub groups: GroupCollection,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct GroupCollection {
    #[serde(default)]
    pub group: Vec<NamedRecord>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CreatedGroup {
    pub group: IdRecord,
}

#[derive(Deserialize, Debug)]
pub(crate) struct WorkbooksResponse {
    pub pagination: Option<Pagination>,
    pub workbooks: WorkbookCollection,
}

/// Tableau reports these numbers as strings.
#[derive(Deserialize, Debug)]
pub(crate) struct Pagination {
    #[serde(rename = "totalAvailable")]
    pub total_available: String,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct WorkbookCollection {
    #[serde(default)]
    pub workbook: Vec<WorkbookRecord>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct WorkbookRecord {
    pub id: String,
    pub name: String,
    pub project: NamedRecord,
    pub owner: IdRecord,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConnectionsResponse {
    pub connections: ConnectionCollection,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct ConnectionCollection {
    #[serde(default)]
    pub connection: Vec<ConnectionRecord>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConnectionRecord {
    pub datasource: NamedRecord,
    #[serde(rename = "serverAddress", default)]
    pub server_address: String,
    #[serde(rename = "type")]
    pub connection_type: String,
    #[serde(rename = "userName", default)]
    pub user_name: String,
}

/// The response to `/auth/signin`.
#[derive(Deserialize, Debug)]
pub(crate) struct SignInResponse {
    pub credentials: SignInCredentials,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SignInCredentials {
    pub token: String,
    pub site: SignInSite,
    pub user: Option<IdRecord>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct SignInSite {
    pub id: String,
    #[serde(rename = "contentUrl", default)]
    pub content_url: Option<String>,
}
