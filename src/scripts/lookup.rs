use crate::{
    api::{
        records::{self, GroupsResponse},
        Page, Session,
    },
    error::Result,
};
use serde::Serialize;
use std::collections::HashMap;

/// A name as we looked it up, and the id it resolved to (if any).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameLookup {
    pub name: String,
    pub id: Option<String>,
}

/// Lowercases a user name and drops any email domain: `Jane.Doe@example.com` -> `jane.doe`.
pub fn normalize_user_name(user_name: &str) -> String {
    let lowered = user_name.to_lowercase();
    match lowered.split_once('@') {
        Some((local, _)) => local.to_string(),
        None => lowered,
    }
}

fn resolve<'a>(
    names: impl Iterator<Item = String> + 'a,
    table: &'a HashMap<String, String>,
) -> impl Iterator<Item = NameLookup> + 'a {
    names.map(|name| NameLookup {
        id: table.get(&name).cloned(),
        name,
    })
}

impl Session {
    /// Resolves group names to ids, preserving input order.
    /// Unknown groups resolve to `None`.
    pub async fn group_ids_from_names<S: AsRef<str>>(
        &self,
        group_names: &[S],
    ) -> Result<Vec<NameLookup>> {
        let response: GroupsResponse = records::extract(self.query_groups().await?)?;
        let table: HashMap<String, String> = response
            .groups
            .group
            .into_iter()
            .map(|group| (group.name.to_lowercase(), group.id))
            .collect();

        let names = group_names.iter().map(|name| name.as_ref().to_lowercase());
        Ok(resolve(names, &table).collect())
    }

    /// Resolves user names (or email addresses) to ids, preserving input order.
    /// Unknown users resolve to `None`.
    pub async fn user_ids_from_names<S: AsRef<str>>(
        &self,
        user_names: &[S],
    ) -> Result<Vec<NameLookup>> {
        let table = self.user_lookup_table(Page::default()).await?;

        let names = user_names
            .iter()
            .map(|name| normalize_user_name(name.as_ref()));
        Ok(resolve(names, &table).collect())
    }
}
