use crate::{
    api::{
        records::{self, ConnectionsResponse, WorkbooksResponse},
        Page, Session,
    },
    error::Result,
};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// One data source connection of one workbook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkbookConnection {
    pub project: String,
    pub workbook: String,
    /// The owner's (lowercased) user name, if the owner is still on the site.
    pub owner: Option<String>,
    pub datasource: String,
    pub server_address: String,
    pub connection_type: String,
    pub username: String,
}

impl Session {
    /// Lists every connection of every workbook on the site.
    ///
    /// This issues one request per workbook and pauses between connection
    /// records, so it is slow on large sites on purpose.
    pub async fn workbooks_with_connections(&self) -> Result<Vec<WorkbookConnection>> {
        let id_to_name: HashMap<String, String> = self
            .user_lookup_table(Page::default())
            .await?
            .into_iter()
            .map(|(name, id)| (id, name))
            .collect();

        let workbooks: WorkbooksResponse =
            records::extract(self.query_workbooks(Page::default()).await?)?;
        if let Some(pagination) = &workbooks.pagination {
            info!(total_available = %pagination.total_available, "listing workbooks");
        }

        let mut table = Vec::new();
        for workbook in workbooks.workbooks.workbook {
            info!(workbook = %workbook.name, "collecting connections");
            let connections: ConnectionsResponse =
                records::extract(self.query_workbook_connections(&workbook.id).await?)?;

            for connection in connections.connections.connection {
                tokio::time::sleep(self.client.connection_pacing).await;
                table.push(WorkbookConnection {
                    project: workbook.project.name.clone(),
                    workbook: workbook.name.clone(),
                    owner: id_to_name.get(&workbook.owner.id).cloned(),
                    datasource: connection.datasource.name,
                    server_address: connection.server_address,
                    connection_type: connection.connection_type,
                    username: connection.user_name,
                });
            }
        }
        Ok(table)
    }
}
