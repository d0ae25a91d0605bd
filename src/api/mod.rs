mod client;
mod groups;
mod http_client;
mod page;
pub(crate) mod records;
mod session;
mod settle;
mod sites;
mod users;
mod workbooks;

pub use client::{TableauClient, DEFAULT_API_VERSION, DEFAULT_CONNECTION_PACING};
pub(crate) use http_client::{auth_headers, base_headers, execute_json};
pub use http_client::{AUTH_HEADER, SESSION_COOKIE};
pub use page::Page;
pub use session::{PostOutcome, Session};
pub use settle::SettlePolicy;
pub use users::SiteRole;
