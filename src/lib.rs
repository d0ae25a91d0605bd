//! A client for Tableau Server's REST API.
//!
//! ```no_run
//! # async fn run() -> tableauctl::Result<()> {
//! use tableauctl::{AuthCredentials, TableauClient};
//!
//! let client = TableauClient::new(
//!     "https://tableau.example.com",
//!     AuthCredentials::new("admin", "hunter2"),
//! )?;
//! let session = client.sign_in("Sales").await?;
//! let groups = session.query_groups().await?;
//! println!("{groups}");
//! session.sign_out().await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod scripts;

pub use api::{Page, PostOutcome, Session, SettlePolicy, SiteRole, TableauClient};
pub use auth::AuthCredentials;
pub use config::Config;
pub use error::{Error, Result};
