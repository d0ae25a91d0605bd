//! Convenience scripts composed from the endpoint methods on `Session`.

mod batch;
mod inventory;
mod lookup;

pub use batch::{MembershipOutcome, MembershipResult};
pub use inventory::WorkbookConnection;
pub use lookup::{normalize_user_name, NameLookup};
