//! Audit logging for Spendwise
//!
//! Every create, update and delete of a user document is appended to the
//! user's `audit.log` as one JSON object per line, with before/after
//! snapshots and a short diff.
//!
//! ```rust,ignore
//! let logger = AuditLogger::new(paths.audit_log());
//! logger.log(&AuditEntry::update(
//!     EntityType::Account,
//!     account.id.to_string(),
//!     Some(account.name.clone()),
//!     &before,
//!     &account,
//! ))?;
//! ```

mod diff;
mod entry;
mod logger;

pub use diff::generate_diff;
pub use entry::{AuditEntry, EntityType, Operation};
pub use logger::AuditLogger;
