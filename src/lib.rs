//! # Sprig
//!
//! Core engine for a branch-listing tool: relative commit ages and
//! per-branch key-value properties, merged into a time-ordered report.
//!
//! ## Core Concepts
//!
//! - **Commit times**: an absolute instant plus a relative label computed
//!   once against a reference "now" ("4d ago", "2mo from now")
//! - **Properties**: custom `branch.<name>.<key>=<value>` entries from the
//!   version-control configuration, with a reserved-key blocklist
//! - **Reports**: branches filtered by age and sorted most recent first,
//!   one property column per discovered key
//!
//! The engine does no I/O of its own. The embedding tool implements
//! [`VcsBackend`] by invoking the version-control binary and parsing its
//! output; rendering of headers and tables also stays outside.
//!
//! ## Example
//!
//! ```ignore
//! use sprig::{RepoView, ReportOptions};
//!
//! let view = RepoView::new(backend);
//! let options = ReportOptions {
//!     max_age_days: Some(30),
//!     columns: view.property_columns()?,
//! };
//! let report = view.report(chrono::Utc::now(), options)?;
//! println!("{}", report.render("branch\tmodified"));
//! ```

pub mod commit_time;
pub mod error;
pub mod properties;
pub mod repo;
pub mod report;

// Re-exports
pub use commit_time::CommitTime;
pub use error::{ReportError, Result};
pub use properties::{
    is_reserved, parse_config_dump, property_union, PropertyMap, RESERVED_PROPERTIES,
};
pub use repo::{RepoView, VcsBackend};
pub use report::{BranchRecord, BranchReport, ReportOptions};
