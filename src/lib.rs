pub mod cli;
pub mod config;
pub mod header;
pub mod report;
pub mod scanner;
pub mod syntax;
pub mod vcs;

pub use config::{Config, VcsKind, YearSeparator};
pub use header::{Classification, RepairEngine, RepairType, Variant, VariantRegistry, classify};
pub use report::{AuditCounts, AuditRecord, Outcome};
pub use scanner::{AuditContext, ScanResult, audit_file, count, process};
pub use vcs::{FixedAuthority, LastChangedAuthority};
