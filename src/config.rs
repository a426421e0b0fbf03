//! Run configuration consumed by the core and the scanner.

use std::path::PathBuf;

use clap::ValueEnum;
use strum::Display;

/// Separator style used when a year token grows into a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSeparator {
    /// "2001-2005"
    #[default]
    Hyphen,
    /// "2001, 2005"
    Comma,
}

impl YearSeparator {
    pub fn joiner(self) -> &'static str {
        match self {
            YearSeparator::Hyphen => "-",
            YearSeparator::Comma => ", ",
        }
    }
}

/// Which version-control tool backs the last-changed authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Display)]
#[strum(serialize_all = "lowercase")]
pub enum VcsKind {
    #[default]
    Git,
    Svn,
    Hg,
}

/// Everything the audit needs to know about one run. Built once from the
/// CLI, read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Rewrite non-conforming headers instead of only reporting them.
    pub repair: bool,
    /// Leave repaired content in a sibling `.new` file, original untouched.
    pub dry_run: bool,
    /// Converge every header to the canonical form: derived and alternate
    /// variants are no longer accepted, and even DATE-only defects are
    /// repaired by full reconstruction.
    pub normalize: bool,
    /// Carry all pre-existing copyright holder lines into repaired headers.
    pub preserve_copyrights: bool,
    /// Separator used when extending a year into a range.
    pub year_separator: YearSeparator,
    /// Accept stale years.
    pub ignore_year: bool,
    /// Skip files the version-control system knows nothing about.
    pub skip_unversioned: bool,
    /// Warn about copyright statements found after the header.
    pub warn_extra: bool,
    pub quiet: bool,
    pub verbose: bool,
    pub debug: bool,
    pub vcs: VcsKind,
    /// Canonical template override; the built-in default when `None`.
    pub canonical_template: Option<PathBuf>,
    /// Extra accepted templates besides the canonical one.
    pub alternate_templates: Vec<PathBuf>,
    /// BSD template override.
    pub bsd_template: Option<PathBuf>,
}
