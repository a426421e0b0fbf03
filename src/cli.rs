use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, VcsKind, YearSeparator};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Files or directories to audit
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Repair defective headers instead of only reporting them
    #[arg(short, long)]
    pub repair: bool,

    /// Write repairs to sibling .new files, leave originals untouched
    #[arg(long)]
    pub dry_run: bool,

    /// Converge all headers to the canonical form (derived and alternate
    /// forms are no longer accepted)
    #[arg(short, long)]
    pub normalize: bool,

    /// Carry pre-existing copyright holder lines into repaired headers
    #[arg(short, long)]
    pub preserve_copyrights: bool,

    /// Use "2001, 2005" instead of "2001-2005" when extending a year
    #[arg(long)]
    pub comma: bool,

    /// Don't check whether the copyright year is current
    #[arg(long)]
    pub ignore_year: bool,

    /// Skip files with no version-control history
    #[arg(long)]
    pub skip_unversioned: bool,

    /// Warn about copyright statements found after the header
    #[arg(long)]
    pub warn: bool,

    /// Version-control tool consulted for last-changed dates
    #[arg(long, value_enum, default_value_t = VcsKind::Git)]
    pub vcs: VcsKind,

    /// Canonical license template file (overrides the built-in default)
    #[arg(long, value_name = "FILE")]
    pub template: Option<PathBuf>,

    /// Additional accepted template file; may be repeated
    #[arg(long = "alternate", value_name = "FILE")]
    pub alternates: Vec<PathBuf>,

    /// BSD license template file (overrides the built-in default)
    #[arg(long, value_name = "FILE")]
    pub bsd_template: Option<PathBuf>,

    /// Exclude patterns (glob patterns like "*.tmp" or "node_modules")
    #[arg(short, long, value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Maximum recursion depth (0 means no recursion)
    #[arg(long, default_value = "50")]
    pub max_depth: usize,

    /// Write a JSON report to this file
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    /// Print nothing but the summary
    #[arg(short, long)]
    pub quiet: bool,

    /// Also report clean and skipped files
    #[arg(short, long)]
    pub verbose: bool,

    /// Log extracted headers
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    pub fn to_config(&self) -> Config {
        Config {
            repair: self.repair,
            dry_run: self.dry_run,
            normalize: self.normalize,
            preserve_copyrights: self.preserve_copyrights,
            year_separator: if self.comma {
                YearSeparator::Comma
            } else {
                YearSeparator::Hyphen
            },
            ignore_year: self.ignore_year,
            skip_unversioned: self.skip_unversioned,
            warn_extra: self.warn,
            quiet: self.quiet,
            verbose: self.verbose,
            debug: self.debug,
            vcs: self.vcs,
            canonical_template: self.template.clone(),
            alternate_templates: self.alternates.clone(),
            bsd_template: self.bsd_template.clone(),
        }
    }
}
