//! Per-file audit records, aggregate counters, and the JSON report model.

use serde::Serialize;

use crate::header::{KnownBad, Variant};

pub const REPORT_FORMAT_VERSION: &str = "1.0.0";

/// The outcome of auditing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Header accepted and year current.
    Clean { variant: Variant },
    /// Not under version control and the run skips such files.
    SkippedUnversioned,
    /// Binary content; headers live in text files only.
    SkippedBinary,
    /// No comment syntax adapter claims this file.
    SkippedUnsupported,
    /// No header, or no copyright statement in it.
    Missing,
    /// A comment exists but is blank.
    Empty,
    /// Header matches nothing we know.
    Wrong,
    /// Header matches a recognized legacy form.
    KnownBad { label: KnownBad },
    /// Header accepted but carries no year to check.
    NoYear,
    /// Header accepted, year out of date.
    StaleYear { found: String, expected: String },
    /// The file couldn't be read, written, or checked.
    IoError { message: String },
}

impl Outcome {
    /// Defects count toward the error total; skips and clean files don't.
    pub fn is_defect(&self) -> bool {
        !matches!(
            self,
            Outcome::Clean { .. }
                | Outcome::SkippedUnversioned
                | Outcome::SkippedBinary
                | Outcome::SkippedUnsupported
        )
    }

    /// The diagnostic message printed next to the file path.
    pub fn message(&self) -> Option<String> {
        match self {
            Outcome::Clean { .. } => None,
            Outcome::SkippedUnversioned => Some("Not under version control, skipped".into()),
            Outcome::SkippedBinary | Outcome::SkippedUnsupported => None,
            Outcome::Missing => Some("No copyright".into()),
            Outcome::Empty => Some("Empty copyright".into()),
            Outcome::Wrong => Some("Wrong copyright".into()),
            Outcome::KnownBad { label } => Some(label.to_string()),
            Outcome::NoYear => Some("No copyright year".into()),
            Outcome::StaleYear { found, expected } => Some(format!(
                "Copyright year is wrong; is {found}, should be {expected}"
            )),
            Outcome::IoError { message } => Some(message.clone()),
        }
    }
}

/// One audited file.
#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub path: String,
    pub outcome: Outcome,
    /// True when a repair was written for this file.
    pub repaired: bool,
}

/// Counts by defect category, matching the summary block.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AuditCounts {
    pub files: usize,
    pub clean: usize,
    pub missing: usize,
    pub empty: usize,
    pub wrong: usize,
    pub sun: usize,
    pub sun_apache: usize,
    pub sun_bsd: usize,
    pub old_cddl: usize,
    pub no_classpath_exception: usize,
    pub no_year: usize,
    pub stale_year: usize,
    pub skipped: usize,
    pub io_errors: usize,
}

impl AuditCounts {
    pub fn record(&mut self, outcome: &Outcome) {
        self.files += 1;
        match outcome {
            Outcome::Clean { .. } => self.clean += 1,
            Outcome::SkippedUnversioned
            | Outcome::SkippedBinary
            | Outcome::SkippedUnsupported => self.skipped += 1,
            Outcome::Missing => self.missing += 1,
            Outcome::Empty => self.empty += 1,
            Outcome::Wrong => self.wrong += 1,
            Outcome::KnownBad { label } => match label {
                KnownBad::Sun => self.sun += 1,
                KnownBad::SunApache => self.sun_apache += 1,
                KnownBad::SunBsd => self.sun_bsd += 1,
                KnownBad::OldCddl => self.old_cddl += 1,
                KnownBad::CddlGplNoClasspath => self.no_classpath_exception += 1,
            },
            Outcome::NoYear => self.no_year += 1,
            Outcome::StaleYear { .. } => self.stale_year += 1,
            Outcome::IoError { .. } => self.io_errors += 1,
        }
    }

    /// Total files with a defect.
    pub fn errors(&self) -> usize {
        self.missing
            + self.empty
            + self.wrong
            + self.sun
            + self.sun_apache
            + self.sun_bsd
            + self.old_cddl
            + self.no_classpath_exception
            + self.no_year
            + self.stale_year
            + self.io_errors
    }

    pub fn merge(&mut self, other: &AuditCounts) {
        self.files += other.files;
        self.clean += other.clean;
        self.missing += other.missing;
        self.empty += other.empty;
        self.wrong += other.wrong;
        self.sun += other.sun;
        self.sun_apache += other.sun_apache;
        self.sun_bsd += other.sun_bsd;
        self.old_cddl += other.old_cddl;
        self.no_classpath_exception += other.no_classpath_exception;
        self.no_year += other.no_year;
        self.stale_year += other.stale_year;
        self.skipped += other.skipped;
        self.io_errors += other.io_errors;
    }
}

/// The JSON report written with `--json`.
#[derive(Debug, Serialize)]
pub struct Report {
    pub headers: Vec<ReportHeader>,
    pub counts: AuditCounts,
    pub files: Vec<AuditRecord>,
}

#[derive(Debug, Serialize)]
pub struct ReportHeader {
    pub tool_name: String,
    pub tool_version: String,
    pub start_timestamp: String,
    pub end_timestamp: String,
    pub duration: f64,
    pub output_format_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_category() {
        let mut counts = AuditCounts::default();
        counts.record(&Outcome::Clean {
            variant: Variant::Canonical,
        });
        counts.record(&Outcome::Missing);
        counts.record(&Outcome::StaleYear {
            found: "2015".into(),
            expected: "2022".into(),
        });
        counts.record(&Outcome::KnownBad {
            label: KnownBad::Sun,
        });
        counts.record(&Outcome::SkippedBinary);

        assert_eq!(counts.files, 5);
        assert_eq!(counts.clean, 1);
        assert_eq!(counts.missing, 1);
        assert_eq!(counts.stale_year, 1);
        assert_eq!(counts.sun, 1);
        assert_eq!(counts.skipped, 1);
        assert_eq!(counts.errors(), 3);
    }

    #[test]
    fn test_stale_year_message() {
        let outcome = Outcome::StaleYear {
            found: "2015".into(),
            expected: "2022".into(),
        };
        assert_eq!(
            outcome.message().as_deref(),
            Some("Copyright year is wrong; is 2015, should be 2022")
        );
    }

    #[test]
    fn test_defect_flag() {
        assert!(Outcome::Missing.is_defect());
        assert!(!Outcome::SkippedUnsupported.is_defect());
        assert!(
            !Outcome::Clean {
                variant: Variant::Canonical
            }
            .is_defect()
        );
    }
}
