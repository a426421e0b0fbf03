//! The last-changed authority: what year was this file last committed,
//! and is it locally modified?
//!
//! Backed by shelling out to git, svn, or hg. Subprocess calls carry a
//! timeout; a timeout or a file with no history means "unknown", and the
//! caller falls back to the current year. A `FixedAuthority` exists so the
//! audit core can be exercised without any version control at all.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use log::warn;

use crate::config::VcsKind;
use crate::header::this_year;

const SUBPROCESS_TIMEOUT: Duration = Duration::from_secs(10);

pub trait LastChangedAuthority: Sync {
    /// The 4-digit year of the file's last committed change, or `None` when
    /// the file has no history.
    fn last_changed_year(&self, path: &Path) -> Result<Option<String>>;

    /// Does the file carry uncommitted local modifications?
    fn is_locally_modified(&self, path: &Path) -> Result<bool>;
}

/// The year a file's header should carry: the current year for locally
/// modified (or history-less) files, the last committed year otherwise.
pub fn expected_year(authority: &dyn LastChangedAuthority, path: &Path) -> Result<String> {
    if authority.is_locally_modified(path)? {
        return Ok(this_year());
    }
    Ok(authority
        .last_changed_year(path)?
        .unwrap_or_else(this_year))
}

pub fn authority_for(kind: VcsKind) -> Box<dyn LastChangedAuthority + Send> {
    match kind {
        VcsKind::Git => Box::new(GitAuthority),
        VcsKind::Svn => Box::new(SvnAuthority),
        VcsKind::Hg => Box::new(MercurialAuthority),
    }
}

pub struct GitAuthority;

impl LastChangedAuthority for GitAuthority {
    fn last_changed_year(&self, path: &Path) -> Result<Option<String>> {
        let output = run(Command::new("git")
            .arg("log")
            .arg("-n")
            .arg("1")
            .arg("--date=format:%Y")
            .arg("--format=%cd")
            .arg("--")
            .arg(path))?;
        Ok(output.and_then(|out| first_year(&out)))
    }

    fn is_locally_modified(&self, path: &Path) -> Result<bool> {
        let output = run(Command::new("git").arg("status").arg("-s").arg("--").arg(path))?;
        Ok(output.is_some_and(|out| has_status_flag(&out)))
    }
}

pub struct SvnAuthority;

impl LastChangedAuthority for SvnAuthority {
    fn last_changed_year(&self, path: &Path) -> Result<Option<String>> {
        const LAST_CHANGED_DATE: &str = "Last Changed Date: ";
        const ADDED_FILE: &str = "Schedule: add";
        let Some(output) = run(Command::new("svn").arg("info").arg(path))? else {
            return Ok(None);
        };
        let mut year = None;
        for line in output.lines() {
            if line == ADDED_FILE {
                // scheduled for addition: no history yet
                year = Some(this_year());
            }
            if let Some(date) = line.strip_prefix(LAST_CHANGED_DATE) {
                if date.len() >= 4 {
                    year = Some(date[..4].to_string());
                }
            }
        }
        Ok(year)
    }

    fn is_locally_modified(&self, path: &Path) -> Result<bool> {
        let output = run(Command::new("svn").arg("status").arg(path))?;
        Ok(output.is_some_and(|out| has_status_flag(&out)))
    }
}

pub struct MercurialAuthority;

impl LastChangedAuthority for MercurialAuthority {
    fn last_changed_year(&self, path: &Path) -> Result<Option<String>> {
        let output = run(Command::new("hg")
            .arg("log")
            .arg("--limit")
            .arg("1")
            .arg("--template")
            .arg("{date|shortdate}")
            .arg(path))?;
        Ok(output.and_then(|out| first_year(&out)))
    }

    fn is_locally_modified(&self, path: &Path) -> Result<bool> {
        let output = run(Command::new("hg").arg("status").arg(path))?;
        Ok(output.is_some_and(|out| has_status_flag(&out)))
    }
}

/// A fake authority with fixed answers, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct FixedAuthority {
    pub year: Option<String>,
    pub modified: bool,
}

impl LastChangedAuthority for FixedAuthority {
    fn last_changed_year(&self, _path: &Path) -> Result<Option<String>> {
        Ok(self.year.clone())
    }

    fn is_locally_modified(&self, _path: &Path) -> Result<bool> {
        Ok(self.modified)
    }
}

/// A status line starting with M or A means modified or newly added.
fn has_status_flag(output: &str) -> bool {
    output
        .lines()
        .map(str::trim)
        .any(|l| l.starts_with('M') || l.starts_with('A'))
}

/// First 4-digit year at the start of a non-empty output line.
fn first_year(output: &str) -> Option<String> {
    for line in output.lines() {
        let line = line.trim();
        if line.len() >= 4 && line.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
            return Some(line[..4].to_string());
        }
    }
    None
}

/// Run a command with a timeout, returning its stdout. `None` on timeout.
fn run(command: &mut Command) -> Result<Option<String>> {
    let mut child = command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("can't run {:?}", command.get_program()))?;

    if !wait_with_timeout(&mut child, SUBPROCESS_TIMEOUT)? {
        warn!("{:?} timed out, treating last-changed date as unknown", command.get_program());
        let _ = child.kill();
        let _ = child.wait();
        return Ok(None);
    }

    let mut output = String::new();
    if let Some(stdout) = child.stdout.as_mut() {
        stdout
            .read_to_string(&mut output)
            .context("can't read subprocess output")?;
    }
    Ok(Some(output))
}

/// True when the child exited within the timeout.
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> Result<bool> {
    let deadline = Instant::now() + timeout;
    loop {
        if child.try_wait().context("can't wait for subprocess")?.is_some() {
            return Ok(true);
        }
        if Instant::now() >= deadline {
            return Ok(false);
        }
        std::thread::sleep(Duration::from_millis(10));
    }
}
