//! The per-file audit and repair driver.
//!
//! One file goes through: read → adapter pick → header extraction →
//! classification → year check → (optionally) repair. Every cross-file
//! input is read-only, so files can be audited in parallel.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use content_inspector::{ContentType, inspect};
use log::{debug, warn};

use crate::config::Config;
use crate::header::{
    Classification, COPYRIGHT_PATTERN, RepairEngine, RepairType, VariantRegistry,
    add_copyright_date, classify, extract_year, last_year, this_year,
};
use crate::report::{AuditRecord, Outcome};
use crate::syntax::{HeaderSyntax, adapter_for, harvest_year};
use crate::vcs::LastChangedAuthority;

/// Shared read-only state for one run.
pub struct AuditContext<'a> {
    pub registry: &'a VariantRegistry,
    pub config: &'a Config,
    pub authority: &'a dyn LastChangedAuthority,
}

/// Audit (and, when configured, repair) a single file. I/O failures are
/// contained: they produce an `IoError` record, never a panic or an abort.
pub fn audit_file(ctx: &AuditContext, path: &Path) -> AuditRecord {
    match audit_inner(ctx, path) {
        Ok(record) => record,
        Err(err) => {
            warn!("{}: {err:#}", path.display());
            AuditRecord {
                path: path.display().to_string(),
                outcome: Outcome::IoError {
                    message: format!("{err:#}"),
                },
                repaired: false,
            }
        }
    }
}

fn audit_inner(ctx: &AuditContext, path: &Path) -> Result<AuditRecord> {
    let config = ctx.config;
    // last-changed year, memoized across the gate, the check, and the repair
    let mut cached_year: Option<String> = None;

    if config.skip_unversioned && !ctx.authority.is_locally_modified(path)? {
        match ctx.authority.last_changed_year(path)? {
            Some(year) => cached_year = Some(year),
            None => {
                let outcome = Outcome::SkippedUnversioned;
                report_outcome(config, path, &outcome);
                return Ok(record(path, outcome, false));
            }
        }
    }

    let bytes = fs::read(path).with_context(|| format!("can't read {}", path.display()))?;
    if !matches!(inspect(&bytes), ContentType::UTF_8 | ContentType::UTF_8_BOM) {
        return Ok(record(path, Outcome::SkippedBinary, false));
    }
    let content = canonicalize(&String::from_utf8_lossy(&bytes));

    let Some(adapter) = adapter_for(path, &content) else {
        return Ok(record(path, Outcome::SkippedUnsupported, false));
    };

    let header = adapter.extract(&content);
    if config.debug {
        debug!(
            "header for {}:\n---\n{}\n---",
            path.display(),
            header.as_deref().unwrap_or("<none>")
        );
    }

    let outcome = match classify(ctx.registry, header.as_deref(), config.normalize) {
        Classification::Missing => Outcome::Missing,
        Classification::Empty => Outcome::Empty,
        Classification::KnownBad(label) => Outcome::KnownBad { label },
        Classification::Unrecognized => Outcome::Wrong,
        Classification::Accepted(variant) if !variant.has_year() => Outcome::Clean { variant },
        Classification::Accepted(variant) => {
            let header = header.as_deref().unwrap_or_default();
            match extract_year(header) {
                None => Outcome::NoYear,
                Some(_) if config.ignore_year => {
                    if config.verbose {
                        println!("Ignoring year check: {}", path.display());
                    }
                    Outcome::Clean { variant }
                }
                Some(token) => {
                    let expected = resolve_expected(ctx, path, &mut cached_year)?;
                    match last_year(token) {
                        Some(found) if found == expected => Outcome::Clean { variant },
                        Some(found) => Outcome::StaleYear {
                            found: found.to_string(),
                            expected,
                        },
                        None => Outcome::NoYear,
                    }
                }
            }
        }
    };

    if config.warn_extra && !config.quiet {
        warn_extra_copyrights(adapter, path, &content);
    }

    report_outcome(config, path, &outcome);

    let mut repaired = false;
    if config.repair {
        if let Some(kind) = repair_type(&outcome) {
            let target = resolve_expected(ctx, path, &mut cached_year)?;
            repair_file(ctx, adapter, path, &content, header.as_deref(), kind, &target)?;
            repaired = true;
        }
    }

    Ok(record(path, outcome, repaired))
}

fn record(path: &Path, outcome: Outcome, repaired: bool) -> AuditRecord {
    AuditRecord {
        path: path.display().to_string(),
        outcome,
        repaired,
    }
}

fn report_outcome(config: &Config, path: &Path, outcome: &Outcome) {
    if config.quiet {
        return;
    }
    if let Some(message) = outcome.message() {
        if outcome.is_defect() || config.verbose {
            println!("{}: {message}", path.display());
        }
    } else if config.verbose && matches!(outcome, Outcome::Clean { .. }) {
        println!("No errors: {}", path.display());
    }
}

/// The year this file's header should carry: the current year for locally
/// modified or history-less files, the last committed year otherwise.
fn resolve_expected(
    ctx: &AuditContext,
    path: &Path,
    cached: &mut Option<String>,
) -> Result<String> {
    if ctx.authority.is_locally_modified(path)? {
        return Ok(this_year());
    }
    if let Some(year) = cached.clone() {
        return Ok(year);
    }
    let year = ctx
        .authority
        .last_changed_year(path)?
        .unwrap_or_else(this_year);
    *cached = Some(year.clone());
    Ok(year)
}

/// Which repair strategy applies, if any.
fn repair_type(outcome: &Outcome) -> Option<RepairType> {
    match outcome {
        Outcome::Missing | Outcome::Empty => Some(RepairType::Missing),
        Outcome::Wrong | Outcome::KnownBad { .. } => Some(RepairType::Wrong),
        Outcome::StaleYear { .. } => Some(RepairType::Date),
        _ => None,
    }
}

fn repair_file(
    ctx: &AuditContext,
    adapter: &dyn HeaderSyntax,
    path: &Path,
    content: &str,
    header: Option<&str>,
    kind: RepairType,
    target: &str,
) -> Result<()> {
    let config = ctx.config;
    let engine = RepairEngine::new(ctx.registry, config);

    let new_content = match kind {
        RepairType::Date if !config.normalize => adapter
            .update_year(content, target, config.year_separator)
            .ok_or_else(|| anyhow!("no copyright line to update in {}", path.display()))?,
        RepairType::Missing => rebuild(adapter, &engine, content, None, target, config, false),
        // Wrong, or Date under normalize: reconstruct the whole header
        _ => rebuild(adapter, &engine, content, header, target, config, true),
    };

    write_repaired(path, &new_content, config.dry_run)
}

/// Reassemble the file around a freshly built header. With `consume` the old
/// header block is replaced (its year folded into the new one); without it
/// the new header goes in front of whatever comment was there.
fn rebuild(
    adapter: &dyn HeaderSyntax,
    engine: &RepairEngine,
    content: &str,
    header: Option<&str>,
    target: &str,
    config: &Config,
    consume: bool,
) -> String {
    let layout = adapter.layout(content);
    let (year_token, body_start) = if consume {
        let harvested = layout
            .block
            .as_ref()
            .and_then(|b| harvest_year(&content[b.clone()]));
        (harvested, layout.rest)
    } else {
        let start = layout.block.as_ref().map(|b| b.start).unwrap_or(layout.rest);
        (None, start)
    };

    let year = match year_token {
        Some(token) => add_copyright_date(&token, target, config.year_separator),
        None => target.to_string(),
    };

    let corrected = engine.corrected_header(if consume { header } else { None }, &year);
    let rest = skip_blank_lines(&content[body_start..]);
    format!("{}{}{}", layout.preamble, adapter.render(&corrected), rest)
}

/// Write the corrected content to a sibling `.new` file first; unless this
/// is a dry run, read it back and replace the original, then drop the
/// sibling. The original is never touched before the `.new` file is whole.
fn write_repaired(path: &Path, content: &str, dry_run: bool) -> Result<()> {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".new");
    let new_path = path.with_file_name(name);

    fs::write(&new_path, content)
        .with_context(|| format!("can't write {}", new_path.display()))?;
    if !dry_run {
        let written = fs::read(&new_path)
            .with_context(|| format!("can't read back {}", new_path.display()))?;
        fs::write(path, written).with_context(|| format!("can't update {}", path.display()))?;
        fs::remove_file(&new_path)
            .with_context(|| format!("can't remove {}", new_path.display()))?;
    }
    Ok(())
}

fn warn_extra_copyrights(adapter: &dyn HeaderSyntax, path: &Path, content: &str) {
    let layout = adapter.layout(content);
    for line in content[layout.rest..].lines() {
        if COPYRIGHT_PATTERN.is_match(line) {
            println!("{}: WARNING: extra copyright: {line}", path.display());
        }
    }
}

fn canonicalize(content: &str) -> String {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content.replace("\r\n", "\n").replace('\r', "\n")
}

fn skip_blank_lines(mut text: &str) -> &str {
    while let Some((line, tail)) = text.split_once('\n') {
        if line.trim().is_empty() {
            text = tail;
        } else {
            break;
        }
    }
    if !text.contains('\n') && text.trim().is_empty() {
        ""
    } else {
        text
    }
}
