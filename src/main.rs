use std::error::Error;
use std::fs::File;
use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use clap::Parser;
use glob::Pattern;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::to_string_pretty;

use headwright::cli::Cli;
use headwright::report::{AuditCounts, REPORT_FORMAT_VERSION, Report, ReportHeader};
use headwright::scanner::{AuditContext, audit_file, count, process};
use headwright::vcs::authority_for;
use headwright::{ScanResult, VariantRegistry};

fn main() {
    env_logger::init();
    if let Err(err) = run() {
        eprintln!("Error: {}", err);
        std::process::exit(2);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let start_time = Utc::now();

    let config = cli.to_config();
    let registry = VariantRegistry::from_config(&config)?;
    let authority = authority_for(config.vcs);
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: authority.as_ref(),
    };

    let exclude_patterns = compile_exclude_patterns(&cli.exclude);

    let mut total_files = 0;
    for path in &cli.paths {
        if path.is_dir() {
            let (files, _dirs, _excluded) = count(path, cli.max_depth, &exclude_patterns)?;
            total_files += files;
        } else {
            total_files += 1;
        }
    }

    let progress_bar = create_progress_bar(total_files, config.quiet);
    let mut scan_result = ScanResult {
        records: Vec::new(),
        excluded_count: 0,
    };
    for path in &cli.paths {
        if path.is_dir() {
            let mut result = process(
                path,
                cli.max_depth,
                Arc::clone(&progress_bar),
                &exclude_patterns,
                &ctx,
            )?;
            scan_result.records.append(&mut result.records);
            scan_result.excluded_count += result.excluded_count;
        } else {
            scan_result.records.push(audit_file(&ctx, path));
            progress_bar.inc(1);
        }
    }
    progress_bar.finish_and_clear();

    let mut counts = AuditCounts::default();
    for record in &scan_result.records {
        counts.record(&record.outcome);
    }

    let end_time = Utc::now();
    if let Some(json_path) = &cli.json {
        let report = create_report(start_time, end_time, &counts, scan_result);
        write_report(json_path, &report)?;
        if !config.quiet {
            println!("JSON report written to {}", json_path.display());
        }
    }

    print_summary(&counts, config.quiet);

    if counts.errors() > 0 {
        std::process::exit(1);
    }
    Ok(())
}

fn compile_exclude_patterns(patterns: &[String]) -> Vec<Pattern> {
    patterns
        .iter()
        .filter_map(|pattern| Pattern::new(pattern).ok())
        .collect()
}

fn create_progress_bar(total_files: usize, quiet: bool) -> Arc<ProgressBar> {
    if quiet {
        return Arc::new(ProgressBar::hidden());
    }
    let progress_bar = ProgressBar::new(total_files as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files audited ({eta})")
            .expect("Failed to create progress bar style")
            .progress_chars("#>-"),
    );
    Arc::new(progress_bar)
}

fn create_report(
    start_time: chrono::DateTime<Utc>,
    end_time: chrono::DateTime<Utc>,
    counts: &AuditCounts,
    scan_result: ScanResult,
) -> Report {
    let duration = (end_time - start_time).num_nanoseconds().unwrap_or(0) as f64 / 1_000_000_000.0;

    Report {
        headers: vec![ReportHeader {
            tool_name: env!("CARGO_PKG_NAME").to_string(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            start_timestamp: start_time.to_rfc3339(),
            end_timestamp: end_time.to_rfc3339(),
            duration,
            output_format_version: REPORT_FORMAT_VERSION.to_string(),
        }],
        counts: counts.clone(),
        files: scan_result.records,
    }
}

fn write_report(path: &std::path::Path, report: &Report) -> std::io::Result<()> {
    let json_output = match to_string_pretty(report) {
        Ok(json) => json,
        Err(err) => return Err(std::io::Error::other(err)),
    };
    let mut file = File::create(path)?;
    file.write_all(json_output.as_bytes())?;
    Ok(())
}

fn print_summary(counts: &AuditCounts, quiet: bool) {
    if quiet {
        if counts.errors() > 0 {
            println!("{} files with copyright defects", counts.errors());
        }
        return;
    }
    println!();
    println!("Audited {} files: {} clean, {} skipped", counts.files, counts.clean, counts.skipped);
    let categories = [
        ("Missing copyright", counts.missing),
        ("Empty copyright", counts.empty),
        ("Wrong copyright", counts.wrong),
        ("Sun copyright", counts.sun),
        ("Sun+Apache copyright", counts.sun_apache),
        ("Sun BSD copyright", counts.sun_bsd),
        ("Old CDDL copyright", counts.old_cddl),
        ("Missing Classpath exception", counts.no_classpath_exception),
        ("No copyright year", counts.no_year),
        ("Stale copyright year", counts.stale_year),
        ("I/O errors", counts.io_errors),
    ];
    for (label, count) in categories {
        if count > 0 {
            println!("{label}: {count}");
        }
    }
}
