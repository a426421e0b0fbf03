use std::fs;
use std::path::Path;
use std::sync::Arc;

use glob::Pattern;
use indicatif::ProgressBar;
use tempfile::TempDir;

use headwright::scanner::{AuditContext, audit_file, process};
use headwright::vcs::FixedAuthority;
use headwright::{AuditCounts, Config, Outcome, VariantRegistry};

/// A one-line canonical template keeps the fixtures readable; the built-in
/// default is exercised by the missing-header tests below.
const SHORT_TEMPLATE: &str =
    "Copyright (c) YYYY Oracle and/or its affiliates. All rights reserved.\n";

fn write_template(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("template.txt");
    fs::write(&path, SHORT_TEMPLATE).unwrap();
    path
}

fn authority(year: &str) -> FixedAuthority {
    FixedAuthority {
        year: Some(year.to_string()),
        modified: false,
    }
}

#[test]
fn test_stale_properties_header_is_repaired_in_place() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("app.properties");
    fs::write(
        &file,
        "# Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved.\n\nkey=value\n",
    )
    .unwrap();

    let config = Config {
        repair: true,
        canonical_template: Some(write_template(dir.path())),
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let record = audit_file(&ctx, &file);
    assert_eq!(
        record.outcome,
        Outcome::StaleYear {
            found: "2015".into(),
            expected: "2022".into()
        }
    );
    assert!(record.repaired);

    // only the year token changed; everything else is untouched
    let repaired = fs::read_to_string(&file).unwrap();
    assert_eq!(
        repaired,
        "# Copyright (c) 2015-2022 Oracle and/or its affiliates. All rights reserved.\n\nkey=value\n"
    );

    // a second audit is a no-op: accepted, current, byte-identical
    let record = audit_file(&ctx, &file);
    assert!(matches!(record.outcome, Outcome::Clean { .. }));
    assert!(!record.repaired);
    assert_eq!(fs::read_to_string(&file).unwrap(), repaired);
}

#[test]
fn test_missing_header_gets_canonical_block_comment() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Main.java");
    fs::write(&file, "package com.example;\n\nclass Main {}\n").unwrap();

    let config = Config {
        repair: true,
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let record = audit_file(&ctx, &file);
    assert_eq!(record.outcome, Outcome::Missing);
    assert!(record.repaired);

    let repaired = fs::read_to_string(&file).unwrap();
    assert!(repaired.starts_with("/*\n"));
    assert!(repaired.contains(
        "Copyright (c) 2022 Oracle and/or its affiliates. All rights reserved."
    ));
    assert!(repaired.ends_with("package com.example;\n\nclass Main {}\n"));

    // the repaired file audits clean against the built-in canonical form
    let record = audit_file(&ctx, &file);
    assert!(matches!(record.outcome, Outcome::Clean { .. }), "{:?}", record.outcome);
    assert_eq!(fs::read_to_string(&file).unwrap(), repaired);
}

#[test]
fn test_shebang_stays_ahead_of_inserted_header() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("build.sh");
    fs::write(&file, "#!/bin/sh\nset -e\n").unwrap();

    let config = Config {
        repair: true,
        canonical_template: Some(write_template(dir.path())),
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let record = audit_file(&ctx, &file);
    assert_eq!(record.outcome, Outcome::Missing);

    let repaired = fs::read_to_string(&file).unwrap();
    assert!(repaired.starts_with("#!/bin/sh\n#\n# Copyright (c) 2022"));
    assert!(repaired.ends_with("set -e\n"));
}

#[test]
fn test_dry_run_writes_sibling_file_only() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Main.java");
    let original = "package com.example;\n";
    fs::write(&file, original).unwrap();

    let config = Config {
        repair: true,
        dry_run: true,
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    audit_file(&ctx, &file);

    assert_eq!(fs::read_to_string(&file).unwrap(), original);
    let sibling = dir.path().join("Main.java.new");
    let staged = fs::read_to_string(&sibling).unwrap();
    assert!(staged.contains("Copyright (c) 2022"));
}

#[test]
fn test_unversioned_files_skipped_when_configured() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Main.java");
    fs::write(&file, "package com.example;\n").unwrap();

    let config = Config {
        skip_unversioned: true,
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = FixedAuthority::default(); // no history, not modified
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let record = audit_file(&ctx, &file);
    assert_eq!(record.outcome, Outcome::SkippedUnversioned);
}

#[test]
fn test_scan_tree_counts_by_category() {
    let dir = TempDir::new().unwrap();
    // the template lives outside the scanned tree so it isn't audited
    let template_dir = TempDir::new().unwrap();
    let template = write_template(template_dir.path());

    fs::write(
        dir.path().join("stale.properties"),
        "# Copyright (c) 2015 Oracle and/or its affiliates. All rights reserved.\n\nkey=value\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("current.properties"),
        "# Copyright (c) 2022 Oracle and/or its affiliates. All rights reserved.\n\nkey=value\n",
    )
    .unwrap();
    fs::write(dir.path().join("Main.java"), "package com.example;\n").unwrap();
    fs::write(dir.path().join("image.dat"), [0u8, 159, 146, 150]).unwrap();
    fs::write(dir.path().join("scratch.tmp"), "# temp\n").unwrap();

    let subdir = dir.path().join("sub");
    fs::create_dir(&subdir).unwrap();
    fs::write(
        subdir.join("more.properties"),
        "# Copyright (c) 2022 Oracle and/or its affiliates. All rights reserved.\n\nkey=value\n",
    )
    .unwrap();

    let config = Config {
        canonical_template: Some(template),
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let patterns = vec![Pattern::new("*.tmp").unwrap()];
    let progress = Arc::new(ProgressBar::hidden());
    let result = process(dir.path(), 50, progress, &patterns, &ctx).unwrap();

    assert_eq!(result.excluded_count, 1);

    let mut counts = AuditCounts::default();
    for record in &result.records {
        counts.record(&record.outcome);
    }
    assert_eq!(counts.files, 5);
    assert_eq!(counts.clean, 2);
    assert_eq!(counts.stale_year, 1);
    assert_eq!(counts.missing, 1);
    assert_eq!(counts.skipped, 1); // the binary file
    assert_eq!(counts.errors(), 2);
}

#[test]
fn test_scan_empty_directory() {
    let dir = TempDir::new().unwrap();
    let config = Config::default();
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let progress = Arc::new(ProgressBar::hidden());
    let result = process(dir.path(), 50, progress, &[], &ctx).unwrap();
    assert!(result.records.is_empty());
    assert_eq!(result.excluded_count, 0);
}

#[test]
fn test_known_bad_header_reported_and_rebuilt() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Legacy.java");

    // an unrecognized vendor header with a harvestable year
    fs::write(
        &file,
        "/*\n * Copyright 2003 Example Industries. All rights reserved.\n *\n * Some in-house license text nobody remembers adopting.\n */\n\npackage legacy;\n",
    )
    .unwrap();

    let config = Config {
        repair: true,
        ..Config::default()
    };
    let registry = VariantRegistry::from_config(&config).unwrap();
    let auth = authority("2022");
    let ctx = AuditContext {
        registry: &registry,
        config: &config,
        authority: &auth,
    };

    let record = audit_file(&ctx, &file);
    assert_eq!(record.outcome, Outcome::Wrong);
    assert!(record.repaired);

    let repaired = fs::read_to_string(&file).unwrap();
    // the old start year is folded into a range ending at the expected year
    assert!(repaired.contains(
        "Copyright (c) 2003-2022 Oracle and/or its affiliates. All rights reserved."
    ));
    assert!(repaired.ends_with("package legacy;\n"));

    let record = audit_file(&ctx, &file);
    assert!(matches!(record.outcome, Outcome::Clean { .. }), "{:?}", record.outcome);
}
