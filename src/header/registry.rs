//! The process-wide set of compiled header variants.
//!
//! Built once at startup from the configured templates (or the built-in
//! defaults), then shared read-only with the classifier and the repair
//! engine. Acceptable variants are matched in a declared priority order;
//! known-bad variants are matched only to produce a precise diagnostic.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use include_dir::{Dir, include_dir};
use regex::Regex;
use strum::Display;

use super::template::{compile, compile_derived, extract_licensor};
use crate::config::Config;

static TEMPLATES: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/resources/templates");

const DEFAULT_CANONICAL: &str = "cddl+gpl+ce-copyright.txt";
const DEFAULT_ALTERNATE: &str = "cddl+gpl+ce-java.net-copyright.txt";
const DEFAULT_BSD: &str = "bsd-copyright.txt";
const DEFAULT_LICENSOR: &str = "Oracle and/or its affiliates";

/// Secondary licenses that may legitimately follow the primary one.
const SECONDARY_TEMPLATES: [&str; 4] = [
    "apacheold-copyright.txt",
    "apache-copyright.txt",
    "mitsallings-copyright.txt",
    "w3c-copyright.txt",
];

/// An acceptable header form, in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// The canonical template itself.
    Canonical,
    /// Canonical followed by a known secondary license.
    Derived,
    /// A configured alternate template, plain or derived.
    Alternate,
    /// The BSD template.
    Bsd,
    /// Old-style Apache header carrying its own copyright line.
    ApacheOld,
    /// Modern Apache header; pure attribution, no year to check.
    Apache,
    /// Licensor copyright line over an Apache license body.
    OracleApache,
}

impl Variant {
    /// Pure-attribution variants carry no copyright year at all.
    pub fn has_year(self) -> bool {
        !matches!(self, Variant::Apache)
    }
}

/// A recognized legacy header, never accepted, reported by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, serde::Serialize)]
pub enum KnownBad {
    #[strum(serialize = "Sun copyright")]
    Sun,
    #[strum(serialize = "Sun+Apache copyright")]
    SunApache,
    #[strum(serialize = "Sun BSD copyright")]
    SunBsd,
    #[strum(serialize = "Old CDDL copyright")]
    OldCddl,
    #[strum(serialize = "CDDL+GPL copyright without Classpath exception")]
    CddlGplNoClasspath,
}

pub struct VariantRegistry {
    canonical_text: String,
    bsd_text: String,
    licensor: String,
    canonical: Regex,
    derived: Vec<Regex>,
    alternates: Vec<Regex>,
    bsd: Regex,
    apache_old: Regex,
    apache: Regex,
    oracle_apache: Regex,
    known_bad: Vec<(KnownBad, Regex)>,
}

impl VariantRegistry {
    /// Compile every variant from the configured templates. Any failure here
    /// is fatal for the whole run; nothing can be classified without the set.
    pub fn from_config(config: &Config) -> Result<Self> {
        let canonical_text = load_template(config.canonical_template.as_deref(), DEFAULT_CANONICAL)?;
        let licensor =
            extract_licensor(&canonical_text).unwrap_or_else(|| DEFAULT_LICENSOR.to_string());

        let canonical = compile(&canonical_text, &licensor)?;
        let mut derived = Vec::with_capacity(SECONDARY_TEMPLATES.len());
        for name in SECONDARY_TEMPLATES {
            derived.push(compile_derived(&canonical_text, &builtin(name)?, &licensor)?);
        }

        let mut alternates = Vec::new();
        // the default alternate applies only to the default canonical, and
        // only when no explicit alternate replaces it
        if config.canonical_template.is_none() && config.alternate_templates.is_empty() {
            push_alternate(&mut alternates, &builtin(DEFAULT_ALTERNATE)?, &licensor)?;
        }
        for path in &config.alternate_templates {
            let text = read_template_file(path)?;
            push_alternate(&mut alternates, &text, &licensor)?;
        }

        let bsd_text = load_template(config.bsd_template.as_deref(), DEFAULT_BSD)?;
        let bsd = compile(&bsd_text, &licensor)?;

        let apache_old = compile(&builtin("apacheold-copyright.txt")?, &licensor)?;
        let apache = compile(&builtin("apache-copyright.txt")?, &licensor)?;
        let oracle_apache = compile(&builtin("oracle-apache-copyright.txt")?, &licensor)?;

        let known_bad = vec![
            (KnownBad::Sun, "sun-cddl+gpl+ce-copyright.txt"),
            (KnownBad::SunApache, "sun-cddl+gpl+ce+apache-copyright.txt"),
            (KnownBad::SunApache, "sun-cddl+gpl+ce+apachenew-copyright.txt"),
            (KnownBad::SunBsd, "sun-bsd-copyright.txt"),
            (KnownBad::OldCddl, "cddl-copyright.txt"),
            (KnownBad::OldCddl, "cddl2-copyright.txt"),
            (KnownBad::CddlGplNoClasspath, "cddl+gpl-copyright.txt"),
        ]
        .into_iter()
        .map(|(label, name)| Ok((label, compile(&builtin(name)?, &licensor)?)))
        .collect::<Result<Vec<_>>>()?;

        Ok(VariantRegistry {
            canonical_text,
            bsd_text,
            licensor,
            canonical,
            derived,
            alternates,
            bsd,
            apache_old,
            apache,
            oracle_apache,
            known_bad,
        })
    }

    pub fn licensor(&self) -> &str {
        &self.licensor
    }

    /// The canonical template text, year placeholder intact.
    pub fn canonical_text(&self) -> &str {
        &self.canonical_text
    }

    /// The BSD template text, year placeholder intact.
    pub fn bsd_text(&self) -> &str {
        &self.bsd_text
    }

    /// Acceptable patterns in priority order. Normalize mode drops derived
    /// and alternate forms so every header converges to the canonical one.
    pub fn acceptable(&self, normalize: bool) -> Vec<(Variant, &Regex)> {
        let mut out = vec![(Variant::Canonical, &self.canonical)];
        if !normalize {
            out.extend(self.derived.iter().map(|p| (Variant::Derived, p)));
            out.extend(self.alternates.iter().map(|p| (Variant::Alternate, p)));
        }
        out.push((Variant::Bsd, &self.bsd));
        out.push((Variant::ApacheOld, &self.apache_old));
        out.push((Variant::Apache, &self.apache));
        out.push((Variant::OracleApache, &self.oracle_apache));
        out
    }

    /// Known-bad patterns in diagnostic priority order.
    pub fn known_bad(&self) -> &[(KnownBad, Regex)] {
        &self.known_bad
    }
}

fn push_alternate(alternates: &mut Vec<Regex>, text: &str, licensor: &str) -> Result<()> {
    alternates.push(compile(text, licensor)?);
    for name in SECONDARY_TEMPLATES {
        alternates.push(compile_derived(text, &builtin(name)?, licensor)?);
    }
    Ok(())
}

fn builtin(name: &str) -> Result<String> {
    let file = TEMPLATES
        .get_file(name)
        .ok_or_else(|| anyhow!("missing built-in copyright template: {name}"))?;
    let text = file
        .contents_utf8()
        .ok_or_else(|| anyhow!("built-in copyright template is not UTF-8: {name}"))?;
    Ok(normalize_newlines(text))
}

fn read_template_file(path: &Path) -> Result<String> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("can't load copyright template {}", path.display()))?;
    Ok(normalize_newlines(&text))
}

fn load_template(path: Option<&Path>, default_name: &str) -> Result<String> {
    match path {
        Some(path) => read_template_file(path),
        None => builtin(default_name),
    }
}

fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_builds() {
        let registry = VariantRegistry::from_config(&Config::default()).unwrap();
        assert_eq!(registry.licensor(), "Oracle and/or its affiliates");
        assert!(registry.canonical_text().contains("YYYY"));
        assert!(registry.bsd_text().contains("Redistribution and use"));
    }

    #[test]
    fn test_acceptable_priority_order() {
        let registry = VariantRegistry::from_config(&Config::default()).unwrap();
        let variants: Vec<Variant> = registry
            .acceptable(false)
            .into_iter()
            .map(|(v, _)| v)
            .collect();
        let canonical = variants
            .iter()
            .position(|v| *v == Variant::Canonical)
            .unwrap();
        let derived = variants.iter().position(|v| *v == Variant::Derived).unwrap();
        let alternate = variants
            .iter()
            .position(|v| *v == Variant::Alternate)
            .unwrap();
        let bsd = variants.iter().position(|v| *v == Variant::Bsd).unwrap();
        assert!(canonical < derived && derived < alternate && alternate < bsd);
    }

    #[test]
    fn test_normalize_drops_derived_and_alternates() {
        let registry = VariantRegistry::from_config(&Config::default()).unwrap();
        let variants: Vec<Variant> = registry
            .acceptable(true)
            .into_iter()
            .map(|(v, _)| v)
            .collect();
        assert!(!variants.contains(&Variant::Derived));
        assert!(!variants.contains(&Variant::Alternate));
        assert!(variants.contains(&Variant::Canonical));
    }

    #[test]
    fn test_known_bad_order() {
        let registry = VariantRegistry::from_config(&Config::default()).unwrap();
        let labels: Vec<KnownBad> = registry.known_bad().iter().map(|(l, _)| *l).collect();
        assert_eq!(labels[0], KnownBad::Sun);
        assert_eq!(*labels.last().unwrap(), KnownBad::CddlGplNoClasspath);
    }
}
