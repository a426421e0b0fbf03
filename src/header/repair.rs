//! Header repair.
//!
//! Produces the corrected header text for a defective file: the canonical
//! template stamped with the right year, with pre-existing copyright-holder
//! lines merged in and any embedded secondary license carried over. The
//! engine never touches file content itself; comment-syntax adapters render
//! the corrected text back into a concrete file.

use std::sync::LazyLock;

use regex::{NoExpand, Regex};

use super::registry::VariantRegistry;
use super::year::{
    COPYRIGHT_LINE_PATTERN, COPYRIGHT_PATTERN, TEMPLATE_YEAR_LINE_PATTERN,
    YEAR_PLACEHOLDER_PATTERN,
};
use crate::config::Config;

const ALL_RIGHTS: &str = "All rights reserved.";

/// Obsolete holder whose preserved lines are dropped outright.
const PURGED_HOLDER: &str = "Sun Microsystems";

/// Detects an existing BSD or EDL license in the original header.
static BSD_SIGNATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        "(THIS SOFTWARE IS PROVIDED BY THE COPYRIGHT HOLDERS AND CONTRIBUTORS)\
         |(SPDX-License-Identifier: BSD-3-Clause)",
    )
    .expect("bsd signature")
});

/// Start of a preserved secondary license (e.g. an embedded Apache notice).
static SECONDARY_LICENSE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^.*This file incorporates work covered by").expect("secondary marker")
});

/// Which repair strategy runs for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairType {
    /// No header at all: emit the canonical template.
    Missing,
    /// Header present but unrecognized or known-bad: reconstruct.
    Wrong,
    /// Header fine, year stale: update the year in place.
    Date,
}

pub struct RepairEngine<'a> {
    registry: &'a VariantRegistry,
    preserve_copyrights: bool,
}

impl<'a> RepairEngine<'a> {
    pub fn new(registry: &'a VariantRegistry, config: &Config) -> Self {
        RepairEngine {
            registry,
            preserve_copyrights: config.preserve_copyrights,
        }
    }

    /// Build the corrected header text, using `year` as the copyright date.
    ///
    /// `original` is the defective header, if any; it determines whether the
    /// replacement is BSD-based, whether a secondary license is carried
    /// over, and which holder lines survive the rewrite.
    pub fn corrected_header(&self, original: Option<&str>, year: &str) -> String {
        let mut copyright = self.registry.canonical_text().to_string();
        let mut preserve = self.preserve_copyrights;

        let Some(comment) = original else {
            return self.stamp(&copyright, year);
        };

        // the part of the original we harvest holder lines from
        let mut harvest = comment;

        if BSD_SIGNATURE.is_match(comment) {
            // no secondary license allowed with the BSD license
            copyright = self.registry.bsd_text().to_string();
        } else if let Some(marker) = SECONDARY_LICENSE_MARKER.find(comment) {
            let secondary = &comment[marker.start()..];
            copyright.push_str("\n\n");
            copyright.push_str(secondary);
            if secondary.contains("Apache") {
                // an Apache notice can't stay secondary: promote the license
                // body after the first blank line to be the new base
                if let Some(blank) = secondary.find("\n\n") {
                    copyright = to_template_form(&secondary[blank + 2..]);
                }
                preserve = true;
            } else {
                // keep the secondary's own copyrights out of the harvest
                harvest = &comment[..marker.start().saturating_sub(1)];
            }
        } else if comment.contains("Apache") {
            // the primary license is Apache; keep it as the base
            copyright = to_template_form(comment);
            preserve = true;
        }

        if preserve {
            self.merge(&copyright, copyright_lines(harvest), year)
        } else {
            self.stamp(&copyright, year)
        }
    }

    /// Replace the year placeholder line tail with year, licensor, rights.
    fn stamp(&self, template: &str, year: &str) -> String {
        let replacement = format!("{year} {}. {ALL_RIGHTS}", self.registry.licensor());
        YEAR_PLACEHOLDER_PATTERN
            .replace(template, NoExpand(&replacement))
            .into_owned()
    }

    /// Replace the template's year line with the merged holder-line block.
    ///
    /// The licensor's own line gets its year set to `year` and is
    /// synthesized at the top if absent; lines naming the obsolete vendor
    /// are purged; everything else passes through in order.
    fn merge(&self, template: &str, mut lines: Vec<String>, year: &str) -> String {
        let licensor = self.registry.licensor();

        let (before, after, need_blank) = match TEMPLATE_YEAR_LINE_PATTERN.find(template) {
            Some(m) => (&template[..m.start()], &template[m.end()..], false),
            // an Apache-promoted base may carry no template year line; the
            // merged block then goes in front of the whole text
            None => ("", template, true),
        };

        if !lines.is_empty() && !lines.iter().any(|l| l.contains(licensor)) {
            lines.insert(0, format!("Copyright (c) {year} {licensor}. {ALL_RIGHTS}"));
        }

        let mut merged = String::new();
        let mut seen_licensor = false;
        for line in &lines {
            if !seen_licensor && line.contains(licensor) {
                seen_licensor = true;
                match COPYRIGHT_LINE_PATTERN
                    .captures(line)
                    .and_then(|c| c.name("year"))
                {
                    Some(y) => {
                        merged.push_str(&line[..y.start()]);
                        merged.push_str(year);
                        merged.push_str(&line[y.end()..]);
                    }
                    None => merged.push_str(line),
                }
                merged.push('\n');
            } else if seen_licensor && line.contains(PURGED_HOLDER) {
                // obsolete vendor line, dropped
            } else {
                merged.push_str(line);
                merged.push('\n');
            }
        }

        if need_blank {
            merged.push('\n');
        }
        format!("{before}{merged}{after}")
    }
}

/// Every line in `text` matching the copyright-statement grammar.
pub fn copyright_lines(text: &str) -> Vec<String> {
    COPYRIGHT_LINE_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Convert a literal copyright line back to template form: the year token
/// becomes the placeholder.
fn to_template_form(text: &str) -> String {
    match COPYRIGHT_PATTERN.captures(text).and_then(|c| c.name("year")) {
        Some(y) => format!("{}YYYY{}", &text[..y.start()], &text[y.end()..]),
        None => text.to_string(),
    }
}
