//! License template compilation.
//!
//! A template is plain text containing one `YYYY` year placeholder. Compiling
//! it quotes every literal line, widens the placeholder into the year-token
//! grammar, and adds tolerance for extra copyright-holder lines next to the
//! canonical one. A "derived" pattern is a primary template followed by the
//! incorporates-work marker and a secondary template compiled without the
//! extra-holder tolerance (a secondary license's attribution is fixed).

use anyhow::{Context, Result};
use regex::Regex;

use super::year::{COPYRIGHT_LINE_ANY, YEAR_TOKEN};

/// Marker that introduces a preserved secondary license.
pub const DERIVED_INTRO: &str =
    "\n\nThis file incorporates work covered by the following copyright and\npermission notice:\n\n";

/// IDE template boilerplate optionally ignored at the very start of a header.
const NETBEANS_BOILERPLATE: &str =
    "To change this template, choose Tools | Templates\nand open the template in the editor.\n\n";

/// Compile a template into a full-match pattern for extracted headers.
pub fn compile(text: &str, licensor: &str) -> Result<Regex> {
    to_pattern(&pattern_body(text, licensor, false))
}

/// Compile a primary template followed by a secondary license template.
pub fn compile_derived(primary: &str, secondary: &str, licensor: &str) -> Result<Regex> {
    let body = format!(
        "{}{}{}",
        pattern_body(primary, licensor, false),
        regex::escape(DERIVED_INTRO),
        pattern_body(secondary, licensor, true),
    );
    to_pattern(&body)
}

/// Pull the licensor name out of a template: the text between the year
/// placeholder and the end of the phrase on its line.
pub fn extract_licensor(text: &str) -> Option<String> {
    let yyyy = text.find("YYYY")?;
    let rest = &text[yyyy + 5..];
    let end = rest.find('.').or_else(|| rest.find('\n'))?;
    if end == 0 {
        return None;
    }
    Some(rest[..end].to_string())
}

/// Assemble the pattern body, line by line.
fn pattern_body(text: &str, licensor: &str, secondary: bool) -> String {
    let mut body = String::new();
    let mut saw_year_line = false;
    for line in text.lines() {
        let mut quoted = regex::escape(line);
        if line.contains("YYYY") {
            saw_year_line = true;
            quoted = quoted.replace("YYYY", YEAR_TOKEN);
            if !secondary {
                if line.contains(licensor) {
                    // extra holders appended below the canonical line
                    quoted = format!("{quoted}(?:\n{COPYRIGHT_LINE_ANY})*");
                } else {
                    // extra holders listed above it
                    quoted = format!("(?:{COPYRIGHT_LINE_ANY}\n)*{quoted}");
                }
            }
        }
        body.push_str(&quoted);
        body.push('\n');
    }
    // a template with no year line at all is pure attribution; allow a
    // block of copyright lines at the beginning
    if !saw_year_line && !secondary {
        body = format!("(?:(?:{COPYRIGHT_LINE_ANY}\n)+\n)?{body}");
    }
    if body.ends_with("\n\n") {
        body.pop();
    }
    body
}

fn to_pattern(body: &str) -> Result<Regex> {
    let boilerplate = regex::escape(NETBEANS_BOILERPLATE);
    Regex::new(&format!(r"(?m)\A(?:{boilerplate})?(?:{body})\z"))
        .context("failed to compile license template pattern")
}
