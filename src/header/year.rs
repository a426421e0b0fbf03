//! Copyright-line grammar and the year policy.
//!
//! A copyright statement line is, in the general case:
//! `[Portions ]Copyright [(c) ]<years> [by ]<holder>` where `<years>` is a
//! single year, a range ("2001-2007"), or a comma list ("2001, 2003, 2007").
//! Comparison and update always key off the LAST four digits of the token.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

use crate::config::YearSeparator;

/// What the template's year placeholder accepts: digits, dashes, commas, spaces.
pub(crate) const YEAR_TOKEN: &str = "[-0-9, ]+";

/// The general copyright-statement grammar, with the year captured.
const COPYRIGHT_STRING: &str =
    r"(?:Portions )?Copyright (?:\(c\) )?(?<year>[-0-9, ]+) (?:by )?(?:[A-Za-z].*)";

/// Same grammar without captures, for embedding inside compiled template
/// patterns (a pattern may contain several copies of it).
pub(crate) const COPYRIGHT_LINE_ANY: &str =
    r"^(?:Portions )?Copyright (?:\(c\) )?[-0-9, ]+ (?:by )?[A-Za-z].*$";

/// Finds a copyright statement anywhere in a string.
pub static COPYRIGHT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(COPYRIGHT_STRING).expect("copyright grammar"));

/// Matches a whole line that is a copyright statement.
pub static COPYRIGHT_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("(?m)^{COPYRIGHT_STRING}$")).expect("copyright line grammar")
});

/// Finds the template's own literal year line ("Copyright (c) YYYY ...").
pub static TEMPLATE_YEAR_LINE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Copyright (?:\(c\) )?YYYY (?:by )?[A-Za-z].*$\n").expect("template year line")
});

/// Finds the year placeholder and the rest of its line.
pub static YEAR_PLACEHOLDER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)YYYY.*$").expect("year placeholder"));

/// The current year as a 4-digit string.
pub fn this_year() -> String {
    chrono::Local::now().year().to_string()
}

/// Extract the year token of the first copyright statement in `header`.
pub fn extract_year(header: &str) -> Option<&str> {
    COPYRIGHT_PATTERN
        .captures(header)
        .and_then(|c| c.name("year"))
        .map(|m| m.as_str())
}

/// The most recent year in a year token: its last 4 digits, tolerating one
/// trailing comma. Returns `None` for tokens too short to hold a year.
pub fn last_year(token: &str) -> Option<&str> {
    let token = token.strip_suffix(',').unwrap_or(token);
    if token.len() < 4 || !token.is_ascii() {
        return None;
    }
    Some(&token[token.len() - 4..])
}

/// Is the year token current with respect to the expected year?
pub fn is_current(token: &str, expected: &str) -> bool {
    last_year(token) == Some(expected)
}

/// Update a year token to include `last_changed` (assumed to be no earlier
/// than any year already in the token).
///
/// A bare year equal to `last_changed` is returned unchanged; a different
/// bare year becomes a range. An existing range or list keeps its first year
/// and gets its trailing year replaced, normalizing the separator to the
/// configured style.
pub fn add_copyright_date(token: &str, last_changed: &str, sep: YearSeparator) -> String {
    let mut date = token.strip_suffix(',').unwrap_or(token).to_string();
    if date.len() == 4 {
        if date != last_changed {
            date.push_str(sep.joiner());
            date.push_str(last_changed);
        }
    } else if date.len() > 4 {
        let trailing = &date[date.len() - 4..];
        let separated = date.as_bytes()[4] == sep.joiner().as_bytes()[0];
        if trailing != last_changed || !separated {
            let first = date[..4].to_string();
            date = if first == last_changed {
                first
            } else {
                format!("{first}{}{last_changed}", sep.joiner())
            };
        }
    }
    date
}
