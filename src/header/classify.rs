//! Header classification against the variant registry.

use std::sync::LazyLock;

use regex::Regex;

use super::registry::{KnownBad, Variant, VariantRegistry};

/// Finds the word "copyright" or "(c)" anywhere in the text.
static COPYRIGHT_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\b[Cc]opyright\b|\([Cc]\))").expect("copyright word"));

/// The outcome of classifying one extracted header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Matches an acceptable variant.
    Accepted(Variant),
    /// Matches a recognized legacy header; reported, never accepted.
    KnownBad(KnownBad),
    /// No header, or a header with no copyright statement at all.
    Missing,
    /// A comment block exists but is blank.
    Empty,
    /// A copyright statement exists but matches nothing we know.
    Unrecognized,
}

/// Classify an extracted header. `None` means no leading comment was found.
///
/// Acceptable variants are tried in the registry's priority order, first
/// full match wins; only when none match are the known-bad patterns
/// consulted, again in fixed order, to label the defect precisely.
pub fn classify(
    registry: &VariantRegistry,
    header: Option<&str>,
    normalize: bool,
) -> Classification {
    let Some(header) = header else {
        return Classification::Missing;
    };
    if header.trim().is_empty() {
        return Classification::Empty;
    }
    // a comment that never says "copyright" is treated as headerless
    if !COPYRIGHT_WORD.is_match(header) {
        return Classification::Missing;
    }

    for (variant, pattern) in registry.acceptable(normalize) {
        if pattern.is_match(header) {
            return Classification::Accepted(variant);
        }
    }
    for (label, pattern) in registry.known_bad() {
        if pattern.is_match(header) {
            return Classification::KnownBad(*label);
        }
    }
    Classification::Unrecognized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn registry() -> VariantRegistry {
        VariantRegistry::from_config(&Config::default()).unwrap()
    }

    fn canonical_header(year: &str) -> String {
        registry().canonical_text().replace("YYYY", year)
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(classify(&registry(), None, false), Classification::Missing);
    }

    #[test]
    fn test_empty_header() {
        assert_eq!(
            classify(&registry(), Some("   \n \n"), false),
            Classification::Empty
        );
    }

    #[test]
    fn test_comment_without_copyright_word_is_missing() {
        let header = "This file does interesting things.\nDo not edit.\n";
        assert_eq!(
            classify(&registry(), Some(header), false),
            Classification::Missing
        );
    }

    #[test]
    fn test_canonical_accepted() {
        let header = canonical_header("2018");
        assert_eq!(
            classify(&registry(), Some(&header), false),
            Classification::Accepted(Variant::Canonical)
        );
    }

    #[test]
    fn test_canonical_with_year_range_accepted() {
        let header = canonical_header("2010-2018");
        assert_eq!(
            classify(&registry(), Some(&header), false),
            Classification::Accepted(Variant::Canonical)
        );
    }

    #[test]
    fn test_unrecognized() {
        let header = "Copyright (c) 2001 Somebody Else.\nAll kinds of other text.\n";
        assert_eq!(
            classify(&registry(), Some(header), false),
            Classification::Unrecognized
        );
    }

    #[test]
    fn test_classification_is_deterministic() {
        let header = canonical_header("2018");
        let first = classify(&registry(), Some(&header), false);
        for _ in 0..3 {
            assert_eq!(classify(&registry(), Some(&header), false), first);
        }
    }
}
