//! Heuristic noise filters for package records.
//!
//! The package index contains a fair amount of spam and auto-generated
//! uploads. These predicates are crude data-cleaning rules kept separate
//! from graph construction so they can be evaluated or swapped on their own.
//! They may exclude legitimate packages (anything containing "free", for
//! instance).

use crate::parser::PackageRecord;

/// Substrings that mark a package name as spam (matched case-insensitively).
pub const SPAM_MARKERS: &[&str] = &["cash", "free"];

/// Why a record was left out of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SkipReason {
    /// The record has no name or an empty one.
    MissingName,
    /// The name matched a spam marker.
    SpamName,
    /// The name contains a decimal digit.
    DigitInName,
    /// The record declares no dependencies.
    NoDependencies,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "missing name"),
            Self::SpamName => write!(f, "spam name"),
            Self::DigitInName => write!(f, "digit in name"),
            Self::NoDependencies => write!(f, "no dependencies"),
        }
    }
}

/// Outcome of running a record through the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict<'a> {
    /// Keep the record; carries the lowercased name to register.
    Keep(&'a str),
    /// Drop the record.
    Skip(SkipReason),
}

/// Returns true if the lowercased name contains a spam marker.
///
/// ```rust
/// use depmap::graph::is_spam_name;
///
/// assert!(is_spam_name("freebie"));
/// assert!(is_spam_name("Get-CASH-now"));
/// assert!(!is_spam_name("requests"));
/// ```
pub fn is_spam_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SPAM_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Returns true if the name contains any digit, Unicode digits included.
pub fn has_digit(name: &str) -> bool {
    name.chars().any(char::is_numeric)
}

/// Returns true if the record declares at least one requirement string.
pub fn has_dependencies(record: &PackageRecord) -> bool {
    !record.requirements().is_empty()
}

/// Applies every filter in order: name presence, spam, digits, dependencies.
///
/// The returned name is not yet lowercased; callers normalize it.
pub fn check(record: &PackageRecord) -> Verdict<'_> {
    let name = match record.name.as_deref() {
        Some(name) if !name.is_empty() => name,
        _ => return Verdict::Skip(SkipReason::MissingName),
    };

    if is_spam_name(name) {
        Verdict::Skip(SkipReason::SpamName)
    } else if has_digit(name) {
        Verdict::Skip(SkipReason::DigitInName)
    } else if !has_dependencies(record) {
        Verdict::Skip(SkipReason::NoDependencies)
    } else {
        Verdict::Keep(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spam_markers() {
        assert!(is_spam_name("freebie"));
        assert!(is_spam_name("cash4u"));
        assert!(is_spam_name("FastCashLoans"));
        assert!(!is_spam_name("numpy"));
    }

    #[test]
    fn test_has_digit() {
        assert!(has_digit("foo2"));
        assert!(has_digit("py3dns"));
        assert!(!has_digit("requests"));
        assert!(has_digit("pkg\u{0663}"));
        assert!(has_digit("cube\u{00b3}"));
    }

    #[test]
    fn test_check_order() {
        // Spam wins over digits when both apply.
        let record = PackageRecord::new("cash4u", ["numpy"]);
        assert_eq!(check(&record), Verdict::Skip(SkipReason::SpamName));

        let record = PackageRecord::new("foo2", ["numpy"]);
        assert_eq!(check(&record), Verdict::Skip(SkipReason::DigitInName));

        let record = PackageRecord::new("numpy", Vec::<String>::new());
        assert_eq!(check(&record), Verdict::Skip(SkipReason::NoDependencies));

        let record = PackageRecord::new("Pandas", ["numpy"]);
        assert_eq!(check(&record), Verdict::Keep("Pandas"));
    }

    #[test]
    fn test_check_missing_name() {
        assert_eq!(
            check(&PackageRecord::default()),
            Verdict::Skip(SkipReason::MissingName)
        );
        let record = PackageRecord::new("", ["numpy"]);
        assert_eq!(check(&record), Verdict::Skip(SkipReason::MissingName));
    }

    #[test]
    fn test_skip_reason_display() {
        assert_eq!(SkipReason::SpamName.to_string(), "spam name");
        assert_eq!(SkipReason::NoDependencies.to_string(), "no dependencies");
    }
}
