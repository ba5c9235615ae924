//! Lenient semantic version parsing.
//!
//! Installation descriptors and patch manifests carry version strings written
//! by hand, so the strict `semver` grammar is too narrow: `"2.0"` drops the
//! patch component and `"1.4 beta"` separates the pre-release tag with a
//! space. [`parse_lenient`] normalizes those shapes before handing the string
//! to the `semver` parser; comparison then uses `semver::Version`'s ordering.
//!
//! A string that still fails to parse after normalization yields `None`.
//! Callers decide what an unknown version means: the applicability gate
//! skips the whole check when the *installation's* version is unknown, and
//! skips only the affected bound when a *manifest* bound is unknown.

use semver::Version;

/// Parse a version string, tolerating common non-semver shapes.
///
/// Normalization applied before parsing:
/// - surrounding whitespace and a leading `v` are stripped
/// - internal spaces become `-` (pre-release separator)
/// - missing minor/patch components are zero-padded (`"2"` parses as `"2.0.0"`)
pub fn parse_lenient(raw: &str) -> Option<Version> {
    let cleaned = raw.trim().trim_start_matches('v').replace(' ', "-");
    if cleaned.is_empty() {
        return None;
    }

    // Zero-pad the numeric core, leaving any pre-release/build suffix alone.
    let (core, suffix) = match cleaned.find(['-', '+']) {
        Some(idx) => cleaned.split_at(idx),
        None => (cleaned.as_str(), ""),
    };
    let dots = core.bytes().filter(|b| *b == b'.').count();
    let mut padded = core.to_string();
    for _ in dots..2 {
        padded.push_str(".0");
    }
    padded.push_str(suffix);

    Version::parse(&padded).ok()
}
