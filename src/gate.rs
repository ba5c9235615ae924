//! Applicability decision.
//!
//! Combines the installation snapshot with the manifest's declared bounds to
//! decide whether the patch may be applied. The decision is a pure function
//! of its inputs; acting on a denial (releasing the package, exiting
//! non-zero) is the orchestrator's job.
//!
//! The schema check is a hard inclusive range over integers. The application
//! check is deliberately lenient: an installation version that fails to parse
//! skips the check entirely, and a manifest bound that fails to parse is
//! skipped individually while the opposite bound stays enforced. A bound
//! that parses is always enforced.

use crate::manifest::PatchManifest;
use crate::probe::InstallationState;
use crate::version::parse_lenient;

/// Outcome of the applicability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applicability {
    /// The patch may be applied.
    Approved,
    /// The patch must not be applied; `reason` is operator-readable.
    Denied { reason: String },
}

impl Applicability {
    /// Whether the decision allows application to proceed.
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

/// Decide whether the patch applies to this installation.
///
/// With `force` set, no checks are evaluated at all.
pub fn decide(state: &InstallationState, manifest: &PatchManifest, force: bool) -> Applicability {
    if force {
        return Applicability::Approved;
    }

    if state.db_version < manifest.mindb || state.db_version > manifest.maxdb {
        return Applicability::Denied {
            reason: format!("DBVersion is not {}", manifest.schema_target()),
        };
    }

    // An unparseable installation version means "cannot determine"; the
    // schema check alone decides.
    let Some(current) = parse_lenient(&state.app_version) else {
        tracing::debug!(
            app_version = %state.app_version,
            "installation version did not parse, skipping app version check"
        );
        return Applicability::Approved;
    };

    if let Some(min) = parse_lenient(&manifest.minapp) {
        if current < min {
            return Applicability::Denied {
                reason: format!("AppVersion is older than {}", manifest.app_target()),
            };
        }
    }
    if let Some(max) = parse_lenient(&manifest.maxapp) {
        if current > max {
            return Applicability::Denied {
                reason: format!("AppVersion is newer than {}", manifest.app_target()),
            };
        }
    }

    Applicability::Approved
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(db_version: i64, app_version: &str) -> InstallationState {
        InstallationState {
            rally_title: "Test Rally".into(),
            db_version,
            app_version: app_version.into(),
        }
    }

    fn manifest(mindb: i64, maxdb: i64, minapp: &str, maxapp: &str) -> PatchManifest {
        PatchManifest {
            id: "gate test".into(),
            mindb,
            maxdb,
            minapp: minapp.into(),
            maxapp: maxapp.into(),
            ..Default::default()
        }
    }

    #[test]
    fn approves_inside_both_ranges() {
        let decision = decide(&state(5, "2.0"), &manifest(4, 6, "1.0", "3.0"), false);
        assert_eq!(decision, Applicability::Approved);
    }

    #[test]
    fn schema_range_is_inclusive() {
        let m = manifest(4, 6, "", "");
        assert!(decide(&state(4, "2.0"), &m, false).is_approved());
        assert!(decide(&state(6, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(3, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(7, "2.0"), &m, false).is_approved());
    }

    #[test]
    fn schema_denial_names_target_range() {
        let decision = decide(&state(7, "2.0"), &manifest(4, 6, "", ""), false);
        match decision {
            Applicability::Denied { reason } => {
                assert!(reason.contains("DBVersion"));
                assert!(reason.contains("in range 4-6"));
            }
            Applicability::Approved => panic!("expected denial"),
        }
    }

    #[test]
    fn equal_schema_bounds_behave_as_equality() {
        let m = manifest(5, 5, "", "");
        assert!(decide(&state(5, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(4, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(6, "2.0"), &m, false).is_approved());
    }

    #[test]
    fn force_bypasses_all_checks() {
        let m = manifest(4, 6, "1.0", "3.0");
        assert!(decide(&state(99, "not a version"), &m, true).is_approved());
        assert!(decide(&state(0, "0.1"), &m, true).is_approved());
    }

    #[test]
    fn denies_app_version_below_minimum() {
        let decision = decide(&state(5, "0.9"), &manifest(4, 6, "1.0", "3.0"), false);
        match decision {
            Applicability::Denied { reason } => assert!(reason.contains("older than 1.0-3.0")),
            Applicability::Approved => panic!("expected denial"),
        }
    }

    #[test]
    fn denies_app_version_above_maximum() {
        let decision = decide(&state(5, "3.1"), &manifest(4, 6, "1.0", "3.0"), false);
        match decision {
            Applicability::Denied { reason } => assert!(reason.contains("newer than 1.0-3.0")),
            Applicability::Approved => panic!("expected denial"),
        }
    }

    #[test]
    fn app_bounds_are_inclusive() {
        let m = manifest(4, 6, "1.0", "3.0");
        assert!(decide(&state(5, "1.0"), &m, false).is_approved());
        assert!(decide(&state(5, "3.0"), &m, false).is_approved());
    }

    #[test]
    fn unparseable_installation_version_skips_app_check() {
        // Schema passes, app version indeterminate: approved.
        let m = manifest(4, 6, "1.0", "3.0");
        assert!(decide(&state(5, "development"), &m, false).is_approved());
        // Schema still decides on its own.
        assert!(!decide(&state(9, "development"), &m, false).is_approved());
    }

    #[test]
    fn unparseable_min_bound_is_skipped_but_max_enforced() {
        let m = manifest(4, 6, "garbage", "3.0");
        assert!(decide(&state(5, "0.1"), &m, false).is_approved());
        assert!(!decide(&state(5, "3.1"), &m, false).is_approved());
    }

    #[test]
    fn unparseable_max_bound_is_skipped_but_min_enforced() {
        let m = manifest(4, 6, "1.0", "garbage");
        assert!(decide(&state(5, "99.0"), &m, false).is_approved());
        assert!(!decide(&state(5, "0.1"), &m, false).is_approved());
    }

    #[test]
    fn inverted_schema_range_always_denies() {
        let m = manifest(6, 4, "", "");
        assert!(!decide(&state(4, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(5, "2.0"), &m, false).is_approved());
        assert!(!decide(&state(6, "2.0"), &m, false).is_approved());
    }

    #[test]
    fn spaced_versions_compare_as_prereleases() {
        // "2.0 beta" orders before "2.0", so it is older than a 2.0 minimum.
        let m = manifest(4, 6, "2.0", "3.0");
        assert!(!decide(&state(5, "2.0 beta"), &m, false).is_approved());
    }
}
